//! # Catalog Indexer Pipeline
//!
//! This crate implements the incremental synchronization pipeline that keeps
//! the denormalized search indices in step with the relational catalog.
//!
//! ## Architecture
//!
//! One cycle flows through the stages in order, passing data only through
//! the cycle-scoped topic bus:
//!
//! 1. **Producers**: find primary IDs modified since the committed watermark
//! 2. **Enrichers**: map changed leaf IDs to the books that embed them
//! 3. **Mergers**: stream denormalized rows in bounded pages
//! 4. **Transformer**: map rows into index-document shape
//! 5. **Loader**: bulk-upsert documents into the search index
//! 6. **Orchestrator**: drives the cycle, the lockstep batch rounds, the
//!    retry policy and the watermark commit

pub mod bus;
pub mod descriptors;
pub mod enricher;
pub mod errors;
pub mod loader;
pub mod merger;
pub mod orchestrator;
pub mod producer;
pub mod retry;
pub mod transformer;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::PipelineError;
pub use orchestrator::{CycleReport, Orchestrator};
pub use retry::RetryPolicy;
