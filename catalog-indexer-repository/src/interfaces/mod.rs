//! Abstract backend interfaces.
//!
//! The pipeline depends only on these traits, so each backend can be
//! swapped for a mock in tests or for a different implementation later.

mod catalog_store;
mod checkpoint_store;
mod search_engine_client;

pub use catalog_store::CatalogStore;
pub use checkpoint_store::CheckpointStore;
pub use search_engine_client::SearchEngineClient;
