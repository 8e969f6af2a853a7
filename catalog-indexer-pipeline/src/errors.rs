//! Error types for the catalog indexer pipeline.

use thiserror::Error;

use catalog_indexer_repository::{CheckpointError, SearchError, StoreError};

/// Errors that can occur while running the pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from the relational catalog store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Error from the checkpoint backing store.
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] CheckpointError),

    /// Invalid pipeline configuration, raised at startup.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error is a transient failure the retry policy may absorb.
    ///
    /// Configuration errors are never transient: they indicate a programming
    /// or deployment mistake and must fail fast.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Search(e) => e.is_transient(),
            Self::Checkpoint(e) => e.is_transient(),
            Self::Config(_) => false,
        }
    }
}
