//! # Catalog Indexer
//!
//! Main library for the catalog search indexer.
//!
//! This crate provides the entry point and configuration for running
//! the incremental catalog synchronization pipeline.

pub mod config;

pub use config::{Dependencies, Settings};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] catalog_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] catalog_indexer_repository::SearchError),

    /// Catalog store error.
    #[error("Store error: {0}")]
    StoreError(#[from] catalog_indexer_repository::StoreError),

    /// Checkpoint error.
    #[error("Checkpoint error: {0}")]
    CheckpointError(#[from] catalog_indexer_repository::CheckpointError),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
