//! Search engine client trait definition.

use async_trait::async_trait;

use crate::errors::SearchError;
use catalog_indexer_shared::CatalogDocument;

/// Write-side interface to the search engine.
///
/// The pipeline only needs bulk upserts keyed by document ID plus one-time
/// index provisioning; querying and ranking live in the serving layer, not
/// here.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Upsert a batch of documents into the given index in one bulk request.
    ///
    /// A document with an ID already present in the index is replaced, so
    /// re-sending the same batch any number of times converges on the same
    /// index state.
    ///
    /// # Arguments
    ///
    /// * `index` - The target index name
    /// * `documents` - The documents to upsert, keyed by their entity ID
    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[CatalogDocument],
    ) -> Result<(), SearchError>;

    /// Create the catalog indices with their mappings if they do not exist.
    ///
    /// Called once at startup, before the first cycle.
    async fn ensure_indices(&self) -> Result<(), SearchError>;

    /// Check if the search engine is reachable and healthy.
    async fn health_check(&self) -> Result<bool, SearchError>;
}
