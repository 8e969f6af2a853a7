//! Loader for the catalog indexer pipeline.
//!
//! Bulk-upserts transformed documents into the search index, retrying
//! transient engine failures under the shared backoff policy.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::PipelineError;
use crate::retry::{retry_transient, RetryPolicy};
use catalog_indexer_repository::SearchEngineClient;
use catalog_indexer_shared::CatalogDocument;

/// Loader that indexes documents into the search engine.
pub struct SearchLoader {
    client: Arc<dyn SearchEngineClient>,
    retry: RetryPolicy,
}

impl SearchLoader {
    /// Create a loader over the given client.
    pub fn new(client: Arc<dyn SearchEngineClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Bulk-upsert a batch of documents, one request per target index.
    ///
    /// Batches arrive from the lockstep scheduler one entity kind at a time,
    /// so this is normally a single bulk request. Upserts are idempotent:
    /// re-loading an unchanged batch leaves the index byte-identical.
    pub async fn load(&self, documents: Vec<CatalogDocument>) -> Result<(), PipelineError> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut by_index: BTreeMap<&'static str, Vec<CatalogDocument>> = BTreeMap::new();
        for doc in documents {
            by_index.entry(doc.index()).or_default().push(doc);
        }

        for (index, docs) in &by_index {
            let client = &self.client;
            retry_transient(&self.retry, "bulk upsert", || async move {
                client.bulk_upsert(index, docs).await.map_err(Into::into)
            })
            .await?;

            debug!(index, count = docs.len(), "Loaded documents");
        }

        Ok(())
    }

    /// Provision the catalog indices, retrying while the engine is
    /// unreachable. Called once at startup.
    pub async fn ensure_indices(&self) -> Result<(), PipelineError> {
        let client = &self.client;
        retry_transient(&self.retry, "ensure indices", || async move {
            client.ensure_indices().await.map_err(Into::into)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockSearchClient;
    use catalog_indexer_shared::{AuthorDocument, CategoryDocument};
    use uuid::Uuid;

    fn author_doc(name: &str) -> CatalogDocument {
        CatalogDocument::Author(AuthorDocument {
            id: Uuid::new_v4(),
            name: name.to_string(),
            last_name: "Smith".to_string(),
        })
    }

    #[tokio::test]
    async fn test_load_routes_documents_by_index() {
        let client = Arc::new(MockSearchClient::new());
        let loader = SearchLoader::new(client.clone(), RetryPolicy::default());

        let docs = vec![
            author_doc("Ann"),
            CatalogDocument::Category(CategoryDocument {
                id: Uuid::new_v4(),
                name: "History".to_string(),
            }),
        ];

        loader.load(docs).await.unwrap();

        let calls = client.bulk_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, "authors");
        assert_eq!(calls[1].0, "categories");
    }

    #[tokio::test]
    async fn test_empty_batch_issues_no_request() {
        let client = Arc::new(MockSearchClient::new());
        let loader = SearchLoader::new(client.clone(), RetryPolicy::default());

        loader.load(Vec::new()).await.unwrap();

        assert!(client.bulk_calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_bulk_failures_are_retried() {
        let client = Arc::new(MockSearchClient::new().failing_times(2));
        let loader = SearchLoader::new(client.clone(), RetryPolicy::default());

        loader.load(vec![author_doc("Ann")]).await.unwrap();

        // Two failed attempts plus the successful one.
        assert_eq!(client.bulk_attempts(), 3);
        assert_eq!(client.bulk_calls().len(), 1);
    }
}
