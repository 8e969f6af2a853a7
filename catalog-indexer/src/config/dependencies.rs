//! Dependency initialization and wiring for the catalog indexer.

use std::sync::Arc;

use tracing::info;

use crate::config::Settings;
use crate::IndexingError;
use catalog_indexer_pipeline::{descriptors::descriptor_set, Orchestrator};
use catalog_indexer_repository::{
    OpenSearchClient, PostgresCatalogStore, RedisCheckpointStore, SearchEngineClient,
};

/// Pool size for the catalog store. The pipeline is a single logical
/// reader, so a small pool is enough.
const POSTGRES_MAX_CONNECTIONS: u32 = 5;

/// Key prefix for checkpoint state in Redis.
const CHECKPOINT_PREFIX: &str = "catalog-indexer";

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all backends and wire the orchestrator.
    ///
    /// Every connection is established and verified here, so a
    /// misconfigured environment fails at startup rather than mid-cycle.
    pub async fn new(settings: &Settings) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %settings.opensearch_url,
            redis_url = %settings.redis_url,
            batch_size = settings.batch_size,
            "Initializing dependencies"
        );

        let store = PostgresCatalogStore::connect(&settings.database_url, POSTGRES_MAX_CONNECTIONS)
            .await
            .map_err(|e| {
                IndexingError::config(format!("Failed to connect to Postgres: {}", e))
            })?;

        let search_client = OpenSearchClient::new(&settings.opensearch_url)
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        // Verify OpenSearch is reachable
        let healthy = search_client
            .health_check()
            .await
            .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

        if !healthy {
            return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
        }

        info!("OpenSearch connection verified");

        let checkpoint = RedisCheckpointStore::connect(&settings.redis_url, CHECKPOINT_PREFIX)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to connect to Redis: {}", e)))?;

        info!("Redis checkpoint store connected");

        let descriptors = descriptor_set(settings.batch_size)?;

        let orchestrator = Orchestrator::new(
            Arc::new(store),
            Arc::new(search_client),
            Arc::new(checkpoint),
            descriptors,
            settings.retry.clone(),
        )?;

        Ok(Self { orchestrator })
    }
}
