//! Redis checkpoint store implementation.
//!
//! The watermark is stored as an RFC 3339 string under a committed key; a
//! separate published key exposes the previous watermark to external
//! observers for lag reporting while a cycle is in flight.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::{debug, info};

use crate::errors::CheckpointError;
use crate::interfaces::CheckpointStore;
use catalog_indexer_shared::Watermark;

/// Checkpoint store backed by Redis.
pub struct RedisCheckpointStore {
    connection: MultiplexedConnection,
    committed_key: String,
    published_key: String,
}

impl RedisCheckpointStore {
    /// Connect to Redis and namespace the checkpoint keys under `prefix`.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection string (e.g., "redis://localhost:6379")
    /// * `prefix` - Key prefix isolating this pipeline's checkpoint
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, CheckpointError> {
        let client =
            redis::Client::open(url).map_err(|e| CheckpointError::connection(e.to_string()))?;
        let connection = client.get_multiplexed_tokio_connection().await?;

        info!(prefix, "Connected to Redis checkpoint store");

        Ok(Self {
            connection,
            committed_key: format!("{prefix}:watermark"),
            published_key: format!("{prefix}:watermark:published"),
        })
    }
}

#[async_trait]
impl CheckpointStore for RedisCheckpointStore {
    async fn load(&self) -> Result<Watermark, CheckpointError> {
        let mut connection = self.connection.clone();
        let stored: Option<String> = connection.get(&self.committed_key).await?;

        match stored {
            Some(value) => Ok(Watermark::parse(&value)?),
            None => {
                debug!("No committed watermark found, defaulting to epoch");
                Ok(Watermark::epoch())
            }
        }
    }

    async fn publish(&self, watermark: Watermark) -> Result<(), CheckpointError> {
        let mut connection = self.connection.clone();
        let _: () = connection
            .set(&self.published_key, watermark.to_rfc3339())
            .await?;
        Ok(())
    }

    async fn commit(&self, candidate: Watermark) -> Result<(), CheckpointError> {
        let mut connection = self.connection.clone();
        let _: () = connection
            .set(&self.committed_key, candidate.to_rfc3339())
            .await?;

        debug!(watermark = %candidate, "Committed watermark");
        Ok(())
    }
}
