//! # Catalog Indexer Repository
//!
//! Backend access for the catalog indexer: traits for the relational catalog
//! store, the search engine and the checkpoint backing store, plus concrete
//! Postgres, OpenSearch and Redis implementations. All pipeline code depends
//! on the traits so backends can be mocked in tests.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod postgres;
pub mod redis;

pub use errors::{CheckpointError, SearchError, StoreError};
pub use interfaces::{CatalogStore, CheckpointStore, SearchEngineClient};
pub use opensearch::OpenSearchClient;
pub use postgres::PostgresCatalogStore;
pub use redis::RedisCheckpointStore;
