//! Catalog search indexer.
//!
//! Incrementally synchronizes the book catalog from Postgres into
//! OpenSearch, driven by a Redis-backed watermark.

use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;

use catalog_indexer::{Dependencies, IndexingError, Settings};

#[tokio::main]
async fn main() -> Result<(), IndexingError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;
    info!(
        poll_interval_secs = settings.poll_interval.as_secs(),
        "Catalog indexer starting"
    );

    let dependencies = Dependencies::new(&settings).await?;
    dependencies.orchestrator.run(settings.poll_interval).await?;

    Ok(())
}
