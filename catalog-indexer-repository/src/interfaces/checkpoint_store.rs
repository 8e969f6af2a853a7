//! Checkpoint store trait definition.

use async_trait::async_trait;

use crate::errors::CheckpointError;
use catalog_indexer_shared::Watermark;

/// Durable storage for the pipeline's watermark.
///
/// The cycle protocol is publish / stage / commit: the previous committed
/// watermark is published for external observers, a candidate is staged from
/// the current clock, and the candidate becomes durable only when the cycle
/// fully completes. A crash between staging and commit leaves the previous
/// value in place, so the next cycle reprocesses the same window — safe
/// because every downstream write is an idempotent upsert.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// The last durably committed watermark, or epoch if none exists.
    async fn load(&self) -> Result<Watermark, CheckpointError>;

    /// Expose the given (previous) watermark for external lag inspection.
    ///
    /// Written before the candidate is staged so a concurrent observer sees
    /// a consistent "old" value until the cycle commits.
    async fn publish(&self, watermark: Watermark) -> Result<(), CheckpointError>;

    /// Durably persist the candidate, replacing the previous value.
    async fn commit(&self, candidate: Watermark) -> Result<(), CheckpointError>;

    /// Capture the current time as this cycle's candidate watermark.
    ///
    /// Not yet durable; the candidate only becomes the committed watermark
    /// through [`CheckpointStore::commit`].
    fn stage_next(&self) -> Watermark {
        Watermark::now()
    }
}
