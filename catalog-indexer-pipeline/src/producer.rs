//! Change producers.
//!
//! One producer per entity kind: it finds the primary IDs modified since the
//! previous committed watermark and publishes them on the kind's changed-ID
//! topic.

use tracing::debug;

use crate::bus::TopicBus;
use crate::errors::PipelineError;
use catalog_indexer_repository::CatalogStore;
use catalog_indexer_shared::EntityKind;

/// Detects changed IDs for a single entity kind.
#[derive(Debug, Clone, Copy)]
pub struct ChangeProducer {
    kind: EntityKind,
}

impl ChangeProducer {
    /// Create a producer for the given kind.
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    /// Query IDs modified since the previous watermark and publish them.
    ///
    /// The filter uses the bus's previous-watermark slot, not the in-flight
    /// candidate, so a window is never skipped by a cycle that later fails.
    /// When nothing changed, nothing is emitted: downstream stages treat an
    /// absent topic entry as "no work".
    pub async fn produce(
        &self,
        store: &dyn CatalogStore,
        bus: &mut TopicBus,
    ) -> Result<(), PipelineError> {
        let ids = store
            .changed_ids(self.kind.table(), bus.previous_watermark())
            .await?;

        debug!(kind = %self.kind, count = ids.len(), "Produced changed IDs");

        if !ids.is_empty() {
            bus.append(self.kind.changed_topic(), ids);
        }
        Ok(())
    }
}
