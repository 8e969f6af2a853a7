//! Relationship enrichers.
//!
//! An enricher translates "this leaf entity changed" into "these books must
//! be re-denormalized": it reads a leaf kind's changed-ID topic and appends
//! the referencing book IDs to the book topic. Enrichers run strictly after
//! all producers and before any merger, so the book merger sees the union of
//! directly-changed and indirectly-affected book IDs.

use tracing::debug;

use crate::bus::TopicBus;
use crate::errors::PipelineError;
use catalog_indexer_repository::CatalogStore;
use catalog_indexer_shared::{EntityKind, JoinPath};

/// Maps a leaf kind's changed IDs to the books that embed them.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipEnricher {
    kind: EntityKind,
    join: JoinPath,
}

impl RelationshipEnricher {
    /// Create an enricher for a leaf kind.
    ///
    /// Fails at startup when the kind declares no join path back to the
    /// root (only the root kind itself may omit one).
    pub fn new(kind: EntityKind) -> Result<Self, PipelineError> {
        let join = kind.join_path().ok_or_else(|| {
            PipelineError::config(format!("kind '{kind}' has no join path to enrich through"))
        })?;
        Ok(Self { kind, join })
    }

    /// Resolve changed leaf IDs to book IDs and publish them.
    ///
    /// An empty input topic short-circuits without touching the store: an
    /// enricher never queries with an empty ID set.
    pub async fn enrich(
        &self,
        store: &dyn CatalogStore,
        bus: &mut TopicBus,
    ) -> Result<(), PipelineError> {
        let leaf_ids = bus.collect_unique(self.kind.changed_topic());
        if leaf_ids.is_empty() {
            return Ok(());
        }

        let book_ids = store.books_referencing(&self.join, &leaf_ids).await?;

        debug!(
            kind = %self.kind,
            leaf_count = leaf_ids.len(),
            book_count = book_ids.len(),
            "Enriched leaf changes to affected books"
        );

        if !book_ids.is_empty() {
            bus.append(EntityKind::Book.changed_topic(), book_ids);
        }
        Ok(())
    }
}
