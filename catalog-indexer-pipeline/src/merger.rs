//! Paginated mergers.
//!
//! A merger turns a kind's changed-ID set into a stream of denormalized row
//! batches, fetching one page per pull so downstream transform and load work
//! interleaves with fetching instead of materializing the whole result set.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::bus::TopicBus;
use crate::descriptors::KindDescriptor;
use crate::errors::PipelineError;
use crate::retry::{retry_transient, RetryPolicy};
use catalog_indexer_repository::CatalogStore;
use catalog_indexer_shared::{AuthorRow, BookRow, CategoryRow, EntityKind};
use uuid::Uuid;

/// One batch of denormalized rows, all of a single entity kind.
#[derive(Debug)]
pub enum RowBatch {
    Books(Vec<BookRow>),
    Authors(Vec<AuthorRow>),
    Categories(Vec<CategoryRow>),
}

impl RowBatch {
    /// Number of rows in the batch.
    pub fn len(&self) -> usize {
        match self {
            RowBatch::Books(rows) => rows.len(),
            RowBatch::Authors(rows) => rows.len(),
            RowBatch::Categories(rows) => rows.len(),
        }
    }

    /// Whether the batch holds no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A resumable source of row batches.
///
/// The contract is "pull next batch or signal done, independently per kind,
/// without blocking on other kinds": `Ok(None)` means exhausted, and an
/// exhausted stream stays exhausted on every later pull (fused).
#[async_trait]
pub trait BatchStream: Send {
    /// Pull the next batch of rows, or `None` once the stream is exhausted.
    async fn next_batch(&mut self) -> Result<Option<RowBatch>, PipelineError>;
}

/// Merger for one entity kind, paging denormalized rows out of the catalog
/// store for the changed-ID set accumulated on the bus.
pub struct Merger {
    kind: EntityKind,
    store: Arc<dyn CatalogStore>,
    retry: RetryPolicy,
    ids: Vec<Uuid>,
    batch_size: usize,
    offset: i64,
    exhausted: bool,
}

impl Merger {
    /// Build a merger from the bus's accumulated changed-ID set.
    ///
    /// An empty set yields an immediately-exhausted stream, so a kind with
    /// no work never blocks the lockstep rounds.
    pub fn from_bus(
        descriptor: &KindDescriptor,
        store: Arc<dyn CatalogStore>,
        retry: RetryPolicy,
        bus: &TopicBus,
    ) -> Self {
        let ids = bus.collect_unique(descriptor.kind.changed_topic());
        let exhausted = ids.is_empty();

        debug!(
            kind = %descriptor.kind,
            changed = ids.len(),
            batch_size = descriptor.batch_size,
            "Prepared merger"
        );

        Self {
            kind: descriptor.kind,
            store,
            retry,
            ids,
            batch_size: descriptor.batch_size,
            offset: 0,
            exhausted,
        }
    }

    async fn fetch_page(&self) -> Result<RowBatch, PipelineError> {
        let limit = self.batch_size as i64;
        let batch = match self.kind {
            EntityKind::Book => RowBatch::Books(
                self.store
                    .fetch_book_page(&self.ids, limit, self.offset)
                    .await?,
            ),
            EntityKind::Author => RowBatch::Authors(
                self.store
                    .fetch_author_page(&self.ids, limit, self.offset)
                    .await?,
            ),
            EntityKind::Category => RowBatch::Categories(
                self.store
                    .fetch_category_page(&self.ids, limit, self.offset)
                    .await?,
            ),
        };
        Ok(batch)
    }
}

#[async_trait]
impl BatchStream for Merger {
    async fn next_batch(&mut self) -> Result<Option<RowBatch>, PipelineError> {
        if self.exhausted {
            return Ok(None);
        }

        let batch = {
            let this = &*self;
            retry_transient(&this.retry, "merge page fetch", || this.fetch_page()).await?
        };

        let fetched = batch.len();
        self.offset += fetched as i64;
        if fetched < self.batch_size {
            self.exhausted = true;
        }

        if fetched == 0 {
            return Ok(None);
        }

        debug!(kind = %self.kind, rows = fetched, "Merged row page");
        Ok(Some(batch))
    }
}
