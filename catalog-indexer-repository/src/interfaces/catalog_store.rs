//! Catalog store trait definition.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StoreError;
use catalog_indexer_shared::{AuthorRow, BookRow, CategoryRow, JoinPath, Watermark};

/// Read-only access to the relational catalog.
///
/// The pipeline needs exactly two query shapes from the store: "IDs modified
/// since a watermark" and "denormalized rows for an ID set, one page at a
/// time". All methods are read-only from the pipeline's perspective.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a single store handle can be
/// shared across the pipeline for the lifetime of the process.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Primary IDs in `table` whose `modified_at` is strictly greater than
    /// the watermark, ordered by modification time ascending.
    async fn changed_ids(&self, table: &str, since: Watermark) -> Result<Vec<Uuid>, StoreError>;

    /// Book IDs referencing any of `leaf_ids` through the given join path,
    /// deduplicated and ordered by the book's modification time.
    ///
    /// Callers must not invoke this with an empty ID set; the enricher
    /// short-circuits before querying.
    async fn books_referencing(
        &self,
        join: &JoinPath,
        leaf_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError>;

    /// One page of denormalized book rows (authors and categories nested)
    /// for the given ID set, ordered by modification time.
    async fn fetch_book_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookRow>, StoreError>;

    /// One page of author rows for the given ID set.
    async fn fetch_author_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuthorRow>, StoreError>;

    /// One page of category rows for the given ID set.
    async fn fetch_category_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CategoryRow>, StoreError>;
}
