//! In-memory backend mocks shared by the pipeline tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use catalog_indexer_repository::{
    CatalogStore, CheckpointError, CheckpointStore, SearchEngineClient, SearchError, StoreError,
};
use catalog_indexer_shared::{
    AuthorRow, BookRow, CatalogDocument, CategoryRow, JoinPath, Watermark,
};

/// In-memory catalog store seeded with rows and join-table links.
#[derive(Default)]
pub struct MockCatalogStore {
    books: Vec<BookRow>,
    authors: Vec<AuthorRow>,
    categories: Vec<CategoryRow>,
    /// (book_id, leaf_id) pairs per join table.
    book_author_links: Vec<(Uuid, Uuid)>,
    book_category_links: Vec<(Uuid, Uuid)>,
    enrich_queries: AtomicU32,
    /// Remaining `changed_ids` calls that fail with a connection error.
    failing_changed_calls: AtomicU32,
}

impl MockCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_book(mut self, id: Uuid, title: &str, modified_at: DateTime<Utc>) -> Self {
        self.books.push(BookRow {
            id,
            title: title.to_string(),
            description: None,
            language: "en".to_string(),
            isbn: "0000000000".to_string(),
            publication_date: modified_at,
            created_at: modified_at,
            modified_at,
            authors: Vec::new(),
            categories: Vec::new(),
        });
        self
    }

    pub fn with_author(
        mut self,
        id: Uuid,
        name: &str,
        last_name: &str,
        modified_at: DateTime<Utc>,
    ) -> Self {
        self.authors.push(AuthorRow {
            id,
            name: name.to_string(),
            last_name: last_name.to_string(),
            biography: None,
            created_at: modified_at,
            modified_at,
        });
        self
    }

    pub fn with_category(mut self, id: Uuid, name: &str, modified_at: DateTime<Utc>) -> Self {
        self.categories.push(CategoryRow {
            id,
            name: name.to_string(),
            description: None,
            created_at: modified_at,
            modified_at,
        });
        self
    }

    /// Link a book to an author, mirroring the `books_authors` join table
    /// and embedding the author reference in the book's denormalized row.
    pub fn with_book_author(mut self, book_id: Uuid, author_id: Uuid) -> Self {
        self.book_author_links.push((book_id, author_id));
        if let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) {
            let name = self
                .authors
                .iter()
                .find(|a| a.id == author_id)
                .map(|a| format!("{} {}", a.name, a.last_name))
                .unwrap_or_else(|| "Unknown Author".to_string());
            book.authors
                .push(catalog_indexer_shared::AuthorRef { id: author_id, name });
        }
        self
    }

    pub fn with_book_category(mut self, book_id: Uuid, category_id: Uuid) -> Self {
        self.book_category_links.push((book_id, category_id));
        if let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) {
            let name = self
                .categories
                .iter()
                .find(|c| c.id == category_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Unknown Category".to_string());
            book.categories
                .push(catalog_indexer_shared::CategoryRef { id: category_id, name });
        }
        self
    }

    /// Make the next `count` calls to `changed_ids` fail transiently.
    pub fn failing_changed_calls(self, count: u32) -> Self {
        self.failing_changed_calls.store(count, Ordering::SeqCst);
        self
    }

    pub fn enrich_queries(&self) -> u32 {
        self.enrich_queries.load(Ordering::SeqCst)
    }

    fn page<T: Clone>(rows: Vec<T>, limit: i64, offset: i64) -> Vec<T> {
        rows.into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect()
    }
}

#[async_trait]
impl CatalogStore for MockCatalogStore {
    async fn changed_ids(&self, table: &str, since: Watermark) -> Result<Vec<Uuid>, StoreError> {
        if self.failing_changed_calls.load(Ordering::SeqCst) > 0 {
            self.failing_changed_calls.fetch_sub(1, Ordering::SeqCst);
            return Err(StoreError::connection("mock store unavailable"));
        }

        let mut changed: Vec<(DateTime<Utc>, Uuid)> = match table {
            "public.books" => self.books.iter().map(|r| (r.modified_at, r.id)).collect(),
            "public.authors" => self.authors.iter().map(|r| (r.modified_at, r.id)).collect(),
            "public.categories" => self
                .categories
                .iter()
                .map(|r| (r.modified_at, r.id))
                .collect(),
            other => return Err(StoreError::query(format!("unknown table: {other}"))),
        };
        changed.retain(|(modified, _)| *modified > since.timestamp());
        changed.sort();
        Ok(changed.into_iter().map(|(_, id)| id).collect())
    }

    async fn books_referencing(
        &self,
        join: &JoinPath,
        leaf_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError> {
        assert!(!leaf_ids.is_empty(), "enricher queried with an empty ID set");
        self.enrich_queries.fetch_add(1, Ordering::SeqCst);

        let links = match join.join_table {
            "public.books_authors" => &self.book_author_links,
            "public.books_categories" => &self.book_category_links,
            other => return Err(StoreError::query(format!("unknown join table: {other}"))),
        };

        let mut hits: Vec<(DateTime<Utc>, Uuid)> = self
            .books
            .iter()
            .filter(|book| {
                links
                    .iter()
                    .any(|(b, leaf)| *b == book.id && leaf_ids.contains(leaf))
            })
            .map(|book| (book.modified_at, book.id))
            .collect();
        hits.sort();
        hits.dedup();
        Ok(hits.into_iter().map(|(_, id)| id).collect())
    }

    async fn fetch_book_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookRow>, StoreError> {
        let mut rows: Vec<BookRow> = self
            .books
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.modified_at, r.id));
        Ok(Self::page(rows, limit, offset))
    }

    async fn fetch_author_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuthorRow>, StoreError> {
        let mut rows: Vec<AuthorRow> = self
            .authors
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.modified_at, r.id));
        Ok(Self::page(rows, limit, offset))
    }

    async fn fetch_category_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CategoryRow>, StoreError> {
        let mut rows: Vec<CategoryRow> = self
            .categories
            .iter()
            .filter(|r| ids.contains(&r.id))
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.modified_at, r.id));
        Ok(Self::page(rows, limit, offset))
    }
}

/// Mock search client recording every successful bulk upsert.
#[derive(Default)]
pub struct MockSearchClient {
    bulk_calls: Mutex<Vec<(String, Vec<CatalogDocument>)>>,
    bulk_attempts: AtomicU32,
    failing_bulk_calls: AtomicU32,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` bulk upserts fail transiently.
    pub fn failing_times(self, count: u32) -> Self {
        self.failing_bulk_calls.store(count, Ordering::SeqCst);
        self
    }

    /// Successful bulk upserts, in call order.
    pub fn bulk_calls(&self) -> Vec<(String, Vec<CatalogDocument>)> {
        self.bulk_calls.lock().unwrap().clone()
    }

    /// Total bulk attempts, failed ones included.
    pub fn bulk_attempts(&self) -> u32 {
        self.bulk_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[CatalogDocument],
    ) -> Result<(), SearchError> {
        self.bulk_attempts.fetch_add(1, Ordering::SeqCst);
        if self.failing_bulk_calls.load(Ordering::SeqCst) > 0 {
            self.failing_bulk_calls.fetch_sub(1, Ordering::SeqCst);
            return Err(SearchError::connection("mock engine unavailable"));
        }

        self.bulk_calls
            .lock()
            .unwrap()
            .push((index.to_string(), documents.to_vec()));
        Ok(())
    }

    async fn ensure_indices(&self) -> Result<(), SearchError> {
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

/// Mock checkpoint store over an in-memory watermark.
pub struct MockCheckpointStore {
    committed: Mutex<Option<Watermark>>,
    published: Mutex<Option<Watermark>>,
    failing_commits: AtomicU32,
    stage_as: Mutex<Option<Watermark>>,
}

impl MockCheckpointStore {
    pub fn new() -> Self {
        Self {
            committed: Mutex::new(None),
            published: Mutex::new(None),
            failing_commits: AtomicU32::new(0),
            stage_as: Mutex::new(None),
        }
    }

    pub fn with_committed(self, watermark: Watermark) -> Self {
        *self.committed.lock().unwrap() = Some(watermark);
        self
    }

    /// Pin the candidate watermark instead of reading the clock.
    pub fn staging_as(self, watermark: Watermark) -> Self {
        *self.stage_as.lock().unwrap() = Some(watermark);
        self
    }

    /// Make the next `count` commits fail transiently.
    pub fn failing_commits(self, count: u32) -> Self {
        self.failing_commits.store(count, Ordering::SeqCst);
        self
    }

    /// Make every commit fail with a non-transient error.
    pub fn rejecting_commits(self) -> Self {
        self.failing_commits.store(u32::MAX, Ordering::SeqCst);
        self
    }

    pub fn committed(&self) -> Option<Watermark> {
        *self.committed.lock().unwrap()
    }

    pub fn published(&self) -> Option<Watermark> {
        *self.published.lock().unwrap()
    }
}

#[async_trait]
impl CheckpointStore for MockCheckpointStore {
    async fn load(&self) -> Result<Watermark, CheckpointError> {
        Ok(self.committed().unwrap_or_else(Watermark::epoch))
    }

    async fn publish(&self, watermark: Watermark) -> Result<(), CheckpointError> {
        *self.published.lock().unwrap() = Some(watermark);
        Ok(())
    }

    async fn commit(&self, candidate: Watermark) -> Result<(), CheckpointError> {
        let remaining = self.failing_commits.load(Ordering::SeqCst);
        if remaining == u32::MAX {
            return Err(CheckpointError::parse("mock commit rejected"));
        }
        if remaining > 0 {
            self.failing_commits.fetch_sub(1, Ordering::SeqCst);
            return Err(CheckpointError::connection("mock checkpoint unavailable"));
        }

        *self.committed.lock().unwrap() = Some(candidate);
        Ok(())
    }

    fn stage_next(&self) -> Watermark {
        self.stage_as
            .lock()
            .unwrap()
            .unwrap_or_else(Watermark::now)
    }
}
