//! Postgres catalog store implementation.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::interfaces::CatalogStore;
use crate::postgres::queries;
use catalog_indexer_shared::{
    AuthorRef, AuthorRow, BookRow, CategoryRef, CategoryRow, JoinPath, Watermark,
};

/// Catalog store backed by a Postgres connection pool.
///
/// The pool is created once at process start and reused for every cycle.
pub struct PostgresCatalogStore {
    pool: PgPool,
}

/// Internal row shape for the denormalized book query; the JSONB aggregates
/// are unwrapped before the row leaves this module.
#[derive(sqlx::FromRow)]
struct BookRecord {
    id: Uuid,
    title: String,
    description: Option<String>,
    language: String,
    isbn: String,
    publication_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    authors: Json<Vec<AuthorRef>>,
    categories: Json<Vec<CategoryRef>>,
}

impl From<BookRecord> for BookRow {
    fn from(record: BookRecord) -> Self {
        BookRow {
            id: record.id,
            title: record.title,
            description: record.description,
            language: record.language,
            isbn: record.isbn,
            publication_date: record.publication_date,
            created_at: record.created_at,
            modified_at: record.modified_at,
            authors: record.authors.0,
            categories: record.categories.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AuthorRecord {
    id: Uuid,
    name: String,
    last_name: String,
    biography: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl From<AuthorRecord> for AuthorRow {
    fn from(record: AuthorRecord) -> Self {
        AuthorRow {
            id: record.id,
            name: record.name,
            last_name: record.last_name,
            biography: record.biography,
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRecord {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl From<CategoryRecord> for CategoryRow {
    fn from(record: CategoryRecord) -> Self {
        CategoryRow {
            id: record.id,
            name: record.name,
            description: record.description,
            created_at: record.created_at,
            modified_at: record.modified_at,
        }
    }
}

impl PostgresCatalogStore {
    /// Connect to Postgres and build the shared pool.
    ///
    /// # Arguments
    ///
    /// * `url` - Postgres connection string
    /// * `max_connections` - Pool size; the pipeline is a single logical
    ///   worker so a small pool suffices
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(url)
            .await?;

        info!(max_connections, "Connected to Postgres catalog store");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (used by integration tests).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn changed_ids(&self, table: &str, since: Watermark) -> Result<Vec<Uuid>, StoreError> {
        let sql = queries::changed_ids(table);
        let ids: Vec<Uuid> = sqlx::query_scalar(&sql)
            .bind(since.timestamp())
            .fetch_all(&self.pool)
            .await?;

        debug!(table, count = ids.len(), "Fetched changed IDs");
        Ok(ids)
    }

    async fn books_referencing(
        &self,
        join: &JoinPath,
        leaf_ids: &[Uuid],
    ) -> Result<Vec<Uuid>, StoreError> {
        let sql = queries::books_referencing(join);
        let rows: Vec<(Uuid, DateTime<Utc>)> = sqlx::query_as(&sql)
            .bind(leaf_ids)
            .fetch_all(&self.pool)
            .await?;

        debug!(
            join_table = join.join_table,
            count = rows.len(),
            "Enriched leaf changes to book IDs"
        );
        Ok(rows.into_iter().map(|(id, _)| id).collect())
    }

    async fn fetch_book_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<BookRow>, StoreError> {
        let records: Vec<BookRecord> = sqlx::query_as(queries::BOOK_PAGE)
            .bind(ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(BookRow::from).collect())
    }

    async fn fetch_author_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuthorRow>, StoreError> {
        let records: Vec<AuthorRecord> = sqlx::query_as(queries::AUTHOR_PAGE)
            .bind(ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(AuthorRow::from).collect())
    }

    async fn fetch_category_page(
        &self,
        ids: &[Uuid],
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CategoryRow>, StoreError> {
        let records: Vec<CategoryRecord> = sqlx::query_as(queries::CATEGORY_PAGE)
            .bind(ids)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(records.into_iter().map(CategoryRow::from).collect())
    }
}
