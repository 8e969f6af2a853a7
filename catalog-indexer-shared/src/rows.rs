//! Denormalized row shapes read from the catalog store.
//!
//! These are the results of the merger queries: a root row joined with all of
//! its related sub-entities. Rows are uniquely keyed by entity ID and safe to
//! re-derive any number of times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An author reference embedded in a denormalized book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    /// Full display name, pre-joined in SQL (`name || ' ' || last_name`).
    pub name: String,
}

/// A category reference embedded in a denormalized book row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
}

/// A book joined with its authors and categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub isbn: String,
    pub publication_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub authors: Vec<AuthorRef>,
    pub categories: Vec<CategoryRef>,
}

/// An author row as selected by the author merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorRow {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
    pub biography: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// A category row as selected by the category merger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}
