//! Document shapes written to the search index.
//!
//! Transformation from rows to documents is pure: field renames, nested-list
//! projection and dropping join metadata not needed downstream. A document is
//! keyed by the same entity ID as its source row, so re-indexing it is an
//! idempotent upsert.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An author entry nested inside a book document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAuthor {
    pub id: Uuid,
    pub name: String,
}

/// A book document for the `books` index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDocument {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub language: String,
    pub isbn: String,
    pub publication_date: DateTime<Utc>,
    pub authors: Vec<BookAuthor>,
    /// Category names only; category IDs are internal to the catalog.
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// An author document for the `authors` index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorDocument {
    pub id: Uuid,
    pub name: String,
    pub last_name: String,
}

/// A category document for the `categories` index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDocument {
    pub id: Uuid,
    pub name: String,
}

/// A document of any catalog kind, ready for bulk upsert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogDocument {
    Book(BookDocument),
    Author(AuthorDocument),
    Category(CategoryDocument),
}

impl CatalogDocument {
    /// The document ID used as the search index `_id`.
    pub fn id(&self) -> Uuid {
        match self {
            CatalogDocument::Book(doc) => doc.id,
            CatalogDocument::Author(doc) => doc.id,
            CatalogDocument::Category(doc) => doc.id,
        }
    }

    /// The index this document belongs to.
    pub fn index(&self) -> &'static str {
        match self {
            CatalogDocument::Book(_) => "books",
            CatalogDocument::Author(_) => "authors",
            CatalogDocument::Category(_) => "categories",
        }
    }
}

impl From<BookDocument> for CatalogDocument {
    fn from(doc: BookDocument) -> Self {
        CatalogDocument::Book(doc)
    }
}

impl From<AuthorDocument> for CatalogDocument {
    fn from(doc: AuthorDocument) -> Self {
        CatalogDocument::Author(doc)
    }
}

impl From<CategoryDocument> for CatalogDocument {
    fn from(doc: CategoryDocument) -> Self {
        CatalogDocument::Category(doc)
    }
}
