//! # Catalog Indexer Shared
//!
//! Shared types for the catalog search indexer: the watermark, the entity
//! kinds synchronized by the pipeline, the denormalized rows read from the
//! catalog store and the documents written to the search index.

pub mod documents;
pub mod kinds;
pub mod rows;
pub mod watermark;

pub use documents::{AuthorDocument, BookDocument, CatalogDocument, CategoryDocument};
pub use kinds::{EntityKind, JoinPath};
pub use rows::{AuthorRef, AuthorRow, BookRow, CategoryRef, CategoryRow};
pub use watermark::Watermark;
