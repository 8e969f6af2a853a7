//! Row-to-document transformation.
//!
//! A pure mapping from denormalized rows to index documents: field renames,
//! nested-list projection and dropping join metadata. A row failing
//! required-field validation is dropped with a logged warning; a single
//! malformed row must never abort an otherwise-healthy batch.

use tracing::warn;

use crate::merger::RowBatch;
use catalog_indexer_shared::{
    documents::BookAuthor, AuthorDocument, AuthorRow, BookDocument, BookRow, CatalogDocument,
    CategoryDocument, CategoryRow,
};

/// Transform a row batch into index documents, dropping invalid rows.
pub fn transform_batch(batch: RowBatch) -> Vec<CatalogDocument> {
    match batch {
        RowBatch::Books(rows) => rows
            .into_iter()
            .filter_map(transform_book)
            .map(CatalogDocument::from)
            .collect(),
        RowBatch::Authors(rows) => rows
            .into_iter()
            .filter_map(transform_author)
            .map(CatalogDocument::from)
            .collect(),
        RowBatch::Categories(rows) => rows
            .into_iter()
            .filter_map(transform_category)
            .map(CatalogDocument::from)
            .collect(),
    }
}

fn transform_book(row: BookRow) -> Option<BookDocument> {
    if row.title.trim().is_empty() {
        warn!(book_id = %row.id, "Dropping book row with empty title");
        return None;
    }

    Some(BookDocument {
        id: row.id,
        title: row.title,
        description: row.description,
        language: row.language,
        isbn: row.isbn,
        publication_date: row.publication_date,
        authors: row
            .authors
            .into_iter()
            .map(|a| BookAuthor {
                id: a.id,
                name: a.name,
            })
            .collect(),
        categories: row.categories.into_iter().map(|c| c.name).collect(),
        created_at: row.created_at,
        modified_at: row.modified_at,
    })
}

fn transform_author(row: AuthorRow) -> Option<AuthorDocument> {
    if row.name.trim().is_empty() && row.last_name.trim().is_empty() {
        warn!(author_id = %row.id, "Dropping author row with empty name");
        return None;
    }

    Some(AuthorDocument {
        id: row.id,
        name: row.name,
        last_name: row.last_name,
    })
}

fn transform_category(row: CategoryRow) -> Option<CategoryDocument> {
    if row.name.trim().is_empty() {
        warn!(category_id = %row.id, "Dropping category row with empty name");
        return None;
    }

    Some(CategoryDocument {
        id: row.id,
        name: row.name,
    })
}
