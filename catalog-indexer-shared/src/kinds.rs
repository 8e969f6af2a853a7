//! The entity kinds synchronized by the pipeline and their join topology.

use std::fmt;

/// An entity kind tracked by the synchronization pipeline.
///
/// `Book` is the root kind: its documents embed authors and categories, so a
/// change to either leaf kind must re-denormalize every book referencing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Book,
    Author,
    Category,
}

impl EntityKind {
    /// All kinds, in pipeline order (root first).
    pub const ALL: [EntityKind; 3] = [EntityKind::Book, EntityKind::Author, EntityKind::Category];

    /// The source table for this kind.
    pub fn table(&self) -> &'static str {
        match self {
            EntityKind::Book => "public.books",
            EntityKind::Author => "public.authors",
            EntityKind::Category => "public.categories",
        }
    }

    /// The search index documents of this kind are written to.
    pub fn index(&self) -> &'static str {
        match self {
            EntityKind::Book => "books",
            EntityKind::Author => "authors",
            EntityKind::Category => "categories",
        }
    }

    /// The cycle-scoped topic carrying this kind's changed IDs.
    pub fn changed_topic(&self) -> &'static str {
        match self {
            EntityKind::Book => "book_ids",
            EntityKind::Author => "author_ids",
            EntityKind::Category => "category_ids",
        }
    }

    /// The join path from this leaf kind back to the root kind, or `None`
    /// for kinds with no dependents (the root itself).
    pub fn join_path(&self) -> Option<JoinPath> {
        match self {
            EntityKind::Book => None,
            EntityKind::Author => Some(JoinPath {
                join_table: "public.books_authors",
                leaf_column: "author_id",
                root_column: "book_id",
            }),
            EntityKind::Category => Some(JoinPath {
                join_table: "public.books_categories",
                leaf_column: "category_id",
                root_column: "book_id",
            }),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Book => write!(f, "book"),
            EntityKind::Author => write!(f, "author"),
            EntityKind::Category => write!(f, "category"),
        }
    }
}

/// One join hop from a leaf table back to the root (books) table.
///
/// Enrichment currently traverses a single hop. If deeper relationships are
/// ever added this becomes a path rather than a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinPath {
    /// The association table joining leaf rows to books.
    pub join_table: &'static str,
    /// The column holding the leaf entity ID.
    pub leaf_column: &'static str,
    /// The column holding the book ID.
    pub root_column: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_kinds_declare_a_join_path() {
        assert!(EntityKind::Book.join_path().is_none());
        assert!(EntityKind::Author.join_path().is_some());
        assert!(EntityKind::Category.join_path().is_some());
    }

    #[test]
    fn test_enriched_kinds_target_the_book_topic() {
        for kind in [EntityKind::Author, EntityKind::Category] {
            let join = kind.join_path().unwrap();
            assert_eq!(join.root_column, "book_id");
        }
    }
}
