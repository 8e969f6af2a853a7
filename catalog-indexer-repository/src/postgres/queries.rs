//! SQL for the catalog store.
//!
//! Table and column identifiers come from the static kind descriptors, never
//! from user input; only ID sets, watermarks and page bounds are bound as
//! parameters.

use catalog_indexer_shared::JoinPath;

/// IDs modified since a watermark, oldest first.
pub fn changed_ids(table: &str) -> String {
    format!(
        "SELECT id FROM {table} \
         WHERE modified_at > $1 \
         ORDER BY modified_at"
    )
}

/// Book IDs referencing any of a leaf-kind ID set through one join hop.
pub fn books_referencing(join: &JoinPath) -> String {
    format!(
        "SELECT DISTINCT b.id, b.modified_at \
         FROM public.books AS b \
         JOIN {join_table} AS jt ON jt.{root_column} = b.id \
         WHERE jt.{leaf_column} = ANY($1) \
         ORDER BY b.modified_at",
        join_table = join.join_table,
        root_column = join.root_column,
        leaf_column = join.leaf_column,
    )
}

/// One page of denormalized book rows with nested author and category
/// aggregates. Ordered by `(modified_at, id)` so pagination is deterministic.
pub const BOOK_PAGE: &str = "\
    SELECT
        b.id, b.title, b.description, b.language, b.isbn,
        b.publication_date, b.created_at, b.modified_at,
        COALESCE(
            JSONB_AGG(
                DISTINCT jsonb_build_object(
                    'id', a.id,
                    'name', a.name || ' ' || a.last_name
                )
            ) FILTER (WHERE a.id IS NOT NULL),
            '[]'::jsonb
        ) AS authors,
        COALESCE(
            JSONB_AGG(
                DISTINCT jsonb_build_object(
                    'id', c.id,
                    'name', c.name
                )
            ) FILTER (WHERE c.id IS NOT NULL),
            '[]'::jsonb
        ) AS categories
    FROM public.books AS b
    LEFT JOIN public.books_authors ba ON ba.book_id = b.id
    LEFT JOIN public.authors a ON a.id = ba.author_id
    LEFT JOIN public.books_categories bc ON bc.book_id = b.id
    LEFT JOIN public.categories c ON c.id = bc.category_id
    WHERE b.id = ANY($1)
    GROUP BY b.id
    ORDER BY b.modified_at, b.id
    LIMIT $2 OFFSET $3";

/// One page of author rows.
pub const AUTHOR_PAGE: &str = "\
    SELECT id, name, last_name, biography, created_at, modified_at
    FROM public.authors
    WHERE id = ANY($1)
    ORDER BY modified_at, id
    LIMIT $2 OFFSET $3";

/// One page of category rows.
pub const CATEGORY_PAGE: &str = "\
    SELECT id, name, description, created_at, modified_at
    FROM public.categories
    WHERE id = ANY($1)
    ORDER BY modified_at, id
    LIMIT $2 OFFSET $3";

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_indexer_shared::EntityKind;

    #[test]
    fn test_changed_ids_filters_on_watermark() {
        let sql = changed_ids("public.books");
        assert!(sql.contains("modified_at > $1"));
        assert!(sql.contains("ORDER BY modified_at"));
    }

    #[test]
    fn test_books_referencing_uses_join_path() {
        let join = EntityKind::Author.join_path().unwrap();
        let sql = books_referencing(&join);
        assert!(sql.contains("public.books_authors"));
        assert!(sql.contains("jt.book_id = b.id"));
        assert!(sql.contains("jt.author_id = ANY($1)"));
    }
}
