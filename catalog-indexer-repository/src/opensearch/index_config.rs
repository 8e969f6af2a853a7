//! Index settings and mappings for the catalog indices.

use serde_json::{json, Value};

use catalog_indexer_shared::EntityKind;

/// The catalog index names, provisioned at startup.
pub const CATALOG_INDICES: [&str; 3] = ["books", "authors", "categories"];

/// Get the settings and mappings for a kind's catalog index.
///
/// IDs are keywords for exact lookups, titles and names are full-text, and
/// modification timestamps are dates so lag can be inspected per document.
pub fn index_settings(kind: EntityKind) -> Value {
    let properties = match kind {
        EntityKind::Book => json!({
            "id": { "type": "keyword" },
            "title": { "type": "text" },
            "description": { "type": "text" },
            "language": { "type": "keyword" },
            "isbn": { "type": "keyword" },
            "publication_date": { "type": "date" },
            "authors": {
                "type": "nested",
                "properties": {
                    "id": { "type": "keyword" },
                    "name": { "type": "text" }
                }
            },
            "categories": { "type": "keyword" },
            "created_at": { "type": "date" },
            "modified_at": { "type": "date" }
        }),
        EntityKind::Author => json!({
            "id": { "type": "keyword" },
            "name": { "type": "text" },
            "last_name": { "type": "text" }
        }),
        EntityKind::Category => json!({
            "id": { "type": "keyword" },
            "name": { "type": "text" }
        }),
    };

    json!({
        "settings": {
            "number_of_shards": 1,
            "number_of_replicas": 1
        },
        "mappings": {
            "properties": properties
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_has_settings() {
        for kind in EntityKind::ALL {
            let settings = index_settings(kind);
            assert!(settings["settings"]["number_of_shards"].is_number());
            assert!(settings["mappings"]["properties"]["id"].is_object());
        }
    }

    #[test]
    fn test_index_names_match_kind_routing() {
        let names: Vec<&str> = EntityKind::ALL.iter().map(|k| k.index()).collect();
        assert_eq!(names, CATALOG_INDICES);
    }

    #[test]
    fn test_book_authors_are_nested() {
        let settings = index_settings(EntityKind::Book);
        assert_eq!(
            settings["mappings"]["properties"]["authors"]["type"],
            "nested"
        );
    }
}
