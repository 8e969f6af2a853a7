//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts},
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::opensearch::index_config::index_settings;
use catalog_indexer_shared::{CatalogDocument, EntityKind};

/// OpenSearch-backed search engine client.
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    pub fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client: OpenSearch::new(transport),
        })
    }

    /// Extract failure reasons from a bulk response body with `errors: true`.
    fn bulk_failures(body: &Value) -> Vec<String> {
        body["items"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|item| {
                let action = item.get("index").or_else(|| item.get("update"))?;
                let err = action.get("error")?;
                Some(format!(
                    "{}: {}",
                    action["_id"].as_str().unwrap_or("?"),
                    err["reason"].as_str().unwrap_or("unknown reason")
                ))
            })
            .collect()
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[CatalogDocument],
    ) -> Result<(), SearchError> {
        if documents.is_empty() {
            return Ok(());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(documents.len() * 2);
        for doc in documents {
            // An `index` action replaces any existing document with the same
            // ID, which is exactly the upsert the pipeline relies on.
            body.push(json!({ "index": { "_id": doc.id().to_string() } }).into());
            let source = serde_json::to_value(doc)
                .map_err(|e| SearchError::SerializationError(e.to_string()))?;
            body.push(source.into());
        }

        let response = self
            .client
            .bulk(BulkParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(index, status = %status, body = %error_body, "Bulk request failed");
            return Err(SearchError::bulk_index(format!(
                "Bulk request failed with status {status}: {error_body}"
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        if body["errors"].as_bool().unwrap_or(false) {
            let failures = Self::bulk_failures(&body);
            error!(index, failures = failures.len(), "Bulk response had item failures");
            return Err(SearchError::bulk_index(failures.join("; ")));
        }

        debug!(index, count = documents.len(), "Bulk upserted documents");
        Ok(())
    }

    async fn ensure_indices(&self) -> Result<(), SearchError> {
        for kind in EntityKind::ALL {
            let index = kind.index();
            let exists = self
                .client
                .indices()
                .exists(IndicesExistsParts::Index(&[index]))
                .send()
                .await
                .map_err(|e| SearchError::connection(e.to_string()))?;

            if exists.status_code().is_success() {
                debug!(index, "Index already exists");
                continue;
            }

            let response = self
                .client
                .indices()
                .create(IndicesCreateParts::Index(index))
                .body(index_settings(kind))
                .send()
                .await
                .map_err(|e| SearchError::connection(e.to_string()))?;

            let status = response.status_code();
            if !status.is_success() {
                let error_body = response.text().await.unwrap_or_default();
                return Err(SearchError::IndexCreationError(format!(
                    "Creating index '{index}' failed with status {status}: {error_body}"
                )));
            }

            info!(index, "Created search index");
        }

        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        let status = body["status"].as_str().unwrap_or("red");
        Ok(status == "green" || status == "yellow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_failures_extraction() {
        let body = json!({
            "errors": true,
            "items": [
                { "index": { "_id": "a", "status": 200 } },
                { "index": {
                    "_id": "b",
                    "status": 400,
                    "error": { "reason": "mapper_parsing_exception" }
                } }
            ]
        });

        let failures = OpenSearchClient::bulk_failures(&body);
        assert_eq!(failures.len(), 1);
        assert!(failures[0].contains("b"));
        assert!(failures[0].contains("mapper_parsing_exception"));
    }
}
