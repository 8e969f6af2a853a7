//! Search engine error types.

use thiserror::Error;

/// Errors that can occur during search engine operations.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Failed to establish connection to the search engine.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Bulk indexing operation had failures.
    #[error("Bulk index error: {0}")]
    BulkIndexError(String),

    /// Failed to create a search index.
    #[error("Index creation error: {0}")]
    IndexCreationError(String),

    /// Failed to serialize documents for the search engine.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failed to parse a response from the search engine.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl SearchError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a bulk index error.
    pub fn bulk_index(msg: impl Into<String>) -> Self {
        Self::BulkIndexError(msg.into())
    }

    /// Whether the error is a transient failure worth retrying.
    ///
    /// Bulk failures are inspected for rate-limit and availability markers;
    /// everything else in them is treated as permanent (a malformed document
    /// will not index better on the next attempt).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::ConnectionError(_) => true,
            Self::BulkIndexError(msg) => {
                let msg = msg.to_lowercase();
                msg.contains("timeout")
                    || msg.contains("connection")
                    || msg.contains("rate limit")
                    || msg.contains("429")
                    || msg.contains("503")
            }
            Self::IndexCreationError(_) | Self::SerializationError(_) | Self::ParseError(_) => {
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(SearchError::connection("refused").is_transient());
        assert!(SearchError::bulk_index("HTTP 503 from cluster").is_transient());
        assert!(!SearchError::bulk_index("mapper_parsing_exception").is_transient());
        assert!(!SearchError::SerializationError("bad doc".into()).is_transient());
    }
}
