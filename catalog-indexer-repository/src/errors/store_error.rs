//! Catalog store error types.

use thiserror::Error;

/// Errors that can occur while reading from the relational catalog store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to reach the database or lost the connection mid-query.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A query failed for a non-connection reason.
    #[error("Query error: {0}")]
    QueryError(String),

    /// A fetched row could not be decoded into its expected shape.
    #[error("Row decode error: {0}")]
    DecodeError(String),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a query error.
    pub fn query(msg: impl Into<String>) -> Self {
        Self::QueryError(msg.into())
    }

    /// Whether the error is a transient failure worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(e) => Self::ConnectionError(e.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::ConnectionError(err.to_string())
            }
            sqlx::Error::Tls(e) => Self::ConnectionError(e.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::DecodeError(err.to_string())
            }
            other => Self::QueryError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_transient() {
        assert!(StoreError::connection("refused").is_transient());
        assert!(!StoreError::query("syntax error").is_transient());
    }
}
