//! Checkpoint backing store error types.

use thiserror::Error;

/// Errors that can occur while loading or committing the watermark.
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Failed to reach the checkpoint backing store.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// A stored watermark value could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),
}

impl CheckpointError {
    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Whether the error is a transient failure worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ConnectionError(_))
    }
}

impl From<redis::RedisError> for CheckpointError {
    fn from(err: redis::RedisError) -> Self {
        Self::ConnectionError(err.to_string())
    }
}

impl From<chrono::ParseError> for CheckpointError {
    fn from(err: chrono::ParseError) -> Self {
        Self::ParseError(err.to_string())
    }
}
