//! Error types for Files Manager.

use thiserror::Error;

/// Common error type for Files Manager.
#[derive(Error, Debug)]
pub enum FilesError {
    /// Document store error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error outside the content medium (config, log files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or invalid credentials or token.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Validation error for client input.
    ///
    /// The message is returned to the client verbatim.
    #[error("{0}")]
    Validation(String),

    /// Resource absent, or present but not visible to the requester.
    #[error("{0} not found")]
    NotFound(String),

    /// Content was requested from a node that has none (a folder).
    #[error("node has no content")]
    NoContent,

    /// Content medium failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Any other internal failure (hashing, task joins).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for FilesError {
    fn from(e: sqlx::Error) -> Self {
        FilesError::Database(e.to_string())
    }
}

/// Result type alias for Files Manager operations.
pub type Result<T> = std::result::Result<T, FilesError>;
