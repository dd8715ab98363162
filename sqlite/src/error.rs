//! Error types for session persistence.

use thiserror::Error;

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// SQLite database operation failure.
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    /// Bundle serialization or deserialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Table prefix contains invalid characters.
    #[error("invalid prefix '{0}': must contain only alphanumeric characters and underscores")]
    InvalidPrefix(String),

    /// No session with this id exists.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// A session with this id already exists.
    #[error("session already exists: {0}")]
    SessionExists(String),
}

/// Convenience alias for results with [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
