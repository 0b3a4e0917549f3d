//! Session store error types.

use thiserror::Error;

/// Errors that can occur during session store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure. Fatal at open; there is no fallback schema.
    #[error("Migration error: {0}")]
    Migration(String),
}

/// Result type for session store operations.
pub type StoreResult<T> = Result<T, StoreError>;
