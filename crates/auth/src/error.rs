//! Authentication error types.

use session_store::StoreError;
use thiserror::Error;

/// Errors that can occur during sign-in and session operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The sign-in credential carries no email address. Unrecoverable for
    /// that attempt; nothing is written.
    #[error("Sign-in credential has no email address")]
    MissingEmail,

    /// Underlying storage failure, propagated without retry.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
