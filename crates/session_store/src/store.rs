//! Session store trait definition.

use async_trait::async_trait;
use entities::UserRecord;
use tokio::sync::watch;

use crate::StoreResult;

/// Trait for session storage operations.
///
/// At most one record is expected to be logged in at a time. The store does
/// not enforce this: `set_login_status` touches only the named row, and
/// callers that want single-session semantics must call `logout_all` first.
/// When more than one row is logged in, `logged_in_user` returns an
/// arbitrary one of them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Inserts or replaces the record keyed by its email.
    async fn upsert_user(&self, user: &UserRecord) -> StoreResult<()>;

    /// Gets a record by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>>;

    /// Updates one record's login flag. No-op when the email is unknown.
    async fn set_login_status(&self, email: &str, is_logged_in: bool) -> StoreResult<()>;

    /// Clears the login flag on every record.
    async fn logout_all(&self) -> StoreResult<()>;

    /// One-shot read of the currently logged-in record, if any.
    async fn logged_in_user(&self) -> StoreResult<Option<UserRecord>>;

    /// Subscribes to the logged-in record. The receiver holds the current
    /// value immediately and is re-notified whenever a write changes it.
    /// Dropping the receiver releases the subscription.
    fn watch_logged_in_user(&self) -> watch::Receiver<Option<UserRecord>>;
}
