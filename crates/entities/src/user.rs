//! User-related entity definitions.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A user record persisted by the session store.
///
/// Records are keyed by email; a record with `is_logged_in == true` is the
/// currently active session. By convention at most one record is logged in at
/// a time, though nothing in the schema enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Email address, the primary key.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Profile photo URL, if the identity provider supplied one.
    pub photo_url: Option<String>,
    /// Whether this record is the active session.
    pub is_logged_in: bool,
    /// Last login time, epoch milliseconds.
    pub last_login_time: i64,
}

impl UserRecord {
    /// Creates a new record marked as logged in, stamped with the current
    /// time.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            photo_url: None,
            is_logged_in: true,
            last_login_time: Utc::now().timestamp_millis(),
        }
    }

    /// Sets the profile photo URL.
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_creation() {
        let user = UserRecord::new("test@example.com", "Test User")
            .with_photo_url("https://example.com/p.png");

        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.name, "Test User");
        assert_eq!(user.photo_url.as_deref(), Some("https://example.com/p.png"));
        assert!(user.is_logged_in);
        assert!(user.last_login_time > 0);
    }
}
