//! Inbound sign-in credential.

use serde::{Deserialize, Serialize};

/// An identity assertion handed over after an external sign-in flow.
///
/// The identity provider is out of scope; all fields are optional at this
/// boundary and validated by the repository (an email is required to store a
/// session).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credential {
    /// Email address (if available).
    pub email: Option<String>,
    /// Display name (if available).
    pub display_name: Option<String>,
    /// Profile photo URL (if available).
    pub photo_url: Option<String>,
}

impl Credential {
    /// Creates an empty credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the photo URL.
    pub fn with_photo_url(mut self, photo_url: impl Into<String>) -> Self {
        self.photo_url = Some(photo_url.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credential_builder() {
        let credential = Credential::new()
            .with_email("a@x.com")
            .with_display_name("A");

        assert_eq!(credential.email.as_deref(), Some("a@x.com"));
        assert_eq!(credential.display_name.as_deref(), Some("A"));
        assert!(credential.photo_url.is_none());
    }
}
