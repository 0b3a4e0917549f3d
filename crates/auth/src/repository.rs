//! Session repository.

use std::sync::Arc;

use entities::{Credential, UserRecord};
use session_store::SessionStore;
use tokio::sync::watch;

use crate::{AuthError, AuthResult, DEFAULT_DISPLAY_NAME};

/// Bridges an external sign-in credential to the session store and exposes
/// the reactive logged-in-user query.
///
/// Holds no cached state; every read goes back to the store. Sign-in does not
/// clear other records' login flags — callers wanting single-session
/// semantics must call [`logout`](Self::logout) first.
pub struct SessionRepository<S> {
    store: Arc<S>,
}

impl<S> Clone for SessionRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: SessionStore> SessionRepository<S> {
    /// Creates a repository over the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Stores a session for the signed-in identity and returns the record.
    ///
    /// Fails with [`AuthError::MissingEmail`] when the credential has no
    /// email, without touching the store. The display name falls back to
    /// [`DEFAULT_DISPLAY_NAME`] when absent.
    pub async fn sign_in(&self, credential: &Credential) -> AuthResult<UserRecord> {
        let email = credential.email.as_deref().ok_or(AuthError::MissingEmail)?;

        let name = credential
            .display_name
            .clone()
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());

        let mut user = UserRecord::new(email, name);
        if let Some(photo_url) = &credential.photo_url {
            user = user.with_photo_url(photo_url);
        }

        self.store.upsert_user(&user).await?;
        tracing::info!(email = %user.email, "User signed in");

        Ok(user)
    }

    /// Subscribes to the store's logged-in-user query, unmodified.
    pub fn logged_in_user(&self) -> watch::Receiver<Option<UserRecord>> {
        self.store.watch_logged_in_user()
    }

    /// One-shot read of the current logged-in record.
    pub async fn current_user(&self) -> AuthResult<Option<UserRecord>> {
        Ok(self.store.logged_in_user().await?)
    }

    /// Logs every session out.
    pub async fn logout(&self) -> AuthResult<()> {
        self.store.logout_all().await?;
        tracing::info!("All sessions logged out");
        Ok(())
    }
}
