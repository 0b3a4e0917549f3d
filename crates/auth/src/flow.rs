//! Interactive sign-in state machine.

use entities::{Credential, UserRecord};
use session_store::SessionStore;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{AuthResult, SessionRepository};

/// Observable sign-in state.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// No sign-in attempted (or signed out).
    Initial,
    /// Sign-in in flight.
    Loading,
    /// A session is active.
    LoggedIn(UserRecord),
    /// The last sign-in attempt failed.
    Error(String),
}

/// Drives sign-in/logout against the repository and publishes the resulting
/// state over a watch channel.
///
/// A background task mirrors the store's logged-in-user subscription into the
/// state, so a session restored from disk (or written by another consumer)
/// surfaces as [`AuthState::LoggedIn`] without an explicit sign-in call. The
/// task is aborted when the flow is dropped; pending notifications are
/// discarded rather than delivered to a torn-down consumer.
pub struct AuthFlow<S: SessionStore> {
    repository: SessionRepository<S>,
    state_tx: watch::Sender<AuthState>,
    mirror_task: JoinHandle<()>,
}

impl<S: SessionStore> AuthFlow<S> {
    /// Creates a flow over the given repository.
    pub fn new(repository: SessionRepository<S>) -> Self {
        let (state_tx, _) = watch::channel(AuthState::Initial);

        let mut store_rx = repository.logged_in_user();
        let mirror_tx = state_tx.clone();
        let mirror_task = tokio::spawn(async move {
            loop {
                // A logged-out store does not reset the state; only an
                // explicit logout() does.
                let user = store_rx.borrow_and_update().clone();
                if let Some(user) = user {
                    set_state(&mirror_tx, AuthState::LoggedIn(user));
                }
                if store_rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Self {
            repository,
            state_tx,
            mirror_task,
        }
    }

    /// Subscribes to the sign-in state.
    pub fn state(&self) -> watch::Receiver<AuthState> {
        self.state_tx.subscribe()
    }

    /// Signs in with the given credential, publishing `Loading` while the
    /// write is in flight and `LoggedIn` or `Error` when it settles.
    pub async fn sign_in(&self, credential: &Credential) -> AuthResult<UserRecord> {
        set_state(&self.state_tx, AuthState::Loading);

        match self.repository.sign_in(credential).await {
            Ok(user) => {
                set_state(&self.state_tx, AuthState::LoggedIn(user.clone()));
                Ok(user)
            }
            Err(err) => {
                set_state(&self.state_tx, AuthState::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Logs out and resets the state.
    pub async fn logout(&self) -> AuthResult<()> {
        self.repository.logout().await?;
        set_state(&self.state_tx, AuthState::Initial);
        Ok(())
    }
}

impl<S: SessionStore> Drop for AuthFlow<S> {
    fn drop(&mut self) {
        self.mirror_task.abort();
    }
}

fn set_state(tx: &watch::Sender<AuthState>, next: AuthState) {
    tx.send_if_modified(|state| {
        if *state != next {
            *state = next;
            true
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use session_store::{MemorySessionStore, SessionStore};

    use super::*;

    fn flow_over(store: Arc<MemorySessionStore>) -> AuthFlow<MemorySessionStore> {
        AuthFlow::new(SessionRepository::new(store))
    }

    #[tokio::test]
    async fn test_sign_in_transitions_to_logged_in() {
        let flow = flow_over(Arc::new(MemorySessionStore::new()));
        let rx = flow.state();
        assert_eq!(*rx.borrow(), AuthState::Initial);

        flow.sign_in(&Credential::new().with_email("a@x.com").with_display_name("A"))
            .await
            .unwrap();

        match &*rx.borrow() {
            AuthState::LoggedIn(user) => assert_eq!(user.email, "a@x.com"),
            state => panic!("unexpected state: {state:?}"),
        };
    }

    #[tokio::test]
    async fn test_missing_email_transitions_to_error() {
        let flow = flow_over(Arc::new(MemorySessionStore::new()));
        let rx = flow.state();

        let result = flow.sign_in(&Credential::new().with_display_name("A")).await;
        assert!(result.is_err());
        assert!(matches!(&*rx.borrow(), AuthState::Error(_)));
    }

    #[tokio::test]
    async fn test_logout_resets_state() {
        let flow = flow_over(Arc::new(MemorySessionStore::new()));

        flow.sign_in(&Credential::new().with_email("a@x.com"))
            .await
            .unwrap();
        flow.logout().await.unwrap();

        assert_eq!(*flow.state().borrow(), AuthState::Initial);
    }

    #[tokio::test]
    async fn test_mirrors_session_written_behind_its_back() {
        let store = Arc::new(MemorySessionStore::new());
        let flow = flow_over(store.clone());
        let mut rx = flow.state();

        store
            .upsert_user(&entities::UserRecord::new("b@x.com", "B"))
            .await
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), rx.changed())
            .await
            .expect("state change")
            .unwrap();

        match &*rx.borrow_and_update() {
            AuthState::LoggedIn(user) => assert_eq!(user.email, "b@x.com"),
            state => panic!("unexpected state: {state:?}"),
        };
    }
}
