//! In-memory session store implementation for testing.

use std::collections::HashMap;

use async_trait::async_trait;
use entities::UserRecord;
use tokio::sync::{watch, RwLock};

use crate::{SessionStore, StoreResult};

/// In-memory session store. Same observable behavior as the SQLite store,
/// minus durability; used by tests and throwaway consumers.
pub struct MemorySessionStore {
    users: RwLock<HashMap<String, UserRecord>>,
    logged_in_tx: watch::Sender<Option<UserRecord>>,
}

impl MemorySessionStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        let (logged_in_tx, _) = watch::channel(None);
        Self {
            users: RwLock::new(HashMap::new()),
            logged_in_tx,
        }
    }

    /// Recomputes the logged-in record and notifies watchers when it changed.
    /// If more than one record is logged in, the pick is arbitrary.
    fn refresh_watch(&self, users: &HashMap<String, UserRecord>) {
        let current = users.values().find(|u| u.is_logged_in).cloned();
        self.logged_in_tx.send_if_modified(|value| {
            if *value != current {
                *value = current;
                true
            } else {
                false
            }
        });
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn upsert_user(&self, user: &UserRecord) -> StoreResult<()> {
        let mut users = self.users.write().await;
        users.insert(user.email.clone(), user.clone());
        self.refresh_watch(&users);
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn set_login_status(&self, email: &str, is_logged_in: bool) -> StoreResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.get_mut(email) {
            user.is_logged_in = is_logged_in;
        }
        self.refresh_watch(&users);
        Ok(())
    }

    async fn logout_all(&self) -> StoreResult<()> {
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            user.is_logged_in = false;
        }
        self.refresh_watch(&users);
        Ok(())
    }

    async fn logged_in_user(&self) -> StoreResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.is_logged_in).cloned())
    }

    fn watch_logged_in_user(&self) -> watch::Receiver<Option<UserRecord>> {
        self.logged_in_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_overwrites_existing_email() {
        let store = MemorySessionStore::new();

        let first = UserRecord::new("a@x.com", "A");
        store.upsert_user(&first).await.unwrap();

        let mut second = UserRecord::new("a@x.com", "A Renamed")
            .with_photo_url("https://example.com/p.png");
        second.is_logged_in = false;
        store.upsert_user(&second).await.unwrap();

        let stored = store.get_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn test_logout_all_clears_logged_in_user() {
        let store = MemorySessionStore::new();
        store
            .upsert_user(&UserRecord::new("a@x.com", "A"))
            .await
            .unwrap();

        assert!(store.logged_in_user().await.unwrap().is_some());

        store.logout_all().await.unwrap();
        assert!(store.logged_in_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_login_status_unknown_email_is_noop() {
        let store = MemorySessionStore::new();
        store
            .set_login_status("nobody@x.com", true)
            .await
            .unwrap();

        assert!(store.logged_in_user().await.unwrap().is_none());
        assert!(store.get_user_by_email("nobody@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_watch_sees_login_changes() {
        let store = MemorySessionStore::new();
        let mut rx = store.watch_logged_in_user();
        assert!(rx.borrow().is_none());

        store
            .upsert_user(&UserRecord::new("a@x.com", "A"))
            .await
            .unwrap();

        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|u| u.email.clone()),
            Some("a@x.com".to_string())
        );

        store.logout_all().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn test_two_login_flags_can_coexist() {
        // Documents current behavior: nothing clears other sessions when a
        // second one is marked active.
        let store = MemorySessionStore::new();
        let mut a = UserRecord::new("a@x.com", "A");
        a.is_logged_in = false;
        let mut b = UserRecord::new("b@x.com", "B");
        b.is_logged_in = false;
        store.upsert_user(&a).await.unwrap();
        store.upsert_user(&b).await.unwrap();

        store.set_login_status("a@x.com", true).await.unwrap();
        store.set_login_status("b@x.com", true).await.unwrap();

        assert!(store
            .get_user_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .is_logged_in);
        assert!(store
            .get_user_by_email("b@x.com")
            .await
            .unwrap()
            .unwrap()
            .is_logged_in);

        // Which of the two comes back is arbitrary.
        let current = store.logged_in_user().await.unwrap().unwrap();
        assert!(current.email == "a@x.com" || current.email == "b@x.com");
    }
}
