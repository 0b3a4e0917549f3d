//! SQLite-backed session store.

use std::path::Path;

use async_trait::async_trait;
use entities::UserRecord;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{FromRow, Pool, Sqlite};
use tokio::sync::watch;

use crate::{migrations, SessionStore, StoreResult};

/// Column list shared by every read. The stored column names keep the
/// original camelCase layout; aliases map them onto the row struct.
const USER_COLUMNS: &str =
    "email, name, photoUrl AS photo_url, isLoggedIn AS is_logged_in, lastLoginTime AS \
     last_login_time";

/// Database row for UserRecord.
#[derive(Debug, FromRow)]
struct UserRow {
    email: String,
    name: String,
    photo_url: Option<String>,
    is_logged_in: i64,
    last_login_time: i64,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            email: row.email,
            name: row.name,
            photo_url: row.photo_url,
            is_logged_in: row.is_logged_in != 0,
            last_login_time: row.last_login_time,
        }
    }
}

/// Durable session store over a SQLite connection pool.
///
/// Construct one per process at startup and hand it to consumers explicitly;
/// there is no ambient global handle.
#[derive(Debug)]
pub struct SqliteSessionStore {
    pool: Pool<Sqlite>,
    logged_in_tx: watch::Sender<Option<UserRecord>>,
}

impl SqliteSessionStore {
    /// Opens (creating if necessary) the database at `db_path` and brings its
    /// schema up to date. Migration failure is fatal.
    pub async fn open(db_path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        migrations::migrate(&pool).await?;

        // Seed the watch channel with whatever session survived the restart.
        let initial = Self::fetch_logged_in(&pool).await?;
        let (logged_in_tx, _) = watch::channel(initial);

        tracing::debug!(path = %db_path.display(), "Opened session store");

        Ok(Self {
            pool,
            logged_in_tx,
        })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn fetch_logged_in(pool: &Pool<Sqlite>) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE isLoggedIn = 1 LIMIT 1"
        ))
        .fetch_optional(pool)
        .await?;
        Ok(row.map(UserRecord::from))
    }

    /// Re-reads the logged-in row and notifies watchers when it changed.
    /// Called after every committed write.
    async fn refresh_watch(&self) -> StoreResult<()> {
        let current = Self::fetch_logged_in(&self.pool).await?;
        self.logged_in_tx.send_if_modified(|value| {
            if *value != current {
                *value = current;
                true
            } else {
                false
            }
        });
        Ok(())
    }
}

#[async_trait]
impl SessionStore for SqliteSessionStore {
    async fn upsert_user(&self, user: &UserRecord) -> StoreResult<()> {
        sqlx::query(
            "INSERT OR REPLACE INTO users (email, name, photoUrl, isLoggedIn, lastLoginTime) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.photo_url)
        .bind(user.is_logged_in)
        .bind(user.last_login_time)
        .execute(&self.pool)
        .await?;

        self.refresh_watch().await
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserRecord::from))
    }

    async fn set_login_status(&self, email: &str, is_logged_in: bool) -> StoreResult<()> {
        sqlx::query("UPDATE users SET isLoggedIn = ? WHERE email = ?")
            .bind(is_logged_in)
            .bind(email)
            .execute(&self.pool)
            .await?;

        self.refresh_watch().await
    }

    async fn logout_all(&self) -> StoreResult<()> {
        sqlx::query("UPDATE users SET isLoggedIn = 0")
            .execute(&self.pool)
            .await?;

        self.refresh_watch().await
    }

    async fn logged_in_user(&self) -> StoreResult<Option<UserRecord>> {
        Self::fetch_logged_in(&self.pool).await
    }

    fn watch_logged_in_user(&self) -> watch::Receiver<Option<UserRecord>> {
        self.logged_in_tx.subscribe()
    }
}
