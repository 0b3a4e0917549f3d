//! Versioned schema migrations for the `users` table.
//!
//! The schema version lives in SQLite's `user_version` pragma. Migrations are
//! forward-only and applied one version step at a time; each step runs in a
//! single transaction together with the version bump, so a failure mid-step
//! rolls back to the previous version instead of leaving a half-migrated
//! table.

use sqlx::{Pool, Sqlite};

use crate::{StoreError, StoreResult};

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 3;

/// The final `users` table definition (version 3).
const CREATE_USERS_SQL: &str = "CREATE TABLE IF NOT EXISTS users (
    email TEXT NOT NULL PRIMARY KEY,
    name TEXT NOT NULL,
    photoUrl TEXT,
    isLoggedIn INTEGER NOT NULL DEFAULT 1,
    lastLoginTime INTEGER NOT NULL DEFAULT 0
)";

/// Reads the on-disk schema version.
pub(crate) async fn schema_version(pool: &Pool<Sqlite>) -> StoreResult<i64> {
    let version: i64 = sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await?;
    Ok(version)
}

/// Brings the database up to [`SCHEMA_VERSION`].
///
/// A fresh database (version 0) gets the final schema directly. Databases at
/// versions 1 or 2 are migrated one step at a time. A database ahead of the
/// supported version is a fatal error; downgrades are not supported.
pub(crate) async fn migrate(pool: &Pool<Sqlite>) -> StoreResult<()> {
    let version = schema_version(pool).await?;

    if version > SCHEMA_VERSION {
        return Err(StoreError::Migration(format!(
            "database is at schema version {version}, newer than supported version \
             {SCHEMA_VERSION}"
        )));
    }

    if version == SCHEMA_VERSION {
        return Ok(());
    }

    if version == 0 {
        create_schema(pool).await?;
        tracing::debug!(version = SCHEMA_VERSION, "Created fresh session schema");
        return Ok(());
    }

    if version < 2 {
        migrate_v1_to_v2(pool).await?;
        tracing::info!("Migrated session schema 1 -> 2");
    }
    if version < 3 {
        migrate_v2_to_v3(pool).await?;
        tracing::info!("Migrated session schema 2 -> 3");
    }

    Ok(())
}

/// Creates the version-3 schema on a fresh database.
async fn create_schema(pool: &Pool<Sqlite>) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query(CREATE_USERS_SQL).execute(&mut *tx).await?;
    sqlx::query(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

/// 1 -> 2: adds the nullable photoUrl column.
async fn migrate_v1_to_v2(pool: &Pool<Sqlite>) -> StoreResult<()> {
    let mut tx = pool.begin().await?;
    sqlx::query("ALTER TABLE users ADD COLUMN photoUrl TEXT")
        .execute(&mut *tx)
        .await?;
    sqlx::query("PRAGMA user_version = 2").execute(&mut *tx).await?;
    tx.commit().await?;
    Ok(())
}

/// 2 -> 3: rebuilds the table so the declared column types and defaults are
/// guaranteed, copying every row across.
async fn migrate_v2_to_v3(pool: &Pool<Sqlite>) -> StoreResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users_new (
            email TEXT NOT NULL PRIMARY KEY,
            name TEXT NOT NULL,
            photoUrl TEXT,
            isLoggedIn INTEGER NOT NULL DEFAULT 1,
            lastLoginTime INTEGER NOT NULL DEFAULT 0
        )",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO users_new (email, name, photoUrl, isLoggedIn, lastLoginTime)
         SELECT email, name, photoUrl, isLoggedIn, lastLoginTime FROM users",
    )
    .execute(&mut *tx)
    .await?;

    sqlx::query("DROP TABLE users").execute(&mut *tx).await?;
    sqlx::query("ALTER TABLE users_new RENAME TO users")
        .execute(&mut *tx)
        .await?;
    sqlx::query("PRAGMA user_version = 3").execute(&mut *tx).await?;

    tx.commit().await?;
    Ok(())
}
