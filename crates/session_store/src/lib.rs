//! Durable user-session storage.
//!
//! This crate provides the session store abstraction: a single `users` table
//! keyed by email, with a forward-only schema migrator and a reactive
//! "current logged-in user" query. It ships a SQLite implementation for
//! durable storage and an in-memory implementation for tests.

mod error;
mod memory;
mod migrations;
mod sqlite;
mod store;

pub use error::*;
pub use memory::*;
pub use migrations::SCHEMA_VERSION;
pub use sqlite::*;
pub use store::*;
