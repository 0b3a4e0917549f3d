//! Session repository and sign-in flow.
//!
//! This crate provides:
//! - The repository translating an external sign-in credential into a stored
//!   user record
//! - A reactive passthrough of the store's logged-in-user query
//! - A small sign-in state machine for interactive consumers

mod error;
mod flow;
mod repository;

pub use error::*;
pub use flow::*;
pub use repository::*;

/// Display name used when the credential carries none.
pub const DEFAULT_DISPLAY_NAME: &str = "User";
