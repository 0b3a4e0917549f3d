//! Core entity definitions for the local session store.
//!
//! This crate defines the data types shared across the session store
//! workspace: the persisted user record and the inbound sign-in credential.

mod credential;
mod user;

pub use credential::*;
pub use user::*;
