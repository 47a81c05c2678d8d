//! # Storage Layer
//!
//! Persistence for the med reminder backend:
//! - `json_store`: the whole application state as one JSON document,
//!   loaded at startup and rewritten wholesale on every mutation.
//! - `sessions`: the process-lifetime token registry (never persisted).

pub mod json_store;
pub mod sessions;

pub use json_store::{AppData, JsonStore};
pub use sessions::SessionRegistry;
