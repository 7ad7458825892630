//! Durable client-side key/value storage.
//!
//! The controller reads a [`DurableState`] snapshot once at startup and afterwards only
//! *requests* writes through `Action::Persist`; the host applies them to a backend.
//!
//! # Modules
//!
//! - `backend`: Storage trait abstraction for backend implementations
//! - `json`: JSON file-based storage implementation
//! - `memory`: In-memory implementation for tests and ephemeral runs
//! - `models`: Durable key names and the boot snapshot

pub mod backend;
pub mod json;
pub mod memory;
pub mod models;

pub use backend::Storage;
pub use json::JsonStorage;
pub use memory::MemoryStorage;
pub use models::{DurableKey, DurableState};
