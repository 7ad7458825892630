//! Storage backend abstraction.
//!
//! This module defines the [`Storage`] trait that abstracts over durable key/value
//! backends. The controller never touches a backend directly: it emits
//! `Action::Persist`, and the host applies it to whichever backend it owns.
//!
//! # Design Philosophy
//!
//! The trait mirrors a browser's local key/value store: string values under a small,
//! closed set of keys. There is no schema, no listing, and no transaction.

use crate::domain::error::Result;
use crate::storage::models::DurableKey;

/// Abstraction over durable key/value backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes (default)
/// - [`MemoryStorage`](crate::storage::MemoryStorage): process-local map (tests, `--ephemeral`)
///
/// # Examples
///
/// ```no_run
/// use codenexus::storage::{DurableKey, JsonStorage, Storage};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/codenexus-store.json"))?;
/// storage.set(DurableKey::LastCategory, "category/cli")?;
/// assert_eq!(storage.get(DurableKey::LastCategory)?.as_deref(), Some("category/cli"));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Storage: Send {
    /// Reads the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the read operation fails.
    fn get(&self, key: DurableKey) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&mut self, key: DurableKey, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal cannot be persisted.
    fn remove(&mut self, key: DurableKey) -> Result<()>;
}
