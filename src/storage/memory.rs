//! Process-local durable store.
//!
//! Used by tests to simulate a page reload (build a second controller from the same
//! store) and by the host's `--ephemeral` mode.

use crate::domain::error::Result;
use crate::storage::backend::Storage;
use crate::storage::models::DurableKey;
use std::collections::BTreeMap;

/// In-memory [`Storage`] backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<DurableKey, String>,
}

impl Storage for MemoryStorage {
    fn get(&self, key: DurableKey) -> Result<Option<String>> {
        Ok(self.entries.get(&key).cloned())
    }

    fn set(&mut self, key: DurableKey, value: &str) -> Result<()> {
        self.entries.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: DurableKey) -> Result<()> {
        self.entries.remove(&key);
        Ok(())
    }
}
