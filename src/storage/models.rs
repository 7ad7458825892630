//! Durable client-side keys and the snapshot the controller boots from.
//!
//! The key names match what the served page keeps in its browser key/value store,
//! so a storage file can be inspected side by side with a browser profile.

use crate::domain::error::Result;
use crate::storage::backend::Storage;
use serde::{Deserialize, Serialize};

/// Keys of the durable client-side store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurableKey {
    /// `"true"` once the covert elevation succeeded.
    AdminVerified,
    /// Credential sent as `X-Admin-Code` on moderation requests.
    AdminCode,
    /// Last visited tool category route, e.g. `category/cli`.
    LastCategory,
}

impl DurableKey {
    /// Storage name of the key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AdminVerified => "admin_verified",
            Self::AdminCode => "aicoding_admin_code",
            Self::LastCategory => "last_category",
        }
    }
}

/// Snapshot of all durable values, read once before the controller starts.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DurableState {
    pub admin_verified: bool,
    pub admin_code: Option<String>,
    pub last_category: Option<String>,
}

impl DurableState {
    /// Reads every durable key from `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read a key.
    ///
    /// # Example
    ///
    /// ```
    /// use codenexus::storage::{DurableKey, DurableState, MemoryStorage, Storage};
    ///
    /// let mut storage = MemoryStorage::default();
    /// storage.set(DurableKey::AdminVerified, "true")?;
    ///
    /// let durable = DurableState::load(&storage)?;
    /// assert!(durable.admin_verified);
    /// # Ok::<(), codenexus::CodeNexusError>(())
    /// ```
    pub fn load(storage: &dyn Storage) -> Result<Self> {
        let admin_verified = storage
            .get(DurableKey::AdminVerified)?
            .is_some_and(|v| v == "true");

        Ok(Self {
            admin_verified,
            admin_code: storage.get(DurableKey::AdminCode)?.filter(|v| !v.is_empty()),
            last_category: storage.get(DurableKey::LastCategory)?.filter(|v| !v.is_empty()),
        })
    }
}
