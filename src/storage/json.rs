//! JSON file-based durable store.
//!
//! The whole map lives in memory; every change rewrites the file via temp file + rename.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": {
//!     "admin_verified": "true",
//!     "last_category": "category/cli"
//!   }
//! }
//! ```

use crate::domain::error::{CodeNexusError, Result};
use crate::storage::backend::Storage;
use crate::storage::models::DurableKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "format_version")]
    version: u32,
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

fn format_version() -> u32 {
    FORMAT_VERSION
}

/// Durable keys kept in a single JSON document.
///
/// `Send` but not `Sync`: the host owns it on its event loop.
pub struct JsonStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonStorage {
    /// Opens the store at `path`, creating parent directories. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// I/O failures while creating directories or reading, and [`CodeNexusError::Storage`] for
    /// a file that is not a store document.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let entries = match fs::read_to_string(&path) {
            Ok(contents) => {
                let file: StoreFile = serde_json::from_str(&contents)
                    .map_err(|e| CodeNexusError::Storage(format!("{}: {e}", path.display())))?;
                if file.version != FORMAT_VERSION {
                    tracing::warn!(version = file.version, "unexpected store version, reading anyway");
                }
                file.entries
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = entries.len(), "durable store opened");
        Ok(Self { path, entries })
    }

    /// Rewrites the document through a sibling temp file and a rename.
    fn persist(&self) -> Result<()> {
        let file = StoreFile { version: FORMAT_VERSION, entries: self.entries.clone() };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| CodeNexusError::Storage(format!("encode store: {e}")))?;

        let staging = self.path.with_extension("tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;
        tracing::trace!(path = %self.path.display(), "durable store written");
        Ok(())
    }
}

impl Storage for JsonStorage {
    fn get(&self, key: DurableKey) -> Result<Option<String>> {
        Ok(self.entries.get(key.as_str()).cloned())
    }

    fn set(&mut self, key: DurableKey, value: &str) -> Result<()> {
        if self.entries.get(key.as_str()).is_some_and(|current| current == value) {
            return Ok(());
        }
        tracing::debug!(key = key.as_str(), "durable key set");
        self.entries.insert(key.as_str().to_string(), value.to_string());
        self.persist()
    }

    fn remove(&mut self, key: DurableKey) -> Result<()> {
        if self.entries.remove(key.as_str()).is_none() {
            return Ok(());
        }
        tracing::debug!(key = key.as_str(), "durable key removed");
        self.persist()
    }
}
