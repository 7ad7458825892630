//! Append-only trace file with size-based rotation.
//!
//! Before each append the live file is measured; once it is larger than
//! [`RotationPolicy::max_bytes`] it is renamed to `<file>.<stamp>-<seq>` and a fresh
//! file is started. Only the newest [`RotationPolicy::backups`] renamed files are kept.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// When to rotate and how many rotated files to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub backups: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self { max_bytes: 10 * 1024 * 1024, backups: 3 }
    }
}

#[derive(Default)]
struct Handle {
    file: Option<File>,
    rotations: u64,
}

/// Line-oriented file writer shared by the exporter; safe to use from several threads.
pub struct RotatingFile {
    path: PathBuf,
    policy: RotationPolicy,
    handle: Mutex<Handle>,
}

impl RotatingFile {
    #[must_use]
    pub fn new(path: PathBuf, policy: RotationPolicy) -> Self {
        Self { path, policy, handle: Mutex::new(Handle::default()) }
    }

    /// Appends `line` plus a newline, rotating first when the file is over the limit.
    ///
    /// # Errors
    ///
    /// Returns the I/O error of the rename, open, write or flush that failed, or
    /// an error when another writer panicked while holding the lock.
    pub fn append(&self, line: &str) -> io::Result<()> {
        let mut handle = self
            .handle
            .lock()
            .map_err(|e| io::Error::other(format!("trace file lock poisoned: {e}")))?;

        let oversized = fs::metadata(&self.path).is_ok_and(|m| m.len() > self.policy.max_bytes);
        if oversized {
            handle.file = None;
            handle.rotations += 1;
            self.rotate(handle.rotations)?;
        }

        if handle.file.is_none() {
            handle.file = Some(OpenOptions::new().create(true).append(true).open(&self.path)?);
        }
        let Some(file) = handle.file.as_mut() else {
            return Err(io::Error::other("trace file not open"));
        };
        writeln!(file, "{line}")?;
        file.flush()
    }

    fn rotate(&self, sequence: u64) -> io::Result<()> {
        let stamp = Utc::now().format("%Y%m%d%H%M%S%6f");
        let mut backup = self.path.clone().into_os_string();
        backup.push(format!(".{stamp}-{sequence:06}"));
        fs::rename(&self.path, PathBuf::from(backup))?;

        let mut backups = self.backups()?;
        backups.sort_unstable_by(|a, b| b.cmp(a));
        for stale in backups.iter().skip(self.policy.backups) {
            if let Err(e) = fs::remove_file(stale) {
                tracing::trace!(path = %stale.display(), error = %e, "stale trace backup not removed");
            }
        }
        Ok(())
    }

    /// Rotated siblings of the live file.
    fn backups(&self) -> io::Result<Vec<PathBuf>> {
        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let Some(name) = self.path.file_name().and_then(|n| n.to_str()) else {
            return Err(io::Error::other("trace file name is not valid UTF-8"));
        };
        let prefix = format!("{name}.");

        Ok(fs::read_dir(dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with(&prefix)))
            .collect())
    }
}

impl std::fmt::Debug for RotatingFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingFile")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let file = RotatingFile::new(path.clone(), RotationPolicy::default());

        file.append("{\"a\":1}").unwrap();
        file.append("{\"b\":2}").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }

    #[test]
    fn rotation_keeps_newest_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let file = RotatingFile::new(path.clone(), RotationPolicy { max_bytes: 8, backups: 2 });

        for n in 0..6 {
            file.append(&format!("line number {n}")).unwrap();
        }

        let backups = file.backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(fs::read_to_string(&path).unwrap(), "line number 5\n");

        let mut kept: Vec<String> = backups.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
        kept.sort();
        assert_eq!(kept, vec!["line number 3\n", "line number 4\n"]);
    }
}
