//! Data directory resolution.
//!
//! Files under the data directory:
//!
//! - `state.json`: durable key/value state (admin flag, admin code, last category)
//! - `codenexus-otlp.json`: exported trace batches, plus rotated backups

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "codenexus";

/// Returns the default data directory.
///
/// `$XDG_DATA_HOME/codenexus` when set, else `~/.local/share/codenexus`, else
/// `./.codenexus` when no home directory is known.
///
/// # Examples
///
/// ```
/// use codenexus::infrastructure::default_data_dir;
///
/// assert!(default_data_dir().ends_with("codenexus") || default_data_dir().ends_with(".codenexus"));
/// ```
#[must_use]
pub fn default_data_dir() -> PathBuf {
    resolve_data_dir(env::var_os("XDG_DATA_HOME"), env::var_os("HOME"))
}

fn resolve_data_dir(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    match home.filter(|v| !v.is_empty()) {
        Some(home) => PathBuf::from(home).join(".local").join("share").join(APP_DIR),
        None => PathBuf::from(format!(".{APP_DIR}")),
    }
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and every path when no home is known, come back unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_with_home(path, env::var_os("HOME").map(PathBuf::from).as_deref())
}

fn expand_with_home(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

/// Durable state file inside `data_dir`.
#[must_use]
pub fn state_file(data_dir: &Path) -> PathBuf {
    data_dir.join("state.json")
}

/// Trace export file inside `data_dir`.
#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join("codenexus-otlp.json")
}
