//! CodeNexus: a route-driven page controller for the CodeNexus developer portal.
//!
//! The portal aggregates programming and AI news, developer tools, prompts, editor rules,
//! resources and weekly digests served by a REST backend. This crate provides:
//! - Route resolution from addresses to content loads
//! - Declarative page trees with commands bound to controls
//! - Stale-response filtering with a monotonically increasing generation token
//! - Pagination, search, moderation submissions and admin deletes
//! - Covert admin elevation from keystrokes with debounced validation
//! - Skeleton menus (dropdowns, mobile submenus, sidebar) and the weekly digest menu
//! - A terminal host that runs the controller against a live backend

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! Everything but the host is sans-IO. The host turns terminal input, HTTP completions and
//! timer expiries into [`Event`]s; [`handle_event`] mutates [`AppState`] and answers with
//! [`Action`]s the host carries out.
//!
//! ```text
//!   stdin / reqwest / tokio timers
//!                 │  Event
//!                 ▼
//!   app::handle_event ──▶ router ─▶ dispatch ─▶ Fetch(ApiCall{generation})
//!                 │                                   │
//!                 │        ApiCompleted ◀─────────────┘
//!                 ▼
//!   responses (drop stale generations) ─▶ ui::views::render ─▶ Paint(Page)
//!                 │
//!                 └─▶ Persist / Alert / Confirm / StartTimer / ...
//! ```
//!
//! # Modules
//!
//! - [`app`]: Application state machine with event/action model
//! - [`api`]: Backend request/response protocol and HTTP executor
//! - [`domain`]: Item models, page configuration, errors
//! - [`infrastructure`]: Data directory paths
//! - [`storage`]: Durable key/value backends
//! - [`ui`]: Page trees, views, chrome and ANSI painting
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Configuration
//!
//! The terminal host reads an optional TOML file with the same keys as
//! [`Config::from_map`]:
//!
//! ```toml
//! api_base = "http://127.0.0.1:8000"
//! page_size = 20
//! theme = "neon-dark"
//! trace_level = "info"
//! viewport_width = 1024
//! admin_debounce_ms = 500
//! ```
//!
//! # Example
//!
//! ```rust
//! use codenexus::app::router::Location;
//! use codenexus::storage::DurableState;
//! use codenexus::{handle_event, initialize, Action, Config, Event};
//!
//! let mut state = initialize(&Config::default(), DurableState::default());
//! let (_, actions) = handle_event(&mut state, &Event::Start { location: Location::parse("/tools") })?;
//! for action in actions {
//!     if let Action::Fetch(call) = action {
//!         assert_eq!(call.request.path_and_query(), "/api/config");
//!     }
//! }
//! # Ok::<(), codenexus::CodeNexusError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Generations Instead of Cancellation
//!
//! Requests are never cancelled. Each dispatch bumps a generation; content responses
//! stamped with an older generation are dropped on arrival, so a slow response can
//! never paint over the page the user moved on to.
//!
//! ## Declarative Pages
//!
//! Views produce a [`Page`](ui::Page) whose controls are bound to [`Command`](app::Command)s.
//! Hosts only report which control was activated; they never interpret markup.

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Command, Event, Key, KeyTarget};
pub use domain::{CodeNexusError, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::DurableState;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
const DEFAULT_PAGE_SIZE: u32 = 20;
const DEFAULT_VIEWPORT_WIDTH: u32 = 1024;
const DEFAULT_ADMIN_DEBOUNCE_MS: u64 = 500;

/// Controller and host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend origin every API path is resolved against. Default: `http://127.0.0.1:8000`
    pub api_base: String,

    /// Items per page for paged listings. Default: 20
    pub page_size: u32,

    /// Built-in theme name (`neon-dark`, `neon-light`). Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. Takes precedence over `theme_name`.
    pub theme_file: Option<String>,

    /// `EnvFilter` directive for exported spans. Default: `"info"`
    pub trace_level: Option<String>,

    /// Directory for durable state and trace files. Default: [`infrastructure::default_data_dir`]
    pub data_dir: Option<PathBuf>,

    /// Initial viewport width in pixels; decides the mobile/desktop menu layout. Default: 1024
    pub viewport_width: u32,

    /// Quiet period after the last admin keystroke before validation. Default: 500
    pub admin_debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            data_dir: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            admin_debounce_ms: DEFAULT_ADMIN_DEBOUNCE_MS,
        }
    }
}

impl Config {
    /// Parses configuration from a key/value map.
    ///
    /// # Parsing Rules
    ///
    /// - `api_base`: trimmed, trailing `/` removed (falls back to the default when blank)
    /// - `page_size`, `viewport_width`: `u32`, positive (falls back on parse error)
    /// - `admin_debounce_ms`: `u64` (falls back on parse error)
    /// - `theme`, `theme_file`, `trace_level`, `data_dir`: taken as-is when non-blank;
    ///   `theme_file` and `data_dir` get `~` expanded
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use codenexus::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base".to_string(), "https://nexus.example/".to_string());
    /// map.insert("page_size".to_string(), "abc".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_base, "https://nexus.example");
    /// assert_eq!(config.page_size, 20);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let text = |key: &str| map.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        let api_base = text("api_base")
            .map(|v| v.trim_end_matches('/'))
            .filter(|v| !v.is_empty())
            .map_or_else(|| DEFAULT_API_BASE.to_string(), String::from);

        let positive = |key: &str, default: u32| {
            text(key).and_then(|v| v.parse::<u32>().ok()).filter(|n| *n > 0).unwrap_or(default)
        };

        Self {
            api_base,
            page_size: positive("page_size", DEFAULT_PAGE_SIZE),
            theme_name: text("theme").map(String::from),
            theme_file: text("theme_file")
                .map(|p| infrastructure::expand_tilde(p).to_string_lossy().into_owned()),
            trace_level: text("trace_level").map(String::from),
            data_dir: text("data_dir").map(infrastructure::expand_tilde),
            viewport_width: positive("viewport_width", DEFAULT_VIEWPORT_WIDTH),
            admin_debounce_ms: text("admin_debounce_ms")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_ADMIN_DEBOUNCE_MS),
        }
    }

    /// Reads configuration from a TOML file with the keys of [`Config::from_map`].
    ///
    /// Strings, integers and booleans are accepted as values; tables and arrays are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CodeNexusError::Io`] if the file cannot be read, or
    /// [`CodeNexusError::Config`] if it is not valid TOML.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let table: toml::Table =
            toml::from_str(&contents).map_err(|e| CodeNexusError::Config(format!("invalid config file: {e}")))?;

        let map = table
            .into_iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    toml::Value::String(s) => s,
                    toml::Value::Integer(i) => i.to_string(),
                    toml::Value::Boolean(b) => b.to_string(),
                    _ => {
                        tracing::debug!(%key, "ignoring non-scalar config value");
                        return None;
                    }
                };
                Some((key, value))
            })
            .collect();

        Ok(Self::from_map(&map))
    }

    /// Directory for durable state and traces.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(infrastructure::default_data_dir)
    }

    /// Loads the configured theme: file first, then name, then `neon-dark`.
    #[must_use]
    pub fn theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }

        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Builds the controller from configuration and previously persisted durable state.
///
/// The returned state has not started booting; feed it [`Event::Start`] with the
/// current address.
#[must_use]
pub fn initialize(config: &Config, durable: DurableState) -> AppState {
    tracing::debug!(
        api_base = %config.api_base,
        page_size = config.page_size,
        admin = durable.admin_verified,
        "initializing controller"
    );

    AppState::new(
        config.viewport_width,
        config.page_size,
        Duration::from_millis(config.admin_debounce_ms),
        durable,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_map(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn typed_values_fall_back_on_garbage() {
        let config = Config::from_map(&map(&[
            ("page_size", "0"),
            ("viewport_width", "700"),
            ("admin_debounce_ms", "-5"),
            ("theme", "  "),
            ("trace_level", "debug"),
        ]));

        assert_eq!(config.page_size, 20);
        assert_eq!(config.viewport_width, 700);
        assert_eq!(config.admin_debounce_ms, 500);
        assert_eq!(config.theme_name, None);
        assert_eq!(config.trace_level.as_deref(), Some("debug"));
    }

    #[test]
    fn toml_file_uses_same_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("codenexus.toml");
        std::fs::write(&path, "api_base = \"http://backend:9000/\"\npage_size = 5\ntheme = \"neon-light\"\n[extra]\nx = 1\n")
            .unwrap();

        let config = Config::from_toml_file(&path).unwrap();
        assert_eq!(config.api_base, "http://backend:9000");
        assert_eq!(config.page_size, 5);
        assert_eq!(config.theme().name, "neon-light");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "page_size = = 3").unwrap();

        assert!(matches!(Config::from_toml_file(&path), Err(CodeNexusError::Config(_))));
        assert!(matches!(Config::from_toml_file(dir.path().join("missing.toml")), Err(CodeNexusError::Io(_))));
    }

    #[test]
    fn initialize_applies_page_size_and_durable_state() {
        let config = Config { page_size: 7, ..Config::default() };
        let durable = DurableState { admin_verified: true, ..DurableState::default() };
        let state = initialize(&config, durable);

        assert_eq!(state.context.page_size, 7);
        assert!(state.admin.is_verified());
        assert!(state.is_booting());
    }
}
