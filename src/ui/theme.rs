//! Theme management and ANSI escape sequence generation.
//!
//! Color schemes for the terminal painter, either built in (embedded TOML) or loaded
//! from a custom TOML file. Every theme carries both accent groups, so tool cards can
//! be painted cyan or purple by category.
//!
//! # Built-in Themes
//!
//! - `neon-dark`: Dark background, cyan/blue and purple/pink accents (default)
//! - `neon-light`: Light background with the same accent groups, darkened
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! heading_fg = "#e6edf3"
//! text_normal = "#c9d1d9"
//! text_dim = "#8b949e"
//! border = "#30363d"
//! accent_cyan = "#00f0ff"
//! accent_purple = "#bf5af2"
//! control_fg = "#00f0ff"
//! control_disabled_fg = "#484f58"
//! error_fg = "#ff6b6b"
//! success_fg = "#3fb950"
//! pending_fg = "#e3b341"
//! tag_tool_fg = "#bf5af2"
//! tag_freeform_fg = "#58a6ff"
//! match_highlight_fg = "#0d1117"
//! match_highlight_bg = "#e3b341"
//! nav_active_fg = "#00f0ff"
//! ```
//!
//! # Example
//!
//! ```
//! use codenexus::ui::Theme;
//!
//! let theme = Theme::from_name("neon-dark").unwrap();
//! println!("{}", Theme::fg(&theme.colors.heading_fg));
//! println!("{}Bold Text{}", Theme::bold(), Theme::reset());
//! ```

use crate::domain::error::{CodeNexusError, Result};
use crate::ui::tree::{Accent, Tone};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Color scheme configuration for the painter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#00f0ff"`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Page headings and card titles.
    pub heading_fg: String,
    /// Body text.
    pub text_normal: String,
    /// Secondary text (meta lines, descriptions).
    pub text_dim: String,
    /// Separator lines.
    pub border: String,

    /// Cyan/blue accent group.
    pub accent_cyan: String,
    /// Purple/pink accent group.
    pub accent_purple: String,

    /// Enabled control labels.
    pub control_fg: String,
    /// Disabled control labels.
    pub control_disabled_fg: String,

    pub error_fg: String,
    pub success_fg: String,
    pub pending_fg: String,

    /// Tags derived from tools.
    pub tag_tool_fg: String,
    /// Free-form tags.
    pub tag_freeform_fg: String,

    /// Search match highlight foreground.
    pub match_highlight_fg: String,
    /// Search match highlight background.
    pub match_highlight_bg: String,

    /// Active navigation entry.
    pub nav_active_fg: String,
}

impl Theme {
    /// Embedded palette registered under `name`, or `None` for names that are not built in.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let source = match name {
            "neon-dark" => include_str!("../../themes/neon-dark.toml"),
            "neon-light" => include_str!("../../themes/neon-light.toml"),
            _ => return None,
        };
        toml::from_str(source).ok()
    }

    /// Reads a custom palette from a TOML file on disk.
    ///
    /// # Errors
    ///
    /// [`CodeNexusError::Theme`] when the file is unreadable or does not describe a full palette.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| CodeNexusError::Theme(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&contents).map_err(|e| CodeNexusError::Theme(format!("invalid theme {}: {e}", path.display())))
    }

    /// Hex color of an accent group.
    #[must_use]
    pub fn accent(&self, accent: Accent) -> &str {
        match accent {
            Accent::Cyan => &self.colors.accent_cyan,
            Accent::Purple => &self.colors.accent_purple,
        }
    }

    /// Hex color of a text tone.
    #[must_use]
    pub fn tone(&self, tone: Tone) -> &str {
        match tone {
            Tone::Normal => &self.colors.text_normal,
            Tone::Muted => &self.colors.text_dim,
            Tone::Error => &self.colors.error_fg,
            Tone::Success => &self.colors.success_fg,
            Tone::Pending => &self.colors.pending_fg,
            Tone::Highlight => &self.colors.accent_cyan,
        }
    }

    /// 24-bit foreground escape for a hex color. Malformed colors paint white.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        true_color(38, hex)
    }

    /// 24-bit background escape for a hex color. Malformed colors paint white.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        true_color(48, hex)
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    #[must_use]
    pub const fn underline() -> &'static str {
        "\u{001b}[4m"
    }

    /// Clears every attribute set by the other escapes.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// `neon-dark`.
    ///
    /// # Panics
    ///
    /// Only if the embedded `neon-dark.toml` is malformed.
    fn default() -> Self {
        Self::from_name("neon-dark").expect("embedded neon-dark theme parses")
    }
}

fn true_color(layer: u8, hex: &str) -> String {
    let (r, g, b) = parse_hex(hex).unwrap_or((255, 255, 255));
    format!("\u{001b}[{layer};2;{r};{g};{b}m")
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.trim().trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
