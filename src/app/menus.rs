//! Dropdown and submenu open/close state.
//!
//! Every menu is an independent two-state machine. Opening one never closes a
//! sibling. Menus are forced closed by a pointer interaction outside them, by the
//! viewport crossing the mobile/desktop breakpoint, and by route changes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Viewport widths at or below this are laid out for mobile.
pub const MOBILE_BREAKPOINT: u32 = 768;

/// Desktop header dropdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dropdown {
    News,
    Resources,
    Weekly,
}

/// Collapsible groups inside the mobile navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Submenu {
    News,
    Resources,
    ClaudeCode,
    Weekly,
}

/// Every menu the controller tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MenuId {
    Dropdown(Dropdown),
    MobileSubmenu(Submenu),
    MobileTopNav,
    Sidebar,
}

impl MenuId {
    /// All menus, in chrome order.
    pub const ALL: [Self; 9] = [
        Self::Dropdown(Dropdown::News),
        Self::Dropdown(Dropdown::Resources),
        Self::Dropdown(Dropdown::Weekly),
        Self::MobileTopNav,
        Self::MobileSubmenu(Submenu::News),
        Self::MobileSubmenu(Submenu::Resources),
        Self::MobileSubmenu(Submenu::ClaudeCode),
        Self::MobileSubmenu(Submenu::Weekly),
        Self::Sidebar,
    ];

    /// Parses the short names used by the terminal host (`news`, `m-weekly`, `sidebar`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "news" => Self::Dropdown(Dropdown::News),
            "resources" => Self::Dropdown(Dropdown::Resources),
            "weekly" => Self::Dropdown(Dropdown::Weekly),
            "topnav" => Self::MobileTopNav,
            "sidebar" => Self::Sidebar,
            "m-news" => Self::MobileSubmenu(Submenu::News),
            "m-resources" => Self::MobileSubmenu(Submenu::Resources),
            "m-claude-code" => Self::MobileSubmenu(Submenu::ClaudeCode),
            "m-weekly" => Self::MobileSubmenu(Submenu::Weekly),
            _ => return None,
        })
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dropdown(Dropdown::News) => "news",
            Self::Dropdown(Dropdown::Resources) => "resources",
            Self::Dropdown(Dropdown::Weekly) => "weekly",
            Self::MobileTopNav => "topnav",
            Self::Sidebar => "sidebar",
            Self::MobileSubmenu(Submenu::News) => "m-news",
            Self::MobileSubmenu(Submenu::Resources) => "m-resources",
            Self::MobileSubmenu(Submenu::ClaudeCode) => "m-claude-code",
            Self::MobileSubmenu(Submenu::Weekly) => "m-weekly",
        }
    }
}

/// Layout class derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layout {
    Mobile,
    Desktop,
}

impl Layout {
    #[must_use]
    pub const fn for_width(width: u32) -> Self {
        if width <= MOBILE_BREAKPOINT {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Open menus plus the layout class they were opened under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuState {
    open: BTreeSet<MenuId>,
    layout: Layout,
}

impl MenuState {
    #[must_use]
    pub fn new(viewport_width: u32) -> Self {
        Self {
            open: BTreeSet::new(),
            layout: Layout::for_width(viewport_width),
        }
    }

    #[must_use]
    pub fn is_open(&self, menu: MenuId) -> bool {
        self.open.contains(&menu)
    }

    #[must_use]
    pub const fn layout(&self) -> Layout {
        self.layout
    }

    /// Flips one menu and returns whether it is now open.
    pub fn toggle(&mut self, menu: MenuId) -> bool {
        if self.open.remove(&menu) {
            false
        } else {
            self.open.insert(menu);
            true
        }
    }

    /// Closes one menu. Returns whether anything changed.
    pub fn close(&mut self, menu: MenuId) -> bool {
        self.open.remove(&menu)
    }

    /// Closes every menu. Returns whether anything changed.
    pub fn close_all(&mut self) -> bool {
        let changed = !self.open.is_empty();
        self.open.clear();
        changed
    }

    /// Handles a pointer interaction; `inside` lists the menus whose subtree or trigger
    /// contains the target. Every other open menu closes.
    pub fn pointer_down(&mut self, inside: &[MenuId]) -> bool {
        let before = self.open.len();
        self.open.retain(|menu| inside.contains(menu));
        before != self.open.len()
    }

    /// Handles a viewport resize. Crossing the breakpoint closes every menu.
    pub fn resize(&mut self, width: u32) -> bool {
        let layout = Layout::for_width(width);
        if layout == self.layout {
            return false;
        }

        tracing::debug!(width, ?layout, "layout class changed");
        self.layout = layout;
        self.close_all()
    }
}
