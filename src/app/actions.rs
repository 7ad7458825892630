//! Side effects requested by the controller, and the commands bound to controls.
//!
//! [`handle_event`](crate::app::handle_event) never performs I/O. It returns a
//! `Vec<Action>` that the host executes in order: HTTP calls, paints, timers, durable
//! writes, dialogs and clipboard access all leave the controller this way.
//!
//! [`Command`] is the other direction: what a painted control does when the user
//! activates it. Commands live in the bindings table of the painted page, never inside
//! the render tree itself.
//!
//! # Example
//!
//! ```
//! use codenexus::app::Action;
//! use codenexus::storage::DurableKey;
//!
//! let actions = vec![
//!     Action::Persist { key: DurableKey::LastCategory, value: "category/cli".into() },
//!     Action::Alert("文章已成功删除".into()),
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use crate::api::ApiCall;
use crate::app::modes::Listing;
use crate::app::router::NavKey;
use crate::app::timers::TimerHandle;
use crate::domain::WeeklyEntry;
use crate::storage::DurableKey;
use crate::ui::{ControlId, Page, RegionPatch};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Contents of the weekly digest dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeeklyMenu {
    /// Not fetched yet.
    #[default]
    Unloaded,
    Loaded(Vec<WeeklyEntry>),
    Failed,
}

impl WeeklyMenu {
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        !matches!(self, Self::Unloaded)
    }
}

/// Side effects for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Executes a backend request and reports back with `Event::ApiCompleted`.
    Fetch(ApiCall),

    /// Replaces the main content surface and its bindings.
    Paint(Page),

    /// Replaces one region of the painted page and its bindings.
    PatchRegion(RegionPatch),

    /// Marks the navigation entry for the current address as active.
    HighlightNav(NavKey),

    /// Shows the hidden admin entry in the header and the mobile navigation.
    RevealAdminEntry,

    /// Replaces the weekly dropdown and mobile submenu contents.
    FillWeeklyMenu(WeeklyMenu),

    /// Writes one durable key.
    Persist {
        key: DurableKey,
        value: String,
    },

    /// Starts a one-shot timer; the host reports `Event::TimerFired(handle)`.
    StartTimer {
        handle: TimerHandle,
        after: Duration,
    },

    /// Cancels a timer started earlier.
    CancelTimer(TimerHandle),

    /// Shows a blocking message.
    Alert(String),

    /// Asks for confirmation; on accept the host reports `Event::Confirmed(on_accept)`.
    Confirm {
        message: String,
        on_accept: Command,
    },

    /// Opens a URL outside the portal.
    OpenExternal {
        url: String,
    },

    /// Pushes an address onto the history stack without reloading.
    PushHistory {
        path: String,
    },

    /// Goes back one history entry; the host reports the new address with `Event::Navigate`.
    HistoryBack,

    /// Writes text to the clipboard; the host reports `Event::CopyFinished`.
    CopyToClipboard {
        text: String,
        control: ControlId,
    },
}

/// Interaction to record when an external link is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Track {
    /// Tool id or identifier.
    Tool(String),
    /// Article URL.
    Article(String),
}

/// What an activated control does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Loads page `page` of `listing`. Values below 1 are ignored.
    ChangePage { page: i64, listing: Listing },

    /// Opens the detail page of a tool.
    OpenTool { key: String },

    /// Opens an external link, optionally recording the click.
    OpenExternal { url: String, track: Option<Track> },

    /// Deletes an article after confirmation; `category` is its feed key.
    DeleteArticle { url: String, category: Option<String> },

    /// Re-fetches the related articles of the tool on screen.
    RefreshRelated { key: String },

    /// Placeholder for a future related-articles page. Does nothing.
    ShowMore { key: String },

    /// Returns from a detail page.
    GoBack,

    /// Fetches the full text of a prompt and copies it.
    CopyPrompt { identifier: String },

    /// Drops the search text of the latest-articles feed.
    ClearRecentSearch,

    /// Navigates inside the portal.
    Navigate { path: String },
}
