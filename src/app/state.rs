//! Controller state.
//!
//! [`AppState`] is the one mutable record of a page session. Everything the router,
//! the pagination controller, the admin state machine and the menu controllers read
//! or write lives here and is threaded explicitly into every handler; there is no
//! hidden global.
//!
//! # State Components
//!
//! - **Page context**: content type, page cursor, page size, category filter, loading flag
//! - **Generation**: dispatch counter that decides whether a response is still wanted
//! - **View and page**: the data on screen and the render tree painted from it
//! - **Admin session**: covert elevation state and the accepted credential
//! - **Menus and timers**: open menus, live timers
//! - **Boot**: progress of the startup sequence and the address deferred until it ends

use crate::api::{ApiCall, ApiRequest, Generation};
use crate::app::actions::{Action, WeeklyMenu};
use crate::app::admin::AdminSession;
use crate::app::menus::MenuState;
use crate::app::modes::ContentType;
use crate::app::router::Location;
use crate::app::timers::Timers;
use crate::domain::ConfigTable;
use crate::storage::DurableState;
use crate::ui::tree::{ControlId, Page};
use crate::ui::views::{render, RenderContext, View};
use std::collections::BTreeMap;
use std::time::Duration;

/// Route and pagination cursor of the main surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub content_type: ContentType,
    /// Current page, 1-based.
    pub page: u32,
    /// Fixed for the session.
    pub page_size: u32,
    /// Category filter supplied by the route, if any.
    pub category: Option<String>,
    /// Whether a full load of the main surface is in flight.
    pub loading: bool,
}

impl PageContext {
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            content_type: ContentType::News,
            page: 1,
            page_size,
            category: None,
            loading: false,
        }
    }
}

/// Progress of the startup sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    /// `Start` has not arrived yet.
    NotStarted,
    LoadingConfig,
    LoadingWeeklyIndex,
    Ready,
}

/// Complete controller state of one page session.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: ConfigTable,
    pub context: PageContext,
    pub generation: Generation,

    /// Data on the main surface.
    pub view: View,

    /// Render tree last painted from `view`, including its bindings.
    pub page: Page,

    /// Address currently dispatched.
    pub location: Location,

    pub admin: AdminSession,

    /// Credential sent with moderation requests.
    pub admin_code: Option<String>,

    pub menus: MenuState,
    pub timers: Timers,
    pub weekly_menu: WeeklyMenu,
    pub(crate) weekly_fetch_pending: bool,

    /// Durable last tool category route, e.g. `category/cli`.
    pub last_category: Option<String>,

    pub boot: BootPhase,

    /// Latest address that arrived while booting.
    pub(crate) deferred: Option<Location>,

    /// Copy controls waiting for prompt text, by prompt identifier.
    pub(crate) pending_copies: BTreeMap<String, ControlId>,
    /// Copies handed to the clipboard, by control, with the generation they were issued under.
    pub(crate) copies_in_flight: BTreeMap<ControlId, Generation>,
}

impl AppState {
    /// Creates the state of a fresh session.
    ///
    /// # Parameters
    ///
    /// * `viewport_width` - Initial viewport width, selects the layout class
    /// * `page_size` - Page size used by every paged listing
    /// * `admin_debounce` - Quiet period of the covert code capture
    /// * `durable` - Values read from the durable store
    #[must_use]
    pub fn new(viewport_width: u32, page_size: u32, admin_debounce: Duration, durable: DurableState) -> Self {
        Self {
            config: ConfigTable::default(),
            context: PageContext::new(page_size.max(1)),
            generation: Generation::default(),
            view: View::Blank,
            page: Page::default(),
            location: Location::parse("/"),
            admin: AdminSession::new(durable.admin_verified, admin_debounce),
            admin_code: durable.admin_code,
            menus: MenuState::new(viewport_width),
            timers: Timers::default(),
            weekly_menu: WeeklyMenu::Unloaded,
            weekly_fetch_pending: false,
            last_category: durable.last_category,
            boot: BootPhase::NotStarted,
            deferred: None,
            pending_copies: BTreeMap::new(),
            copies_in_flight: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn is_booting(&self) -> bool {
        !matches!(self.boot, BootPhase::Ready)
    }

    #[must_use]
    pub fn render_context(&self) -> RenderContext<'_> {
        RenderContext { config: &self.config, admin: self.admin.is_verified() }
    }

    /// Starts a new generation; responses issued under older ones will be discarded.
    pub fn bump_generation(&mut self) -> Generation {
        self.generation = self.generation.next();
        tracing::debug!(generation = %self.generation, "generation advanced");
        self.generation
    }

    /// Stamps a request with the live generation.
    #[must_use]
    pub fn fetch(&self, request: ApiRequest) -> Action {
        Action::Fetch(ApiCall::new(self.generation, request))
    }

    /// Replaces the view, renders it and returns the paint action.
    pub fn show(&mut self, view: View) -> Action {
        self.view = view;
        self.repaint()
    }

    /// Re-renders the current view, e.g. after admin elevation or a form status change.
    pub fn repaint(&mut self) -> Action {
        self.page = render(&self.view, &self.render_context());
        Action::Paint(self.page.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::tree::Node;

    fn state() -> AppState {
        AppState::new(1024, 20, Duration::from_millis(500), DurableState::default())
    }

    #[test]
    fn fresh_state_is_booting_on_page_one() {
        let state = state();
        assert!(state.is_booting());
        assert_eq!(state.context.page, 1);
        assert_eq!(state.context.page_size, 20);
        assert!(!state.admin.is_verified());
    }

    #[test]
    fn fetch_is_stamped_with_live_generation() {
        let mut state = state();
        let generation = state.bump_generation();
        let Action::Fetch(call) = state.fetch(ApiRequest::Rules) else { panic!("expected fetch") };
        assert_eq!(call.generation, generation);
    }

    #[test]
    fn show_keeps_painted_page() {
        let mut state = state();
        let action = state.show(View::Loading);
        assert_eq!(state.page.nodes, vec![Node::Spinner]);
        assert_eq!(action, Action::Paint(state.page.clone()));
    }

    #[test]
    fn durable_flags_carry_over() {
        let durable = DurableState {
            admin_verified: true,
            admin_code: Some("abc".into()),
            last_category: Some("category/cli".into()),
        };
        let state = AppState::new(600, 20, Duration::from_millis(500), durable);
        assert!(state.admin.is_verified());
        assert_eq!(state.admin_code.as_deref(), Some("abc"));
        assert!(state.render_context().admin);
    }
}
