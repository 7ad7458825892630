//! Event handling and state transition logic.
//!
//! This module implements [`handle_event`], the single entry point of the controller.
//! The host translates everything that happens outside (address changes, clicks,
//! keystrokes, timer fires, completed HTTP requests, viewport changes) into an
//! [`Event`], and executes the returned [`Action`]s in order.
//!
//! # Architecture
//!
//! ```text
//! Host ──Event──▶ handle_event ──▶ AppState mutations
//!   ▲                   │
//!   └────Vec<Action>────┘  (fetches, paints, timers, durable writes, dialogs)
//! ```
//!
//! # Event Types
//!
//! - **Navigation**: `Start`, `Navigate`, `LinkClicked`
//! - **Surface**: `Activate`, `Submit`, `Confirmed`, `CopyFinished`
//! - **Keyboard**: `Key` (covert admin capture, Escape closes the sidebar)
//! - **Chrome**: `ToggleMenu`, `PointerDown`, `Resize`
//! - **Asynchronous**: `TimerFired`, `ApiCompleted`
//!
//! # Example
//!
//! ```
//! use codenexus::app::{handle_event, Action, AppState, Event};
//! use codenexus::app::router::Location;
//! use codenexus::storage::DurableState;
//! use std::time::Duration;
//!
//! let mut state = AppState::new(1024, 20, Duration::from_millis(500), DurableState::default());
//! let (_, actions) = handle_event(&mut state, &Event::Start { location: Location::parse("/tools") })?;
//! assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));
//! # Ok::<(), codenexus::CodeNexusError>(())
//! ```

use crate::api::{ApiCall, ApiOutcome, ApiRequest};
use crate::app::actions::{Action, Command};
use crate::app::commands::{confirmed, execute};
use crate::app::dispatch::{dispatch, navigate};
use crate::app::forms::submit;
use crate::app::menus::{Dropdown, MenuId, Submenu};
use crate::app::responses::on_api_completed;
use crate::app::router::{Location, NavKey};
use crate::app::state::{AppState, BootPhase};
use crate::app::timers::{TimerHandle, TimerPurpose, COPY_FEEDBACK};
use crate::domain::error::Result;
use crate::ui::tree::{ControlId, FormId};
use crate::ui::views::{COPIED_LABEL, COPY_LABEL};
use std::collections::BTreeMap;

/// A key press as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// A single printable character.
    Char(char),
    Backspace,
    Delete,
    Escape,
    Enter,
    /// Any other named key (`Tab`, `ArrowUp`, ...).
    Other(String),
}

/// Where keyboard focus was when a key was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    /// Outside any text-entry surface.
    Document,
    /// An input, textarea or content-editable surface.
    TextEntry,
}

/// Events reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The page was opened at `location`. Starts the boot sequence.
    Start { location: Location },

    /// The address changed without a link click (history navigation, typed address).
    Navigate { location: Location },

    /// A skeleton link was followed.
    LinkClicked { href: String },

    /// A control of the painted page was activated.
    Activate(ControlId),

    /// A form of the painted page was submitted with these field values.
    Submit {
        form: FormId,
        fields: BTreeMap<String, String>,
    },

    Key {
        key: Key,
        target: KeyTarget,
    },

    TimerFired(TimerHandle),

    /// A request issued with [`Action::Fetch`] finished.
    ApiCompleted {
        call: ApiCall,
        outcome: ApiOutcome,
    },

    /// A menu trigger was clicked.
    ToggleMenu(MenuId),

    /// A pointer interaction; `inside` lists the menus whose subtree or trigger was hit.
    PointerDown { inside: Vec<MenuId> },

    Resize { width: u32 },

    /// The user accepted an [`Action::Confirm`] dialog.
    Confirmed(Command),

    /// Outcome of an [`Action::CopyToClipboard`].
    CopyFinished { control: ControlId, ok: bool },
}

/// Processes an event, mutates the controller state and returns the actions to execute.
///
/// # Returns
///
/// `(chrome_changed, actions)`. `chrome_changed` reports that the open/closed state of
/// the menus changed and the skeleton should be repainted. Actions are executed in order.
///
/// # Errors
///
/// Never returns `Err` for any event. Backend, validation and authorization failures are
/// reported as actions (inline error views, alerts, or nothing), and hosts handle the
/// `Result` like any other crate call.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event = event_name(event), generation = %state.generation).entered();

    let menus_before = state.menus.clone();
    let actions = match event {
        Event::Start { location } => start(state, location),
        Event::Navigate { location } => {
            if state.is_booting() {
                tracing::debug!(path = %location, "address deferred until boot finishes");
                state.deferred = Some(location.clone());
                vec![]
            } else {
                dispatch(state, location.clone())
            }
        }
        Event::LinkClicked { href } => follow_link(state, href),
        Event::Activate(control) => match state.page.command(*control).cloned() {
            Some(command) => execute(state, &command, *control),
            None => {
                tracing::debug!(%control, "control is not bound on the painted page");
                vec![]
            }
        },
        Event::Submit { form, fields } => submit(state, *form, fields),
        Event::Key { key, target } => on_key(state, key, *target),
        Event::TimerFired(handle) => on_timer(state, *handle),
        Event::ApiCompleted { call, outcome } => on_api_completed(state, call, outcome),
        Event::ToggleMenu(menu) => toggle_menu(state, *menu),
        Event::PointerDown { inside } => {
            state.menus.pointer_down(inside);
            vec![]
        }
        Event::Resize { width } => {
            state.menus.resize(*width);
            vec![]
        }
        Event::Confirmed(command) => confirmed(state, command),
        Event::CopyFinished { control, ok } => copy_finished(state, *control, *ok),
    };

    let chrome_changed = state.menus != menus_before;
    tracing::trace!(actions = actions.len(), chrome_changed, "event handled");
    Ok((chrome_changed, actions))
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::Start { .. } => "start",
        Event::Navigate { .. } => "navigate",
        Event::LinkClicked { .. } => "link_clicked",
        Event::Activate(_) => "activate",
        Event::Submit { .. } => "submit",
        Event::Key { .. } => "key",
        Event::TimerFired(_) => "timer_fired",
        Event::ApiCompleted { .. } => "api_completed",
        Event::ToggleMenu(_) => "toggle_menu",
        Event::PointerDown { .. } => "pointer_down",
        Event::Resize { .. } => "resize",
        Event::Confirmed(_) => "confirmed",
        Event::CopyFinished { .. } => "copy_finished",
    }
}

fn start(state: &mut AppState, location: &Location) -> Vec<Action> {
    if state.boot != BootPhase::NotStarted {
        tracing::debug!("boot already started");
        state.deferred = Some(location.clone());
        return vec![];
    }

    tracing::info!(path = %location, "boot started");
    state.boot = BootPhase::LoadingConfig;
    state.location = location.clone();
    vec![state.fetch(ApiRequest::Config)]
}

/// External and admin-panel links leave the portal; everything else is routed in place.
fn follow_link(state: &mut AppState, href: &str) -> Vec<Action> {
    if href.starts_with("http") || href.starts_with("/digest") {
        return vec![Action::OpenExternal { url: href.to_string() }];
    }
    if state.is_booting() {
        state.deferred = Some(Location::parse(href));
        return vec![Action::PushHistory { path: Location::parse(href).to_string() }];
    }
    navigate(state, href)
}

fn on_key(state: &mut AppState, key: &Key, target: KeyTarget) -> Vec<Action> {
    if *key == Key::Escape && target == KeyTarget::Document {
        state.menus.close(MenuId::Sidebar);
    }
    state.admin.on_key(key, target, &mut state.timers)
}

fn on_timer(state: &mut AppState, handle: TimerHandle) -> Vec<Action> {
    match state.timers.fire(handle) {
        Some(TimerPurpose::AdminDebounce) => state
            .admin
            .on_debounce(handle)
            .map(|request| vec![state.fetch(request)])
            .unwrap_or_default(),
        Some(TimerPurpose::NavHighlight) => vec![Action::HighlightNav(NavKey::from_path(&state.location.path))],
        Some(purpose @ TimerPurpose::CopyFeedback(control)) => {
            // A later copy of the same control owns the label until its own timer fires.
            let superseded = state.timers.pending(purpose) > 0;
            let still_copied = state.page.controls().iter().any(|c| c.id == control && c.label == COPIED_LABEL);
            if !superseded && still_copied && state.page.relabel(control, COPY_LABEL) {
                vec![Action::Paint(state.page.clone())]
            } else {
                vec![]
            }
        }
        None => {
            tracing::trace!(handle = handle.0, "unknown timer ignored");
            vec![]
        }
    }
}

fn toggle_menu(state: &mut AppState, menu: MenuId) -> Vec<Action> {
    let open = state.menus.toggle(menu);
    let weekly = matches!(menu, MenuId::Dropdown(Dropdown::Weekly) | MenuId::MobileSubmenu(Submenu::Weekly));

    if open && weekly && !state.weekly_menu.is_populated() && !state.weekly_fetch_pending {
        tracing::debug!("weekly menu opened before it was populated");
        state.weekly_fetch_pending = true;
        return vec![state.fetch(ApiRequest::WeeklyIndex)];
    }
    vec![]
}

fn copy_finished(state: &mut AppState, control: ControlId, ok: bool) -> Vec<Action> {
    let issued = state.copies_in_flight.remove(&control);
    if !ok {
        return vec![Action::Alert(crate::app::responses::COPY_FAILED.to_string())];
    }

    if issued != Some(state.generation) || !state.page.relabel(control, COPIED_LABEL) {
        return vec![];
    }

    let (_, start) = state.timers.start(TimerPurpose::CopyFeedback(control), COPY_FEEDBACK);
    vec![Action::Paint(state.page.clone()), start]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DurableState;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(1024, 20, Duration::from_millis(500), DurableState::default())
    }

    fn complete(state: &mut AppState, actions: &[Action], outcome: ApiOutcome) -> Vec<Action> {
        let call = actions
            .iter()
            .find_map(|a| if let Action::Fetch(call) = a { Some(call.clone()) } else { None })
            .expect("a request was issued");
        handle_event(state, &Event::ApiCompleted { call, outcome }).unwrap().1
    }

    #[test]
    fn boot_fetches_config_then_weekly_then_dispatches() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Start { location: Location::parse("/prompts") }).unwrap();
        let actions = complete(&mut state, &actions, ApiOutcome::json(200, &serde_json::json!({})));
        let Action::Fetch(call) = &actions[0] else { panic!("expected weekly index fetch") };
        assert_eq!(call.request, ApiRequest::WeeklyIndex);

        let actions = complete(&mut state, &actions, ApiOutcome::json(200, &serde_json::json!({"items": []})));
        assert!(!state.is_booting());
        assert!(actions.contains(&Action::HighlightNav(NavKey::from_path("/prompts"))));
        assert!(actions.iter().any(|a| matches!(a, Action::Fetch(c) if c.request.kind() == "prompts")));
    }

    #[test]
    fn navigation_during_boot_is_deferred_latest_wins() {
        let mut state = state();
        let (_, actions) = handle_event(&mut state, &Event::Start { location: Location::parse("/") }).unwrap();
        handle_event(&mut state, &Event::Navigate { location: Location::parse("/rules") }).unwrap();
        handle_event(&mut state, &Event::Navigate { location: Location::parse("/hot-news") }).unwrap();

        let actions = complete(&mut state, &actions, ApiOutcome::Transport { message: "down".into() });
        let actions = complete(&mut state, &actions, ApiOutcome::Transport { message: "down".into() });
        assert!(actions.iter().any(|a| matches!(a, Action::Fetch(c) if c.request.kind() == "hot_news")));
        assert!(!actions.iter().any(|a| matches!(a, Action::Fetch(c) if c.request.kind() == "rules")));
    }

    #[test]
    fn external_links_leave_the_portal() {
        let mut state = state();
        state.boot = BootPhase::Ready;
        let (_, actions) = handle_event(&mut state, &Event::LinkClicked { href: "/digest/panel".into() }).unwrap();
        assert_eq!(actions, vec![Action::OpenExternal { url: "/digest/panel".into() }]);

        let (_, actions) = handle_event(&mut state, &Event::LinkClicked { href: "/rules".into() }).unwrap();
        assert_eq!(actions[0], Action::PushHistory { path: "/rules".into() });
    }

    #[test]
    fn failures_are_actions_not_errors() {
        let mut state = state();
        let call = ApiCall::new(state.generation, ApiRequest::Prompts { page: 1, page_size: 20 });
        let events = [
            Event::Navigate { location: Location::parse("/nowhere") },
            Event::Start { location: Location::parse("/") },
            Event::Start { location: Location::parse("/again") },
            Event::ApiCompleted { call, outcome: ApiOutcome::Transport { message: "refused".into() } },
            Event::Activate(ControlId(7)),
            Event::Submit { form: FormId::Article, fields: BTreeMap::new() },
            Event::Key { key: Key::Other("F5".into()), target: KeyTarget::TextEntry },
            Event::TimerFired(TimerHandle(99)),
            Event::PointerDown { inside: vec![] },
            Event::Resize { width: 0 },
            Event::Confirmed(Command::GoBack),
            Event::CopyFinished { control: ControlId(1), ok: false },
        ];
        for event in &events {
            assert!(handle_event(&mut state, event).is_ok(), "{event:?}");
        }
    }

    #[test]
    fn unbound_control_does_nothing() {
        let mut state = state();
        let (changed, actions) = handle_event(&mut state, &Event::Activate(ControlId(42))).unwrap();
        assert!(!changed);
        assert!(actions.is_empty());
    }

    #[test]
    fn menu_events_report_chrome_changes() {
        let mut state = state();
        let (changed, _) = handle_event(&mut state, &Event::ToggleMenu(MenuId::Sidebar)).unwrap();
        assert!(changed);

        let key = Event::Key { key: Key::Escape, target: KeyTarget::Document };
        let (changed, _) = handle_event(&mut state, &key).unwrap();
        assert!(changed);
        assert!(!state.menus.is_open(MenuId::Sidebar));
    }

    #[test]
    fn opening_unpopulated_weekly_menu_fetches_index_once() {
        let mut state = state();
        let weekly = MenuId::Dropdown(Dropdown::Weekly);
        let (_, actions) = handle_event(&mut state, &Event::ToggleMenu(weekly)).unwrap();
        assert_eq!(actions.len(), 1);

        handle_event(&mut state, &Event::ToggleMenu(weekly)).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::ToggleMenu(weekly)).unwrap();
        assert!(actions.is_empty());
    }

    /// A painted prompts page with two copyable prompts.
    fn prompts_page() -> (AppState, ControlId, ControlId) {
        let mut state = state();
        state.boot = BootPhase::Ready;
        let (_, actions) = handle_event(&mut state, &Event::Navigate { location: Location::parse("/prompts") }).unwrap();
        let body = serde_json::json!({
            "items": [{"name": "Review", "identifier": "review"}, {"name": "Refactor", "identifier": "refactor"}],
            "total": 2, "total_pages": 1
        });
        complete(&mut state, &actions, ApiOutcome::json(200, &body));

        let copies: Vec<ControlId> =
            state.page.controls().iter().filter(|c| c.label == COPY_LABEL).map(|c| c.id).collect();
        assert_eq!(copies.len(), 2);
        (state, copies[0], copies[1])
    }

    fn label_of(state: &AppState, control: ControlId) -> String {
        state.page.controls().iter().find(|c| c.id == control).map(|c| c.label.clone()).unwrap()
    }

    /// Activates a copy control, serves the prompt text and reports the clipboard outcome.
    fn copy(state: &mut AppState, control: ControlId, ok: bool) -> Vec<Action> {
        let (_, actions) = handle_event(state, &Event::Activate(control)).unwrap();
        let actions = complete(state, &actions, ApiOutcome::json(200, &serde_json::json!({"content": "prompt text"})));
        assert_eq!(actions, vec![Action::CopyToClipboard { text: "prompt text".into(), control }]);
        handle_event(state, &Event::CopyFinished { control, ok }).unwrap().1
    }

    fn feedback_timer(actions: &[Action]) -> TimerHandle {
        let timers: Vec<_> = actions
            .iter()
            .filter_map(|a| if let Action::StartTimer { handle, after } = a { Some((*handle, *after)) } else { None })
            .collect();
        assert_eq!(timers.len(), 1, "{actions:?}");
        assert_eq!(timers[0].1, COPY_FEEDBACK);
        timers[0].0
    }

    #[test]
    fn copy_flashes_label_then_restores_it() {
        let (mut state, review, _) = prompts_page();

        let actions = copy(&mut state, review, true);
        assert!(matches!(actions.first(), Some(Action::Paint(_))));
        assert_eq!(label_of(&state, review), COPIED_LABEL);
        let timer = feedback_timer(&actions);

        let (_, actions) = handle_event(&mut state, &Event::TimerFired(timer)).unwrap();
        assert!(matches!(actions.as_slice(), [Action::Paint(_)]));
        assert_eq!(label_of(&state, review), COPY_LABEL);
    }

    #[test]
    fn failed_copy_alerts_and_keeps_label() {
        let (mut state, review, _) = prompts_page();

        let actions = copy(&mut state, review, false);
        assert_eq!(actions, vec![Action::Alert(crate::app::responses::COPY_FAILED.into())]);
        assert_eq!(label_of(&state, review), COPY_LABEL);
        assert!(state.copies_in_flight.is_empty());
    }

    #[test]
    fn overlapping_copies_each_restore_their_label() {
        let (mut state, review, refactor) = prompts_page();

        let first = feedback_timer(&copy(&mut state, review, true));
        let second = feedback_timer(&copy(&mut state, refactor, true));
        assert_eq!(label_of(&state, review), COPIED_LABEL);
        assert_eq!(label_of(&state, refactor), COPIED_LABEL);

        handle_event(&mut state, &Event::TimerFired(first)).unwrap();
        assert_eq!(label_of(&state, review), COPY_LABEL);
        assert_eq!(label_of(&state, refactor), COPIED_LABEL);

        handle_event(&mut state, &Event::TimerFired(second)).unwrap();
        assert_eq!(label_of(&state, refactor), COPY_LABEL);
    }

    #[test]
    fn recopy_extends_feedback() {
        let (mut state, review, _) = prompts_page();

        let first = feedback_timer(&copy(&mut state, review, true));
        let second = feedback_timer(&copy(&mut state, review, true));

        let (_, actions) = handle_event(&mut state, &Event::TimerFired(first)).unwrap();
        assert!(actions.is_empty());
        assert_eq!(label_of(&state, review), COPIED_LABEL);

        handle_event(&mut state, &Event::TimerFired(second)).unwrap();
        assert_eq!(label_of(&state, review), COPY_LABEL);
    }

    #[test]
    fn nav_highlight_timer_uses_current_address() {
        let mut state = state();
        state.boot = BootPhase::Ready;
        let (_, actions) = handle_event(&mut state, &Event::Navigate { location: Location::parse("/category/ide") }).unwrap();
        let handle = actions
            .iter()
            .find_map(|a| if let Action::StartTimer { handle, .. } = a { Some(*handle) } else { None })
            .unwrap();

        let (_, actions) = handle_event(&mut state, &Event::TimerFired(handle)).unwrap();
        assert_eq!(actions, vec![Action::HighlightNav(NavKey::from_path("/tools"))]);
        let (_, actions) = handle_event(&mut state, &Event::TimerFired(handle)).unwrap();
        assert!(actions.is_empty());
    }
}
