//! Application layer coordinating state, events, and actions.
//!
//! The controller is sans-IO: it never touches the network, the clock or the screen.
//! The host feeds it [`Event`]s and executes the [`Action`]s it returns.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Host Input → Events → handle_event → State Mutations → Actions → Side Effects
//!                            ↑                                  ↓
//!                            └───── API completions, timers ────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effects and the commands bound to painted controls
//! - [`handler`]: Event processing and state transition coordinator
//! - [`router`]: Address parsing, route resolution and navigation keys
//! - [`dispatch`]: Route dispatch and listing loads
//! - [`responses`]: Completion of backend requests with stale-response filtering
//! - [`pagination`], [`forms`], [`commands`]: Operations triggered from the page
//! - [`admin`]: Covert admin code capture and validation
//! - [`menus`], [`timers`]: Skeleton menus and host-driven timers
//! - [`modes`]: Content types and listing descriptors
//! - [`state`]: Central application state container

pub mod actions;
pub mod admin;
pub mod commands;
pub mod dispatch;
pub mod forms;
pub mod handler;
pub mod menus;
pub mod modes;
pub mod pagination;
pub mod responses;
pub mod router;
pub mod state;
pub mod timers;

pub use actions::{Action, Command};
pub use handler::{handle_event, Event, Key, KeyTarget};
pub use state::AppState;
