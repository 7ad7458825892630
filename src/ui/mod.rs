//! Presentation layer: declarative page trees and their terminal painting.
//!
//! Views turn controller state into a [`Page`], a tree of nodes whose controls are
//! bound to commands. The page is pure data; painting it is left to the host. The
//! bundled painter renders pages and the site skeleton as ANSI text.
//!
//! # Architecture
//!
//! ```text
//! View + RenderContext → render → Page ─┬─▶ paint_page → ANSI Output
//! Chrome + MenuState ───────────────────┴─▶ paint_chrome
//! ```
//!
//! # Modules
//!
//! - [`tree`]: Page nodes, controls, forms and region patches
//! - [`views`]: One renderer per content type
//! - [`chrome`]: Skeleton navigation (dropdowns, sidebar, weekly menu, admin entry)
//! - [`painter`]: ANSI painting of pages and chrome
//! - [`helpers`]: Dates, sources and search highlighting
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod chrome;
pub mod helpers;
pub mod painter;
pub mod theme;
pub mod tree;
pub mod views;

pub use chrome::Chrome;
pub use painter::{paint_chrome, paint_page};
pub use theme::Theme;
pub use tree::{Accent, Card, Control, ControlId, Field, Form, FormId, Node, Page, PageBuilder, Region, RegionPatch, Tone};
pub use views::{render, RenderContext, View};
