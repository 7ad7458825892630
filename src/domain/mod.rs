//! Domain layer for the CodeNexus controller.
//!
//! Core types shared by every other layer, independent of transport and rendering:
//! the item models returned by the backend, the page configuration table, and the
//! crate-wide error type.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`models`]: Listing pages and the items they carry
//! - [`config_table`]: Page titles/descriptions with built-in fallbacks

pub mod config_table;
pub mod error;
pub mod models;

pub use config_table::{category_display_name, CategoryMeta, ConfigTable, PageMeta};
pub use error::{CodeNexusError, Result};
pub use models::{
    AckReply, Article, ArticleFeed, CatalogEntry, ErrorDetail, ItemId, ListResult, PromptContent, Resource,
    Tag, TagOrigin, Tool, ToolDetail, VerifyReply, WeeklyDigest, WeeklyEntry, WeeklyIndex,
};
