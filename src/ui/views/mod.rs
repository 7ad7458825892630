//! Per-kind renderers: pure functions from loaded data to a [`Page`].
//!
//! The controller keeps the last loaded [`View`] and re-renders it whenever something
//! that affects presentation changes (admin elevation, form status). Rendering never
//! touches the network or the durable store.
//!
//! # Modules
//!
//! - `tools`: Featured and per-category tool listings
//! - `articles`: Article feeds, the merged latest feed and the hot feed
//! - `tool_detail`: Tool detail with its refreshable related-articles region
//! - `catalog`: Prompts and rules
//! - `resources`: Grouped community resources
//! - `weekly`: Weekly digest bodies
//! - `forms`: Submission forms
//! - `info`: Static information panels

mod articles;
mod catalog;
mod forms;
mod info;
mod resources;
mod tool_detail;
mod tools;
mod weekly;

pub use catalog::{COPIED_LABEL, COPY_LABEL};
pub use forms::{field_specs, initial_values, FieldSpec};
pub use tool_detail::related_patch;

use crate::app::actions::Command;
use crate::app::modes::{FormKind, Listing};
use crate::domain::{
    Article, ArticleFeed, CatalogEntry, ConfigTable, ListResult, Resource, Tool, ToolDetail, WeeklyDigest,
};
use crate::ui::tree::{Node, Page, PageBuilder, PaginationBar, Tone};
use std::collections::BTreeMap;

/// Everything a renderer reads besides the data itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub config: &'a ConfigTable,
    /// Whether admin-only controls are shown.
    pub admin: bool,
}

/// The data currently on the main surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Blank,
    Loading,
    /// Inline failure with its full message.
    Failed(String),
    Tools {
        featured: bool,
        category: Option<String>,
        result: ListResult<Tool>,
    },
    Articles {
        feed: ArticleFeed,
        result: ListResult<Article>,
    },
    Recent {
        search: Option<String>,
        result: ListResult<Article>,
    },
    HotNews {
        result: ListResult<Article>,
    },
    Prompts {
        result: ListResult<CatalogEntry>,
    },
    Rules {
        result: ListResult<CatalogEntry>,
    },
    Resources {
        category: Option<String>,
        subcategory: Option<String>,
        result: ListResult<Resource>,
    },
    ToolDetail(ToolDetail),
    Weekly(WeeklyDigest),
    Form {
        kind: FormKind,
        values: BTreeMap<String, String>,
        status: Option<(String, Tone)>,
    },
    WechatMp,
}

impl View {
    /// The paged listing on screen, if any.
    #[must_use]
    pub fn listing(&self) -> Option<Listing> {
        match self {
            Self::Tools { featured, category, .. } => {
                Some(Listing::Tools { featured: *featured, category: category.clone() })
            }
            Self::Articles { feed, .. } => Some(Listing::Articles(*feed)),
            Self::Recent { search, .. } => Some(Listing::Recent { search: search.clone() }),
            Self::HotNews { .. } => Some(Listing::HotNews),
            Self::Prompts { .. } => Some(Listing::Prompts),
            _ => None,
        }
    }
}

/// Renders a view into a fresh page.
#[must_use]
pub fn render(view: &View, ctx: &RenderContext<'_>) -> Page {
    let _span = tracing::trace_span!("render_view").entered();

    let mut builder = PageBuilder::new();
    let nodes = match view {
        View::Blank => vec![],
        View::Loading => vec![Node::Spinner],
        View::Failed(message) => vec![Node::InlineError(message.clone())],
        View::Tools { featured, category, result } => {
            tools::render(&mut builder, ctx, *featured, category.as_deref(), result)
        }
        View::Articles { feed, result } => articles::render_feed(&mut builder, ctx, *feed, result),
        View::Recent { search, result } => articles::render_recent(&mut builder, ctx, search.as_deref(), result),
        View::HotNews { result } => articles::render_hot(&mut builder, ctx, result),
        View::Prompts { result } => catalog::render_prompts(&mut builder, ctx, result),
        View::Rules { result } => catalog::render_rules(&mut builder, ctx, result),
        View::Resources { category, subcategory, result } => {
            resources::render(&mut builder, ctx, category.as_deref(), subcategory.as_deref(), result)
        }
        View::ToolDetail(detail) => tool_detail::render(&mut builder, ctx, detail),
        View::Weekly(digest) => weekly::render(digest),
        View::Form { kind, values, status } => forms::render(ctx, *kind, values, status.as_ref()),
        View::WechatMp => info::render_wechat(&mut builder, ctx),
    };

    builder.finish(nodes)
}

/// Page heading with the description and an optional `(共 N 个)` style count.
pub(crate) fn heading(title: String, description: &str, count: Option<String>) -> Node {
    let subtitle = match count {
        Some(count) => format!("{description} {count}"),
        None => description.to_string(),
    };
    Node::Heading { text: title, subtitle: Some(subtitle) }
}

/// `上一页 / 第 p / N 页 / 下一页`, shown only when there is more than one page.
pub(crate) fn pagination<T>(builder: &mut PageBuilder, result: &ListResult<T>, listing: &Listing) -> Option<Node> {
    if !result.is_paged() {
        return None;
    }

    let page = i64::from(result.page);
    let previous = builder.control(
        "上一页",
        result.has_previous().then(|| Command::ChangePage { page: page - 1, listing: listing.clone() }),
    );
    let next = builder.control(
        "下一页",
        result.has_next().then(|| Command::ChangePage { page: page + 1, listing: listing.clone() }),
    );

    Some(Node::Pagination(PaginationBar {
        previous,
        label: format!("第 {} / {} 页", result.page, result.total_pages),
        next,
    }))
}
