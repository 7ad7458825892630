//! Portal item models as returned by the backend REST surface.
//!
//! Every listing endpoint answers with a [`ListResult`] page; single-entity endpoints
//! answer with [`ToolDetail`], [`WeeklyDigest`] or one of the small acknowledgement
//! records at the bottom of this module. Deserialization is lenient: missing optional
//! fields default instead of failing, since the backend omits empty values freely.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One page of items, as returned by every paged listing endpoint.
///
/// `total_pages == ceil(total / page_size)` is computed by the backend and trusted here.
///
/// # Example
///
/// ```
/// use codenexus::domain::{ListResult, Tool};
///
/// let json = r#"{"items": [], "total": 42, "page": 1, "page_size": 20, "total_pages": 3}"#;
/// let page: ListResult<Tool> = serde_json::from_str(json).unwrap();
/// assert!(!page.has_previous());
/// assert!(page.has_next());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResult<T> {
    /// Items on this page, in backend order.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
    /// One-based page number of this page.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Page size the backend applied.
    #[serde(default)]
    pub page_size: u32,
    /// Total number of pages.
    #[serde(default)]
    pub total_pages: u32,
}

const fn first_page() -> u32 {
    1
}

impl<T> ListResult<T> {
    /// Whether a page before this one exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Whether a page after this one exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether pagination controls are worth showing at all.
    #[must_use]
    pub const fn is_paged(&self) -> bool {
        self.total_pages > 1
    }
}

/// Identifier that the backend sends either as a number or as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric database id.
    Number(i64),
    /// Textual id.
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Article feeds served by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArticleFeed {
    /// `programming` feed, shown as 编程资讯.
    Programming,
    /// `ai_news` feed, shown as AI资讯.
    AiNews,
}

impl ArticleFeed {
    /// Backend category key of the feed.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Programming => "programming",
            Self::AiNews => "ai_news",
        }
    }

    /// Parses a backend category key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "programming" => Some(Self::Programming),
            "ai_news" => Some(Self::AiNews),
            _ => None,
        }
    }
}

/// A developer tool listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tool {
    #[serde(default)]
    pub id: Option<ItemId>,
    /// Human-readable slug, preferred over `id` in addresses.
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub view_count: u64,
}

impl Tool {
    /// Key used in `/tool/{key}` addresses and click tracking: identifier, else id.
    #[must_use]
    pub fn route_key(&self) -> String {
        self.identifier
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(String::from)
            .or_else(|| self.id.as_ref().map(ToString::to_string))
            .unwrap_or_default()
    }
}

/// A tool together with the articles that mention it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolDetail {
    #[serde(flatten)]
    pub tool: Tool,
    #[serde(default)]
    pub related_articles: Vec<Article>,
    /// Total related articles on the backend; only the first ten are embedded.
    #[serde(default)]
    pub related_articles_count: u64,
}

/// A news article from any feed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// Feed key, `programming` or `ai_news`.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub archived_at: Option<String>,
    #[serde(default)]
    pub published_time: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Tags derived from tools mentioned by the article.
    #[serde(default)]
    pub tool_tags: Vec<String>,
    #[serde(default)]
    pub view_count: u64,
}

/// Where a displayed tag came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagOrigin {
    /// Derived from a tool the article mentions.
    Tool,
    /// Free-form editorial tag.
    Freeform,
}

/// A tag with its origin preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub label: String,
    pub origin: TagOrigin,
}

impl Article {
    /// Merges tool-derived tags and free-form tags, tool tags first.
    ///
    /// # Example
    ///
    /// ```
    /// use codenexus::domain::{Article, TagOrigin};
    ///
    /// let article = Article {
    ///     tags: vec!["rust".into()],
    ///     tool_tags: vec!["Cursor".into()],
    ///     ..Default::default()
    /// };
    /// let merged = article.merged_tags();
    /// assert_eq!(merged[0].origin, TagOrigin::Tool);
    /// assert_eq!(merged[1].label, "rust");
    /// ```
    #[must_use]
    pub fn merged_tags(&self) -> Vec<Tag> {
        self.tool_tags
            .iter()
            .map(|label| Tag { label: label.clone(), origin: TagOrigin::Tool })
            .chain(
                self.tags
                    .iter()
                    .map(|label| Tag { label: label.clone(), origin: TagOrigin::Freeform }),
            )
            .collect()
    }

    /// Whether the article belongs to the AI feed.
    #[must_use]
    pub fn is_ai_news(&self) -> bool {
        self.category.as_deref() == Some("ai_news")
    }
}

/// A prompt or rule entry; both listings share this shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(default)]
    pub id: Option<ItemId>,
    /// Present when the backend can serve the full text at `/prompts/{identifier}`.
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A community resource link.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Resource kind label such as `教程` or `文章`.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// One entry of the weekly digest index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyEntry {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Response of `/api/weekly`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyIndex {
    #[serde(default)]
    pub items: Vec<WeeklyEntry>,
}

/// A compiled weekly digest with a rich-text body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyDigest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Rendered HTML body.
    #[serde(default)]
    pub content: Option<String>,
}

/// Response of `/api/admin/verify-code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VerifyReply {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub valid: bool,
}

/// Generic `{ok, message}` acknowledgement used by submit and delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AckReply {
    #[serde(default)]
    pub ok: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error body of the form `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Response of `/api/prompts/{identifier}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptContent {
    pub content: String,
}
