//! Request/response protocol between the controller and the HTTP executor.
//!
//! The controller never performs I/O. When it needs backend data it emits an
//! [`ApiCall`]: a typed [`ApiRequest`] stamped with the [`Generation`] that was live
//! when the request was issued, plus the tracing context of the issuing span. The host
//! executes the call and feeds the [`ApiOutcome`] back in as an event, carrying the
//! same call so the controller can match the response against its current generation.

use crate::domain::error::{CodeNexusError, Result};
use crate::domain::ArticleFeed;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// Page size used for listings that are shown unpaged (rules, resources).
pub const UNPAGED_PAGE_SIZE: u32 = 100;

/// Distributed tracing context for linking executor spans to the controller span.
///
/// Captures the current trace and span IDs from OpenTelemetry so the span that
/// performs the HTTP request can be parented under the span that decided to issue it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID as a hex string.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid, which is always the
    /// case when no OpenTelemetry layer is installed.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        let trace_id = format!("{:032x}", span_context.trace_id());
        let parent_span_id = format!("{:016x}", span_context.span_id());
        tracing::trace!(%trace_id, %parent_span_id, "capturing trace context");

        Some(Self { trace_id, parent_span_id })
    }

    /// Rebuilds an OpenTelemetry context with this trace as the remote parent.
    ///
    /// Returns `None` if either id is not valid hex.
    #[must_use]
    pub fn to_otel_context(&self) -> Option<opentelemetry::Context> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_id = TraceId::from_hex(&self.trace_id).ok()?;
        let span_id = SpanId::from_hex(&self.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        Some(opentelemetry::Context::current().with_remote_span_context(span_context))
    }
}

/// Monotonic dispatch counter used to discard stale responses.
///
/// Bumped on every route dispatch and page change. A response is applied only when
/// the generation it was issued under is still the live one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    /// The generation following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of `POST /api/articles/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArticleSubmission {
    pub title: String,
    pub url: String,
    pub category: String,
    /// Free-form recommendation reason, sent as the article summary.
    pub summary: String,
}

/// Body of `POST /api/tools/submit`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToolSubmission {
    pub name: String,
    pub url: String,
    pub description: String,
    pub category: String,
    /// Comma-separated tags, passed through as typed.
    pub tags: String,
    pub icon: String,
}

/// HTTP method of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
}

/// Every backend request the controller knows how to issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiRequest {
    /// Page titles and descriptions.
    Config,
    /// Tool listing, featured (by popularity) or all (optionally by category).
    Tools {
        featured: bool,
        category: Option<String>,
        page: u32,
        page_size: u32,
    },
    /// Tool detail by id or identifier, including related articles.
    ToolDetail { key: String },
    /// Article feed listing.
    Articles { feed: ArticleFeed, page: u32, page_size: u32 },
    /// Merged latest feed with optional free-text search.
    Recent {
        page: u32,
        page_size: u32,
        search: Option<String>,
    },
    /// Programming articles sorted by score.
    HotNews { page: u32, page_size: u32 },
    Prompts { page: u32, page_size: u32 },
    /// Full text of one prompt, fetched for copying.
    PromptContent { identifier: String },
    Rules,
    Resources {
        category: Option<String>,
        subcategory: Option<String>,
    },
    WeeklyIndex,
    Weekly { id: String },
    VerifyAdminCode { code: String },
    RecordToolClick { key: String },
    RecordArticleClick { url: String },
    SubmitArticle(ArticleSubmission),
    SubmitTool(ToolSubmission),
    DeleteArticle { url: String, admin_code: String },
}

impl ApiRequest {
    /// HTTP method of the request.
    #[must_use]
    pub const fn method(&self) -> Method {
        match self {
            Self::RecordToolClick { .. }
            | Self::RecordArticleClick { .. }
            | Self::SubmitArticle(_)
            | Self::SubmitTool(_)
            | Self::DeleteArticle { .. } => Method::Post,
            _ => Method::Get,
        }
    }

    /// Path segments and query pairs of the request, relative to the API base.
    fn endpoint(&self) -> (Vec<&str>, Vec<(&'static str, String)>) {
        let paging = |page: u32, page_size: u32| vec![("page", page.to_string()), ("page_size", page_size.to_string())];

        match self {
            Self::Config => (vec!["api", "config"], vec![]),
            Self::Tools { featured: true, page, page_size, .. } => {
                let mut query = paging(*page, *page_size);
                query.push(("sort_by", "view_count".to_string()));
                (vec!["api", "tools", "featured"], query)
            }
            Self::Tools { featured: false, category, page, page_size } => {
                let mut query = paging(*page, *page_size);
                if let Some(category) = category.as_deref().filter(|c| !c.is_empty()) {
                    query.push(("category", category.to_string()));
                }
                (vec!["api", "tools"], query)
            }
            Self::ToolDetail { key } => (vec!["api", "tools", key.as_str()], vec![]),
            Self::Articles { feed: ArticleFeed::Programming, page, page_size } => {
                let mut query = vec![("category", "programming".to_string())];
                query.extend(paging(*page, *page_size));
                (vec!["api", "news"], query)
            }
            Self::Articles { feed: ArticleFeed::AiNews, page, page_size } => {
                (vec!["api", "ai-news"], paging(*page, *page_size))
            }
            Self::Recent { page, page_size, search } => {
                let mut query = paging(*page, *page_size);
                if let Some(search) = search.as_deref().filter(|s| !s.is_empty()) {
                    query.push(("search", search.to_string()));
                }
                (vec!["api", "recent"], query)
            }
            Self::HotNews { page, page_size } => {
                let mut query = paging(*page, *page_size);
                query.push(("sort_by", "score".to_string()));
                (vec!["api", "news"], query)
            }
            Self::Prompts { page, page_size } => (vec!["api", "prompts"], paging(*page, *page_size)),
            Self::PromptContent { identifier } => (vec!["api", "prompts", identifier.as_str()], vec![]),
            Self::Rules => (vec!["api", "rules"], paging(1, UNPAGED_PAGE_SIZE)),
            Self::Resources { category, subcategory } => {
                let mut query = paging(1, UNPAGED_PAGE_SIZE);
                if let Some(category) = category.as_deref().filter(|c| !c.is_empty()) {
                    query.push(("category", category.to_string()));
                }
                if let Some(subcategory) = subcategory.as_deref().filter(|c| !c.is_empty()) {
                    query.push(("subcategory", subcategory.to_string()));
                }
                (vec!["api", "resources"], query)
            }
            Self::WeeklyIndex => (vec!["api", "weekly"], vec![]),
            Self::Weekly { id } => (vec!["api", "weekly", id.as_str()], vec![]),
            Self::VerifyAdminCode { code } => (vec!["api", "admin", "verify-code"], vec![("code", code.clone())]),
            Self::RecordToolClick { key } => (vec!["api", "tools", key.as_str(), "click"], vec![]),
            Self::RecordArticleClick { url } => (vec!["api", "articles", "click"], vec![("url", url.clone())]),
            Self::SubmitArticle(_) => (vec!["api", "articles", "submit"], vec![]),
            Self::SubmitTool(_) => (vec!["api", "tools", "submit"], vec![]),
            Self::DeleteArticle { .. } => (vec!["digest", "delete-article"], vec![]),
        }
    }

    /// Builds the absolute URL of the request under `base`.
    ///
    /// Path segments are percent-encoded individually, so identifiers containing `/`
    /// or spaces cannot escape their segment. A path prefix on `base` is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`CodeNexusError::Config`] if `base` cannot carry a path (e.g. `data:` URLs).
    pub fn url(&self, base: &Url) -> Result<Url> {
        let (segments, query) = self.endpoint();

        let mut url = base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| CodeNexusError::Config(format!("api base cannot be a base: {base}")))?
            .pop_if_empty()
            .extend(segments);

        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Path and query of the request as it would be sent, e.g. `/api/tools?page=1&page_size=20`.
    ///
    /// Used for logging and assertions; the executor uses [`ApiRequest::url`].
    #[must_use]
    pub fn path_and_query(&self) -> String {
        Url::parse("http://localhost/")
            .ok()
            .and_then(|base| self.url(&base).ok())
            .map(|url| url[url::Position::BeforePath..].to_string())
            .unwrap_or_default()
    }

    /// JSON body of POST requests that carry one.
    #[must_use]
    pub fn body(&self) -> Option<serde_json::Value> {
        match self {
            Self::SubmitArticle(submission) => serde_json::to_value(submission).ok(),
            Self::SubmitTool(submission) => serde_json::to_value(submission).ok(),
            Self::DeleteArticle { url, .. } => Some(serde_json::json!({ "url": url })),
            _ => None,
        }
    }

    /// Extra request headers.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::DeleteArticle { admin_code, .. } => vec![("X-Admin-Code", admin_code.clone())],
            _ => vec![],
        }
    }

    /// Short, stable name of the request kind for span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Tools { .. } => "tools",
            Self::ToolDetail { .. } => "tool_detail",
            Self::Articles { .. } => "articles",
            Self::Recent { .. } => "recent",
            Self::HotNews { .. } => "hot_news",
            Self::Prompts { .. } => "prompts",
            Self::PromptContent { .. } => "prompt_content",
            Self::Rules => "rules",
            Self::Resources { .. } => "resources",
            Self::WeeklyIndex => "weekly_index",
            Self::Weekly { .. } => "weekly",
            Self::VerifyAdminCode { .. } => "verify_admin_code",
            Self::RecordToolClick { .. } => "record_tool_click",
            Self::RecordArticleClick { .. } => "record_article_click",
            Self::SubmitArticle(_) => "submit_article",
            Self::SubmitTool(_) => "submit_tool",
            Self::DeleteArticle { .. } => "delete_article",
        }
    }
}

/// A request stamped with the generation it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCall {
    /// Generation that was live when the call was issued.
    pub generation: Generation,

    pub request: ApiRequest,

    /// Trace context for linking the executor span to the issuing span.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_context: Option<TraceContext>,
}

impl ApiCall {
    /// Creates a call with the current trace context attached.
    #[must_use]
    pub fn new(generation: Generation, request: ApiRequest) -> Self {
        Self {
            generation,
            request,
            trace_context: TraceContext::from_current(),
        }
    }
}

/// What came back from executing an [`ApiCall`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiOutcome {
    /// The backend answered, successfully or not.
    Response {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    Transport {
        /// Human-readable error message.
        message: String,
    },
}

impl ApiOutcome {
    /// A response with a JSON body built from `value`.
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::Response { status, body: value.to_string() }
    }

    /// HTTP status, if a response arrived.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    /// Whether a 2xx response arrived.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Response { status, .. } if *status >= 200 && *status < 300)
    }

    /// Decodes the body of a successful response.
    ///
    /// # Errors
    ///
    /// - [`CodeNexusError::Api`] for transport failures and non-2xx statuses
    /// - [`CodeNexusError::Decode`] when the body does not match `T`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Response { status, body } if self.is_success() => {
                serde_json::from_str(body).map_err(|e| {
                    tracing::debug!(status, error = %e, "response body did not decode");
                    CodeNexusError::Decode(e.to_string())
                })
            }
            Self::Response { status, .. } => Err(CodeNexusError::Api(format!("HTTP {status}"))),
            Self::Transport { message } => Err(CodeNexusError::Api(message.clone())),
        }
    }

    /// Decodes the body regardless of status, for endpoints whose error bodies carry data.
    ///
    /// # Errors
    ///
    /// - [`CodeNexusError::Api`] for transport failures
    /// - [`CodeNexusError::Decode`] when the body does not match `T`
    pub fn decode_any<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Response { body, .. } => Ok(serde_json::from_str(body)?),
            Self::Transport { message } => Err(CodeNexusError::Api(message.clone())),
        }
    }
}
