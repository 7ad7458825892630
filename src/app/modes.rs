//! Content kinds and paged listing modes.
//!
//! [`ContentType`] names what the main surface currently shows. [`Listing`] names a
//! paged backend listing together with every filter that must survive a page change,
//! so the pagination controller can re-issue the exact same query with a new page.

use crate::api::ApiRequest;
use crate::domain::ArticleFeed;
use serde::{Deserialize, Serialize};

/// What the main content surface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    News,
    AiNews,
    Tools,
    ToolDetail,
    Prompts,
    Rules,
    Resources,
    Submit,
    SubmitTool,
    WechatMp,
    Weekly,
    Recent,
    HotNews,
}

impl ContentType {
    /// Route-style key of the content type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::News => "news",
            Self::AiNews => "ai-news",
            Self::Tools => "tools",
            Self::ToolDetail => "tool",
            Self::Prompts => "prompts",
            Self::Rules => "rules",
            Self::Resources => "resources",
            Self::Submit => "submit",
            Self::SubmitTool => "submit-tool",
            Self::WechatMp => "wechat-mp",
            Self::Weekly => "weekly",
            Self::Recent => "recent",
            Self::HotNews => "hot-news",
        }
    }
}

/// Which submission form is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    Article,
    Tool,
}

/// A paged backend listing with its filters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Listing {
    /// Tools, featured (by popularity) or all (optionally one category).
    Tools { featured: bool, category: Option<String> },
    Articles(ArticleFeed),
    /// Merged latest feed; the search text is part of the listing.
    Recent { search: Option<String> },
    HotNews,
    Prompts,
}

impl Listing {
    /// The request that loads `page` of this listing.
    #[must_use]
    pub fn request(&self, page: u32, page_size: u32) -> ApiRequest {
        match self {
            Self::Tools { featured, category } => ApiRequest::Tools {
                featured: *featured,
                category: category.clone(),
                page,
                page_size,
            },
            Self::Articles(feed) => ApiRequest::Articles { feed: *feed, page, page_size },
            Self::Recent { search } => ApiRequest::Recent { page, page_size, search: search.clone() },
            Self::HotNews => ApiRequest::HotNews { page, page_size },
            Self::Prompts => ApiRequest::Prompts { page, page_size },
        }
    }

    /// Content type shown while this listing is on screen.
    #[must_use]
    pub const fn content_type(&self) -> ContentType {
        match self {
            Self::Tools { .. } => ContentType::Tools,
            Self::Articles(ArticleFeed::Programming) => ContentType::News,
            Self::Articles(ArticleFeed::AiNews) => ContentType::AiNews,
            Self::Recent { .. } => ContentType::Recent,
            Self::HotNews => ContentType::HotNews,
            Self::Prompts => ContentType::Prompts,
        }
    }

    /// Tool category filter, when the listing carries one.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        match self {
            Self::Tools { category, .. } => category.as_deref().filter(|c| !c.is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_listing_threads_search_into_every_page() {
        let listing = Listing::Recent { search: Some("mcp".into()) };
        for page in 1..=3 {
            assert_eq!(
                listing.request(page, 20),
                ApiRequest::Recent { page, page_size: 20, search: Some("mcp".into()) }
            );
        }
    }

    #[test]
    fn empty_category_is_no_filter() {
        let listing = Listing::Tools { featured: false, category: Some(String::new()) };
        assert_eq!(listing.category(), None);
        assert_eq!(listing.content_type(), ContentType::Tools);
    }
}
