//! Address resolution and navigation-key normalization.
//!
//! An address is a path plus an optional query string, exactly as it appears in the
//! browser bar (`/resources?category=技术社区`). [`Route::resolve`] maps it to the one
//! loader/renderer pair that serves it; [`NavKey::from_path`] maps it to the navigation
//! entry that should be highlighted. Both mappings are total: every address resolves.

use crate::domain::ArticleFeed;
use crate::app::modes::FormKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A parsed address: decoded path with leading `/` and decoded query pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl Location {
    /// Parses `path[?query]`. A missing leading `/` is added; a fragment is dropped.
    /// Path segments are percent-decoded, so `/tool/my%20tool` names the tool `my tool`.
    ///
    /// # Example
    ///
    /// ```
    /// use codenexus::app::router::Location;
    ///
    /// let location = Location::parse("/recent?search=rust+async");
    /// assert_eq!(location.path, "/recent");
    /// assert_eq!(location.query.get("search").map(String::as_str), Some("rust async"));
    /// ```
    #[must_use]
    pub fn parse(address: &str) -> Self {
        let address = address.split('#').next().unwrap_or_default();
        let (path, query) = address.split_once('?').unwrap_or((address, ""));

        let path = decode_path(path);
        let path = if path.starts_with('/') { path } else { format!("/{path}") };
        let query = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();

        Self { path, query }
    }

    /// Query value for `key`, ignoring empty values.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path: Vec<_> = self.path.split('/').map(urlencoding::encode).collect();
        f.write_str(&path.join("/"))?;
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

/// Percent-decodes each segment; a segment that is not valid UTF-8 once decoded stays as written.
fn decode_path(raw: &str) -> String {
    let segments: Vec<_> = raw
        .split('/')
        .map(|segment| urlencoding::decode(segment).map_or_else(|_| segment.to_string(), |s| s.into_owned()))
        .collect();
    segments.join("/")
}

/// The loader/renderer pair an address resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Articles(ArticleFeed),
    FeaturedTools,
    /// Tools of one category; an empty name lists all tools.
    Category(String),
    ToolDetail(String),
    Prompts,
    Rules,
    Resources {
        category: Option<String>,
        subcategory: Option<String>,
    },
    Submit(FormKind),
    WechatMp,
    Weekly(String),
    Recent { search: Option<String> },
    HotNews,
}

impl Route {
    /// Resolves an address. Unknown and empty paths fall back to programming articles.
    ///
    /// # Example
    ///
    /// ```
    /// use codenexus::app::router::{Location, Route};
    ///
    /// assert_eq!(Route::resolve(&Location::parse("/category/cli")), Route::Category("cli".into()));
    /// assert_eq!(Route::resolve(&Location::parse("/tool/")), Route::FeaturedTools);
    /// ```
    #[must_use]
    pub fn resolve(location: &Location) -> Self {
        let route = location.path.strip_prefix('/').unwrap_or(&location.path);

        match route {
            "" | "news" => Self::Articles(ArticleFeed::Programming),
            "ai-news" => Self::Articles(ArticleFeed::AiNews),
            "tools" => Self::FeaturedTools,
            "prompts" => Self::Prompts,
            "rules" => Self::Rules,
            "resources" => Self::Resources {
                category: location.param("category").map(String::from),
                subcategory: location.param("subcategory").map(String::from),
            },
            "submit" => Self::Submit(FormKind::Article),
            "submit-tool" => Self::Submit(FormKind::Tool),
            "wechat-mp" => Self::WechatMp,
            "recent" => Self::Recent { search: location.param("search").map(String::from) },
            "hot-news" => Self::HotNews,
            _ => {
                if let Some(id) = route.strip_prefix("weekly/").filter(|id| !id.is_empty()) {
                    Self::Weekly(id.to_string())
                } else if let Some(category) = route.strip_prefix("category/") {
                    Self::Category(category.to_string())
                } else if let Some(key) = route.strip_prefix("tool/") {
                    if key.is_empty() {
                        Self::FeaturedTools
                    } else {
                        Self::ToolDetail(key.to_string())
                    }
                } else {
                    Self::Articles(ArticleFeed::Programming)
                }
            }
        }
    }
}

/// Paths that highlight their own navigation entry.
const STATIC_NAV_PATHS: &[&str] = &[
    "/news",
    "/ai-news",
    "/tools",
    "/prompts",
    "/rules",
    "/resources",
    "/wechat-mp",
    "/submit",
    "/submit-tool",
    "/recent",
    "/hot-news",
];

/// Canonical navigation entry an address highlights.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NavKey(String);

impl NavKey {
    /// Normalizes a path. Total and idempotent.
    ///
    /// # Example
    ///
    /// ```
    /// use codenexus::app::router::NavKey;
    ///
    /// let key = NavKey::from_path("/tool/cursor");
    /// assert_eq!(key.as_str(), "/tools");
    /// assert_eq!(NavKey::from_path(key.as_str()), key);
    /// assert_eq!(NavKey::from_path("/nowhere").as_str(), "/news");
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();

        let key = if path.starts_with("/category/") || path.starts_with("/tool/") {
            "/tools".to_string()
        } else if STATIC_NAV_PATHS.contains(&path) {
            path.to_string()
        } else if path.strip_prefix("/weekly/").is_some_and(|id| !id.is_empty()) {
            path.to_string()
        } else {
            "/news".to_string()
        };

        Self(key)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(address: &str) -> Route {
        Route::resolve(&Location::parse(address))
    }

    #[test]
    fn static_routes() {
        assert_eq!(resolve("/"), Route::Articles(ArticleFeed::Programming));
        assert_eq!(resolve("/news"), Route::Articles(ArticleFeed::Programming));
        assert_eq!(resolve("/ai-news"), Route::Articles(ArticleFeed::AiNews));
        assert_eq!(resolve("/tools"), Route::FeaturedTools);
        assert_eq!(resolve("/submit-tool"), Route::Submit(FormKind::Tool));
        assert_eq!(resolve("/wechat-mp"), Route::WechatMp);
        assert_eq!(resolve("/hot-news"), Route::HotNews);
    }

    #[test]
    fn dynamic_routes() {
        assert_eq!(resolve("/weekly/2024-03"), Route::Weekly("2024-03".into()));
        assert_eq!(resolve("/weekly/"), Route::Articles(ArticleFeed::Programming));
        assert_eq!(resolve("/category/"), Route::Category(String::new()));
        assert_eq!(resolve("/tool/42"), Route::ToolDetail("42".into()));
        assert_eq!(resolve("/definitely/not"), Route::Articles(ArticleFeed::Programming));
    }

    #[test]
    fn query_parameters_feed_filters() {
        assert_eq!(
            resolve("/resources?category=Claude%20Code%20%E8%B5%84%E6%BA%90&subcategory=Skill"),
            Route::Resources {
                category: Some("Claude Code 资源".into()),
                subcategory: Some("Skill".into()),
            }
        );
        assert_eq!(resolve("/recent?search="), Route::Recent { search: None });
    }

    #[test]
    fn nav_key_is_total_and_idempotent() {
        let paths = [
            "/", "", "/news", "/ai-news", "/tools", "/category/cli", "/tool/x", "/prompts", "/rules",
            "/resources?category=a", "/weekly/1", "/weekly/", "/submit", "/recent", "/hot-news", "/zzz",
        ];
        for path in paths {
            let key = NavKey::from_path(path);
            assert_eq!(NavKey::from_path(key.as_str()), key, "not idempotent for {path}");
        }

        assert_eq!(NavKey::from_path("/").as_str(), "/news");
        assert_eq!(NavKey::from_path("/news").as_str(), "/news");
        assert_eq!(NavKey::from_path("/category/mcp").as_str(), "/tools");
        assert_eq!(NavKey::from_path("/resources?category=a").as_str(), "/resources");
        assert_eq!(NavKey::from_path("/weekly/7").as_str(), "/weekly/7");
    }

    #[test]
    fn encoded_path_segments_match_in_app_keys() {
        let deep = resolve("/tool/my%20tool");
        assert_eq!(deep, Route::ToolDetail("my tool".into()));

        let Route::ToolDetail(key) = deep else { unreachable!() };
        let from_link = crate::api::ApiRequest::ToolDetail { key };
        let in_app = crate::api::ApiRequest::ToolDetail { key: "my tool".into() };
        assert_eq!(from_link.path_and_query(), in_app.path_and_query());
        assert_eq!(in_app.path_and_query(), "/api/tools/my%20tool");

        assert_eq!(resolve("/category/%E5%BC%80%E5%8F%91"), Route::Category("开发".into()));
        assert_eq!(resolve("/weekly/2024%2D03"), Route::Weekly("2024-03".into()));
    }

    #[test]
    fn display_re_encodes_path_segments() {
        let location = Location::parse("/tool/my%20tool");
        assert_eq!(location.path, "/tool/my tool");
        assert_eq!(location.to_string(), "/tool/my%20tool");
        assert_eq!(Location::parse(&location.to_string()), location);
        assert_eq!(Location::parse("/tool/100%").path, "/tool/100%");
    }

    #[test]
    fn location_display_round_trips_query() {
        let location = Location::parse("resources?category=技术社区");
        assert_eq!(location.path, "/resources");
        assert_eq!(Location::parse(&location.to_string()), location);
    }
}
