//! Page titles and descriptions fetched once from `/api/config`.
//!
//! The table is read-only after load. Lookups never fail: a missing page, a missing
//! category, or an empty string all fall back to the caller's built-in default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Title and description for one page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Display name and description for one category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Process-wide page configuration.
///
/// # Example
///
/// ```
/// use codenexus::domain::ConfigTable;
///
/// let json = r#"{
///     "pages": {"tools": {"title": "Hot", "description": ""}},
///     "categories": {"tools": {"cli": {"name": "CLI", "description": "Terminal tools"}}}
/// }"#;
/// let table: ConfigTable = serde_json::from_str(json).unwrap();
///
/// let (title, description) = table.resolve("tools", None, "热门工具", "发现最优秀的开发工具和资源");
/// assert_eq!(title, "Hot");
/// assert_eq!(description, "发现最优秀的开发工具和资源");
///
/// let (title, _) = table.resolve("all-tools", Some("cli"), "全部工具", "");
/// assert_eq!(title, "CLI");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigTable {
    /// Page key (`tools`, `all-tools`, `news`, ...) to metadata.
    #[serde(default)]
    pub pages: BTreeMap<String, PageMeta>,
    /// Domain (`tools`) to category key to metadata.
    #[serde(default)]
    pub categories: BTreeMap<String, BTreeMap<String, CategoryMeta>>,
}

impl ConfigTable {
    /// Looks up raw metadata for a page, preferring a tool category entry when one exists.
    #[must_use]
    pub fn page_meta(&self, page_key: &str, category: Option<&str>) -> PageMeta {
        if let Some(entry) = category
            .filter(|c| !c.is_empty())
            .and_then(|c| self.categories.get("tools").and_then(|tools| tools.get(c)))
        {
            return PageMeta {
                title: entry.name.clone(),
                description: entry.description.clone(),
            };
        }

        self.pages.get(page_key).cloned().unwrap_or_default()
    }

    /// Resolves `(title, description)` with per-field fallback to the given defaults.
    #[must_use]
    pub fn resolve(
        &self,
        page_key: &str,
        category: Option<&str>,
        default_title: &str,
        default_description: &str,
    ) -> (String, String) {
        let meta = self.page_meta(page_key, category);
        let title = if meta.title.is_empty() { default_title.to_string() } else { meta.title };
        let description = if meta.description.is_empty() {
            default_description.to_string()
        } else {
            meta.description
        };
        (title, description)
    }
}

/// Display name of a tool category key; unknown keys are shown as-is.
///
/// ```
/// use codenexus::domain::category_display_name;
///
/// assert_eq!(category_display_name("cli"), "命令行工具");
/// assert_eq!(category_display_name("quantum"), "quantum");
/// ```
#[must_use]
pub fn category_display_name(key: &str) -> String {
    let name = match key {
        "ide" => "开发IDE",
        "plugin" => "IDE插件",
        "cli" => "命令行工具",
        "codeagent" => "CodeAgent",
        "ai-test" => "AI测试",
        "review" => "代码审查",
        "devops" => "DevOps工具",
        "doc" => "文档相关",
        "design" => "设计工具",
        "ui" => "UI生成",
        "mcp" => "MCP工具",
        "other" => "其他工具",
        other => other,
    };
    name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_falls_back_to_defaults() {
        let table = ConfigTable::default();
        assert_eq!(
            table.resolve("news", None, "编程资讯", "最新技术文章和资讯"),
            ("编程资讯".to_string(), "最新技术文章和资讯".to_string())
        );
    }

    #[test]
    fn unknown_category_uses_page_entry() {
        let mut table = ConfigTable::default();
        table.pages.insert(
            "all-tools".into(),
            PageMeta { title: "All".into(), description: "Everything".into() },
        );
        let (title, description) = table.resolve("all-tools", Some("nope"), "全部工具", "x");
        assert_eq!(title, "All");
        assert_eq!(description, "Everything");
    }
}
