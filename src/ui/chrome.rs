//! Page skeleton: header navigation, dropdowns, mobile menus and the tool sidebar.
//!
//! The skeleton itself is fixed. The controller only populates it: it marks the active
//! navigation entry, reveals the admin entry and fills the weekly menu, each through an
//! [`Action`]. The host keeps a [`Chrome`] value, feeds it those actions, and asks it
//! for the visible items given the current [`MenuState`].

use crate::app::actions::{Action, WeeklyMenu};
use crate::app::menus::{Dropdown, Layout, MenuId, MenuState, Submenu};
use crate::app::router::NavKey;

/// Href of the admin panel; handed to the host unchanged when followed.
pub const ADMIN_PANEL_HREF: &str = "/digest/panel";

const NEWS_LINKS: &[(&str, &str)] = &[("💻 编程资讯", "/news"), ("🤖 AI资讯", "/ai-news")];

const TOP_LINKS: &[(&str, &str)] = &[("💡 提示词", "/prompts"), ("📋 规则", "/rules")];

const RESOURCE_LINKS: &[(&str, &str)] = &[
    ("📚 飞书知识库", "/resources?category=飞书知识库"),
    ("👥 技术社区", "/resources?category=技术社区"),
    ("🎯 Cursor资源", "/resources?category=Cursor资源"),
];

const CLAUDE_CODE_LINKS: &[(&str, &str)] = &[
    ("🔌 插件市场", "/resources?category=Claude Code 资源&subcategory=插件市场"),
    ("🌐 模型服务", "/resources?category=Claude Code 资源&subcategory=模型服务"),
    ("🎯 Skill", "/resources?category=Claude Code 资源&subcategory=Skill"),
    ("📦 其他", "/resources?category=Claude Code 资源&subcategory=其他"),
];

const SIDEBAR_LINKS: &[(&str, &str)] = &[
    ("💻 开发IDE", "/category/ide"),
    ("🔌 IDE插件", "/category/plugin"),
    ("⌨️ 命令行工具", "/category/cli"),
    ("🤖 CodeAgent", "/category/codeagent"),
    ("🧪 AI测试", "/category/ai-test"),
    ("✅ 代码审查", "/category/review"),
    ("🚀 DevOps 工具", "/category/devops"),
    ("📚 文档相关", "/category/doc"),
    ("🎨 设计工具", "/category/design"),
    ("🖼️ UI生成", "/category/ui"),
    ("🔌 MCP工具", "/category/mcp"),
    ("➕ 提交工具", "/submit-tool"),
];

/// A visible skeleton entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChromeItem {
    /// A followable link.
    Link { label: String, href: String, depth: u8, active: bool },
    /// A menu trigger and whether its menu is open.
    Trigger { label: String, menu: MenuId, open: bool, depth: u8 },
    /// Non-interactive line, such as an empty weekly menu.
    Note { text: String, depth: u8 },
}

/// Skeleton state populated by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chrome {
    active: Option<NavKey>,
    admin_entry: bool,
    weekly: WeeklyMenu,
}

impl Chrome {
    /// Applies a skeleton action. Returns whether anything visible changed.
    pub fn apply(&mut self, action: &Action) -> bool {
        match action {
            Action::HighlightNav(key) => {
                let changed = self.active.as_ref() != Some(key);
                self.active = Some(key.clone());
                changed
            }
            Action::RevealAdminEntry => !std::mem::replace(&mut self.admin_entry, true),
            Action::FillWeeklyMenu(menu) => {
                let changed = self.weekly != *menu;
                self.weekly = menu.clone();
                changed
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn admin_entry_visible(&self) -> bool {
        self.admin_entry
    }

    #[must_use]
    pub fn active(&self) -> Option<&NavKey> {
        self.active.as_ref()
    }

    fn link(&self, label: &str, href: &str, depth: u8) -> ChromeItem {
        let active = !href.contains('?')
            && self.active.as_ref().is_some_and(|key| href == key.as_str());
        ChromeItem::Link { label: label.to_string(), href: href.to_string(), depth, active }
    }

    fn links(&self, links: &[(&str, &str)], depth: u8) -> Vec<ChromeItem> {
        links.iter().map(|(label, href)| self.link(label, href, depth)).collect()
    }

    fn weekly_items(&self, depth: u8) -> Vec<ChromeItem> {
        match &self.weekly {
            WeeklyMenu::Unloaded => vec![ChromeItem::Note { text: "加载中...".to_string(), depth }],
            WeeklyMenu::Failed => vec![ChromeItem::Note { text: "加载失败".to_string(), depth }],
            WeeklyMenu::Loaded(entries) if entries.is_empty() => {
                vec![ChromeItem::Note { text: "暂无每周资讯".to_string(), depth }]
            }
            WeeklyMenu::Loaded(entries) => entries
                .iter()
                .map(|entry| self.link(&format!("📅 {}", entry.name), &format!("/weekly/{}", entry.id), depth))
                .collect(),
        }
    }

    fn trigger(label: &str, menu: MenuId, menus: &MenuState, depth: u8) -> ChromeItem {
        ChromeItem::Trigger { label: label.to_string(), menu, open: menus.is_open(menu), depth }
    }

    /// Visible skeleton entries for the current layout and open menus, in paint order.
    #[must_use]
    pub fn items(&self, menus: &MenuState) -> Vec<ChromeItem> {
        let mut items = vec![];

        match menus.layout() {
            Layout::Desktop => {
                let news = MenuId::Dropdown(Dropdown::News);
                items.push(Self::trigger("📰 最新资讯", news, menus, 0));
                if menus.is_open(news) {
                    items.extend(self.links(NEWS_LINKS, 1));
                }

                let weekly = MenuId::Dropdown(Dropdown::Weekly);
                items.push(Self::trigger("📅 每周资讯", weekly, menus, 0));
                if menus.is_open(weekly) {
                    items.extend(self.weekly_items(1));
                }

                items.extend(self.links(TOP_LINKS, 0));

                let resources = MenuId::Dropdown(Dropdown::Resources);
                items.push(Self::trigger("🌐 社区资源", resources, menus, 0));
                if menus.is_open(resources) {
                    items.extend(self.links(RESOURCE_LINKS, 1));
                    items.push(self.link("🤖 Claude Code 资源", "/resources?category=Claude Code 资源", 1));
                    items.extend(self.links(CLAUDE_CODE_LINKS, 2));
                }

                items.push(self.link("📱 微信公众号", "/wechat-mp", 0));
                if self.admin_entry {
                    items.push(self.link("🔐 管理员入口", ADMIN_PANEL_HREF, 0));
                }

                items.extend(self.links(SIDEBAR_LINKS, 0));
            }
            Layout::Mobile => {
                items.push(Self::trigger("☰ 工具分类", MenuId::Sidebar, menus, 0));
                if menus.is_open(MenuId::Sidebar) {
                    items.extend(self.links(SIDEBAR_LINKS, 1));
                }

                items.push(Self::trigger("⋮ 导航", MenuId::MobileTopNav, menus, 0));
                if menus.is_open(MenuId::MobileTopNav) {
                    items.extend(self.mobile_nav(menus));
                }
            }
        }

        items
    }

    fn mobile_nav(&self, menus: &MenuState) -> Vec<ChromeItem> {
        let mut items = vec![];

        let news = MenuId::MobileSubmenu(Submenu::News);
        items.push(Self::trigger("📰 最新资讯", news, menus, 1));
        if menus.is_open(news) {
            items.extend(self.links(NEWS_LINKS, 2));
        }

        let weekly = MenuId::MobileSubmenu(Submenu::Weekly);
        items.push(Self::trigger("📅 每周资讯", weekly, menus, 1));
        if menus.is_open(weekly) {
            items.extend(self.weekly_items(2));
        }

        items.extend(self.links(TOP_LINKS, 1));

        let resources = MenuId::MobileSubmenu(Submenu::Resources);
        items.push(Self::trigger("🌐 社区资源", resources, menus, 1));
        if menus.is_open(resources) {
            items.extend(self.links(RESOURCE_LINKS, 2));

            let claude = MenuId::MobileSubmenu(Submenu::ClaudeCode);
            items.push(Self::trigger("🤖 Claude Code 资源", claude, menus, 2));
            if menus.is_open(claude) {
                items.extend(self.links(CLAUDE_CODE_LINKS, 3));
            }
        }

        items.push(self.link("📱 微信公众号", "/wechat-mp", 1));
        if self.admin_entry {
            items.push(self.link("🔐 管理员入口", ADMIN_PANEL_HREF, 1));
        }

        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::WeeklyEntry;

    fn hrefs(items: &[ChromeItem]) -> Vec<&str> {
        items
            .iter()
            .filter_map(|i| if let ChromeItem::Link { href, .. } = i { Some(href.as_str()) } else { None })
            .collect()
    }

    #[test]
    fn admin_entry_appears_once_revealed() {
        let mut chrome = Chrome::default();
        let menus = MenuState::new(1280);
        assert!(!hrefs(&chrome.items(&menus)).contains(&ADMIN_PANEL_HREF));

        assert!(chrome.apply(&Action::RevealAdminEntry));
        assert!(!chrome.apply(&Action::RevealAdminEntry));
        assert!(hrefs(&chrome.items(&menus)).contains(&ADMIN_PANEL_HREF));
    }

    #[test]
    fn weekly_dropdown_lists_entries_when_open() {
        let mut chrome = Chrome::default();
        let mut menus = MenuState::new(1280);
        chrome.apply(&Action::FillWeeklyMenu(WeeklyMenu::Loaded(vec![WeeklyEntry {
            id: "2024-03".into(),
            name: "三月第一周".into(),
        }])));

        assert!(!hrefs(&chrome.items(&menus)).contains(&"/weekly/2024-03"));
        menus.toggle(MenuId::Dropdown(Dropdown::Weekly));
        assert!(hrefs(&chrome.items(&menus)).contains(&"/weekly/2024-03"));
    }

    #[test]
    fn highlight_marks_matching_link() {
        let mut chrome = Chrome::default();
        chrome.apply(&Action::HighlightNav(NavKey::from_path("/prompts")));
        let items = chrome.items(&MenuState::new(1280));
        let active: Vec<_> = items
            .iter()
            .filter_map(|i| match i {
                ChromeItem::Link { href, active: true, .. } => Some(href.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(active, vec!["/prompts"]);
    }

    #[test]
    fn mobile_layout_hides_sidebar_until_opened() {
        let chrome = Chrome::default();
        let mut menus = MenuState::new(600);
        assert!(!hrefs(&chrome.items(&menus)).contains(&"/category/cli"));
        menus.toggle(MenuId::Sidebar);
        assert!(hrefs(&chrome.items(&menus)).contains(&"/category/cli"));
    }
}
