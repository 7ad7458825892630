//! Tool listings, featured or by category.

use super::{heading, pagination, RenderContext};
use crate::app::actions::{Command, Track};
use crate::app::modes::Listing;
use crate::domain::{category_display_name, ListResult, Tag, TagOrigin, Tool};
use crate::ui::tree::{Accent, Card, Node, PageBuilder};

/// Icon shown when a tool has none.
pub const DEFAULT_TOOL_ICON: &str = "</>";

pub(super) fn render(
    builder: &mut PageBuilder,
    ctx: &RenderContext<'_>,
    featured: bool,
    category: Option<&str>,
    result: &ListResult<Tool>,
) -> Vec<Node> {
    let page_key = if featured { "tools" } else { "all-tools" };
    let default_title = if featured { "热门工具" } else { "全部工具" };
    let (title, description) = ctx.config.resolve(page_key, category, default_title, "发现最优秀的开发工具和资源");

    let mut nodes = vec![heading(title, &description, Some(format!("(共 {} 个)", result.total)))];

    if result.items.is_empty() {
        nodes.push(Node::Placeholder("暂无工具数据".to_string()));
    } else {
        nodes.extend(result.items.iter().map(|tool| Node::Card(tool_card(builder, tool, featured))));
    }

    let listing = Listing::Tools { featured, category: category.map(String::from) };
    nodes.extend(pagination(builder, result, &listing));
    nodes
}

fn tool_card(builder: &mut PageBuilder, tool: &Tool, featured: bool) -> Card {
    let key = tool.route_key();
    let category = tool.category.as_deref().unwrap_or_default();

    let mut meta = vec![category_display_name(category)];
    if featured {
        meta.push(format!("🔥 {} 次访问", tool.view_count));
    }

    let open = builder.control("详情", Some(Command::OpenTool { key: key.clone() }));
    let visit = builder.control(
        "访问工具",
        Some(Command::OpenExternal { url: tool.url.clone(), track: Some(Track::Tool(key)) }),
    );

    Card {
        title: format!("{} ⭐", tool.name),
        accent: Some(Accent::for_category(tool.category.as_deref())),
        badge: Some(tool.icon.clone().filter(|i| !i.is_empty()).unwrap_or_else(|| DEFAULT_TOOL_ICON.to_string())),
        meta,
        body: tool.description.clone().filter(|d| !d.is_empty()),
        tags: tool.tags.iter().map(|t| Tag { label: t.clone(), origin: TagOrigin::Freeform }).collect(),
        controls: vec![open, visit],
        ..Card::default()
    }
}
