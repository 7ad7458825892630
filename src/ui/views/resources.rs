//! Community resources, grouped by category.
//!
//! Without a filter every category gets its own section in a fixed editorial order,
//! and `Claude Code 资源` is split further by subcategory. With a category filter the
//! items are re-filtered locally (the backend filter is advisory) and shown as one group.

use super::{heading, RenderContext};
use crate::app::actions::Command;
use crate::domain::{ListResult, Resource, Tag, TagOrigin};
use crate::ui::tree::{Card, Node, PageBuilder};
use std::cmp::Ordering;
use std::collections::BTreeMap;

const CATEGORY_ORDER: [&str; 5] = ["飞书知识库", "技术社区", "Cursor资源", "Claude Code 资源", "其他"];
const SUBCATEGORY_ORDER: [&str; 4] = ["插件市场", "模型服务", "Skill", "其他"];
const CLAUDE_CODE: &str = "Claude Code 资源";
const UNCATEGORIZED: &str = "其他";

fn category_icon(category: &str) -> &'static str {
    match category {
        "飞书知识库" => "📚",
        "技术社区" => "👥",
        "Cursor资源" => "🎯",
        CLAUDE_CODE => "🤖",
        _ => "📦",
    }
}

fn subcategory_icon(subcategory: &str) -> &'static str {
    match subcategory {
        "插件市场" => "🔌",
        "模型服务" => "🌐",
        "Skill" => "🎯",
        _ => "📦",
    }
}

/// Known names first in editorial order, unknown names alphabetically after.
fn editorial_cmp(order: &[&str], a: &str, b: &str) -> Ordering {
    match (order.iter().position(|o| *o == a), order.iter().position(|o| *o == b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn group_by<'a>(
    items: impl IntoIterator<Item = &'a Resource>,
    key: impl Fn(&Resource) -> Option<&str>,
    order: &[&str],
) -> Vec<(String, Vec<&'a Resource>)> {
    let mut groups: BTreeMap<String, Vec<&Resource>> = BTreeMap::new();
    for item in items {
        let name = key(item).filter(|k| !k.is_empty()).unwrap_or(UNCATEGORIZED);
        groups.entry(name.to_string()).or_default().push(item);
    }

    let mut groups: Vec<_> = groups.into_iter().collect();
    groups.sort_by(|(a, _), (b, _)| editorial_cmp(order, a, b));
    groups
}

fn resource_card(builder: &mut PageBuilder, resource: &Resource) -> Card {
    let open = builder.control("打开", Some(Command::OpenExternal { url: resource.url.clone(), track: None }));

    Card {
        title: resource.title.clone(),
        badge: Some(resource.kind.clone().filter(|k| !k.is_empty()).unwrap_or_else(|| "资源".to_string())),
        meta: resource.author.iter().filter(|a| !a.is_empty()).map(|a| format!("作者: {a}")).collect(),
        body: resource.description.clone(),
        tags: resource.tags.iter().map(|t| Tag { label: t.clone(), origin: TagOrigin::Freeform }).collect(),
        controls: vec![open],
        ..Card::default()
    }
}

fn cards(builder: &mut PageBuilder, items: &[&Resource]) -> Vec<Node> {
    items.iter().map(|r| Node::Card(resource_card(builder, r))).collect()
}

pub(super) fn render(
    builder: &mut PageBuilder,
    ctx: &RenderContext<'_>,
    category: Option<&str>,
    subcategory: Option<&str>,
    result: &ListResult<Resource>,
) -> Vec<Node> {
    let (default_title, description) =
        ctx.config.resolve("resources", None, "社区资源", "AI编程教程、文章和社区资源");
    let title = category.map_or(default_title, String::from);

    let shown: Vec<&Resource> = match category {
        Some(category) => result
            .items
            .iter()
            .filter(|r| r.category.as_deref() == Some(category))
            .filter(|r| subcategory.map_or(true, |sub| r.subcategory.as_deref() == Some(sub)))
            .collect(),
        None => result.items.iter().collect(),
    };

    let mut nodes = vec![heading(title, &description, Some(format!("(共 {} 个)", shown.len())))];
    if shown.is_empty() {
        nodes.push(Node::Placeholder("暂无资源".to_string()));
        return nodes;
    }

    if let Some(category) = category {
        let section_title = match subcategory {
            Some(sub) if category == CLAUDE_CODE => {
                format!("{} {category} - {} {sub}", category_icon(category), subcategory_icon(sub))
            }
            _ => format!("{} {category}", category_icon(category)),
        };
        nodes.push(Node::Section { title: section_title, children: cards(builder, &shown) });
        return nodes;
    }

    for (name, items) in group_by(shown, |r| r.category.as_deref(), &CATEGORY_ORDER) {
        let children = if name == CLAUDE_CODE {
            group_by(items, |r| r.subcategory.as_deref(), &SUBCATEGORY_ORDER)
                .into_iter()
                .map(|(sub, sub_items)| Node::Section {
                    title: format!("{} {sub}", subcategory_icon(&sub)),
                    children: cards(builder, &sub_items),
                })
                .collect()
        } else {
            cards(builder, &items)
        };

        nodes.push(Node::Section { title: format!("{} {name}", category_icon(&name)), children });
    }

    nodes
}
