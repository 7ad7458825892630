//! Prompts and rules. Both listings share the catalog entry card.

use super::{heading, pagination, RenderContext};
use crate::app::actions::Command;
use crate::app::modes::Listing;
use crate::domain::{CatalogEntry, ListResult, Tag, TagOrigin};
use crate::ui::tree::{Card, Node, PageBuilder};

/// Label of the prompt copy control while idle.
pub const COPY_LABEL: &str = "复制";

/// Label shown on a copy control after a successful copy.
pub const COPIED_LABEL: &str = "✓ 已复制";

fn entry_card(builder: &mut PageBuilder, entry: &CatalogEntry, copyable: bool) -> Card {
    let mut controls = vec![];

    if let Some(url) = entry.url.as_deref().filter(|u| !u.is_empty()) {
        controls.push(builder.control("查看详情", Some(Command::OpenExternal { url: url.to_string(), track: None })));
        controls.push(builder.control("查看原文 →", Some(Command::OpenExternal { url: url.to_string(), track: None })));
    }

    if let Some(identifier) = entry.identifier.as_deref().filter(|i| copyable && !i.is_empty()) {
        controls.push(builder.control(
            COPY_LABEL,
            Some(Command::CopyPrompt { identifier: identifier.to_string() }),
        ));
    }

    Card {
        title: entry.name.clone(),
        body: Some(entry.description.clone()).filter(|d| !d.is_empty()),
        tags: entry.tags.iter().map(|t| Tag { label: t.clone(), origin: TagOrigin::Freeform }).collect(),
        controls,
        ..Card::default()
    }
}

pub(super) fn render_prompts(
    builder: &mut PageBuilder,
    ctx: &RenderContext<'_>,
    result: &ListResult<CatalogEntry>,
) -> Vec<Node> {
    let (title, description) = ctx.config.resolve("prompts", None, "提示词", "精选AI编程提示词，提升开发效率");

    let mut nodes = vec![heading(title, &description, Some(format!("(共 {} 个)", result.total)))];
    if result.items.is_empty() {
        nodes.push(Node::Placeholder("暂无提示词".to_string()));
    } else {
        nodes.extend(result.items.iter().map(|entry| Node::Card(entry_card(builder, entry, true))));
    }

    nodes.extend(pagination(builder, result, &Listing::Prompts));
    nodes
}

pub(super) fn render_rules(
    builder: &mut PageBuilder,
    ctx: &RenderContext<'_>,
    result: &ListResult<CatalogEntry>,
) -> Vec<Node> {
    let (title, description) = ctx.config.resolve("rules", None, "规则", "Cursor Rules和其他AI编程规则");

    let mut nodes = vec![heading(title, &description, Some(format!("(共 {} 个)", result.total)))];
    if result.items.is_empty() {
        nodes.push(Node::Placeholder("暂无规则".to_string()));
    } else {
        nodes.extend(result.items.iter().map(|entry| Node::Card(entry_card(builder, entry, false))));
    }
    nodes
}
