//! Tool detail page and its related-articles region.
//!
//! The related list lives in [`Region::RelatedArticles`], so a refresh can replace it
//! through [`related_patch`] without repainting the rest of the page.

use super::articles::{article_card, CardKind};
use super::tools::DEFAULT_TOOL_ICON;
use super::RenderContext;
use crate::app::actions::{Command, Track};
use crate::domain::{category_display_name, Article, Tag, TagOrigin, ToolDetail};
use crate::ui::tree::{Accent, Card, Node, Page, PageBuilder, Region, RegionPatch, Tone};

/// Related articles embedded in a detail response; more exist when the count exceeds it.
const EMBEDDED_RELATED: u64 = 10;

pub(super) fn render(builder: &mut PageBuilder, ctx: &RenderContext<'_>, detail: &ToolDetail) -> Vec<Node> {
    let tool = &detail.tool;
    let key = tool.route_key();
    let category = tool.category.as_deref();

    let back = builder.control("返回分类", Some(Command::GoBack));
    let visit = builder.control(
        "访问工具",
        Some(Command::OpenExternal { url: tool.url.clone(), track: Some(Track::Tool(key.clone())) }),
    );

    let summary = Card {
        title: tool.name.clone(),
        accent: Some(Accent::for_category(category)),
        badge: Some(tool.icon.clone().filter(|i| !i.is_empty()).unwrap_or_else(|| DEFAULT_TOOL_ICON.to_string())),
        meta: vec![format!(
            "{} • 🔥 {} 次访问",
            category_display_name(category.unwrap_or_default()),
            tool.view_count
        )],
        controls: vec![visit],
        ..Card::default()
    };

    let description = tool
        .description
        .clone()
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| "暂无描述".to_string());

    let mut nodes = vec![
        Node::Controls(vec![back]),
        Node::Card(summary),
        Node::Section { title: "工具描述".to_string(), children: vec![Node::text(description)] },
    ];

    if !tool.tags.is_empty() {
        nodes.push(Node::Section {
            title: "标签".to_string(),
            children: vec![Node::Card(Card {
                tags: tool.tags.iter().map(|t| Tag { label: t.clone(), origin: TagOrigin::Freeform }).collect(),
                ..Card::default()
            })],
        });
    }

    let mut related_controls = vec![builder.control("刷新", Some(Command::RefreshRelated { key: key.clone() }))];
    if detail.related_articles_count > EMBEDDED_RELATED {
        related_controls.push(builder.control("查看更多 >", Some(Command::ShowMore { key })));
    }

    let related = related_nodes(builder, ctx, &detail.related_articles);
    nodes.push(Node::Section {
        title: "相关资讯".to_string(),
        children: vec![
            Node::Controls(related_controls),
            Node::Region { region: Region::RelatedArticles, children: related },
        ],
    });

    nodes
}

fn related_nodes(builder: &mut PageBuilder, ctx: &RenderContext<'_>, articles: &[Article]) -> Vec<Node> {
    if articles.is_empty() {
        return vec![Node::Text { text: "暂无相关资讯".to_string(), tone: Tone::Muted }];
    }

    articles
        .iter()
        .map(|article| Node::Card(article_card(builder, ctx, article, CardKind::Related)))
        .collect()
}

/// Builds the replacement of the related-articles region of an already painted page.
#[must_use]
pub fn related_patch(page: &Page, ctx: &RenderContext<'_>, articles: &[Article]) -> RegionPatch {
    let mut builder = PageBuilder::continuing(page);
    let nodes = related_nodes(&mut builder, ctx, articles);
    builder.patch(Region::RelatedArticles, nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigTable, ItemId, Tool};
    use crate::ui::views::{render as render_view, View};

    fn detail(related: usize, count: u64) -> ToolDetail {
        ToolDetail {
            tool: Tool {
                id: Some(ItemId::Number(3)),
                identifier: Some("cursor".into()),
                name: "Cursor".into(),
                url: "https://cursor.sh".into(),
                category: Some("ide".into()),
                view_count: 99,
                ..Default::default()
            },
            related_articles: (0..related)
                .map(|i| Article {
                    title: format!("a{i}"),
                    url: format!("https://a/{i}"),
                    published_time: Some("2024-02-01".into()),
                    archived_at: Some("2024-03-01".into()),
                    ..Default::default()
                })
                .collect(),
            related_articles_count: count,
        }
    }

    #[test]
    fn detail_layout() {
        let config = ConfigTable::default();
        let page = render_view(&View::ToolDetail(detail(2, 2)), &RenderContext { config: &config, admin: false });

        assert!(page.contains_text("开发IDE • 🔥 99 次访问"));
        assert!(page.contains_text("暂无描述"));
        assert!(page.contains_text("2024/2/1"));
        assert!(page.control_by_label("查看更多 >").is_none());
        assert_eq!(
            page.command(page.control_by_label("刷新").unwrap().id),
            Some(&Command::RefreshRelated { key: "cursor".into() })
        );
    }

    #[test]
    fn show_more_only_beyond_embedded() {
        let config = ConfigTable::default();
        let ctx = RenderContext { config: &config, admin: false };
        assert!(render_view(&View::ToolDetail(detail(10, 10)), &ctx).control_by_label("查看更多 >").is_none());
        assert!(render_view(&View::ToolDetail(detail(10, 11)), &ctx).control_by_label("查看更多 >").is_some());
    }

    #[test]
    fn refresh_patch_replaces_only_related() {
        let config = ConfigTable::default();
        let ctx = RenderContext { config: &config, admin: true };
        let mut page = render_view(&View::ToolDetail(detail(1, 1)), &ctx);
        let heading_before = page.nodes[1].clone();

        let patch = related_patch(&page, &ctx, &[]);
        assert!(page.apply_patch(&patch));
        assert!(page.contains_text("暂无相关资讯"));
        assert!(page.control_by_label("删除").is_none());
        assert_eq!(page.nodes[1], heading_before);
        assert!(page.control_by_label("返回分类").is_some());
    }
}
