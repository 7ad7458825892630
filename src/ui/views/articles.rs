//! Article feeds: per-feed listings, the merged latest feed and the hot feed.
//!
//! All article cards share one layout. They differ in which date wins, whether the
//! feed label and click count are shown, and which category a delete is filed under.

use super::{heading, pagination, RenderContext};
use crate::app::actions::{Command, Track};
use crate::app::modes::Listing;
use crate::domain::{Article, ArticleFeed, ListResult};
use crate::ui::helpers::{feed_label, highlight_ranges, listing_date, related_date, source_name};
use crate::ui::tree::{Card, Field, Form, FormId, Node, PageBuilder};

/// Where an article card is shown.
#[derive(Debug, Clone, Copy)]
pub(super) enum CardKind<'a> {
    /// A single-feed listing; deletes are filed under the feed.
    Feed(ArticleFeed),
    /// The merged latest feed, with the active search highlighted in titles.
    Recent { search: Option<&'a str> },
    Hot,
    /// Related articles on a tool detail page.
    Related,
}

pub(super) fn article_card(builder: &mut PageBuilder, ctx: &RenderContext<'_>, article: &Article, kind: CardKind<'_>) -> Card {
    let date = match kind {
        CardKind::Related => related_date(article),
        _ => listing_date(article),
    };
    let source = source_name(article);

    let (badge, meta) = match kind {
        CardKind::Feed(_) => (None, vec![format!("{source} • {date}")]),
        CardKind::Recent { .. } | CardKind::Related => (Some(feed_label(article).to_string()), vec![date, source]),
        CardKind::Hot => (
            Some(feed_label(article).to_string()),
            vec![date, format!("🔥 {} 次点击", article.view_count), source],
        ),
    };

    let title_highlights = match kind {
        CardKind::Recent { search: Some(query) } => highlight_ranges(&article.title, query),
        _ => vec![],
    };

    let mut controls = vec![builder.control(
        "打开",
        Some(Command::OpenExternal {
            url: article.url.clone(),
            track: Some(Track::Article(article.url.clone())),
        }),
    )];

    if ctx.admin {
        let category = match kind {
            CardKind::Feed(feed) => Some(feed.key().to_string()),
            _ => article.category.clone(),
        };
        controls.push(builder.control(
            "删除",
            Some(Command::DeleteArticle { url: article.url.clone(), category }),
        ));
    }

    Card {
        title: article.title.clone(),
        title_highlights,
        accent: None,
        badge,
        meta,
        body: article.summary.clone().filter(|s| !s.is_empty()),
        tags: article.merged_tags(),
        controls,
    }
}

fn cards(builder: &mut PageBuilder, ctx: &RenderContext<'_>, items: &[Article], kind: CardKind<'_>) -> Vec<Node> {
    items
        .iter()
        .map(|article| Node::Card(article_card(builder, ctx, article, kind)))
        .collect()
}

pub(super) fn render_feed(
    builder: &mut PageBuilder,
    ctx: &RenderContext<'_>,
    feed: ArticleFeed,
    result: &ListResult<Article>,
) -> Vec<Node> {
    let (page_key, default_title) = match feed {
        ArticleFeed::Programming => ("news", "编程资讯"),
        ArticleFeed::AiNews => ("ai-news", "AI资讯"),
    };
    let (title, description) = ctx.config.resolve(page_key, None, default_title, "最新技术文章和资讯");

    let mut nodes = vec![heading(title, &description, Some(format!("(共 {} 篇)", result.total)))];
    if result.items.is_empty() {
        nodes.push(Node::Placeholder("暂无文章数据".to_string()));
    } else {
        nodes.extend(cards(builder, ctx, &result.items, CardKind::Feed(feed)));
    }

    nodes.extend(pagination(builder, result, &Listing::Articles(feed)));
    nodes
}

pub(super) fn render_recent(
    builder: &mut PageBuilder,
    ctx: &RenderContext<'_>,
    search: Option<&str>,
    result: &ListResult<Article>,
) -> Vec<Node> {
    let (title, description) =
        ctx.config.resolve("recent", None, "最新资讯", "编程资讯和AI资讯的最新文章，按时间排序");

    let mut nodes = vec![
        heading(title, &description, Some(format!("(共 {} 篇)", result.total))),
        Node::Form(Form {
            id: FormId::RecentSearch,
            fields: vec![Field {
                name: "search".to_string(),
                label: "搜索文章标题或摘要...".to_string(),
                value: search.unwrap_or_default().to_string(),
                ..Field::default()
            }],
            submit_label: "搜索".to_string(),
            status: None,
        }),
    ];

    if search.is_some() {
        nodes.push(Node::Controls(vec![builder.control("清除", Some(Command::ClearRecentSearch))]));
    }

    if result.items.is_empty() {
        let empty = if search.is_some() { "未找到相关文章" } else { "暂无文章" };
        nodes.push(Node::Placeholder(empty.to_string()));
    } else {
        nodes.extend(cards(builder, ctx, &result.items, CardKind::Recent { search }));
    }

    let listing = Listing::Recent { search: search.map(String::from) };
    nodes.extend(pagination(builder, result, &listing));
    nodes
}

pub(super) fn render_hot(builder: &mut PageBuilder, ctx: &RenderContext<'_>, result: &ListResult<Article>) -> Vec<Node> {
    let (title, description) = ctx.config.resolve("hot-news", None, "热门资讯", "最受欢迎的技术文章");

    let mut nodes = vec![heading(title, &description, Some(format!("(共 {} 篇)", result.total)))];
    if result.items.is_empty() {
        nodes.push(Node::Placeholder("暂无文章数据".to_string()));
    } else {
        nodes.extend(cards(builder, ctx, &result.items, CardKind::Hot));
    }

    nodes.extend(pagination(builder, result, &Listing::HotNews));
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfigTable, TagOrigin};
    use crate::ui::views::{render, View};

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            source: Some(String::new()),
            category: Some("ai_news".into()),
            archived_at: Some("2024-03-05T08:00:00".into()),
            tags: vec!["llm".into()],
            tool_tags: vec!["Cursor".into()],
            view_count: 7,
            ..Default::default()
        }
    }

    fn page_of(items: Vec<Article>) -> ListResult<Article> {
        let total = items.len() as u64;
        ListResult { items, total, page: 1, page_size: 20, total_pages: 1 }
    }

    #[test]
    fn feed_card_layout() {
        let config = ConfigTable::default();
        let view = View::Articles { feed: ArticleFeed::Programming, result: page_of(vec![article("rust")]) };
        let page = render(&view, &RenderContext { config: &config, admin: false });

        assert!(page.contains_text("编程资讯"));
        assert!(page.contains_text("(共 1 篇)"));
        let Node::Card(card) = &page.nodes[1] else { panic!("expected card") };
        assert_eq!(card.meta, vec!["未知来源 • 2024/3/5".to_string()]);
        assert_eq!(card.tags[0].origin, TagOrigin::Tool);
        assert_eq!(card.tags[1].origin, TagOrigin::Freeform);
        assert!(page.control_by_label("删除").is_none());
    }

    #[test]
    fn admin_delete_uses_feed_key_in_feeds() {
        let config = ConfigTable::default();
        let view = View::Articles { feed: ArticleFeed::Programming, result: page_of(vec![article("rust")]) };
        let page = render(&view, &RenderContext { config: &config, admin: true });

        let delete = page.control_by_label("删除").unwrap();
        assert_eq!(
            page.command(delete.id),
            Some(&Command::DeleteArticle { url: "https://example.com/rust".into(), category: Some("programming".into()) })
        );
    }

    #[test]
    fn recent_search_highlights_and_offers_clear() {
        let config = ConfigTable::default();
        let view = View::Recent { search: Some("rust".into()), result: page_of(vec![article("async rust")]) };
        let page = render(&view, &RenderContext { config: &config, admin: false });

        assert_eq!(page.command(page.control_by_label("清除").unwrap().id), Some(&Command::ClearRecentSearch));
        let card = page.nodes.iter().find_map(|n| if let Node::Card(c) = n { Some(c) } else { None }).unwrap();
        assert_eq!(card.title_highlights, vec![(6, 10)]);
        assert_eq!(card.badge.as_deref(), Some("AI资讯"));
    }

    #[test]
    fn only_matching_recent_titles_are_highlighted() {
        let config = ConfigTable::default();
        let ctx = RenderContext { config: &config, admin: false };
        let cards = |page: &crate::ui::Page| -> Vec<Vec<(usize, usize)>> {
            page.nodes.iter().filter_map(|n| if let Node::Card(c) = n { Some(c.title_highlights.clone()) } else { None }).collect()
        };

        let searched = render(&View::Recent { search: Some("rust".into()), result: page_of(vec![article("golang")]) }, &ctx);
        assert_eq!(cards(&searched), vec![Vec::<(usize, usize)>::new()]);

        let feed = render(&View::Articles { feed: ArticleFeed::AiNews, result: page_of(vec![article("async rust")]) }, &ctx);
        assert_eq!(cards(&feed), vec![Vec::<(usize, usize)>::new()]);
    }

    #[test]
    fn recent_empty_text_depends_on_search() {
        let config = ConfigTable::default();
        let ctx = RenderContext { config: &config, admin: false };
        let searching = render(&View::Recent { search: Some("zzz".into()), result: page_of(vec![]) }, &ctx);
        assert!(searching.contains_text("未找到相关文章"));
        let idle = render(&View::Recent { search: None, result: page_of(vec![]) }, &ctx);
        assert!(idle.contains_text("暂无文章"));
        assert!(idle.control_by_label("清除").is_none());
    }

    #[test]
    fn hot_cards_show_clicks() {
        let config = ConfigTable::default();
        let page = render(&View::HotNews { result: page_of(vec![article("hot")]) }, &RenderContext { config: &config, admin: false });
        assert!(page.contains_text("热门资讯"));
        assert!(page.contains_text("🔥 7 次点击"));
    }
}
