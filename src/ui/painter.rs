//! ANSI painting of render trees and the page skeleton.
//!
//! The painter is the only place that knows about escape sequences. It turns a [`Page`]
//! or the [`Chrome`] items into a string the terminal host writes out verbatim. Every
//! interactive control is printed with its [`ControlId`] so the user can activate it
//! by number.
//!
//! # Layout
//!
//! ```text
//! ▌ [badge] Title ⭐
//!   meta • meta
//!   body text
//!   #tag ♥tool-tag
//!   [3] 详情  [4] 访问工具
//! ```

use crate::domain::TagOrigin;
use crate::ui::chrome::{Chrome, ChromeItem};
use crate::app::menus::MenuState;
use crate::ui::theme::Theme;
use crate::ui::tree::{Card, Control, Form, Node, Page, PaginationBar, Tone};

const INDENT: &str = "  ";

struct Canvas<'a> {
    theme: &'a Theme,
    out: String,
}

impl<'a> Canvas<'a> {
    const fn new(theme: &'a Theme) -> Self {
        Self { theme, out: String::new() }
    }

    fn line(&mut self, depth: usize, styled: &str) {
        self.out.push_str(&INDENT.repeat(depth));
        self.out.push_str(styled);
        self.out.push_str(Theme::reset());
        self.out.push('\n');
    }

    fn toned(&self, tone: Tone, text: &str) -> String {
        format!("{}{text}", Theme::fg(self.theme.tone(tone)))
    }

    fn control(&self, control: &Control) -> String {
        if control.enabled {
            format!("{}{} {}{}", Theme::fg(&self.theme.colors.control_fg), control.id, control.label, Theme::reset())
        } else {
            format!(
                "{}{}{} {}{}",
                Theme::dim(),
                Theme::fg(&self.theme.colors.control_disabled_fg),
                control.id,
                control.label,
                Theme::reset()
            )
        }
    }

    fn controls(&self, controls: &[Control]) -> String {
        controls.iter().map(|c| self.control(c)).collect::<Vec<_>>().join("  ")
    }

    fn node(&mut self, node: &Node, depth: usize) {
        match node {
            Node::Heading { text, subtitle } => {
                let heading = format!("{}{}{text}", Theme::bold(), Theme::fg(&self.theme.colors.heading_fg));
                self.line(depth, &heading);
                if let Some(subtitle) = subtitle {
                    let subtitle = self.toned(Tone::Muted, subtitle);
                    self.line(depth, &subtitle);
                }
                self.out.push('\n');
            }
            Node::Section { title, children } => {
                let title = format!("{}── {title} ──", Theme::fg(&self.theme.colors.border));
                self.line(depth, &title);
                for child in children {
                    self.node(child, depth + 1);
                }
            }
            Node::Text { text, tone } => {
                let text = self.toned(*tone, text);
                self.line(depth, &text);
            }
            Node::Spinner => {
                let text = self.toned(Tone::Pending, "⠋ 加载中...");
                self.line(depth, &text);
            }
            Node::Placeholder(text) => {
                let text = format!("{}{}", Theme::dim(), self.toned(Tone::Muted, text));
                self.line(depth, &text);
            }
            Node::InlineError(text) => {
                let text = self.toned(Tone::Error, text);
                self.line(depth, &text);
            }
            Node::Card(card) => self.card(card, depth),
            Node::Controls(controls) => {
                let row = self.controls(controls);
                self.line(depth, &row);
            }
            Node::Pagination(bar) => self.pagination(bar, depth),
            Node::RichText(html) => {
                for text in plain_text(html).lines() {
                    let text = self.toned(Tone::Normal, text);
                    self.line(depth, &text);
                }
            }
            Node::Form(form) => self.form(form, depth),
            Node::Region { children, .. } => {
                for child in children {
                    self.node(child, depth);
                }
            }
        }
    }

    fn card(&mut self, card: &Card, depth: usize) {
        let bar_color = card.accent.map_or(self.theme.colors.border.as_str(), |accent| self.theme.accent(accent));
        let mut head = format!("{}▌ ", Theme::fg(bar_color));
        if let Some(badge) = &card.badge {
            head.push_str(&format!("{}[{badge}] ", Theme::fg(&self.theme.colors.text_dim)));
        }
        head.push_str(Theme::bold());
        head.push_str(&highlighted(&card.title, &card.title_highlights, self.theme));
        self.line(depth, &head);

        let inner = depth + 1;
        if !card.meta.is_empty() {
            let meta = self.toned(Tone::Muted, &card.meta.join(" • "));
            self.line(inner, &meta);
        }
        if let Some(body) = &card.body {
            let body = self.toned(Tone::Normal, body);
            self.line(inner, &body);
        }
        if !card.tags.is_empty() {
            let tags = card
                .tags
                .iter()
                .map(|tag| match tag.origin {
                    TagOrigin::Tool => format!("{}♥{}", Theme::fg(&self.theme.colors.tag_tool_fg), tag.label),
                    TagOrigin::Freeform => format!("{}#{}", Theme::fg(&self.theme.colors.tag_freeform_fg), tag.label),
                })
                .collect::<Vec<_>>()
                .join(" ");
            self.line(inner, &tags);
        }
        if !card.controls.is_empty() {
            let row = self.controls(&card.controls);
            self.line(inner, &row);
        }
        self.out.push('\n');
    }

    fn pagination(&mut self, bar: &PaginationBar, depth: usize) {
        let row = format!(
            "{}   {}   {}",
            self.control(&bar.previous),
            self.toned(Tone::Muted, &bar.label),
            self.control(&bar.next)
        );
        self.line(depth, &row);
    }

    fn form(&mut self, form: &Form, depth: usize) {
        let title = format!("{}{}form {}", Theme::bold(), Theme::fg(&self.theme.colors.heading_fg), form.id.as_str());
        self.line(depth, &title);

        for field in &form.fields {
            let mut row = format!("{}{}: {}", Theme::fg(&self.theme.colors.text_dim), field.name, field.label);
            row.push_str(&format!(" = {}{}", Theme::fg(&self.theme.colors.text_normal), field.value));
            if !field.choices.is_empty() {
                let choices = field.choices.iter().map(|(value, label)| format!("{value}={label}")).collect::<Vec<_>>();
                row.push_str(&format!("{}  ({})", Theme::fg(&self.theme.colors.text_dim), choices.join(", ")));
            }
            self.line(depth + 1, &row);
        }

        let submit = format!("{}{}", Theme::fg(&self.theme.colors.control_fg), form.submit_label);
        self.line(depth + 1, &submit);
        if let Some((status, tone)) = &form.status {
            let status = self.toned(*tone, status);
            self.line(depth + 1, &status);
        }
    }
}

/// Paints `text` with the given character ranges emphasized.
///
/// Ranges are character indices, `start..end`, sorted and non-overlapping.
fn highlighted(text: &str, ranges: &[(usize, usize)], theme: &Theme) -> String {
    let normal = Theme::fg(&theme.colors.text_normal);
    if ranges.is_empty() {
        return format!("{normal}{text}");
    }

    let mut out = normal.clone();
    let mut ranges = ranges.iter().peekable();
    let mut inside = false;
    for (idx, ch) in text.chars().enumerate() {
        while ranges.peek().is_some_and(|(_, end)| idx >= *end) {
            ranges.next();
        }
        let hit = ranges.peek().is_some_and(|(start, end)| idx >= *start && idx < *end);

        if hit && !inside {
            out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
            out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
            out.push_str(Theme::underline());
        } else if !hit && inside {
            out.push_str(Theme::reset());
            out.push_str(Theme::bold());
            out.push_str(&normal);
        }
        inside = hit;
        out.push(ch);
    }
    out
}

/// Flattens rich text into lines: block-closing tags become line breaks, other tags vanish.
fn plain_text(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let Some(close) = rest[open..].find('>') else {
            out.push_str(&rest[open..]);
            rest = "";
            break;
        };
        let tag = rest[open + 1..open + close].trim().to_ascii_lowercase();
        let name = tag.trim_start_matches('/').split_whitespace().next().unwrap_or_default().trim_end_matches('/');
        if matches!(name, "br" | "p" | "div" | "li" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "tr" | "pre")
            && (tag.starts_with('/') || name == "br")
        {
            out.push('\n');
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);

    out.replace("&nbsp;", " ").replace("&lt;", "<").replace("&gt;", ">").replace("&amp;", "&")
}

/// Paints a render tree.
#[must_use]
pub fn paint_page(page: &Page, theme: &Theme) -> String {
    let _span = tracing::trace_span!("paint_page", nodes = page.nodes.len()).entered();

    let mut canvas = Canvas::new(theme);
    for node in &page.nodes {
        canvas.node(node, 0);
    }
    canvas.out
}

/// Paints the skeleton. Links are numbered `L1`, `L2`, … in [`Chrome::items`] order.
#[must_use]
pub fn paint_chrome(chrome: &Chrome, menus: &MenuState, theme: &Theme) -> String {
    let mut canvas = Canvas::new(theme);
    let mut link_no = 0;

    for item in chrome.items(menus) {
        match item {
            ChromeItem::Link { label, depth, active, .. } => {
                link_no += 1;
                let color = if active { &theme.colors.nav_active_fg } else { &theme.colors.control_fg };
                let weight = if active { Theme::bold() } else { "" };
                canvas.line(usize::from(depth), &format!("{weight}{}L{link_no} {label}", Theme::fg(color)));
            }
            ChromeItem::Trigger { label, menu, open, depth } => {
                let marker = if open { "▾" } else { "▸" };
                let text = format!("{}{label} {marker} ({})", Theme::fg(&theme.colors.heading_fg), menu.name());
                canvas.line(usize::from(depth), &text);
            }
            ChromeItem::Note { text, depth } => {
                let text = canvas.toned(Tone::Muted, &text);
                canvas.line(usize::from(depth), &text);
            }
        }
    }
    canvas.out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::actions::Command;
    use crate::ui::tree::{Accent, PageBuilder};

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c.is_ascii_alphabetic() {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn card_shows_numbered_controls() {
        let mut builder = PageBuilder::new();
        let open = builder.control("详情", Some(Command::OpenTool { key: "cursor".into() }));
        let disabled = builder.control("上一页", None);
        let page = builder.finish(vec![
            Node::Card(Card { title: "Cursor ⭐".into(), meta: vec!["开发IDE".into()], controls: vec![open], ..Card::default() }),
            Node::Controls(vec![disabled]),
        ]);

        let text = strip_ansi(&paint_page(&page, &Theme::default()));
        assert!(text.contains("▌ Cursor ⭐"));
        assert!(text.contains("[1] 详情"));
        assert!(text.contains("[2] 上一页"));
    }

    #[test]
    fn card_bar_follows_accent_or_border() {
        let theme = Theme::default();
        let page = PageBuilder::new().finish(vec![
            Node::Card(Card { title: "plain".into(), ..Card::default() }),
            Node::Card(Card { title: "agent".into(), accent: Some(Accent::Purple), ..Card::default() }),
        ]);

        let painted = paint_page(&page, &theme);
        assert!(painted.contains(&format!("{}▌ ", Theme::fg(&theme.colors.border))));
        assert!(painted.contains(&format!("{}▌ ", Theme::fg(theme.accent(Accent::Purple)))));
    }

    #[test]
    fn highlights_wrap_matched_characters() {
        let theme = Theme::default();
        let painted = highlighted("async rust", &[(6, 10)], &theme);
        assert!(painted.contains(Theme::underline()));
        assert_eq!(strip_ansi(&painted), "async rust");
    }

    #[test]
    fn rich_text_is_flattened() {
        assert_eq!(plain_text("<h1>周报</h1><p>a &amp; b</p>"), "周报\na & b\n");
        assert_eq!(plain_text("one<br/>two"), "one\ntwo");
    }

    #[test]
    fn chrome_links_are_numbered() {
        let text = strip_ansi(&paint_chrome(&Chrome::default(), &MenuState::new(1280), &Theme::default()));
        assert!(text.contains("📰 最新资讯 ▸ (news)"));
        assert!(text.contains("L1 💡 提示词"));
        assert!(text.contains("L2 📋 规则"));
    }
}
