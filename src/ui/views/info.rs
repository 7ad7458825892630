//! Static information panels.

use super::{heading, RenderContext};
use crate::app::actions::Command;
use crate::ui::tree::{Node, PageBuilder, Tone};

/// Public repository of the portal.
pub const REPOSITORY_URL: &str = "https://github.com/yunlongwen/AI-CodeNexus";

pub(super) fn render_wechat(builder: &mut PageBuilder, ctx: &RenderContext<'_>) -> Vec<Node> {
    let (title, description) =
        ctx.config.resolve("wechat-mp", None, "微信公众号", "关注我们的微信公众号，获取最新技术资讯");

    let repository = builder.control(
        "yunlongwen/AI-CodeNexus",
        Some(Command::OpenExternal { url: REPOSITORY_URL.to_string(), track: None }),
    );
    let star = builder.control(
        "前往 GitHub 点 Star",
        Some(Command::OpenExternal { url: REPOSITORY_URL.to_string(), track: None }),
    );

    vec![
        heading(title, &description, None),
        Node::Text { text: "扫描二维码关注我们的微信公众号".to_string(), tone: Tone::Normal },
        Node::Text { text: "获取最新的编程资讯、AI动态和开发工具推荐".to_string(), tone: Tone::Muted },
        Node::Section {
            title: "开源项目".to_string(),
            children: vec![
                Node::text("这个平台是开源的！欢迎访问我们的 GitHub 仓库"),
                Node::Controls(vec![repository]),
                Node::Text { text: "⭐ 如果这个项目对你有帮助，欢迎给个 Star！".to_string(), tone: Tone::Highlight },
                Node::Controls(vec![star]),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use crate::app::actions::Command;
    use crate::domain::ConfigTable;
    use crate::ui::views::{render, RenderContext, View};

    #[test]
    fn wechat_panel_links_repository() {
        let config = ConfigTable::default();
        let page = render(&View::WechatMp, &RenderContext { config: &config, admin: false });

        assert!(page.contains_text("微信公众号"));
        let star = page.control_by_label("前往 GitHub 点 Star").unwrap();
        assert_eq!(
            page.command(star.id),
            Some(&Command::OpenExternal { url: super::REPOSITORY_URL.into(), track: None })
        );
    }
}
