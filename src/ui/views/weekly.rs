//! Weekly digest detail. The body is backend-rendered rich text shown as-is.

use crate::domain::WeeklyDigest;
use crate::ui::tree::Node;

pub(super) fn render(digest: &WeeklyDigest) -> Vec<Node> {
    let mut nodes = vec![];

    if let Some(title) = digest.title.as_deref().filter(|t| !t.is_empty()) {
        nodes.push(Node::Heading { text: title.to_string(), subtitle: digest.description.clone() });
    }

    match digest.content.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(content) => nodes.push(Node::RichText(content.to_string())),
        None => nodes.push(Node::Placeholder("暂无内容".to_string())),
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_placeholder() {
        let nodes = render(&WeeklyDigest::default());
        assert_eq!(nodes, vec![Node::Placeholder("暂无内容".into())]);
    }

    #[test]
    fn body_is_kept_verbatim() {
        let digest = WeeklyDigest {
            title: Some("第 12 期".into()),
            description: None,
            content: Some("<h2>本周</h2><p>Rust 1.80</p>".into()),
        };
        let nodes = render(&digest);
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1], Node::RichText("<h2>本周</h2><p>Rust 1.80</p>".into()));
    }
}
