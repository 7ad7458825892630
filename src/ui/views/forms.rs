//! Article and tool submission forms.

use crate::app::modes::FormKind;
use super::RenderContext;
use crate::ui::tree::{Field, Form, FormId, Node, Tone};
use std::collections::BTreeMap;

/// Static description of one form input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub required: bool,
    /// `(value, label)` pairs; the first is the default.
    pub choices: &'static [(&'static str, &'static str)],
    /// Value a fresh or reset form starts with.
    pub default: &'static str,
}

impl FieldSpec {
    const fn text(name: &'static str, label: &'static str, required: bool) -> Self {
        Self { name, label, required, choices: &[], default: "" }
    }

    /// Initial value: the explicit default, else the first choice.
    #[must_use]
    pub fn initial(&self) -> &'static str {
        match self.choices.first() {
            Some((value, _)) if self.default.is_empty() => *value,
            _ => self.default,
        }
    }
}

const ARTICLE_CATEGORIES: &[(&str, &str)] = &[("programming", "编程资讯"), ("ai_news", "AI资讯")];

const TOOL_CATEGORIES: &[(&str, &str)] = &[
    ("ide", "开发IDE"),
    ("plugin", "IDE插件"),
    ("cli", "命令行工具"),
    ("codeagent", "CodeAgent"),
    ("ai-test", "AI测试"),
    ("review", "代码审查"),
    ("devops", "DevOps工具"),
    ("doc", "文档相关"),
    ("design", "设计工具"),
    ("ui", "UI生成"),
    ("mcp", "MCP工具"),
    ("other", "其他工具"),
];

const ARTICLE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "文章标题", true),
    FieldSpec::text("url", "文章链接", true),
    FieldSpec { name: "category", label: "文章分类", required: true, choices: ARTICLE_CATEGORIES, default: "" },
    FieldSpec::text("reason", "推荐理由（可选）", false),
];

const TOOL_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "工具名称", true),
    FieldSpec::text("url", "工具链接", true),
    FieldSpec::text("description", "工具描述", true),
    FieldSpec { name: "category", label: "工具分类", required: true, choices: TOOL_CATEGORIES, default: "" },
    FieldSpec::text("tags", "标签（可选，用逗号分隔）", false),
    FieldSpec { name: "icon", label: "图标（可选）", required: false, choices: &[], default: "</>" },
];

/// Inputs of a submission form, in display order.
#[must_use]
pub fn field_specs(kind: FormKind) -> &'static [FieldSpec] {
    match kind {
        FormKind::Article => ARTICLE_FIELDS,
        FormKind::Tool => TOOL_FIELDS,
    }
}

/// Values of a freshly opened (or reset) form.
#[must_use]
pub fn initial_values(kind: FormKind) -> BTreeMap<String, String> {
    field_specs(kind)
        .iter()
        .map(|spec| (spec.name.to_string(), spec.initial().to_string()))
        .collect()
}

pub(super) fn render(
    ctx: &RenderContext<'_>,
    kind: FormKind,
    values: &BTreeMap<String, String>,
    status: Option<&(String, Tone)>,
) -> Vec<Node> {
    let (title, description, entity, submit_label, id) = match kind {
        FormKind::Article => {
            let (title, description) = ctx.config.resolve("submit", None, "提交资讯", "分享优质的技术文章和资讯");
            (title, description, "资讯", "提交资讯", FormId::Article)
        }
        FormKind::Tool => ("提交工具".to_string(), "分享优质的开发工具和资源".to_string(), "工具", "提交工具", FormId::Tool),
    };

    let fields = field_specs(kind)
        .iter()
        .map(|spec| Field {
            name: spec.name.to_string(),
            label: if spec.required { format!("{} *", spec.label) } else { spec.label.to_string() },
            required: spec.required,
            value: values.get(spec.name).cloned().unwrap_or_else(|| spec.initial().to_string()),
            choices: spec.choices.iter().map(|(v, l)| ((*v).to_string(), (*l).to_string())).collect(),
        })
        .collect();

    vec![
        Node::Heading { text: title, subtitle: Some(description) },
        Node::Section {
            title: "ℹ️ 审核说明".to_string(),
            children: vec![Node::Text {
                text: format!(
                    "您提交的{entity}将进入{pool}候选池，由管理员进行人工审核。我们会在一天内完成审核，审核通过后即可在网站上展示。",
                    pool = if id == FormId::Article { "文章" } else { "工具" }
                ),
                tone: Tone::Muted,
            }],
        },
        Node::Form(Form { id, fields, submit_label: submit_label.to_string(), status: status.cloned() }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigTable;
    use crate::ui::views::{render as render_view, View};

    #[test]
    fn initial_values_pick_defaults() {
        let article = initial_values(FormKind::Article);
        assert_eq!(article.get("category").map(String::as_str), Some("programming"));
        assert_eq!(article.get("title").map(String::as_str), Some(""));

        let tool = initial_values(FormKind::Tool);
        assert_eq!(tool.get("icon").map(String::as_str), Some("</>"));
        assert_eq!(tool.get("category").map(String::as_str), Some("ide"));
    }

    #[test]
    fn form_renders_status_and_required_marks() {
        let config = ConfigTable::default();
        let view = View::Form {
            kind: FormKind::Tool,
            values: initial_values(FormKind::Tool),
            status: Some(("请填写必填项".into(), Tone::Error)),
        };
        let page = render_view(&view, &RenderContext { config: &config, admin: false });

        let Some(Node::Form(form)) = page.nodes.last() else { panic!("expected form") };
        assert_eq!(form.id, FormId::Tool);
        assert_eq!(form.fields.len(), 6);
        assert_eq!(form.fields[0].label, "工具名称 *");
        assert_eq!(form.fields[3].choices.len(), 12);
        assert!(page.contains_text("请填写必填项"));
        assert!(page.contains_text("工具候选池"));
    }
}
