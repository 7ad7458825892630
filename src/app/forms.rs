//! Form submissions: the latest-feed search box and the two moderation forms.

use crate::api::{ApiRequest, ArticleSubmission, ToolSubmission};
use crate::api::ApiOutcome;
use crate::app::actions::Action;
use crate::app::dispatch::load_listing;
use crate::app::modes::{FormKind, Listing};
use crate::app::state::AppState;
use crate::domain::AckReply;
use crate::ui::tree::{FormId, Tone};
use crate::ui::views::{field_specs, initial_values, View};
use std::collections::BTreeMap;

pub const REQUIRED_MISSING: &str = "请填写必填项";
pub const SUBMITTING: &str = "提交中...";
pub const SUBMIT_FAILED: &str = "提交失败，请稍后重试。";

const DEFAULT_ICON: &str = "</>";

fn submitted_text(kind: FormKind) -> &'static str {
    match kind {
        FormKind::Article => "提交成功！您的资讯已进入审核队列，我们会在一天内完成审核。",
        FormKind::Tool => "提交成功！您的工具已进入审核队列，我们会在一天内完成审核。",
    }
}

/// Handles a submitted form.
pub fn submit(state: &mut AppState, form: FormId, fields: &BTreeMap<String, String>) -> Vec<Action> {
    let _span = tracing::debug_span!("submit_form", form = form.as_str()).entered();

    match form {
        FormId::RecentSearch => search(state, fields.get("search").map(String::as_str)),
        FormId::Article => submit_for_review(state, FormKind::Article, fields),
        FormId::Tool => submit_for_review(state, FormKind::Tool, fields),
    }
}

/// Restarts the latest feed at page 1 with `text` as query; blank text drops the query.
///
/// The address query is kept in sync but no history entry is pushed.
pub fn search(state: &mut AppState, text: Option<&str>) -> Vec<Action> {
    let search = text.map(str::trim).filter(|t| !t.is_empty()).map(String::from);
    tracing::debug!(search = ?search, "latest feed search");

    match &search {
        Some(query) => state.location.query.insert("search".to_string(), query.clone()),
        None => state.location.query.remove("search"),
    };

    state.bump_generation();
    load_listing(state, Listing::Recent { search }, 1)
}

fn value<'a>(values: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    values.get(name).map_or("", |v| v.trim())
}

fn request_for(kind: FormKind, values: &BTreeMap<String, String>) -> ApiRequest {
    match kind {
        FormKind::Article => ApiRequest::SubmitArticle(ArticleSubmission {
            title: value(values, "title").to_string(),
            url: value(values, "url").to_string(),
            category: value(values, "category").to_string(),
            summary: value(values, "reason").to_string(),
        }),
        FormKind::Tool => {
            let icon = value(values, "icon");
            ApiRequest::SubmitTool(ToolSubmission {
                name: value(values, "name").to_string(),
                url: value(values, "url").to_string(),
                description: value(values, "description").to_string(),
                category: value(values, "category").to_string(),
                tags: value(values, "tags").to_string(),
                icon: if icon.is_empty() { DEFAULT_ICON.to_string() } else { icon.to_string() },
            })
        }
    }
}

fn submit_for_review(state: &mut AppState, kind: FormKind, fields: &BTreeMap<String, String>) -> Vec<Action> {
    let View::Form { kind: shown, values, status } = &mut state.view else {
        tracing::debug!("no form on screen");
        return vec![];
    };
    if *shown != kind {
        tracing::debug!(?kind, shown = ?shown, "submitted form is not on screen");
        return vec![];
    }

    for spec in field_specs(kind) {
        if let Some(value) = fields.get(spec.name) {
            values.insert(spec.name.to_string(), value.clone());
        }
    }

    let missing = field_specs(kind).iter().any(|spec| spec.required && value(values, spec.name).is_empty());
    if missing {
        *status = Some((REQUIRED_MISSING.to_string(), Tone::Error));
        return vec![state.repaint()];
    }

    let request = request_for(kind, values);
    *status = Some((SUBMITTING.to_string(), Tone::Pending));
    vec![state.repaint(), state.fetch(request)]
}

/// Applies the moderation queue's answer to the form, if it is still on screen.
pub fn on_submit_reply(state: &mut AppState, kind: FormKind, outcome: &ApiOutcome) -> Vec<Action> {
    let View::Form { kind: shown, values, status } = &mut state.view else {
        return vec![];
    };
    if *shown != kind {
        return vec![];
    }

    match outcome.decode_any::<AckReply>() {
        Ok(AckReply { ok: true, .. }) => {
            tracing::info!(?kind, "submission accepted");
            *values = initial_values(kind);
            *status = Some((submitted_text(kind).to_string(), Tone::Success));
        }
        Ok(AckReply { message, .. }) => {
            tracing::warn!(?kind, status = ?outcome.status(), "submission rejected");
            let message = message.filter(|m| !m.is_empty()).unwrap_or_else(|| SUBMIT_FAILED.to_string());
            *status = Some((message, Tone::Error));
        }
        Err(e) => {
            tracing::warn!(?kind, error = %e, "submission failed");
            *status = Some((SUBMIT_FAILED.to_string(), Tone::Error));
        }
    }

    vec![state.repaint()]
}
