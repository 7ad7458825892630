//! Completion of backend requests.
//!
//! Content responses (listings, tool detail, weekly digests) are applied only while the
//! generation they were issued under is still live; anything older is discarded. The
//! remaining requests belong to the session rather than to a dispatch: boot data,
//! admin validation, click records, prompt text, submissions and deletes.
//!
//! # Failure presentation
//!
//! | Request | Failure shown |
//! |---|---|
//! | tools, articles, tool detail | `加载失败，请刷新重试` |
//! | latest, hot, prompts, rules, resources | `加载失败` |
//! | weekly digest | `加载失败: {detail}` |
//! | related refresh, click records | logged only |
//! | admin validation | silent |

use crate::api::{ApiCall, ApiOutcome, ApiRequest};
use crate::app::actions::{Action, WeeklyMenu};
use crate::app::dispatch::{dispatch, reload};
use crate::app::forms::on_submit_reply;
use crate::app::modes::FormKind;
use crate::app::router::{Location, NavKey};
use crate::app::state::{AppState, BootPhase};
use crate::domain::{
    AckReply, Article, CatalogEntry, ConfigTable, ErrorDetail, ListResult, PromptContent, Resource, Tool,
    ToolDetail, VerifyReply, WeeklyDigest, WeeklyIndex,
};
use crate::ui::views::{related_patch, View};
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

const LOAD_FAILED_RETRY: &str = "加载失败，请刷新重试";
const LOAD_FAILED: &str = "加载失败";

pub const COPY_FAILED: &str = "复制失败，请手动选择文本复制";
pub const DELETE_FORBIDDEN: &str = "删除失败：需要管理员权限";
pub const DELETE_DONE: &str = "文章已成功删除";
pub const DELETE_FAILED: &str = "删除失败";

/// Handles a completed request.
pub fn on_api_completed(state: &mut AppState, call: &ApiCall, outcome: &ApiOutcome) -> Vec<Action> {
    let _span = tracing::debug_span!(
        "api_completed",
        request = call.request.kind(),
        generation = %call.generation,
        status = ?outcome.status()
    )
    .entered();

    match &call.request {
        ApiRequest::Config => on_config(state, outcome),
        ApiRequest::WeeklyIndex => on_weekly_index(state, outcome),
        ApiRequest::VerifyAdminCode { code } => on_verify(state, code, outcome),
        ApiRequest::RecordToolClick { .. } | ApiRequest::RecordArticleClick { .. } => {
            if !outcome.is_success() {
                tracing::debug!("click record failed");
            }
            vec![]
        }
        ApiRequest::PromptContent { identifier } => on_prompt_content(state, call, identifier, outcome),
        ApiRequest::SubmitArticle(_) => on_submit_reply(state, FormKind::Article, outcome),
        ApiRequest::SubmitTool(_) => on_submit_reply(state, FormKind::Tool, outcome),
        ApiRequest::DeleteArticle { .. } => on_delete(state, outcome),
        request => {
            if call.generation != state.generation {
                tracing::debug!(live = %state.generation, "stale response discarded");
                return vec![];
            }
            on_content(state, request, outcome)
        }
    }
}

fn on_config(state: &mut AppState, outcome: &ApiOutcome) -> Vec<Action> {
    state.config = outcome.decode::<ConfigTable>().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "page configuration unavailable, using built-in titles");
        ConfigTable::default()
    });

    if state.boot != BootPhase::LoadingConfig {
        return vec![];
    }
    state.boot = BootPhase::LoadingWeeklyIndex;
    state.weekly_fetch_pending = true;
    vec![state.fetch(ApiRequest::WeeklyIndex)]
}

fn on_weekly_index(state: &mut AppState, outcome: &ApiOutcome) -> Vec<Action> {
    state.weekly_fetch_pending = false;
    state.weekly_menu = match outcome.decode::<WeeklyIndex>() {
        Ok(index) => WeeklyMenu::Loaded(index.items),
        Err(e) => {
            tracing::warn!(error = %e, "weekly index unavailable");
            WeeklyMenu::Failed
        }
    };

    let mut actions = vec![Action::FillWeeklyMenu(state.weekly_menu.clone())];
    if state.boot == BootPhase::LoadingWeeklyIndex {
        actions.extend(finish_boot(state));
    }
    actions
}

fn finish_boot(state: &mut AppState) -> Vec<Action> {
    state.boot = BootPhase::Ready;
    let location = state.deferred.take().unwrap_or_else(|| state.location.clone());
    tracing::info!(path = %location, admin = state.admin.is_verified(), "boot finished");

    let mut actions = vec![];
    if state.admin.is_verified() {
        actions.push(Action::RevealAdminEntry);
    }
    actions.push(Action::HighlightNav(NavKey::from_path(&location.path)));
    actions.extend(dispatch(state, location));
    actions
}

fn on_verify(state: &mut AppState, code: &str, outcome: &ApiOutcome) -> Vec<Action> {
    let reply = match outcome.decode::<VerifyReply>() {
        Ok(reply) => reply,
        Err(e) => {
            tracing::debug!(error = %e, "admin validation unavailable");
            return vec![];
        }
    };

    match state.admin.on_verify_reply(reply, code) {
        Some(mut actions) => {
            state.admin_code = Some(code.to_string());
            actions.push(state.repaint());
            actions
        }
        None => vec![],
    }
}

fn on_prompt_content(state: &mut AppState, call: &ApiCall, identifier: &str, outcome: &ApiOutcome) -> Vec<Action> {
    let control = state.pending_copies.remove(identifier);
    if call.generation != state.generation {
        tracing::debug!(%identifier, "prompt text arrived after navigation");
        return vec![];
    }

    match (outcome.decode::<PromptContent>(), control) {
        (Ok(prompt), Some(control)) => {
            state.copies_in_flight.insert(control, state.generation);
            vec![Action::CopyToClipboard { text: prompt.content, control }]
        }
        (Ok(_), None) => vec![],
        (Err(e), _) => {
            tracing::warn!(%identifier, error = %e, "prompt text unavailable");
            vec![Action::Alert(COPY_FAILED.to_string())]
        }
    }
}

fn on_delete(state: &mut AppState, outcome: &ApiOutcome) -> Vec<Action> {
    if matches!(outcome.status(), Some(401 | 403)) {
        tracing::warn!("delete refused without admin credential");
        return vec![Action::Alert(DELETE_FORBIDDEN.to_string())];
    }

    match outcome.decode_any::<AckReply>() {
        Ok(AckReply { ok: true, message }) => {
            let mut actions = vec![Action::Alert(message.filter(|m| !m.is_empty()).unwrap_or_else(|| DELETE_DONE.to_string()))];
            actions.extend(reload(state));
            actions
        }
        Ok(AckReply { message, .. }) => {
            vec![Action::Alert(message.filter(|m| !m.is_empty()).unwrap_or_else(|| DELETE_FAILED.to_string()))]
        }
        Err(e) => {
            tracing::warn!(error = %e, "delete failed");
            vec![Action::Alert(DELETE_FAILED.to_string())]
        }
    }
}

fn listing<T: DeserializeOwned>(
    outcome: &ApiOutcome,
    failure: &str,
    build: impl FnOnce(ListResult<T>) -> View,
) -> View {
    match outcome.decode::<ListResult<T>>() {
        Ok(result) => {
            tracing::debug!(items = result.items.len(), total = result.total, "listing loaded");
            build(result)
        }
        Err(e) => {
            tracing::warn!(error = %e, "listing failed to load");
            View::Failed(failure.to_string())
        }
    }
}

/// Message of a failed weekly digest load.
fn weekly_failure(outcome: &ApiOutcome) -> String {
    match outcome {
        ApiOutcome::Transport { message } => format!("{LOAD_FAILED}: {message}"),
        ApiOutcome::Response { .. } => {
            let detail = outcome.decode_any::<ErrorDetail>().map_or_else(|_| LOAD_FAILED.to_string(), |e| e.detail);
            format!("{LOAD_FAILED}: {detail}")
        }
    }
}

fn on_content(state: &mut AppState, request: &ApiRequest, outcome: &ApiOutcome) -> Vec<Action> {
    if let ApiRequest::ToolDetail { key } = request {
        if !state.context.loading {
            return on_related_refresh(state, key, outcome);
        }
    }
    state.context.loading = false;

    let mut actions = vec![];
    let view = match request {
        ApiRequest::Tools { featured, category, .. } => listing(outcome, LOAD_FAILED_RETRY, |result: ListResult<Tool>| {
            View::Tools { featured: *featured, category: category.clone(), result }
        }),
        ApiRequest::Articles { feed, .. } => listing(outcome, LOAD_FAILED_RETRY, |result: ListResult<Article>| {
            View::Articles { feed: *feed, result }
        }),
        ApiRequest::Recent { search, .. } => listing(outcome, LOAD_FAILED, |result: ListResult<Article>| {
            View::Recent { search: search.clone(), result }
        }),
        ApiRequest::HotNews { .. } => listing(outcome, LOAD_FAILED, |result: ListResult<Article>| View::HotNews { result }),
        ApiRequest::Prompts { .. } => {
            listing(outcome, LOAD_FAILED, |result: ListResult<CatalogEntry>| View::Prompts { result })
        }
        ApiRequest::Rules => listing(outcome, LOAD_FAILED, |result: ListResult<CatalogEntry>| View::Rules { result }),
        ApiRequest::Resources { category, subcategory } => {
            listing(outcome, LOAD_FAILED, |result: ListResult<Resource>| View::Resources {
                category: category.clone(),
                subcategory: subcategory.clone(),
                result,
            })
        }
        ApiRequest::ToolDetail { key } => match outcome.decode::<ToolDetail>() {
            Ok(detail) => {
                let route_key = detail.tool.route_key();
                let path = format!("/tool/{route_key}");
                if !route_key.is_empty() && state.location.path != path {
                    tracing::debug!(%key, %path, "canonical tool address");
                    state.location = Location { path, query: BTreeMap::new() };
                    actions.push(Action::PushHistory { path: state.location.to_string() });
                }
                View::ToolDetail(detail)
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "tool detail failed to load");
                View::Failed(LOAD_FAILED_RETRY.to_string())
            }
        },
        ApiRequest::Weekly { id } => match outcome.decode::<WeeklyDigest>() {
            Ok(digest) => View::Weekly(digest),
            Err(e) => {
                tracing::warn!(%id, error = %e, "weekly digest failed to load");
                View::Failed(weekly_failure(outcome))
            }
        },
        other => {
            tracing::debug!(request = other.kind(), "no content view for request");
            return vec![];
        }
    };

    actions.insert(0, state.show(view));
    actions
}

fn on_related_refresh(state: &mut AppState, key: &str, outcome: &ApiOutcome) -> Vec<Action> {
    let detail = match outcome.decode::<ToolDetail>() {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!(%key, error = %e, "related articles refresh failed");
            return vec![];
        }
    };

    let View::ToolDetail(shown) = &mut state.view else {
        tracing::debug!(%key, "tool detail no longer shown");
        return vec![];
    };
    shown.related_articles.clone_from(&detail.related_articles);
    shown.related_articles_count = detail.related_articles_count;

    let patch = related_patch(&state.page, &state.render_context(), &detail.related_articles);
    if !state.page.apply_patch(&patch) {
        return vec![];
    }
    vec![Action::PatchRegion(patch)]
}
