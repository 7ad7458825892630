//! Execution of the commands bound to painted controls.

use crate::api::ApiRequest;
use crate::app::actions::{Action, Command, Track};
use crate::app::dispatch::navigate;
use crate::app::forms::search;
use crate::app::pagination::change_page;
use crate::app::state::AppState;
use crate::ui::tree::ControlId;

/// Confirmation text of an article delete.
pub const DELETE_CONFIRMATION: &str =
    "确定要删除这篇文章吗？删除后将从所有相关数据源（文章池、归档分类、周报）中移除。";

/// Runs the command bound to `control` on the painted page.
pub fn execute(state: &mut AppState, command: &Command, control: ControlId) -> Vec<Action> {
    let _span = tracing::debug_span!("execute_command", %control, command = ?command).entered();

    match command {
        Command::ChangePage { page, listing } => change_page(state, *page, listing),
        Command::OpenTool { key } => navigate(state, &format!("/tool/{}", urlencoding::encode(key))),
        Command::OpenExternal { url, track } => {
            let mut actions = vec![Action::OpenExternal { url: url.clone() }];
            match track {
                Some(Track::Tool(key)) => actions.push(state.fetch(ApiRequest::RecordToolClick { key: key.clone() })),
                Some(Track::Article(url)) => {
                    actions.push(state.fetch(ApiRequest::RecordArticleClick { url: url.clone() }));
                }
                None => {}
            }
            actions
        }
        Command::DeleteArticle { .. } => vec![Action::Confirm {
            message: DELETE_CONFIRMATION.to_string(),
            on_accept: command.clone(),
        }],
        Command::RefreshRelated { key } => {
            tracing::debug!(%key, "refreshing related articles");
            vec![state.fetch(ApiRequest::ToolDetail { key: key.clone() })]
        }
        Command::ShowMore { key } => {
            tracing::debug!(%key, "show more is not wired to a page");
            vec![]
        }
        Command::GoBack => go_back(state),
        Command::CopyPrompt { identifier } => {
            state.pending_copies.insert(identifier.clone(), control);
            vec![state.fetch(ApiRequest::PromptContent { identifier: identifier.clone() })]
        }
        Command::ClearRecentSearch => search(state, None),
        Command::Navigate { path } => navigate(state, path),
    }
}

/// From a tool detail page, returns to the last tool category; elsewhere goes back in history.
fn go_back(state: &mut AppState) -> Vec<Action> {
    if !state.location.path.contains("/tool/") {
        return vec![Action::HistoryBack];
    }

    let target = state.last_category.clone().unwrap_or_else(|| "tools".to_string());
    navigate(state, &format!("/{target}"))
}

/// Handles an accepted confirmation dialog.
pub fn confirmed(state: &mut AppState, command: &Command) -> Vec<Action> {
    let Command::DeleteArticle { url, category } = command else {
        tracing::debug!(command = ?command, "nothing awaits this confirmation");
        return vec![];
    };

    tracing::info!(%url, category = ?category, "deleting article");
    let admin_code = state.admin_code.clone().unwrap_or_default();
    vec![state.fetch(ApiRequest::DeleteArticle { url: url.clone(), admin_code })]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::router::Location;
    use crate::storage::DurableState;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(1024, 20, Duration::from_millis(500), DurableState::default())
    }

    #[test]
    fn external_open_records_click() {
        let mut state = state();
        let command = Command::OpenExternal { url: "https://cursor.com".into(), track: Some(Track::Tool("7".into())) };
        let actions = execute(&mut state, &command, ControlId(1));

        assert_eq!(actions[0], Action::OpenExternal { url: "https://cursor.com".into() });
        let Action::Fetch(call) = &actions[1] else { panic!("expected click record") };
        assert_eq!(call.request, ApiRequest::RecordToolClick { key: "7".into() });
    }

    #[test]
    fn delete_asks_first_and_sends_credential() {
        let mut state = state();
        state.admin_code = Some("s3cret".into());
        let command = Command::DeleteArticle { url: "https://a".into(), category: Some("programming".into()) };

        let actions = execute(&mut state, &command, ControlId(4));
        assert_eq!(actions, vec![Action::Confirm { message: DELETE_CONFIRMATION.into(), on_accept: command.clone() }]);

        let actions = confirmed(&mut state, &command);
        let [Action::Fetch(call)] = actions.as_slice() else { panic!("expected one fetch") };
        assert_eq!(call.request, ApiRequest::DeleteArticle { url: "https://a".into(), admin_code: "s3cret".into() });
    }

    #[test]
    fn go_back_from_detail_returns_to_last_category() {
        let mut state = state();
        state.location = Location::parse("/tool/cursor");
        state.last_category = Some("category/ide".into());

        let actions = execute(&mut state, &Command::GoBack, ControlId(1));
        assert_eq!(actions[0], Action::PushHistory { path: "/category/ide".into() });

        state.location = Location::parse("/tool/cursor");
        state.last_category = None;
        let actions = execute(&mut state, &Command::GoBack, ControlId(1));
        assert_eq!(actions[0], Action::PushHistory { path: "/tools".into() });

        let actions = execute(&mut state, &Command::GoBack, ControlId(1));
        assert_eq!(actions, vec![Action::HistoryBack]);
    }

    #[test]
    fn show_more_is_inert() {
        let mut state = state();
        assert!(execute(&mut state, &Command::ShowMore { key: "cursor".into() }, ControlId(2)).is_empty());
    }

    #[test]
    fn copy_remembers_control() {
        let mut state = state();
        execute(&mut state, &Command::CopyPrompt { identifier: "review".into() }, ControlId(9));
        assert_eq!(state.pending_copies.get("review"), Some(&ControlId(9)));
    }
}
