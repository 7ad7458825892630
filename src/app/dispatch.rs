//! Route dispatch: from an address to one loader.
//!
//! Every dispatch starts a new generation, resets the page cursor, closes all menus,
//! issues exactly one content request (or paints a local view for routes without
//! one) and schedules the two deferred navigation-highlight passes.

use crate::api::ApiRequest;
use crate::app::actions::Action;
use crate::app::modes::{ContentType, FormKind, Listing};
use crate::app::router::{Location, Route};
use crate::app::state::AppState;
use crate::app::timers::{TimerPurpose, NAV_HIGHLIGHT_DELAYS};
use crate::storage::DurableKey;
use crate::ui::views::{initial_values, View};

/// Dispatches `location` without touching history.
pub fn dispatch(state: &mut AppState, location: Location) -> Vec<Action> {
    let route = Route::resolve(&location);
    let _span = tracing::info_span!("dispatch", path = %location, route = ?route).entered();

    state.location = location;
    state.bump_generation();
    state.context.page = 1;
    state.context.category = None;
    state.context.loading = false;
    state.menus.close_all();

    let mut actions = match route {
        Route::Articles(feed) => load_listing(state, Listing::Articles(feed), 1),
        Route::FeaturedTools => load_listing(state, Listing::Tools { featured: true, category: None }, 1),
        Route::Category(category) => {
            let mut actions = vec![];
            if !category.is_empty() {
                let route = format!("category/{category}");
                state.last_category = Some(route.clone());
                actions.push(Action::Persist { key: DurableKey::LastCategory, value: route });
            }
            actions.extend(load_listing(state, Listing::Tools { featured: false, category: Some(category) }, 1));
            actions
        }
        Route::ToolDetail(key) => load(state, ContentType::ToolDetail, ApiRequest::ToolDetail { key }),
        Route::Prompts => load_listing(state, Listing::Prompts, 1),
        Route::Rules => load(state, ContentType::Rules, ApiRequest::Rules),
        Route::Resources { category, subcategory } => {
            state.context.category.clone_from(&category);
            load(state, ContentType::Resources, ApiRequest::Resources { category, subcategory })
        }
        Route::Submit(kind) => {
            state.context.content_type = match kind {
                FormKind::Article => ContentType::Submit,
                FormKind::Tool => ContentType::SubmitTool,
            };
            vec![state.show(View::Form { kind, values: initial_values(kind), status: None })]
        }
        Route::WechatMp => {
            state.context.content_type = ContentType::WechatMp;
            vec![state.show(View::WechatMp)]
        }
        Route::Weekly(id) => load(state, ContentType::Weekly, ApiRequest::Weekly { id }),
        Route::Recent { search } => load_listing(state, Listing::Recent { search }, 1),
        Route::HotNews => load_listing(state, Listing::HotNews, 1),
    };

    for delay in NAV_HIGHLIGHT_DELAYS {
        let (_, start) = state.timers.start(TimerPurpose::NavHighlight, delay);
        actions.push(start);
    }

    actions
}

/// Follows an in-portal link: pushes the address and dispatches it.
pub fn navigate(state: &mut AppState, path: &str) -> Vec<Action> {
    let location = Location::parse(path);
    let mut actions = vec![Action::PushHistory { path: location.to_string() }];
    actions.extend(dispatch(state, location));
    actions
}

/// Loads one page of a listing under the live generation.
///
/// Updates the page context, shows the spinner and issues the request.
pub fn load_listing(state: &mut AppState, listing: Listing, page: u32) -> Vec<Action> {
    state.context.page = page;
    state.context.category = listing.category().map(String::from);
    let request = listing.request(page, state.context.page_size);
    load(state, listing.content_type(), request)
}

fn load(state: &mut AppState, content_type: ContentType, request: ApiRequest) -> Vec<Action> {
    tracing::debug!(content_type = content_type.as_str(), request = request.kind(), "loading");
    state.context.content_type = content_type;
    state.context.loading = true;
    vec![state.show(View::Loading), state.fetch(request)]
}

/// Reloads whatever the main surface shows: the same page of a listing, or the current address.
pub fn reload(state: &mut AppState) -> Vec<Action> {
    match state.view.listing() {
        Some(listing) => {
            state.bump_generation();
            let page = state.context.page;
            load_listing(state, listing, page)
        }
        None => {
            let location = state.location.clone();
            dispatch(state, location)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::menus::MenuId;
    use crate::storage::DurableState;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(1024, 20, Duration::from_millis(500), DurableState::default())
    }

    fn fetches(actions: &[Action]) -> Vec<&ApiRequest> {
        actions
            .iter()
            .filter_map(|a| if let Action::Fetch(call) = a { Some(&call.request) } else { None })
            .collect()
    }

    #[test]
    fn every_route_issues_at_most_one_request() {
        for path in [
            "/", "/news", "/ai-news", "/tools", "/category/cli", "/tool/cursor", "/prompts", "/rules",
            "/resources?category=技术社区", "/weekly/2024-03", "/recent?search=mcp", "/hot-news",
        ] {
            let mut state = state();
            state.context.page = 4;
            let actions = dispatch(&mut state, Location::parse(path));
            assert_eq!(fetches(&actions).len(), 1, "{path}");
            assert_eq!(state.context.page, 1, "{path}");
            assert!(state.context.loading);
        }

        for path in ["/submit", "/submit-tool", "/wechat-mp"] {
            let mut state = state();
            let actions = dispatch(&mut state, Location::parse(path));
            assert!(fetches(&actions).is_empty(), "{path}");
            assert!(!state.context.loading);
        }
    }

    #[test]
    fn category_route_persists_last_category() {
        let mut state = state();
        let actions = dispatch(&mut state, Location::parse("/category/cli"));
        assert!(actions.contains(&Action::Persist { key: DurableKey::LastCategory, value: "category/cli".into() }));
        assert_eq!(state.context.category.as_deref(), Some("cli"));
        assert_eq!(state.context.content_type, ContentType::Tools);
        assert_eq!(
            fetches(&actions),
            vec![&ApiRequest::Tools { featured: false, category: Some("cli".into()), page: 1, page_size: 20 }]
        );
    }

    #[test]
    fn dispatch_schedules_two_highlights_and_closes_menus() {
        let mut state = state();
        state.menus.toggle(MenuId::Sidebar);
        let actions = dispatch(&mut state, Location::parse("/rules"));

        let timers = actions.iter().filter(|a| matches!(a, Action::StartTimer { .. })).count();
        assert_eq!(timers, 2);
        assert_eq!(state.timers.pending(TimerPurpose::NavHighlight), 2);
        assert!(!state.menus.is_open(MenuId::Sidebar));
    }

    #[test]
    fn each_dispatch_advances_generation() {
        let mut state = state();
        dispatch(&mut state, Location::parse("/news"));
        let first = state.generation;
        dispatch(&mut state, Location::parse("/news"));
        assert!(state.generation > first);
    }

    #[test]
    fn navigate_pushes_history_first() {
        let mut state = state();
        let actions = navigate(&mut state, "/tool/cursor");
        assert_eq!(actions[0], Action::PushHistory { path: "/tool/cursor".into() });
        assert_eq!(state.context.content_type, ContentType::ToolDetail);
    }
}
