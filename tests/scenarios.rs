//! End-to-end controller scenarios driven through `handle_event`.

use codenexus::api::{ApiCall, ApiOutcome, ApiRequest};
use codenexus::app::modes::ContentType;
use codenexus::app::router::{Location, NavKey};
use codenexus::app::timers::TimerHandle;
use codenexus::storage::{DurableKey, DurableState, MemoryStorage, Storage};
use codenexus::ui::{Node, Page};
use codenexus::{handle_event, initialize, Action, AppState, Config, Event, Key, KeyTarget};
use serde_json::json;

fn run(state: &mut AppState, event: Event) -> Vec<Action> {
    handle_event(state, &event).expect("controller events are infallible").1
}

fn calls(actions: &[Action]) -> Vec<ApiCall> {
    actions
        .iter()
        .filter_map(|a| if let Action::Fetch(call) = a { Some(call.clone()) } else { None })
        .collect()
}

fn only_call(actions: &[Action], kind: &str) -> ApiCall {
    let matching: Vec<ApiCall> = calls(actions).into_iter().filter(|c| c.request.kind() == kind).collect();
    assert_eq!(matching.len(), 1, "expected exactly one {kind} request in {actions:?}");
    matching[0].clone()
}

fn reply(state: &mut AppState, call: ApiCall, outcome: ApiOutcome) -> Vec<Action> {
    run(state, Event::ApiCompleted { call, outcome })
}

fn last_paint(actions: &[Action]) -> Option<&Page> {
    actions.iter().rev().find_map(|a| if let Action::Paint(page) = a { Some(page) } else { None })
}

fn timers(actions: &[Action]) -> Vec<TimerHandle> {
    actions
        .iter()
        .filter_map(|a| if let Action::StartTimer { handle, .. } = a { Some(*handle) } else { None })
        .collect()
}

/// Runs the boot sequence at `path` and returns the actions of its final step.
fn boot(state: &mut AppState, path: &str) -> Vec<Action> {
    let actions = run(state, Event::Start { location: Location::parse(path) });
    let config = only_call(&actions, "config");
    let actions = reply(state, config, ApiOutcome::json(200, &json!({})));
    let weekly = only_call(&actions, "weekly_index");
    reply(state, weekly, ApiOutcome::json(200, &json!({ "items": [] })))
}

fn controller() -> AppState {
    initialize(&Config::default(), DurableState::default())
}

fn tools(n: usize, category: &str) -> serde_json::Value {
    json!((0..n)
        .map(|i| json!({ "id": i, "name": format!("tool-{i}"), "url": format!("https://t{i}.dev"), "category": category }))
        .collect::<Vec<_>>())
}

#[test]
fn category_listing_renders_items_and_pagination() {
    let mut state = controller();
    let actions = boot(&mut state, "/category/cli");

    let call = only_call(&actions, "tools");
    assert_eq!(call.request.path_and_query(), "/api/tools?page=1&page_size=20&category=cli");
    assert_eq!(state.context.content_type, ContentType::Tools);
    assert_eq!(state.context.page, 1);
    assert!(actions.contains(&Action::Persist { key: DurableKey::LastCategory, value: "category/cli".into() }));

    let body = json!({ "items": tools(5, "cli"), "total": 42, "page": 1, "page_size": 20, "total_pages": 3 });
    let actions = reply(&mut state, call, ApiOutcome::json(200, &body));
    let page = last_paint(&actions).expect("listing painted");

    assert_eq!(page.nodes.iter().filter(|n| matches!(n, Node::Card(_))).count(), 5);
    assert!(page.contains_text("第 1 / 3 页"));
    assert!(!page.control_by_label("上一页").unwrap().enabled);
    let next = page.control_by_label("下一页").unwrap();
    assert!(next.enabled);

    let actions = run(&mut state, Event::Activate(next.id));
    let call = only_call(&actions, "tools");
    assert_eq!(call.request.path_and_query(), "/api/tools?page=2&page_size=20&category=cli");
    assert_eq!(state.context.page, 2);
}

#[test]
fn weekly_not_found_shows_backend_detail() {
    let mut state = controller();
    let actions = boot(&mut state, "/weekly/2024-03");
    let call = only_call(&actions, "weekly");

    let actions = reply(&mut state, call.clone(), ApiOutcome::json(404, &json!({ "detail": "周报不存在" })));
    assert!(last_paint(&actions).unwrap().contains_text("加载失败: 周报不存在"));

    let actions = run(&mut state, Event::Navigate { location: Location::parse("/weekly/2024-03") });
    let call = only_call(&actions, "weekly");
    let garbage = ApiOutcome::Response { status: 404, body: "<html>Not Found</html>".into() };
    let page = reply(&mut state, call, garbage);
    let page = last_paint(&page).unwrap();
    assert!(page.contains_text("加载失败"));
    assert!(!page.contains_text("Not Found"));
}

#[test]
fn stale_response_is_discarded() {
    let mut state = controller();
    let actions = boot(&mut state, "/tools");
    let slow = only_call(&actions, "tools");

    let actions = run(&mut state, Event::Navigate { location: Location::parse("/prompts") });
    let fast = only_call(&actions, "prompts");

    let prompts = json!({ "items": [{ "name": "Code review", "identifier": "review" }], "total": 1, "total_pages": 1 });
    let actions = reply(&mut state, fast, ApiOutcome::json(200, &prompts));
    assert!(last_paint(&actions).unwrap().contains_text("Code review"));

    let late = json!({ "items": tools(3, "ide"), "total": 3, "total_pages": 1 });
    let actions = reply(&mut state, slow, ApiOutcome::json(200, &late));
    assert!(actions.is_empty());
    assert!(state.page.contains_text("Code review"));
    assert!(!state.page.contains_text("tool-0"));
    assert_eq!(state.context.content_type, ContentType::Prompts);
}

#[test]
fn short_admin_buffer_never_validates() {
    let mut state = controller();
    boot(&mut state, "/");

    let mut started = vec![];
    for c in "ab".chars() {
        started.extend(timers(&run(&mut state, Event::Key { key: Key::Char(c), target: KeyTarget::Document })));
    }
    for handle in started {
        let actions = run(&mut state, Event::TimerFired(handle));
        assert!(calls(&actions).iter().all(|c| c.request.kind() != "verify_admin_code"));
    }
}

#[test]
fn admin_elevation_survives_reload() {
    let mut storage = MemoryStorage::default();
    let mut state = initialize(&Config::default(), DurableState::load(&storage).unwrap());
    boot(&mut state, "/news");

    let mut debounce = None;
    for c in "s3cret".chars() {
        let actions = run(&mut state, Event::Key { key: Key::Char(c), target: KeyTarget::Document });
        debounce = timers(&actions).last().copied();
    }
    let actions = run(&mut state, Event::TimerFired(debounce.unwrap()));
    let verify = only_call(&actions, "verify_admin_code");
    assert_eq!(verify.request, ApiRequest::VerifyAdminCode { code: "s3cret".into() });

    let actions = reply(&mut state, verify, ApiOutcome::json(200, &json!({ "ok": true, "valid": true })));
    assert!(actions.contains(&Action::RevealAdminEntry));
    for action in &actions {
        if let Action::Persist { key, value } = action {
            storage.set(*key, value).unwrap();
        }
    }

    let durable = DurableState::load(&storage).unwrap();
    assert!(durable.admin_verified);
    assert_eq!(durable.admin_code.as_deref(), Some("s3cret"));

    let mut reloaded = initialize(&Config::default(), durable);
    let actions = boot(&mut reloaded, "/news");
    assert!(reloaded.admin.is_verified());
    assert!(actions.contains(&Action::RevealAdminEntry));
}

#[test]
fn forbidden_delete_alerts_without_reload() {
    let durable = DurableState { admin_verified: true, admin_code: Some("stale".into()), last_category: None };
    let mut state = initialize(&Config::default(), durable);
    let actions = boot(&mut state, "/news");
    let call = only_call(&actions, "articles");

    let body = json!({ "items": [{ "title": "Rust 1.90", "url": "https://blog.rust-lang.org/x" }], "total": 1, "total_pages": 1 });
    let actions = reply(&mut state, call, ApiOutcome::json(200, &body));
    let delete = last_paint(&actions).unwrap().control_by_label("删除").unwrap().id;

    let actions = run(&mut state, Event::Activate(delete));
    let Some(Action::Confirm { on_accept, .. }) = actions.first() else { panic!("expected confirmation") };
    let actions = run(&mut state, Event::Confirmed(on_accept.clone()));
    let call = only_call(&actions, "delete_article");
    assert_eq!(call.request.headers(), vec![("X-Admin-Code", "stale".to_string())]);

    let actions = reply(&mut state, call, ApiOutcome::json(403, &json!({ "detail": "forbidden" })));
    assert_eq!(actions, vec![Action::Alert("删除失败：需要管理员权限".into())]);
}

#[test]
fn navigation_keys_are_total_and_idempotent() {
    for path in ["/", "/news", "/zzz", "/tool/cursor", "/category/", "/weekly/7", "/weekly/", "/recent?search=x", ""] {
        let key = NavKey::from_path(path);
        assert_eq!(NavKey::from_path(key.as_str()), key, "{path}");
    }
    assert_eq!(NavKey::from_path("/").as_str(), "/news");
    assert_eq!(NavKey::from_path("/unknown/page").as_str(), "/news");
}

#[test]
fn every_route_issues_one_matching_load() {
    let cases = [
        ("/", "articles"),
        ("/ai-news", "articles"),
        ("/tools", "tools"),
        ("/category/mcp", "tools"),
        ("/tool/cursor", "tool_detail"),
        ("/prompts", "prompts"),
        ("/rules", "rules"),
        ("/resources", "resources"),
        ("/weekly/12", "weekly"),
        ("/recent", "recent"),
        ("/hot-news", "hot_news"),
    ];

    let mut state = controller();
    boot(&mut state, "/submit");
    for (path, kind) in cases {
        let actions = run(&mut state, Event::Navigate { location: Location::parse(path) });
        let loads = calls(&actions);
        assert_eq!(loads.len(), 1, "{path}");
        assert_eq!(loads[0].request.kind(), kind, "{path}");
        assert_eq!(state.context.page, 1);
    }
}
