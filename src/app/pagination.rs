//! Page changes of the paged listings.

use crate::app::actions::Action;
use crate::app::dispatch::load_listing;
use crate::app::modes::Listing;
use crate::app::state::AppState;

/// Loads page `page` of `listing`, keeping every filter it carries.
///
/// # Returns
///
/// No actions for `page < 1`. Otherwise the spinner paint and exactly one request,
/// issued under a fresh generation so a slower response for the previous page is
/// discarded.
pub fn change_page(state: &mut AppState, page: i64, listing: &Listing) -> Vec<Action> {
    let Ok(page) = u32::try_from(page) else {
        tracing::debug!(page, "page out of range ignored");
        return vec![];
    };
    if page < 1 {
        tracing::debug!("page below 1 ignored");
        return vec![];
    }

    let _span = tracing::debug_span!("change_page", page, listing = ?listing).entered();
    state.bump_generation();
    load_listing(state, listing.clone(), page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiRequest;
    use crate::app::modes::ContentType;
    use crate::storage::DurableState;
    use std::time::Duration;

    fn state() -> AppState {
        AppState::new(1024, 20, Duration::from_millis(500), DurableState::default())
    }

    fn requests(actions: &[Action]) -> Vec<ApiRequest> {
        actions
            .iter()
            .filter_map(|a| if let Action::Fetch(call) = a { Some(call.request.clone()) } else { None })
            .collect()
    }

    #[test]
    fn pages_below_one_are_ignored() {
        let mut state = state();
        let generation = state.generation;
        for page in [0, -1, i64::MIN] {
            assert!(change_page(&mut state, page, &Listing::Prompts).is_empty());
        }
        assert_eq!(state.generation, generation);
        assert_eq!(state.context.page, 1);
    }

    #[test]
    fn valid_page_issues_one_request() {
        let mut state = state();
        let listing = Listing::Tools { featured: false, category: Some("mcp".into()) };
        let actions = change_page(&mut state, 3, &listing);

        assert_eq!(
            requests(&actions),
            vec![ApiRequest::Tools { featured: false, category: Some("mcp".into()), page: 3, page_size: 20 }]
        );
        assert_eq!(state.context.page, 3);
        assert_eq!(state.context.category.as_deref(), Some("mcp"));
        assert_eq!(state.context.content_type, ContentType::Tools);
    }

    #[test]
    fn search_is_reissued_on_every_page() {
        let mut state = state();
        let listing = Listing::Recent { search: Some("agent".into()) };
        for page in [2, 3, 1] {
            let actions = change_page(&mut state, page, &listing);
            assert_eq!(
                requests(&actions),
                vec![ApiRequest::Recent { page: u32::try_from(page).unwrap(), page_size: 20, search: Some("agent".into()) }]
            );
        }
    }
}
