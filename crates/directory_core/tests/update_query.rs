use std::sync::Once;

use directory_core::{
    update, Effect, Item, ItemKind, ListingConfig, ListingState, Msg, PageResult, QueryState,
    SearchPolicy,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(directory_logging::initialize_for_tests);
}

fn page(current: u32, total: u32) -> PageResult {
    PageResult {
        items: vec![Item::new(1, "Kafić Central")],
        current_page: current,
        total_pages: total,
        page_size: 10,
        total_count: u64::from(total) * 10,
    }
}

/// A state that has loaded page `current` of `total`.
fn loaded_at(current: u32, total: u32) -> ListingState {
    let (state, _) = update(
        ListingState::new(ListingConfig::new(ItemKind::Events)),
        Msg::Init {
            query_string: Some(format!("page={current}")),
        },
    );
    let seq = state.latest_seq();
    let (mut state, _) = update(
        state,
        Msg::ListingLoaded {
            seq,
            result: Ok(page(current, total)),
        },
    );
    state.consume_dirty();
    state
}

fn fetched_query(effects: &[Effect]) -> QueryState {
    effects
        .iter()
        .find_map(|effect| match effect {
            Effect::FetchListing { query, .. } => Some(query.clone()),
            _ => None,
        })
        .expect("fetch effect")
}

#[test]
fn init_fetches_facets_and_listing() {
    init_logging();
    let (state, effects) = update(
        ListingState::new(ListingConfig::new(ItemKind::Places)),
        Msg::Init { query_string: None },
    );

    assert_eq!(
        effects,
        vec![
            Effect::FetchCategories {
                kind: ItemKind::Places
            },
            Effect::ReplaceUrl {
                query_string: String::new()
            },
            Effect::FetchListing {
                seq: 1,
                kind: ItemKind::Places,
                query: QueryState::new(10),
            },
        ]
    );
    assert_eq!(state.latest_seq(), 1);
}

#[test]
fn init_restores_every_field_from_address() {
    init_logging();
    let (state, effects) = update(
        ListingState::default(),
        Msg::Init {
            query_string: Some("?search=kafe&categories=Klub,Kafić&page=3&per_page=20".into()),
        },
    );

    let query = fetched_query(&effects);
    assert_eq!(query.search_text(), Some("kafe"));
    assert!(query.is_selected("Klub"));
    assert!(query.is_selected("Kafić"));
    assert_eq!(query.page(), 3);
    assert_eq!(query.page_size(), 20);
    assert_eq!(state.search_draft(), "kafe");
}

#[test]
fn category_toggle_resets_page_and_refreshes() {
    init_logging();
    let state = loaded_at(4, 9);

    let (state, effects) = update(
        state,
        Msg::CategoryToggled {
            name: "Klub".into(),
            checked: true,
        },
    );

    let query = fetched_query(&effects);
    assert_eq!(query.page(), 1);
    assert!(query.is_selected("Klub"));
    assert_eq!(state.query().page(), 1);
}

#[test]
fn repeated_identical_toggle_is_idempotent() {
    init_logging();
    let toggle = || Msg::CategoryToggled {
        name: "Klub".into(),
        checked: true,
    };
    let (once, _) = update(loaded_at(1, 3), toggle());
    let (twice, _) = update(once.clone(), toggle());

    assert_eq!(once.query(), twice.query());

    let (off, _) = update(
        twice,
        Msg::CategoryToggled {
            name: "Klub".into(),
            checked: false,
        },
    );
    assert!(off.query().selected_categories().is_empty());
}

#[test]
fn search_is_submit_gated_by_default() {
    init_logging();
    let state = loaded_at(5, 9);

    let (state, effects) = update(state, Msg::SearchInputChanged("kafe".into()));
    assert!(effects.is_empty());
    assert_eq!(state.query().search_text(), None);
    assert_eq!(state.query().page(), 5);

    let (state, effects) = update(state, Msg::SearchSubmitted);
    let query = fetched_query(&effects);
    assert_eq!(query.search_text(), Some("kafe"));
    assert_eq!(query.page(), 1);
    assert_eq!(state.query().page(), 1);
}

#[test]
fn live_search_refreshes_on_every_edit() {
    init_logging();
    let config = ListingConfig {
        search_policy: SearchPolicy::Live,
        ..ListingConfig::new(ItemKind::Places)
    };
    let (state, _) = update(ListingState::new(config), Msg::Init { query_string: None });

    let (state, effects) = update(state, Msg::SearchInputChanged("ka".into()));
    assert_eq!(fetched_query(&effects).search_text(), Some("ka"));

    let (_state, effects) = update(state, Msg::SearchInputChanged("kaf".into()));
    assert_eq!(fetched_query(&effects).search_text(), Some("kaf"));
}

#[test]
fn empty_submit_clears_search_filter() {
    init_logging();
    let (state, _) = update(
        ListingState::default(),
        Msg::Init {
            query_string: Some("search=kafe".into()),
        },
    );
    let (state, _) = update(state, Msg::SearchInputChanged("  ".into()));
    let (_state, effects) = update(state, Msg::SearchSubmitted);

    assert_eq!(fetched_query(&effects).search_text(), None);
}

#[test]
fn page_size_resets_page() {
    init_logging();
    let (state, effects) = update(loaded_at(3, 9), Msg::PageSizeSelected(25));

    let query = fetched_query(&effects);
    assert_eq!(query.page_size(), 25);
    assert_eq!(query.page(), 1);
    assert_eq!(state.query().page(), 1);
}

#[test]
fn zero_page_size_is_ignored() {
    init_logging();
    let state = loaded_at(3, 9);
    let before = state.query().clone();

    let (state, effects) = update(state, Msg::PageSizeSelected(0));
    assert!(effects.is_empty());
    assert_eq!(state.query(), &before);
}

#[test]
fn set_page_keeps_filters() {
    init_logging();
    let (state, _) = update(
        loaded_at(1, 9),
        Msg::CategoryToggled {
            name: "Klub".into(),
            checked: true,
        },
    );
    let (state, _) = update(state, Msg::SearchInputChanged("rock".into()));
    let (state, _) = update(state, Msg::SearchSubmitted);
    let seq = state.latest_seq();
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            seq,
            result: Ok(page(1, 9)),
        },
    );

    let (state, effects) = update(state, Msg::PageSelected(4));

    let query = fetched_query(&effects);
    assert_eq!(query.page(), 4);
    assert_eq!(query.search_text(), Some("rock"));
    assert!(query.is_selected("Klub"));
    assert_eq!(state.query().page(), 4);
}

#[test]
fn set_page_is_clamped_to_known_pages() {
    init_logging();
    let (_state, effects) = update(loaded_at(2, 6), Msg::PageSelected(40));
    assert_eq!(fetched_query(&effects).page(), 6);

    let (_state, effects) = update(loaded_at(2, 6), Msg::PageSelected(0));
    assert_eq!(fetched_query(&effects).page(), 1);
}

#[test]
fn prev_and_next_stop_at_the_edges() {
    init_logging();
    let (_state, effects) = update(loaded_at(1, 3), Msg::PrevPage);
    assert!(effects.is_empty());

    let (_state, effects) = update(loaded_at(3, 3), Msg::NextPage);
    assert!(effects.is_empty());

    let (_state, effects) = update(loaded_at(2, 3), Msg::NextPage);
    assert_eq!(fetched_query(&effects).page(), 3);

    let (_state, effects) = update(loaded_at(2, 3), Msg::PrevPage);
    assert_eq!(fetched_query(&effects).page(), 1);
}

#[test]
fn refresh_mirrors_query_into_address() {
    init_logging();
    let (_state, effects) = update(
        loaded_at(1, 3),
        Msg::CategoryToggled {
            name: "Klub".into(),
            checked: true,
        },
    );

    assert_eq!(
        effects[0],
        Effect::ReplaceUrl {
            query_string: "categories=Klub".into()
        }
    );
}
