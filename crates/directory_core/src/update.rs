use crate::detail::detail_map_plan;
use crate::map::MapPlan;
use crate::state::MapAction;
use crate::{Effect, ListingState, Msg, QueryState, SearchPolicy};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: ListingState, msg: Msg) -> (ListingState, Vec<Effect>) {
    let effects = match msg {
        Msg::Init { query_string } => {
            if let Some(raw) = query_string {
                let restored =
                    QueryState::from_query_string(&raw, state.config().default_page_size);
                state.restore_query(restored);
            }
            let mut effects = vec![Effect::FetchCategories { kind: state.kind() }];
            effects.extend(refresh(&mut state));
            effects
        }
        Msg::SearchInputChanged(text) => {
            let policy = state.config().search_policy;
            match policy {
                SearchPolicy::OnSubmit => {
                    state.set_search_draft(text);
                    Vec::new()
                }
                SearchPolicy::Live => {
                    state.update_search_text(&text);
                    refresh(&mut state)
                }
            }
        }
        Msg::SearchSubmitted => {
            state.commit_search_draft();
            refresh(&mut state)
        }
        Msg::CategoryToggled { name, checked } => {
            state.update_filter(&name, checked);
            refresh(&mut state)
        }
        Msg::PageSelected(page) => {
            state.set_page(page);
            refresh(&mut state)
        }
        Msg::PrevPage => {
            let current = state.query().page();
            if current > 1 {
                state.set_page(current - 1);
                refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::NextPage => {
            let current = state.query().page();
            if current < state.total_pages() {
                state.set_page(current + 1);
                refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::PageSizeSelected(page_size) => {
            if state.set_page_size(page_size) {
                refresh(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::RefreshRequested => refresh(&mut state),
        Msg::ListingLoaded { seq, result } => {
            if state.apply_listing(seq, result) {
                match state.sync_map_after_load() {
                    Some(action) => map_effects(&state, action),
                    None => Vec::new(),
                }
            } else {
                // Superseded by a newer request.
                Vec::new()
            }
        }
        Msg::CategoriesLoaded(result) => {
            state.apply_categories(result);
            Vec::new()
        }
        Msg::MapToggled => {
            let action = state.toggle_map();
            map_effects(&state, action)
        }
        Msg::MapClosed => match state.close_map() {
            Some(action) => map_effects(&state, action),
            None => Vec::new(),
        },
        Msg::DetailRequested(id) => {
            state.begin_detail(id);
            vec![Effect::FetchDetail {
                kind: state.kind(),
                id,
            }]
        }
        Msg::DetailClosed => match state.close_detail() {
            Some(_) => vec![Effect::HideDetailMap],
            None => Vec::new(),
        },
        Msg::DetailLoaded { id, result } => {
            let plan = result
                .as_ref()
                .ok()
                .and_then(|detail| detail_map_plan(detail, state.kind()));
            if state.apply_detail(id, result) {
                plan.map(Effect::ShowDetailMap).into_iter().collect()
            } else {
                Vec::new()
            }
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn refresh(state: &mut ListingState) -> Vec<Effect> {
    let (seq, query) = state.begin_refresh();
    let mut effects = vec![
        Effect::ReplaceUrl {
            query_string: state.query_string(),
        },
        Effect::FetchListing {
            seq,
            kind: state.kind(),
            query,
        },
    ];
    if state.map_cleared_by_refresh() {
        effects.push(Effect::RebuildMap(MapPlan::empty()));
    }
    effects
}

fn map_effects(state: &ListingState, action: MapAction) -> Vec<Effect> {
    match action {
        MapAction::Init => vec![Effect::InitMap(state.map_plan())],
        MapAction::Rebuild => vec![Effect::RebuildMap(state.map_plan())],
        MapAction::Invalidate => vec![Effect::InvalidateMapSize],
        MapAction::Hide => vec![Effect::HideMap],
    }
}
