use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use directory_core::map::{
    plan_map, GeoBounds, GeoPoint, MapInstance, MapMarker, MapPlan, MapProvider, MapSync,
    PositionError, Viewport, CLOSE_ZOOM, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING_PX,
    FIT_ZOOM_OUT,
};
use directory_core::{update, Effect, Item, ItemKind, ListingState, Msg, PageResult};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(directory_logging::initialize_for_tests);
}

#[test]
fn two_markers_fit_bounds_with_padding() {
    init_logging();
    let items = vec![
        Item::new(1, "A").with_position("45.0,20.0"),
        Item::new(2, "B").with_position("45.1,20.1"),
    ];

    let plan = plan_map(&items, ItemKind::Places);

    assert_eq!(plan.markers.len(), 2);
    assert_eq!(
        plan.viewport,
        Viewport::Fit {
            bounds: GeoBounds {
                south_west: GeoPoint::new(45.0, 20.0),
                north_east: GeoPoint::new(45.1, 20.1),
            },
            padding_px: FIT_PADDING_PX,
            zoom_out: FIT_ZOOM_OUT,
        }
    );
}

#[test]
fn single_marker_centres_at_close_zoom() {
    init_logging();
    let items = vec![Item::new(1, "A").with_position("45.37995, 20.39280")];

    let plan = plan_map(&items, ItemKind::Places);

    assert_eq!(
        plan.viewport,
        Viewport::Center {
            center: GeoPoint::new(45.37995, 20.39280),
            zoom: CLOSE_ZOOM,
        }
    );
}

#[test]
fn coincident_markers_do_not_fit_a_zero_area_box() {
    init_logging();
    let items = vec![
        Item::new(1, "A").with_position("45.2,20.2"),
        Item::new(2, "B").with_position("45.2,20.2"),
    ];

    let plan = plan_map(&items, ItemKind::Events);

    assert_eq!(plan.markers.len(), 2);
    assert!(matches!(plan.viewport, Viewport::Center { zoom, .. } if zoom == CLOSE_ZOOM));
    assert_eq!(plan.markers[1].href, "/events/2");
}

#[test]
fn no_valid_markers_uses_default_view() {
    init_logging();
    let items = vec![
        Item::new(1, "no position"),
        Item::new(2, "garbage").with_position("north,east"),
        Item::new(3, "too many").with_position("1,2,3"),
        Item::new(4, "off the globe").with_position("95.0,20.0"),
    ];

    let plan = plan_map(&items, ItemKind::Places);

    assert!(plan.markers.is_empty());
    assert_eq!(
        plan.viewport,
        Viewport::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    );
    let reasons: Vec<_> = plan.skipped.iter().map(|s| s.reason.clone()).collect();
    assert_eq!(reasons[0], PositionError::Missing);
    assert!(matches!(reasons[1], PositionError::Malformed(_)));
    assert!(matches!(reasons[2], PositionError::Malformed(_)));
    assert!(matches!(reasons[3], PositionError::OutOfRange(_)));
}

#[test]
fn bad_positions_are_skipped_not_fatal() {
    init_logging();
    let items = vec![
        Item::new(1, "ok").with_position("45.0,20.0"),
        Item::new(2, "bad").with_position("x"),
        Item::new(3, "ok too").with_position("45.1,20.1"),
    ];

    let plan = plan_map(&items, ItemKind::Places);

    let ids: Vec<_> = plan.markers.iter().map(|m| m.item_id).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(plan.skipped.len(), 1);
    assert_eq!(plan.skipped[0].item_id, 2);
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(String),
    TileLayer,
    Marker(i64),
    FitBounds(u32),
    SetView(f64),
    SetZoom(f64),
    Invalidate,
    Remove(usize),
}

#[derive(Default, Clone)]
struct FakeProvider {
    calls: Rc<RefCell<Vec<Call>>>,
    created: usize,
}

struct FakeMap {
    id: usize,
    zoom: f64,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl MapInstance for FakeMap {
    fn add_tile_layer(&mut self, _url_template: &str, _attribution: &str) {
        self.calls.borrow_mut().push(Call::TileLayer);
    }

    fn add_marker(&mut self, marker: &MapMarker) {
        self.calls.borrow_mut().push(Call::Marker(marker.item_id));
    }

    fn fit_bounds(&mut self, _bounds: GeoBounds, padding_px: u32) {
        self.zoom = 12.0;
        self.calls.borrow_mut().push(Call::FitBounds(padding_px));
    }

    fn set_view(&mut self, _center: GeoPoint, zoom: f64) {
        self.zoom = zoom;
        self.calls.borrow_mut().push(Call::SetView(zoom));
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
        self.calls.borrow_mut().push(Call::SetZoom(zoom));
    }

    fn invalidate_size(&mut self) {
        self.calls.borrow_mut().push(Call::Invalidate);
    }

    fn remove(self) {
        self.calls.borrow_mut().push(Call::Remove(self.id));
    }
}

impl MapProvider for FakeProvider {
    type Instance = FakeMap;

    fn create(&mut self, container: &str, _center: GeoPoint, zoom: f64) -> FakeMap {
        self.created += 1;
        self.calls
            .borrow_mut()
            .push(Call::Create(container.to_string()));
        FakeMap {
            id: self.created,
            zoom,
            calls: self.calls.clone(),
        }
    }
}

#[test]
fn fit_plan_zooms_out_after_fitting() {
    init_logging();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let provider = FakeProvider {
        calls: calls.clone(),
        created: 0,
    };
    let mut sync = MapSync::new(provider, "map");
    let items = vec![
        Item::new(1, "A").with_position("45.0,20.0"),
        Item::new(2, "B").with_position("45.1,20.1"),
    ];

    sync.rebuild(&plan_map(&items, ItemKind::Places));

    assert_eq!(
        *calls.borrow(),
        vec![
            Call::Create("map".into()),
            Call::TileLayer,
            Call::Invalidate,
            Call::Marker(1),
            Call::Marker(2),
            Call::FitBounds(FIT_PADDING_PX),
            Call::SetZoom(12.0 - FIT_ZOOM_OUT),
        ]
    );
    assert_eq!(sync.instance().map(|m| m.zoom()), Some(11.0));
}

#[test]
fn rebuild_removes_previous_instance_first() {
    init_logging();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let provider = FakeProvider {
        calls: calls.clone(),
        created: 0,
    };
    let mut sync = MapSync::new(provider, "map");

    sync.rebuild(&MapPlan::empty());
    calls.borrow_mut().clear();
    sync.rebuild(&MapPlan::empty());

    let recorded = calls.borrow();
    assert_eq!(recorded[0], Call::Remove(1));
    assert_eq!(recorded[1], Call::Create("map".into()));
    assert!(recorded.contains(&Call::SetView(DEFAULT_ZOOM)));
    assert!(sync.is_initialized());

    drop(recorded);
    sync.teardown();
    assert!(!sync.is_initialized());
    assert_eq!(calls.borrow().last(), Some(&Call::Remove(2)));
}

fn loaded(state: ListingState, items: Vec<Item>) -> ListingState {
    let seq = state.latest_seq();
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            seq,
            result: Ok(PageResult {
                items,
                current_page: 1,
                total_pages: 1,
                page_size: 10,
                total_count: 1,
            }),
        },
    );
    state
}

#[test]
fn toggling_map_initializes_once_then_invalidates() {
    init_logging();
    let (state, _) = update(ListingState::default(), Msg::Init { query_string: None });
    let state = loaded(state, vec![Item::new(1, "A").with_position("45.0,20.0")]);

    let (state, effects) = update(state, Msg::MapToggled);
    assert!(matches!(&effects[..], [Effect::InitMap(plan)] if plan.markers.len() == 1));
    assert_eq!(state.view().map.marker_count, 1);

    let (state, effects) = update(state, Msg::MapToggled);
    assert_eq!(effects, vec![Effect::HideMap]);
    assert!(!state.view().map.visible);

    let (state, effects) = update(state, Msg::MapToggled);
    assert_eq!(effects, vec![Effect::InvalidateMapSize]);
    assert!(state.map_state().is_visible());
}

#[test]
fn hidden_map_rebuilds_on_show_after_result_changed() {
    init_logging();
    let (state, _) = update(ListingState::default(), Msg::Init { query_string: None });
    let state = loaded(state, vec![Item::new(1, "A").with_position("45.0,20.0")]);
    let (state, _) = update(state, Msg::MapToggled);
    let (state, _) = update(state, Msg::MapClosed);

    let (state, _) = update(state, Msg::RefreshRequested);
    let state = loaded(
        state,
        vec![
            Item::new(2, "B").with_position("45.0,20.0"),
            Item::new(3, "C").with_position("45.1,20.1"),
        ],
    );

    let (_state, effects) = update(state, Msg::MapToggled);
    assert!(matches!(&effects[..], [Effect::RebuildMap(plan)] if plan.markers.len() == 2));
}

#[test]
fn visible_map_follows_every_completed_load() {
    init_logging();
    let (state, _) = update(ListingState::default(), Msg::Init { query_string: None });
    let state = loaded(state, vec![Item::new(1, "A").with_position("45.0,20.0")]);
    let (state, _) = update(state, Msg::MapToggled);

    let (state, _) = update(state, Msg::RefreshRequested);
    let seq = state.latest_seq();
    let (_state, effects) = update(
        state,
        Msg::ListingLoaded {
            seq,
            result: Err(directory_core::LoadError::network("down")),
        },
    );

    // Cards were cleared by the failure, so the markers go too.
    assert_eq!(effects, vec![Effect::RebuildMap(MapPlan::empty())]);
}

#[test]
fn refresh_clears_visible_markers_until_the_next_load() {
    init_logging();
    let (state, _) = update(ListingState::default(), Msg::Init { query_string: None });
    let state = loaded(
        state,
        vec![
            Item::new(1, "A").with_position("45.0,20.0"),
            Item::new(2, "B").with_position("45.1,20.1"),
        ],
    );
    let (state, _) = update(state, Msg::MapToggled);

    let (state, effects) = update(
        state,
        Msg::CategoryToggled {
            name: "Klub".into(),
            checked: true,
        },
    );
    let map_effects: Vec<&Effect> = effects
        .iter()
        .filter(|effect| matches!(effect, Effect::RebuildMap(_)))
        .collect();
    assert_eq!(map_effects, vec![&Effect::RebuildMap(MapPlan::empty())]);
    assert_eq!(state.view().map.marker_count, 0);

    let (state, effects) = update(state, Msg::MapToggled);
    assert_eq!(effects, vec![Effect::HideMap]);

    // Shown again while the request is still out: no stale markers to keep.
    let (_state, effects) = update(state, Msg::MapToggled);
    assert_eq!(effects, vec![Effect::RebuildMap(MapPlan::empty())]);
}
