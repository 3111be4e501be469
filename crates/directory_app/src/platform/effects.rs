use std::path::PathBuf;
use std::time::Duration;

use directory_core::map::{MapPlan, MapSync};
use directory_core::{
    Category, CategoryRef, DetailResult, Effect, Item, ItemKind, LoadError, Msg, PageResult,
    PlaceRef, QueryState,
};
use directory_engine::{
    Collection, DetailPayload, EngineEvent, EngineHandle, FailureKind, FetchError, ListingPage,
    ListingRequest, WireCategory, WireItem,
};
use directory_logging::{
    directory_debug, directory_error, directory_info, directory_warn, request_scope,
};

use super::persistence;
use super::ui::map::{TerminalMapProvider, ViewSize};
use super::ui::render::Renderer;

pub const LISTING_MAP: &str = "listing-map";
pub const DETAIL_MAP: &str = "detail-map";

/// Carries out effects against the engine, the two map containers and the
/// saved view state, and turns engine completions back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
    listing_map: MapSync<TerminalMapProvider>,
    detail_map: MapSync<TerminalMapProvider>,
    kind: ItemKind,
    state_dir: PathBuf,
    in_flight: usize,
}

impl EffectRunner {
    pub fn new(
        engine: EngineHandle,
        kind: ItemKind,
        state_dir: PathBuf,
        map_size: ViewSize,
    ) -> Self {
        Self {
            engine,
            listing_map: MapSync::new(TerminalMapProvider::new(map_size), LISTING_MAP),
            detail_map: MapSync::new(TerminalMapProvider::new(map_size), DETAIL_MAP),
            kind,
            state_dir,
            in_flight: 0,
        }
    }

    /// Backend calls issued and not yet answered.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    #[cfg(test)]
    pub fn listing_map(&self) -> &MapSync<TerminalMapProvider> {
        &self.listing_map
    }

    #[cfg(test)]
    pub fn detail_map(&self) -> &MapSync<TerminalMapProvider> {
        &self.detail_map
    }

    pub fn run(&mut self, effects: Vec<Effect>, renderer: &mut dyn Renderer) {
        for effect in effects {
            match effect {
                Effect::FetchListing { seq, kind, query } => {
                    let _scope = request_scope(seq);
                    let request = listing_request(kind, &query);
                    directory_info!(
                        "FetchListing {} page={} per_page={} search={:?} categories={:?}",
                        kind.collection(),
                        request.page,
                        request.per_page,
                        request.search,
                        request.categories
                    );
                    self.in_flight += 1;
                    self.engine.fetch_listing(seq, request);
                }
                Effect::FetchCategories { kind } => {
                    directory_debug!("FetchCategories {}", kind.category_collection());
                    self.in_flight += 1;
                    self.engine.fetch_categories(collection(kind));
                }
                Effect::FetchDetail { kind, id } => {
                    directory_debug!("FetchDetail {} {}", kind.collection(), id);
                    self.in_flight += 1;
                    self.engine.fetch_detail(collection(kind), id);
                }
                Effect::ReplaceUrl { query_string } => {
                    directory_debug!("ReplaceUrl ?{}", query_string);
                    if let Err(err) =
                        persistence::save_query(&self.state_dir, self.kind, &query_string)
                    {
                        directory_error!("Failed to save view state: {}", err);
                    }
                }
                Effect::InitMap(plan) | Effect::RebuildMap(plan) => {
                    log_skipped(&plan);
                    self.listing_map.rebuild(&plan);
                    if let Some(map) = self.listing_map.instance() {
                        renderer.render_map(map.snapshot());
                    }
                }
                Effect::InvalidateMapSize => {
                    self.listing_map.invalidate();
                    if let Some(map) = self.listing_map.instance() {
                        renderer.render_map(map.snapshot());
                    }
                }
                Effect::HideMap => renderer.hide_map(LISTING_MAP),
                Effect::ShowDetailMap(plan) => {
                    log_skipped(&plan);
                    self.detail_map.rebuild(&plan);
                    if let Some(map) = self.detail_map.instance() {
                        renderer.render_map(map.snapshot());
                    }
                }
                Effect::HideDetailMap => {
                    self.detail_map.teardown();
                    renderer.hide_map(DETAIL_MAP);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_msg(&mut self, timeout: Duration) -> Option<Msg> {
        let event = self.engine.recv_timeout(timeout)?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Some(event_to_msg(event))
    }
}

fn collection(kind: ItemKind) -> Collection {
    match kind {
        ItemKind::Places => Collection::Places,
        ItemKind::Events => Collection::Events,
    }
}

fn item_kind(collection: Collection) -> ItemKind {
    match collection {
        Collection::Places => ItemKind::Places,
        Collection::Events => ItemKind::Events,
    }
}

fn log_skipped(plan: &MapPlan) {
    for skipped in &plan.skipped {
        directory_warn!("item {} left off the map: {}", skipped.item_id, skipped.reason);
    }
}

pub fn listing_request(kind: ItemKind, query: &QueryState) -> ListingRequest {
    ListingRequest {
        collection: collection(kind),
        page: query.page(),
        per_page: query.page_size(),
        search: query.search_text().map(str::to_string),
        categories: query.selected_categories().iter().cloned().collect(),
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ListingCompleted { seq, result } => {
            let _scope = request_scope(seq);
            let result = match result {
                Ok(page) => {
                    directory_info!(
                        "listing answered: {} items, page {} of {}",
                        page.items.len(),
                        page.page,
                        page.total_pages
                    );
                    Ok(page_result(page))
                }
                Err(err) => {
                    directory_warn!("listing failed: {}", err);
                    Err(load_error(err))
                }
            };
            Msg::ListingLoaded { seq, result }
        }
        EngineEvent::CategoriesCompleted { collection, result } => {
            let result = result
                .map(|entries| {
                    entries
                        .into_iter()
                        .map(|entry| Category { name: entry.name })
                        .collect()
                })
                .map_err(|err| {
                    directory_warn!(
                        "{} failed: {}",
                        item_kind(collection).category_collection(),
                        err
                    );
                    load_error(err)
                });
            Msg::CategoriesLoaded(result)
        }
        EngineEvent::DetailCompleted { id, result, .. } => {
            let result = result.map(detail_result).map_err(|err| {
                directory_warn!("detail {} failed: {}", id, err);
                load_error(err)
            });
            Msg::DetailLoaded { id, result }
        }
    }
}

pub fn load_error(err: FetchError) -> LoadError {
    match err.kind {
        FailureKind::HttpStatus(code) => LoadError::status(code, err.message),
        _ => LoadError::network(err.to_string()),
    }
}

pub fn page_result(page: ListingPage) -> PageResult {
    PageResult {
        items: page.items.into_iter().map(item).collect(),
        current_page: page.page,
        total_pages: page.total_pages,
        page_size: page.per_page,
        total_count: page.total,
    }
}

/// Listing item; events only carry a full description, which stands in for
/// the short one.
pub fn item(wire: WireItem) -> Item {
    Item {
        id: wire.id,
        name: wire.name,
        category: wire.category.map(category_ref),
        short_description: wire.short_description.or(wire.description),
        image_url: wire.image_url,
        position: wire.position,
        starts_at: wire.starts_at,
    }
}

fn category_ref(wire: WireCategory) -> CategoryRef {
    match wire {
        WireCategory::Name(name) => CategoryRef {
            name,
            id: None,
            parent_id: None,
        },
        WireCategory::Full {
            name,
            id,
            parent_id,
        } => CategoryRef {
            name,
            id,
            parent_id,
        },
    }
}

pub fn detail_result(payload: DetailPayload) -> DetailResult {
    let description = payload.item.description.clone();
    DetailResult {
        item: item(payload.item),
        description,
        place: payload.place.map(|place| PlaceRef {
            id: place.id,
            name: place.name,
            position: place.position,
        }),
    }
}
