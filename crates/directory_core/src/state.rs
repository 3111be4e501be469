use crate::detail::{DetailResult, DetailState};
use crate::map::{plan_map, MapPlan};
use crate::view_model::{self, ListingViewModel};
use crate::{
    Category, ItemId, ItemKind, ListingConfig, LoadError, PageResult, QueryState,
};

/// Monotonic id of a listing fetch; only the latest one may land.
pub type RequestSeq = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingStatus {
    Idle,
    Loading,
    Loaded,
    Failed(LoadError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetState {
    Loading,
    Loaded(Vec<Category>),
    Failed(LoadError),
}

/// What the map overlay has to do after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapAction {
    /// First show: create the instance.
    Init,
    /// Shown result changed: recreate markers and view.
    Rebuild,
    /// Same result as last shown: only re-lay out.
    Invalidate,
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapState {
    visible: bool,
    initialized: bool,
    shown_revision: u64,
}

impl MapState {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

/// View state of one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    config: ListingConfig,
    query: QueryState,
    search_draft: String,
    status: ListingStatus,
    result: Option<PageResult>,
    /// Bumped whenever `result` is replaced or cleared by a completed load.
    result_revision: u64,
    known_total_pages: u32,
    latest_seq: RequestSeq,
    facets: FacetState,
    map: MapState,
    detail: DetailState,
    dirty: bool,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(ListingConfig::new(ItemKind::Places))
    }
}

impl ListingState {
    pub fn new(config: ListingConfig) -> Self {
        let query = QueryState::new(config.default_page_size);
        Self {
            config,
            query,
            search_draft: String::new(),
            status: ListingStatus::Idle,
            result: None,
            result_revision: 0,
            known_total_pages: 1,
            latest_seq: 0,
            facets: FacetState::Loading,
            map: MapState::default(),
            detail: DetailState::Closed,
            dirty: false,
        }
    }

    pub fn view(&self) -> ListingViewModel {
        view_model::render(self)
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    pub fn kind(&self) -> ItemKind {
        self.config.kind
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn search_draft(&self) -> &str {
        &self.search_draft
    }

    pub fn status(&self) -> &ListingStatus {
        &self.status
    }

    pub fn result(&self) -> Option<&PageResult> {
        self.result.as_ref()
    }

    pub fn facets(&self) -> &FacetState {
        &self.facets
    }

    pub fn map_state(&self) -> MapState {
        self.map
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    pub fn latest_seq(&self) -> RequestSeq {
        self.latest_seq
    }

    /// Total pages from the last successful load (at least 1).
    pub fn total_pages(&self) -> u32 {
        self.known_total_pages.max(1)
    }

    pub fn query_string(&self) -> String {
        self.query.to_query_string(self.config.default_page_size)
    }

    /// Returns whether anything visible changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn restore_query(&mut self, query: QueryState) {
        self.search_draft = query.search_text().unwrap_or_default().to_string();
        self.query = query;
        self.mark_dirty();
    }

    pub(crate) fn set_search_draft(&mut self, text: String) {
        if self.search_draft != text {
            self.search_draft = text;
            self.mark_dirty();
        }
    }

    pub(crate) fn update_filter(&mut self, name: &str, checked: bool) {
        self.query.set_category(name, checked);
        self.query.set_page(1);
        self.mark_dirty();
    }

    pub(crate) fn update_search_text(&mut self, text: &str) {
        self.search_draft = text.to_string();
        self.query.set_search_text(text);
        self.query.set_page(1);
        self.mark_dirty();
    }

    pub(crate) fn commit_search_draft(&mut self) {
        let draft = self.search_draft.clone();
        self.update_search_text(&draft);
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.query.set_page(page.clamp(1, self.total_pages()));
        self.mark_dirty();
    }

    /// Returns false (and changes nothing) for a zero page size.
    pub(crate) fn set_page_size(&mut self, page_size: u32) -> bool {
        if page_size == 0 {
            return false;
        }
        self.query.set_page_size(page_size);
        self.query.set_page(1);
        self.mark_dirty();
        true
    }

    /// Starts a fetch for the current query and supersedes any in flight.
    ///
    /// Rendered content is cleared until the new result lands. Markers go
    /// with the cards: the revision moves so no map keeps the old page.
    pub(crate) fn begin_refresh(&mut self) -> (RequestSeq, QueryState) {
        self.latest_seq += 1;
        self.status = ListingStatus::Loading;
        self.result = None;
        self.result_revision += 1;
        self.mark_dirty();
        (self.latest_seq, self.query.clone())
    }

    /// Applies a listing response. Returns false when `seq` is stale.
    pub(crate) fn apply_listing(
        &mut self,
        seq: RequestSeq,
        result: Result<PageResult, LoadError>,
    ) -> bool {
        if seq != self.latest_seq {
            return false;
        }
        match result {
            Ok(page) => {
                self.query.set_page(page.current_page);
                self.known_total_pages = page.total_pages;
                self.result = Some(page);
                self.status = ListingStatus::Loaded;
            }
            Err(error) => {
                self.result = None;
                self.status = ListingStatus::Failed(error);
            }
        }
        self.result_revision += 1;
        self.mark_dirty();
        true
    }

    pub(crate) fn apply_categories(&mut self, result: Result<Vec<Category>, LoadError>) {
        self.facets = match result {
            Ok(categories) => FacetState::Loaded(categories),
            Err(error) => FacetState::Failed(error),
        };
        self.mark_dirty();
    }

    pub(crate) fn toggle_map(&mut self) -> MapAction {
        self.mark_dirty();
        if self.map.visible {
            self.map.visible = false;
            return MapAction::Hide;
        }
        self.map.visible = true;
        if !self.map.initialized {
            self.map.initialized = true;
            self.map.shown_revision = self.result_revision;
            MapAction::Init
        } else if self.map.shown_revision != self.result_revision {
            self.map.shown_revision = self.result_revision;
            MapAction::Rebuild
        } else {
            MapAction::Invalidate
        }
    }

    pub(crate) fn close_map(&mut self) -> Option<MapAction> {
        if !self.map.visible {
            return None;
        }
        self.map.visible = false;
        self.mark_dirty();
        Some(MapAction::Hide)
    }

    /// After a load landed: a visible map follows the new result immediately,
    /// a hidden one catches up on its next show.
    pub(crate) fn sync_map_after_load(&mut self) -> Option<MapAction> {
        if self.map.visible && self.map.initialized {
            self.map.shown_revision = self.result_revision;
            Some(MapAction::Rebuild)
        } else {
            None
        }
    }

    /// A visible map drops its markers while a request is out. The shown
    /// revision stays behind, so showing the map again rebuilds it.
    pub(crate) fn map_cleared_by_refresh(&self) -> bool {
        self.map.visible && self.map.initialized
    }

    /// Markers and viewport for the current result (empty while none is held).
    pub fn map_plan(&self) -> MapPlan {
        match &self.result {
            Some(page) => plan_map(&page.items, self.config.kind),
            None => MapPlan::empty(),
        }
    }

    pub(crate) fn begin_detail(&mut self, id: ItemId) {
        self.detail = DetailState::Loading(id);
        self.mark_dirty();
    }

    /// Applies a detail response. Returns false when another detail was requested since.
    pub(crate) fn apply_detail(&mut self, id: ItemId, result: Result<DetailResult, LoadError>) -> bool {
        if self.detail != DetailState::Loading(id) {
            return false;
        }
        self.detail = match result {
            Ok(detail) => DetailState::Loaded(detail),
            Err(error) => DetailState::Failed { id, error },
        };
        self.mark_dirty();
        true
    }

    /// Returns the id of the detail that was open, if any.
    pub(crate) fn close_detail(&mut self) -> Option<ItemId> {
        let closed = self.detail.requested_id()?;
        self.detail = DetailState::Closed;
        self.mark_dirty();
        Some(closed)
    }
}
