use crate::detail::DetailState;
use crate::pagination::{next_enabled, page_window, prev_enabled};
use crate::state::{FacetState, ListingState, ListingStatus};
use crate::{ItemId, ItemKind, ListingConfig, PageResult, PLACEHOLDER_IMAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusView {
    Idle,
    Loading,
    Loaded,
    /// Load succeeded with no items.
    Empty,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingViewModel {
    pub kind: ItemKind,
    pub status: StatusView,
    /// Loading, empty or failure text; `None` while cards are shown.
    pub status_text: Option<String>,
    pub search_text: String,
    pub cards: Vec<CardView>,
    pub pagination: PaginationView,
    pub facets: FacetPanelView,
    pub map: MapPanelView,
    pub detail: Option<DetailView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: ItemId,
    pub title: String,
    pub image_url: String,
    pub category: String,
    pub description: String,
    pub starts_at: Option<String>,
    pub href: String,
    pub more_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub number: u32,
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub label: String,
    pub buttons: Vec<PageButton>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub prev_label: String,
    pub next_label: String,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetEntry {
    pub name: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetPanelView {
    pub heading: String,
    pub entries: Vec<FacetEntry>,
    /// Inline error; the listing itself stays usable.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapPanelView {
    pub visible: bool,
    pub marker_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceLink {
    pub name: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailView {
    Loading { id: ItemId },
    Loaded {
        id: ItemId,
        title: String,
        category: String,
        starts_at: Option<String>,
        description: String,
        place: Option<PlaceLink>,
    },
    Failed { id: ItemId, message: String },
}

/// Builds the full view model of a listing page.
pub fn render(state: &ListingState) -> ListingViewModel {
    let config = state.config();
    let labels = &config.labels;

    let (status, status_text) = match (state.status(), state.result()) {
        (ListingStatus::Idle, _) => (StatusView::Idle, None),
        (ListingStatus::Loading, _) => (StatusView::Loading, Some(labels.loading.clone())),
        (ListingStatus::Failed(_), _) => (StatusView::Failed, Some(labels.load_failed.clone())),
        (ListingStatus::Loaded, Some(page)) if page.is_empty() => {
            (StatusView::Empty, Some(labels.empty.clone()))
        }
        (ListingStatus::Loaded, _) => (StatusView::Loaded, None),
    };

    let cards = state
        .result()
        .map(|page| render_cards(page, config))
        .unwrap_or_default();

    let marker_count = if state.map_state().is_visible() {
        state.map_plan().markers.len()
    } else {
        0
    };

    ListingViewModel {
        kind: config.kind,
        status,
        status_text,
        search_text: state.search_draft().to_string(),
        cards,
        pagination: render_pagination(state),
        facets: render_facets(state),
        map: MapPanelView {
            visible: state.map_state().is_visible(),
            marker_count,
        },
        detail: render_detail(state),
    }
}

/// Cards for one result page, with placeholder and fallback text filled in.
pub fn render_cards(page: &PageResult, config: &ListingConfig) -> Vec<CardView> {
    let labels = &config.labels;
    page.items
        .iter()
        .map(|item| CardView {
            id: item.id,
            title: item.name.clone(),
            image_url: item
                .image_url
                .clone()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            category: item
                .category
                .as_ref()
                .map(|category| category.name.clone())
                .unwrap_or_else(|| labels.no_category.clone()),
            description: item
                .short_description
                .clone()
                .unwrap_or_else(|| labels.no_description.clone()),
            starts_at: item.starts_at.clone(),
            href: config.kind.detail_href(item.id),
            more_label: labels.more.clone(),
        })
        .collect()
}

fn render_pagination(state: &ListingState) -> PaginationView {
    let labels = &state.config().labels;
    let current = state.query().page();
    let total = state.total_pages();
    PaginationView {
        label: labels.page_label(current, total),
        buttons: page_window(current, total)
            .into_iter()
            .map(|number| PageButton {
                number,
                current: number == current,
            })
            .collect(),
        prev_enabled: prev_enabled(current),
        next_enabled: next_enabled(current, total),
        prev_label: labels.prev.clone(),
        next_label: labels.next.clone(),
        page_size: state.query().page_size(),
    }
}

fn render_facets(state: &ListingState) -> FacetPanelView {
    let labels = &state.config().labels;
    let (entries, error) = match state.facets() {
        FacetState::Loading => (Vec::new(), None),
        FacetState::Loaded(categories) => (
            categories
                .iter()
                .map(|category| FacetEntry {
                    name: category.name.clone(),
                    checked: state.query().is_selected(&category.name),
                })
                .collect(),
            None,
        ),
        FacetState::Failed(_) => (Vec::new(), Some(labels.facets_failed.clone())),
    };
    FacetPanelView {
        heading: labels.facets_heading.clone(),
        entries,
        error,
    }
}

fn render_detail(state: &ListingState) -> Option<DetailView> {
    let config = state.config();
    let labels = &config.labels;
    match state.detail() {
        DetailState::Closed => None,
        DetailState::Loading(id) => Some(DetailView::Loading { id: *id }),
        DetailState::Failed { id, .. } => Some(DetailView::Failed {
            id: *id,
            message: labels.load_failed.clone(),
        }),
        DetailState::Loaded(result) => {
            let item = &result.item;
            Some(DetailView::Loaded {
                id: item.id,
                title: item.name.clone(),
                category: item
                    .category
                    .as_ref()
                    .map(|category| category.name.clone())
                    .unwrap_or_else(|| labels.no_category.clone()),
                starts_at: item.starts_at.clone(),
                description: result
                    .description
                    .clone()
                    .or_else(|| item.short_description.clone())
                    .unwrap_or_else(|| labels.no_description.clone()),
                place: result.place.as_ref().map(|place| PlaceLink {
                    name: place.name.clone(),
                    href: ItemKind::Places.detail_href(place.id),
                }),
            })
        }
    }
}
