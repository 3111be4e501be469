//! Directory core: pure listing state machine and view-model helpers.
mod config;
mod detail;
mod effect;
mod item;
pub mod map;
mod msg;
pub mod pagination;
mod query;
mod state;
mod update;
mod view_model;

pub use config::{
    ItemKind, Labels, ListingConfig, SearchPolicy, DEFAULT_PAGE_SIZE, PLACEHOLDER_IMAGE,
};
pub use detail::{detail_map_plan, DetailResult, DetailState, PlaceRef};
pub use effect::Effect;
pub use item::{Category, CategoryRef, Item, ItemId, LoadError, LoadErrorKind, PageResult};
pub use msg::Msg;
pub use query::QueryState;
pub use state::{FacetState, ListingState, ListingStatus, MapAction, MapState, RequestSeq};
pub use update::update;
pub use view_model::{
    render, render_cards, CardView, DetailView, FacetEntry, FacetPanelView, ListingViewModel,
    MapPanelView, PageButton, PaginationView, PlaceLink, StatusView,
};
