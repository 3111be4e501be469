use crate::map::MapPlan;
use crate::{ItemId, ItemKind, QueryState, RequestSeq};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchListing {
        seq: RequestSeq,
        kind: ItemKind,
        query: QueryState,
    },
    FetchCategories { kind: ItemKind },
    FetchDetail { kind: ItemKind, id: ItemId },
    /// Mirror the query into the page address without navigating.
    ReplaceUrl { query_string: String },
    InitMap(MapPlan),
    RebuildMap(MapPlan),
    InvalidateMapSize,
    HideMap,
    ShowDetailMap(MapPlan),
    /// The detail view closed; its map goes with it.
    HideDetailMap,
}
