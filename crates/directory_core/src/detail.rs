use crate::map::{plan_map, MapPlan};
use crate::{Item, ItemId, ItemKind, LoadError};

/// Venue an event takes place at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRef {
    pub id: ItemId,
    pub name: String,
    pub position: Option<String>,
}

/// Everything fetched for one detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailResult {
    pub item: Item,
    /// Full description; the listing only carries the short one.
    pub description: Option<String>,
    pub place: Option<PlaceRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    Loading(ItemId),
    Loaded(DetailResult),
    Failed { id: ItemId, error: LoadError },
}

impl DetailState {
    pub fn requested_id(&self) -> Option<ItemId> {
        match self {
            DetailState::Closed => None,
            DetailState::Loading(id) => Some(*id),
            DetailState::Loaded(result) => Some(result.item.id),
            DetailState::Failed { id, .. } => Some(*id),
        }
    }
}

/// Map for a detail page: the event's venue, or the place itself.
///
/// `None` when there is no usable position.
pub fn detail_map_plan(result: &DetailResult, kind: ItemKind) -> Option<MapPlan> {
    let located = match (&result.place, kind) {
        (Some(place), _) => {
            Item::new(place.id, place.name.clone()).with_position(place.position.clone()?)
        }
        (None, ItemKind::Places) => result.item.clone(),
        (None, ItemKind::Events) => return None,
    };
    let plan = plan_map(std::slice::from_ref(&located), ItemKind::Places);
    if plan.markers.is_empty() {
        None
    } else {
        Some(plan)
    }
}
