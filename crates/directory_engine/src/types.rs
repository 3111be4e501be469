use std::fmt;

use serde::Deserialize;

pub type RequestSeq = u64;

/// Backend collection a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Places,
    Events,
}

impl Collection {
    pub fn segment(self) -> &'static str {
        match self {
            Collection::Places => "places",
            Collection::Events => "events",
        }
    }

    pub fn category_segment(self) -> &'static str {
        match self {
            Collection::Places => "place_categories",
            Collection::Events => "event_categories",
        }
    }
}

/// Parameters of one listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub collection: Collection,
    pub page: u32,
    pub per_page: u32,
    /// `None` means no search filter; the parameter is then left out entirely.
    pub search: Option<String>,
    /// Empty means no category filter; the parameter is then left out entirely.
    pub categories: Vec<String>,
}

/// Listing response body. Accepts both the `places` and the `events` shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingPage {
    #[serde(alias = "places", alias = "events")]
    pub items: Vec<WireItem>,
    #[serde(default, alias = "total_places", alias = "total_events")]
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WireItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub category: Option<WireCategory>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, alias = "datetime")]
    pub starts_at: Option<String>,
    #[serde(default)]
    pub place_id: Option<i64>,
}

/// Item category: places send `{ name }`, events send `{ category_name, .. }`,
/// and older payloads send a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireCategory {
    Name(String),
    Full {
        #[serde(alias = "category_name")]
        name: String,
        #[serde(default, alias = "category_id")]
        id: Option<i64>,
        #[serde(default, alias = "category_parent_id")]
        parent_id: Option<i64>,
    },
}

/// Facet list entry; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryEntry {
    pub name: String,
}

/// Detail page payload: the item plus, for events, the venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPayload {
    pub item: WireItem,
    pub place: Option<WireItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ListingCompleted {
        seq: RequestSeq,
        result: Result<ListingPage, FetchError>,
    },
    CategoriesCompleted {
        collection: Collection,
        result: Result<Vec<CategoryEntry>, FetchError>,
    },
    DetailCompleted {
        collection: Collection,
        id: i64,
        result: Result<DetailPayload, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Body was not the expected JSON.
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
