use std::fmt;

pub type ItemId = i64;

/// Category attached to a listed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub name: String,
    pub id: Option<i64>,
    pub parent_id: Option<i64>,
}

/// One place or event as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub category: Option<CategoryRef>,
    pub short_description: Option<String>,
    pub image_url: Option<String>,
    /// Raw `"lat,lng"` string; parsed only when planning the map.
    pub position: Option<String>,
    /// Start time of an event, as sent by the backend.
    pub starts_at: Option<String>,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            category: None,
            short_description: None,
            image_url: None,
            position: None,
            starts_at: None,
        }
    }

    pub fn with_position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn with_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(CategoryRef {
            name: name.into(),
            id: None,
            parent_id: None,
        });
        self
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.short_description = Some(text.into());
        self
    }
}

/// Snapshot returned by one listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub items: Vec<Item>,
    pub current_page: u32,
    pub total_pages: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl PageResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Entry of the category facet list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    /// Transport failure, timeout or unreadable body.
    Network,
    /// The backend answered with a non-success status.
    Status(u16),
}

/// A failed backend load as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
}

impl LoadError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::Network,
            message: message.into(),
        }
    }

    pub fn status(code: u16, message: impl Into<String>) -> Self {
        Self {
            kind: LoadErrorKind::Status(code),
            message: message.into(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LoadErrorKind::Network => write!(f, "network error: {}", self.message),
            LoadErrorKind::Status(code) => write!(f, "http status {code}: {}", self.message),
        }
    }
}
