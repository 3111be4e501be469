/// Default number of items per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Image shown on a card whose item has no image of its own.
pub const PLACEHOLDER_IMAGE: &str = "/static/img/placeholder.jpg";

/// Which entity a listing page shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Places,
    Events,
}

impl ItemKind {
    /// Collection segment used by the listing endpoint and detail routes.
    pub fn collection(self) -> &'static str {
        match self {
            ItemKind::Places => "places",
            ItemKind::Events => "events",
        }
    }

    /// Collection segment of the category facet endpoint.
    pub fn category_collection(self) -> &'static str {
        match self {
            ItemKind::Places => "place_categories",
            ItemKind::Events => "event_categories",
        }
    }

    /// Navigation target of an item's detail page.
    pub fn detail_href(self, id: i64) -> String {
        format!("/{}/{}", self.collection(), id)
    }
}

/// When typed search text is committed to the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPolicy {
    /// Only an explicit submit (button or Enter) commits the text.
    #[default]
    OnSubmit,
    /// Every edit commits the text and refreshes the listing.
    Live,
}

/// User-facing strings of one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub facets_heading: String,
    pub facets_failed: String,
    pub loading: String,
    pub empty: String,
    pub load_failed: String,
    pub no_category: String,
    pub no_description: String,
    pub more: String,
    /// Word before the current page number ("Page").
    pub page_prefix: String,
    /// Word between current and total pages ("of").
    pub page_separator: String,
    pub prev: String,
    pub next: String,
}

impl Labels {
    pub fn english() -> Self {
        Self {
            facets_heading: "Categories".to_string(),
            facets_failed: "Could not load categories.".to_string(),
            loading: "Loading...".to_string(),
            empty: "Nothing found for your search.".to_string(),
            load_failed: "Failed to load, please try again.".to_string(),
            no_category: "Not specified".to_string(),
            no_description: "No description available".to_string(),
            more: "More".to_string(),
            page_prefix: "Page".to_string(),
            page_separator: "of".to_string(),
            prev: "Previous".to_string(),
            next: "Next".to_string(),
        }
    }

    pub fn serbian() -> Self {
        Self {
            facets_heading: "Kategorije".to_string(),
            facets_failed: "Greška pri učitavanju kategorija.".to_string(),
            loading: "Učitavanje...".to_string(),
            empty: "Ništa nije pronađeno za vašu pretragu.".to_string(),
            load_failed: "Došlo je do greške. Pokušajte ponovo.".to_string(),
            no_category: "Nedefinisano".to_string(),
            no_description: "Opis nije dostupan".to_string(),
            more: "Više".to_string(),
            page_prefix: "Stranica".to_string(),
            page_separator: "od".to_string(),
            prev: "Prethodna".to_string(),
            next: "Sledeća".to_string(),
        }
    }

    pub fn page_label(&self, current: u32, total: u32) -> String {
        format!(
            "{} {} {} {}",
            self.page_prefix, current, self.page_separator, total
        )
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

/// Parameters of one listing controller instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingConfig {
    pub kind: ItemKind,
    pub labels: Labels,
    pub default_page_size: u32,
    pub search_policy: SearchPolicy,
}

impl ListingConfig {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            labels: Labels::default(),
            default_page_size: DEFAULT_PAGE_SIZE,
            search_policy: SearchPolicy::default(),
        }
    }
}
