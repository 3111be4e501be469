use std::collections::BTreeSet;

use url::form_urlencoded;

/// Search, filter and paging parameters that drive every listing fetch.
///
/// Only user messages mutate a `QueryState`; the constructors below exist for
/// initial load and for restoring a persisted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    search_text: Option<String>,
    selected_categories: BTreeSet<String>,
    page: u32,
    page_size: u32,
}

impl QueryState {
    pub fn new(page_size: u32) -> Self {
        Self {
            search_text: None,
            selected_categories: BTreeSet::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_search(mut self, text: &str) -> Self {
        self.search_text = normalize_search(text);
        self
    }

    pub fn with_categories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.selected_categories = names
            .into_iter()
            .filter_map(|name| normalize_category(name.as_ref()))
            .collect();
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn search_text(&self) -> Option<&str> {
        self.search_text.as_deref()
    }

    pub fn selected_categories(&self) -> &BTreeSet<String> {
        &self.selected_categories
    }

    pub fn is_selected(&self, category: &str) -> bool {
        self.selected_categories.contains(category)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub(crate) fn set_search_text(&mut self, text: &str) {
        self.search_text = normalize_search(text);
    }

    pub(crate) fn set_category(&mut self, name: &str, checked: bool) {
        let Some(name) = normalize_category(name) else {
            return;
        };
        if checked {
            self.selected_categories.insert(name);
        } else {
            self.selected_categories.remove(&name);
        }
    }

    pub(crate) fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub(crate) fn set_page_size(&mut self, page_size: u32) {
        self.page_size = page_size.max(1);
    }

    /// Encodes the query for the page address.
    ///
    /// Defaults are left out: no `search` or `categories` when unfiltered, no
    /// `page` on the first page and no `per_page` at the default size.
    pub fn to_query_string(&self, default_page_size: u32) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(search) = &self.search_text {
            out.append_pair("search", search);
        }
        if !self.selected_categories.is_empty() {
            out.append_pair("categories", &self.categories_joined());
        }
        if self.page != 1 {
            out.append_pair("page", &self.page.to_string());
        }
        if self.page_size != default_page_size {
            out.append_pair("per_page", &self.page_size.to_string());
        }
        out.finish()
    }

    /// Decodes a page address query, with or without the leading `?`.
    ///
    /// Unknown keys are ignored and malformed numbers fall back to the defaults.
    pub fn from_query_string(raw: &str, default_page_size: u32) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let mut query = Self::new(default_page_size);
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "search" => query.set_search_text(&value),
                "categories" => {
                    for name in value.split(',') {
                        query.set_category(name, true);
                    }
                }
                "page" => {
                    if let Ok(page) = value.trim().parse::<u32>() {
                        query.set_page(page);
                    }
                }
                "per_page" => {
                    if let Ok(size) = value.trim().parse::<u32>() {
                        if size > 0 {
                            query.set_page_size(size);
                        }
                    }
                }
                _ => {}
            }
        }
        query
    }

    /// Category names joined the way the backend expects them.
    pub fn categories_joined(&self) -> String {
        self.selected_categories
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn normalize_search(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn normalize_category(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
