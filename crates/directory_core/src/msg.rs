#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Page loaded; carries the address query to restore, if any.
    Init { query_string: Option<String> },
    /// User edited the search box.
    SearchInputChanged(String),
    /// User pressed the search button or Enter.
    SearchSubmitted,
    /// User ticked or unticked a category checkbox.
    CategoryToggled { name: String, checked: bool },
    /// User clicked a numbered page button.
    PageSelected(u32),
    PrevPage,
    NextPage,
    /// User picked a page size.
    PageSizeSelected(u32),
    /// Reload the listing for the unchanged query.
    RefreshRequested,
    /// Backend answered a listing fetch.
    ListingLoaded {
        seq: crate::RequestSeq,
        result: Result<crate::PageResult, crate::LoadError>,
    },
    /// Backend answered the category facet fetch.
    CategoriesLoaded(Result<Vec<crate::Category>, crate::LoadError>),
    /// User clicked the map button.
    MapToggled,
    /// User closed the map overlay.
    MapClosed,
    /// User opened an item's detail page.
    DetailRequested(crate::ItemId),
    DetailClosed,
    /// Backend answered a detail fetch.
    DetailLoaded {
        id: crate::ItemId,
        result: Result<crate::DetailResult, crate::LoadError>,
    },
    /// Fallback for unmapped input.
    NoOp,
}
