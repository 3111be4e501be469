use std::io::Write;

use directory_core::{
    CardView, DetailView, FacetPanelView, ItemKind, ListingViewModel, PaginationView, StatusView,
};
use directory_logging::directory_warn;

use super::map::MapSnapshot;

/// Output surface of the controller.
pub trait Renderer {
    fn render(&mut self, view: &ListingViewModel);
    fn render_map(&mut self, map: &MapSnapshot);
    fn hide_map(&mut self, container: &str);
}

/// Draws view models as plain text.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            directory_warn!("Failed to write to terminal: {}", err);
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &ListingViewModel) {
        let text = format_listing(view);
        self.emit(&text);
    }

    fn render_map(&mut self, map: &MapSnapshot) {
        let text = format_map(map);
        self.emit(&text);
    }

    fn hide_map(&mut self, container: &str) {
        self.emit(&format!("[{container} hidden]\n"));
    }
}

fn heading(kind: ItemKind) -> &'static str {
    match kind {
        ItemKind::Places => "PLACES",
        ItemKind::Events => "EVENTS",
    }
}

pub fn format_listing(view: &ListingViewModel) -> String {
    let mut out = String::new();

    if let Some(detail) = &view.detail {
        format_detail(&mut out, detail);
        return out;
    }

    out.push_str(&format!("== {} ==\n", heading(view.kind)));
    if !view.search_text.is_empty() {
        out.push_str(&format!("search: {}\n", view.search_text));
    }
    format_facets(&mut out, &view.facets);

    if let Some(text) = &view.status_text {
        out.push_str(&format!("  {text}\n"));
    }
    if matches!(view.status, StatusView::Loaded) {
        for card in &view.cards {
            format_card(&mut out, card);
        }
    }
    format_pagination(&mut out, &view.pagination);

    if view.map.visible {
        out.push_str(&format!("[map open: {} markers]\n", view.map.marker_count));
    }
    out
}

fn format_facets(out: &mut String, facets: &FacetPanelView) {
    if let Some(error) = &facets.error {
        out.push_str(&format!("{}: {}\n", facets.heading, error));
        return;
    }
    if facets.entries.is_empty() {
        return;
    }
    let entries: Vec<String> = facets
        .entries
        .iter()
        .map(|entry| {
            let mark = if entry.checked { 'x' } else { ' ' };
            format!("[{mark}] {}", entry.name)
        })
        .collect();
    out.push_str(&format!("{}: {}\n", facets.heading, entries.join("  ")));
}

fn format_card(out: &mut String, card: &CardView) {
    out.push_str(&format!("- #{} {} ({})\n", card.id, card.title, card.category));
    if let Some(starts_at) = &card.starts_at {
        out.push_str(&format!("    {starts_at}\n"));
    }
    out.push_str(&format!("    {}\n", card.description));
    out.push_str(&format!("    {} -> {}  [{}]\n", card.more_label, card.href, card.image_url));
}

fn format_pagination(out: &mut String, pagination: &PaginationView) {
    let buttons: Vec<String> = pagination
        .buttons
        .iter()
        .map(|button| {
            if button.current {
                format!("[{}]", button.number)
            } else {
                button.number.to_string()
            }
        })
        .collect();
    let prev = nav_label(format!("< {}", pagination.prev_label), pagination.prev_enabled);
    let next = nav_label(format!("{} >", pagination.next_label), pagination.next_enabled);
    out.push_str(&format!(
        "{}  {} {} {}  ({} per page)\n",
        pagination.label,
        prev,
        buttons.join(" "),
        next,
        pagination.page_size
    ));
}

/// Disabled navigation stays on screen in parentheses.
fn nav_label(label: String, enabled: bool) -> String {
    if enabled {
        label
    } else {
        format!("({label})")
    }
}

fn format_detail(out: &mut String, detail: &DetailView) {
    match detail {
        DetailView::Loading { id } => out.push_str(&format!("== #{id} ==\n  ...\n")),
        DetailView::Failed { id, message } => {
            out.push_str(&format!("== #{id} ==\n  {message}\n"));
        }
        DetailView::Loaded {
            id,
            title,
            category,
            starts_at,
            description,
            place,
        } => {
            out.push_str(&format!("== #{id} {title} ==\n"));
            out.push_str(&format!("  {category}\n"));
            if let Some(starts_at) = starts_at {
                out.push_str(&format!("  {starts_at}\n"));
            }
            out.push_str(&format!("  {description}\n"));
            if let Some(place) = place {
                out.push_str(&format!("  @ {} -> {}\n", place.name, place.href));
            }
        }
    }
}

pub fn format_map(map: &MapSnapshot) -> String {
    let mut out = format!(
        "[{}] centre {:.5},{:.5} zoom {:.2}\n",
        map.container, map.center.lat, map.center.lng, map.zoom
    );
    for marker in &map.markers {
        out.push_str(&format!(
            "  * {} ({:.5},{:.5}) -> {}\n",
            marker.title, marker.point.lat, marker.point.lng, marker.href
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use directory_core::{update, Item, ListingConfig, ListingState, Msg, PageResult};

    fn loaded(items: Vec<Item>, total_pages: u32) -> ListingViewModel {
        let (state, _) = update(
            ListingState::new(ListingConfig::new(ItemKind::Places)),
            Msg::Init {
                query_string: None,
            },
        );
        let (state, _) = update(
            state,
            Msg::ListingLoaded {
                seq: 1,
                result: Ok(PageResult {
                    items,
                    current_page: 1,
                    total_pages,
                    page_size: 10,
                    total_count: 2,
                }),
            },
        );
        state.view()
    }

    #[test]
    fn listing_prints_cards_and_page_label() {
        let view = loaded(
            vec![
                Item::new(1, "Caffe Bridge").with_category("Kafić"),
                Item::new(2, "Vinyl Bassic"),
            ],
            1,
        );

        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&view);
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains("#1 Caffe Bridge (Kafić)"), "{text}");
        assert!(text.contains("#2 Vinyl Bassic (Not specified)"), "{text}");
        assert!(text.contains("No description available"), "{text}");
        assert!(text.contains("Page 1 of 1"), "{text}");
        assert!(text.contains("[1]"), "{text}");
        assert!(text.contains("(< Previous)"), "{text}");
        assert!(text.contains("(Next >)"), "{text}");
    }

    #[test]
    fn enabled_navigation_is_not_bracketed() {
        let view = loaded(vec![Item::new(1, "Caffe Bridge")], 3);
        let text = format_listing(&view);
        assert!(text.contains("(< Previous)"), "{text}");
        assert!(text.contains(" Next >"), "{text}");
        assert!(!text.contains("(Next >)"), "{text}");
    }

    #[test]
    fn empty_listing_prints_empty_text_only() {
        let view = loaded(Vec::new(), 0);
        let text = format_listing(&view);
        assert!(text.contains("Nothing found for your search."), "{text}");
        assert!(!text.contains("- #"), "{text}");
    }

    #[test]
    fn map_snapshot_lists_markers() {
        let snapshot = MapSnapshot {
            container: "listing-map".into(),
            center: directory_core::map::GeoPoint::new(45.38, 20.39),
            zoom: 15.0,
            tile_layer: None,
            markers: vec![directory_core::map::MapMarker {
                item_id: 1,
                point: directory_core::map::GeoPoint::new(45.37934, 20.38927),
                title: "Caffe Bridge".into(),
                description: None,
                href: "/places/1".into(),
            }],
        };
        let text = format_map(&snapshot);
        assert!(text.starts_with("[listing-map] centre 45.38000,20.39000 zoom 15.00"));
        assert!(text.contains("* Caffe Bridge (45.37934,20.38927) -> /places/1"));
    }
}
