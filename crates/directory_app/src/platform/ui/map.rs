//! Headless map provider: keeps the camera and marker list a real tile map
//! would show, so the terminal view can print them.
use std::cell::Cell;
use std::f64::consts::PI;
use std::rc::Rc;

use directory_core::map::{GeoBounds, GeoPoint, MapInstance, MapMarker, MapProvider};
use directory_logging::{directory_debug, directory_trace};

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 18.0;
/// Fitted zooms are floored to this step.
pub const ZOOM_SNAP: f64 = 0.25;
const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ViewSize {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// What a map instance currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct MapSnapshot {
    pub container: String,
    pub center: GeoPoint,
    pub zoom: f64,
    pub tile_layer: Option<String>,
    pub markers: Vec<MapMarker>,
}

pub struct TerminalMap {
    snapshot: MapSnapshot,
    size: ViewSize,
    layouts: u32,
    live: Rc<Cell<usize>>,
}

impl TerminalMap {
    pub fn snapshot(&self) -> &MapSnapshot {
        &self.snapshot
    }

    /// Number of layout passes since creation.
    #[cfg(test)]
    pub fn layouts(&self) -> u32 {
        self.layouts
    }
}

impl MapInstance for TerminalMap {
    fn add_tile_layer(&mut self, url_template: &str, _attribution: &str) {
        self.snapshot.tile_layer = Some(url_template.to_string());
    }

    fn add_marker(&mut self, marker: &MapMarker) {
        directory_trace!(
            "marker {} at {},{}",
            marker.item_id,
            marker.point.lat,
            marker.point.lng
        );
        self.snapshot.markers.push(marker.clone());
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32) {
        self.snapshot.center = bounds.center();
        self.snapshot.zoom = fit_zoom(bounds, padding_px, self.size);
    }

    fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.snapshot.center = center;
        self.snapshot.zoom = clamp_zoom(zoom);
    }

    fn zoom(&self) -> f64 {
        self.snapshot.zoom
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.snapshot.zoom = clamp_zoom(zoom);
    }

    fn invalidate_size(&mut self) {
        self.layouts += 1;
    }

    fn remove(self) {
        self.live.set(self.live.get().saturating_sub(1));
        directory_debug!("map on {} removed", self.snapshot.container);
    }
}

#[derive(Default)]
pub struct TerminalMapProvider {
    size: ViewSize,
    live: Rc<Cell<usize>>,
}

impl TerminalMapProvider {
    pub fn new(size: ViewSize) -> Self {
        Self {
            size,
            live: Rc::new(Cell::new(0)),
        }
    }

    /// Instances created and not yet removed.
    #[cfg(test)]
    pub fn live_instances(&self) -> usize {
        self.live.get()
    }
}

impl MapProvider for TerminalMapProvider {
    type Instance = TerminalMap;

    fn create(&mut self, container: &str, center: GeoPoint, zoom: f64) -> TerminalMap {
        self.live.set(self.live.get() + 1);
        directory_debug!("map created on {}", container);
        TerminalMap {
            snapshot: MapSnapshot {
                container: container.to_string(),
                center,
                zoom: clamp_zoom(zoom),
                tile_layer: None,
                markers: Vec::new(),
            },
            size: self.size,
            layouts: 0,
            live: Rc::clone(&self.live),
        }
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Web Mercator x/y of a point as a fraction of the world square.
fn project(point: GeoPoint) -> (f64, f64) {
    let x = (point.lng + 180.0) / 360.0;
    let lat = point.lat.to_radians();
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;
    (x, y)
}

/// Largest snapped zoom at which `bounds` fits the view minus padding.
pub fn fit_zoom(bounds: GeoBounds, padding_px: u32, size: ViewSize) -> f64 {
    let (x1, y1) = project(bounds.south_west);
    let (x2, y2) = project(bounds.north_east);
    let span_x = (x2 - x1).abs();
    let span_y = (y2 - y1).abs();

    let pad = f64::from(padding_px) * 2.0;
    let avail_w = (f64::from(size.width) - pad).max(1.0);
    let avail_h = (f64::from(size.height) - pad).max(1.0);

    let scale_x = if span_x > 0.0 {
        avail_w / (TILE_SIZE * span_x)
    } else {
        f64::INFINITY
    };
    let scale_y = if span_y > 0.0 {
        avail_h / (TILE_SIZE * span_y)
    } else {
        f64::INFINITY
    };
    let scale = scale_x.min(scale_y);
    if !scale.is_finite() {
        return MAX_ZOOM;
    }

    let zoom = (scale.log2() / ZOOM_SNAP).floor() * ZOOM_SNAP;
    clamp_zoom(zoom)
}
