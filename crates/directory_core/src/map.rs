//! Map planning and the capability surface of a map provider.
//!
//! [`plan_map`] turns a result set into markers plus a viewport decision.
//! [`MapSync`] applies a plan to any [`MapProvider`], always tearing down the
//! previous instance before creating the next one on the same container.
use std::fmt;

use crate::{Item, ItemId, ItemKind};

/// City centre used when there is nothing to show.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 45.38036,
    lng: 20.39056,
};
/// Zoom a fresh map instance is created with, before the plan's viewport is applied.
pub const INITIAL_ZOOM: f64 = 15.0;
/// Wide zoom for an empty marker set.
pub const DEFAULT_ZOOM: f64 = 13.0;
/// Close zoom for a single marker (or coincident markers).
pub const CLOSE_ZOOM: f64 = 16.0;
pub const FIT_PADDING_PX: u32 = 50;
/// Zoom levels removed after fitting, so edge markers are not glued to the frame.
pub const FIT_ZOOM_OUT: f64 = 1.0;

pub const TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionError {
    Missing,
    Malformed(String),
    OutOfRange(String),
}

impl fmt::Display for PositionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionError::Missing => write!(f, "no position"),
            PositionError::Malformed(raw) => write!(f, "malformed position {raw:?}"),
            PositionError::OutOfRange(raw) => write!(f, "position out of range {raw:?}"),
        }
    }
}

/// Parses a `"lat,lng"` string. Whitespace around either number is allowed.
pub fn parse_position(raw: &str) -> Result<GeoPoint, PositionError> {
    let mut parts = raw.split(',');
    let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PositionError::Malformed(raw.to_string()));
    };
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| PositionError::Malformed(raw.to_string()))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|_| PositionError::Malformed(raw.to_string()))?;
    if !lat.is_finite() || !lng.is_finite() {
        return Err(PositionError::Malformed(raw.to_string()));
    }
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(PositionError::OutOfRange(raw.to_string()));
    }
    Ok(GeoPoint { lat, lng })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub south_west: GeoPoint,
    pub north_east: GeoPoint,
}

impl GeoBounds {
    /// Smallest box holding every point; `None` for an empty input.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = GeoPoint>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self {
            south_west: first,
            north_east: first,
        };
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: GeoPoint) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: (self.south_west.lat + self.north_east.lat) / 2.0,
            lng: (self.south_west.lng + self.north_east.lng) / 2.0,
        }
    }

    /// True when the box has zero area in both directions.
    pub fn is_point(&self) -> bool {
        self.south_west == self.north_east
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub item_id: ItemId,
    pub point: GeoPoint,
    pub title: String,
    pub description: Option<String>,
    pub href: String,
}

/// How the map view is positioned once markers are placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Center { center: GeoPoint, zoom: f64 },
    Fit {
        bounds: GeoBounds,
        padding_px: u32,
        zoom_out: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedMarker {
    pub item_id: ItemId,
    pub reason: PositionError,
}

/// Everything a provider needs to draw one result set.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPlan {
    pub markers: Vec<MapMarker>,
    pub viewport: Viewport,
    /// Items left off the map because their position could not be used.
    pub skipped: Vec<SkippedMarker>,
}

impl MapPlan {
    /// Plan for an empty result set.
    pub fn empty() -> Self {
        Self {
            markers: Vec::new(),
            viewport: Viewport::Center {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
            skipped: Vec::new(),
        }
    }
}

/// Builds markers for every item with a usable position and picks the viewport.
pub fn plan_map(items: &[Item], kind: ItemKind) -> MapPlan {
    let mut markers = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for item in items {
        let parsed = match item.position.as_deref() {
            Some(raw) => parse_position(raw),
            None => Err(PositionError::Missing),
        };
        match parsed {
            Ok(point) => markers.push(MapMarker {
                item_id: item.id,
                point,
                title: item.name.clone(),
                description: item.short_description.clone(),
                href: kind.detail_href(item.id),
            }),
            Err(reason) => skipped.push(SkippedMarker {
                item_id: item.id,
                reason,
            }),
        }
    }

    let viewport = match GeoBounds::from_points(markers.iter().map(|m| m.point)) {
        None => Viewport::Center {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        },
        Some(bounds) if bounds.is_point() => Viewport::Center {
            center: bounds.south_west,
            zoom: CLOSE_ZOOM,
        },
        Some(bounds) => Viewport::Fit {
            bounds,
            padding_px: FIT_PADDING_PX,
            zoom_out: FIT_ZOOM_OUT,
        },
    };

    MapPlan {
        markers,
        viewport,
        skipped,
    }
}

/// One live map on a container.
pub trait MapInstance {
    fn add_tile_layer(&mut self, url_template: &str, attribution: &str);
    fn add_marker(&mut self, marker: &MapMarker);
    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32);
    fn set_view(&mut self, center: GeoPoint, zoom: f64);
    fn zoom(&self) -> f64;
    fn set_zoom(&mut self, zoom: f64);
    fn invalidate_size(&mut self);
    /// Releases the instance and detaches it from its container.
    fn remove(self);
}

/// Factory for map instances.
pub trait MapProvider {
    type Instance: MapInstance;

    fn create(&mut self, container: &str, center: GeoPoint, zoom: f64) -> Self::Instance;
}

/// Owns at most one map instance for a container and rebuilds it from plans.
pub struct MapSync<P: MapProvider> {
    provider: P,
    container: String,
    instance: Option<P::Instance>,
}

impl<P: MapProvider> MapSync<P> {
    pub fn new(provider: P, container: impl Into<String>) -> Self {
        Self {
            provider,
            container: container.into(),
            instance: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.instance.is_some()
    }

    pub fn instance(&self) -> Option<&P::Instance> {
        self.instance.as_ref()
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Replaces the current instance (if any) with a fresh one drawn from `plan`.
    pub fn rebuild(&mut self, plan: &MapPlan) {
        self.teardown();

        let mut map = self
            .provider
            .create(&self.container, DEFAULT_CENTER, INITIAL_ZOOM);
        map.add_tile_layer(TILE_URL_TEMPLATE, TILE_ATTRIBUTION);
        map.invalidate_size();

        for marker in &plan.markers {
            map.add_marker(marker);
        }

        match plan.viewport {
            Viewport::Center { center, zoom } => map.set_view(center, zoom),
            Viewport::Fit {
                bounds,
                padding_px,
                zoom_out,
            } => {
                map.fit_bounds(bounds, padding_px);
                let fitted = map.zoom();
                map.set_zoom(fitted - zoom_out);
            }
        }

        self.instance = Some(map);
    }

    /// Re-lays out the existing instance after its container was shown or resized.
    pub fn invalidate(&mut self) {
        if let Some(map) = self.instance.as_mut() {
            map.invalidate_size();
        }
    }

    pub fn teardown(&mut self) {
        if let Some(old) = self.instance.take() {
            old.remove();
        }
    }
}
