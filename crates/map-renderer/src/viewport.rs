//! Map viewport and fit-to-bounds computation.

use std::f64::consts::PI;

use serde::Serialize;

use field_common::{BoundingBox, LatLng};

/// Web Mercator tile size in pixels.
const TILE_SIZE: f64 = 256.0;

/// Latitude limit of the Web Mercator projection.
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

/// What the map currently shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    /// Set once the view has been fitted to an overlay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

impl Viewport {
    pub fn centered(center: LatLng, zoom: u8) -> Self {
        Self {
            center,
            zoom,
            bounds: None,
        }
    }
}

/// Project a position to global pixel coordinates at `zoom` (spherical Mercator).
pub fn project(lat: f64, lon: f64, zoom: f64) -> (f64, f64) {
    let scale = TILE_SIZE * 2_f64.powf(zoom);
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (lon + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

/// Pixel extent of `bounds` at `zoom`.
pub fn projected_size(bounds: &BoundingBox, zoom: f64) -> (f64, f64) {
    let (west, north) = project(bounds.max_lat, bounds.min_lon, zoom);
    let (east, south) = project(bounds.min_lat, bounds.max_lon, zoom);
    ((east - west).abs(), (south - north).abs())
}

/// Center on `bounds` at the deepest zoom where they fit inside a
/// `width`×`height` pixel view, keeping `padding` pixels free on every side.
pub fn fit_bounds(
    bounds: &BoundingBox,
    width: u32,
    height: u32,
    padding: f64,
    min_zoom: u8,
    max_zoom: u8,
) -> Viewport {
    let avail_w = (width as f64 - 2.0 * padding).max(1.0);
    let avail_h = (height as f64 - 2.0 * padding).max(1.0);

    let mut best = min_zoom;
    for zoom in min_zoom..=max_zoom {
        let (w, h) = projected_size(bounds, zoom as f64);
        if w <= avail_w && h <= avail_h {
            best = zoom;
        } else {
            break;
        }
    }

    let (lat, lon) = bounds.center();
    Viewport {
        center: LatLng::new(lat, lon),
        zoom: best,
        bounds: Some(*bounds),
    }
}
