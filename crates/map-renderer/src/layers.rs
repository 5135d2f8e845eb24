//! Layer definitions.

use serde::Serialize;

use field_common::{BoundingBox, FieldFeature};

/// Raster basemap tiles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for TileLayer {
    /// CARTO light basemap over OpenStreetMap data.
    fn default() -> Self {
        Self {
            url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png"
                .to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> \
                          contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>"
                .to_string(),
            min_zoom: 0,
            max_zoom: 19,
        }
    }
}

/// A georeferenced image drawn over the basemap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOverlay {
    /// `data:` URI of the rendered image
    pub image_url: String,
    pub bounds: BoundingBox,
    /// `[[south, west], [north, east]]`
    pub lat_lng_bounds: [[f64; 2]; 2],
    pub opacity: f64,
}

/// Stroke and fill of a vector layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub fill_opacity: f64,
}

impl PathStyle {
    /// Field outline drawn over the NDVI overlay.
    pub const FIELD_BOUNDARY: PathStyle = PathStyle {
        color: "#00A3FF",
        weight: 2.0,
        opacity: 0.9,
        fill_opacity: 0.1,
    };
}

/// The field polygon as a styled vector layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryLayer {
    pub feature: FieldFeature,
    pub style: PathStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Tile,
    ImageOverlay,
    Boundary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    Tile(TileLayer),
    ImageOverlay(ImageOverlay),
    Boundary(BoundaryLayer),
}

impl Layer {
    pub fn kind(&self) -> LayerKind {
        match self {
            Layer::Tile(_) => LayerKind::Tile,
            Layer::ImageOverlay(_) => LayerKind::ImageOverlay,
            Layer::Boundary(_) => LayerKind::Boundary,
        }
    }
}

/// A layer as it sits in a mounted map, in draw order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneLayer {
    /// Unique within one mount; never reused after removal
    pub id: u64,
    #[serde(flatten)]
    pub layer: Layer,
}
