//! The map renderer contract and its in-memory implementation.

use serde::Serialize;
use tracing::{debug, info};

use field_common::{BoundingBox, FieldError, FieldFeature, FieldResult, LatLng};
use imagery::ImageryResult;

use crate::layers::{BoundaryLayer, ImageOverlay, Layer, LayerKind, PathStyle, SceneLayer, TileLayer};
use crate::viewport::{fit_bounds, Viewport};

/// Narrow interface over an interactive map bound to one container.
pub trait MapRenderer: Send {
    /// Bind to `container` with a single base tile layer. A map already bound
    /// anywhere is torn down first.
    fn mount(&mut self, container: &str, center: LatLng, zoom: u8) -> FieldResult<()>;

    /// Replace the overlay and boundary layers, then fit the view to `bounds`.
    fn set_overlay(
        &mut self,
        image: &ImageryResult,
        bounds: BoundingBox,
        boundary: &FieldFeature,
    ) -> FieldResult<()>;

    /// Release every layer and detach. Safe to call repeatedly.
    fn unmount(&mut self);

    fn is_mounted(&self) -> bool;

    /// Snapshot for the UI.
    fn scene(&self) -> MapScene;
}

/// Serializable state of a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub container: Option<String>,
    pub layers: Vec<SceneLayer>,
    pub viewport: Option<Viewport>,
}

impl MapScene {
    pub fn count(&self, kind: LayerKind) -> usize {
        self.layers.iter().filter(|l| l.layer.kind() == kind).count()
    }

    pub fn overlay(&self) -> Option<&ImageOverlay> {
        self.layers.iter().find_map(|l| match &l.layer {
            Layer::ImageOverlay(overlay) => Some(overlay),
            _ => None,
        })
    }

    pub fn boundary(&self) -> Option<&BoundaryLayer> {
        self.layers.iter().find_map(|l| match &l.layer {
            Layer::Boundary(boundary) => Some(boundary),
            _ => None,
        })
    }
}

/// In-memory map holding base tiles, the NDVI overlay and the field outline.
#[derive(Debug, Clone)]
pub struct LayeredMap {
    tile_layer: TileLayer,
    overlay_opacity: f64,
    width: u32,
    height: u32,
    padding: f64,
    container: Option<String>,
    layers: Vec<SceneLayer>,
    viewport: Option<Viewport>,
    next_layer_id: u64,
}

impl Default for LayeredMap {
    fn default() -> Self {
        Self::new(TileLayer::default())
    }
}

impl LayeredMap {
    pub fn new(tile_layer: TileLayer) -> Self {
        Self {
            tile_layer,
            overlay_opacity: 0.7,
            width: 512,
            height: 512,
            padding: 20.0,
            container: None,
            layers: Vec::new(),
            viewport: None,
            next_layer_id: 1,
        }
    }

    /// Pixel size of the view used when fitting bounds.
    pub fn with_view_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_overlay_opacity(mut self, opacity: f64) -> Self {
        self.overlay_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    fn add_layer(&mut self, layer: Layer) -> u64 {
        let id = self.next_layer_id;
        self.next_layer_id += 1;
        self.layers.push(SceneLayer { id, layer });
        id
    }

    fn remove_layers(&mut self, kind: LayerKind) -> usize {
        let before = self.layers.len();
        self.layers.retain(|l| l.layer.kind() != kind);
        before - self.layers.len()
    }
}

impl MapRenderer for LayeredMap {
    fn mount(&mut self, container: &str, center: LatLng, zoom: u8) -> FieldResult<()> {
        if container.trim().is_empty() {
            return Err(FieldError::Validation(
                "map container id must not be empty".to_string(),
            ));
        }
        let (min_zoom, max_zoom) = (self.tile_layer.min_zoom, self.tile_layer.max_zoom);
        if min_zoom > max_zoom {
            return Err(FieldError::Validation(format!(
                "tile layer zoom range {}..={} is empty",
                min_zoom, max_zoom
            )));
        }
        if self.is_mounted() {
            debug!(previous = ?self.container, "Map already mounted, tearing down first");
            self.unmount();
        }

        let zoom = zoom.clamp(min_zoom, max_zoom);
        self.container = Some(container.to_string());
        self.viewport = Some(Viewport::centered(center, zoom));
        let tile_layer = self.tile_layer.clone();
        self.add_layer(Layer::Tile(tile_layer));

        info!(container = %container, zoom = zoom, "Map mounted");
        Ok(())
    }

    fn set_overlay(
        &mut self,
        image: &ImageryResult,
        bounds: BoundingBox,
        boundary: &FieldFeature,
    ) -> FieldResult<()> {
        let Some(container) = self.container.clone() else {
            return Err(FieldError::Render(
                "cannot add overlay: map is not mounted".to_string(),
            ));
        };
        bounds.validate()?;

        let removed =
            self.remove_layers(LayerKind::ImageOverlay) + self.remove_layers(LayerKind::Boundary);

        let overlay_id = self.add_layer(Layer::ImageOverlay(ImageOverlay {
            image_url: image.data_uri(),
            bounds,
            lat_lng_bounds: bounds.to_lat_lng_bounds(),
            opacity: self.overlay_opacity,
        }));
        self.add_layer(Layer::Boundary(BoundaryLayer {
            feature: boundary.clone(),
            style: PathStyle::FIELD_BOUNDARY,
        }));

        let viewport = fit_bounds(
            &bounds,
            self.width,
            self.height,
            self.padding,
            self.tile_layer.min_zoom,
            self.tile_layer.max_zoom,
        );
        debug!(
            container = %container,
            overlay_id = overlay_id,
            removed = removed,
            zoom = viewport.zoom,
            "Overlay replaced"
        );
        self.viewport = Some(viewport);
        Ok(())
    }

    fn unmount(&mut self) {
        if let Some(container) = self.container.take() {
            info!(container = %container, layers = self.layers.len(), "Map unmounted");
        }
        self.layers.clear();
        self.viewport = None;
    }

    fn is_mounted(&self) -> bool {
        self.container.is_some()
    }

    fn scene(&self) -> MapScene {
        MapScene {
            container: self.container.clone(),
            layers: self.layers.clone(),
            viewport: self.viewport.clone(),
        }
    }
}
