//! Map session management for field-health maps.
//!
//! A [`LayeredMap`] is the server-side model of one interactive map: a base
//! tile layer, at most one NDVI image overlay and at most one field boundary.
//! The web UI renders its [`MapScene`] snapshot with its map library; nothing
//! outside this crate touches individual layers.

pub mod layers;
pub mod renderer;
pub mod viewport;

pub use layers::{BoundaryLayer, ImageOverlay, Layer, LayerKind, PathStyle, SceneLayer, TileLayer};
pub use renderer::{LayeredMap, MapRenderer, MapScene};
pub use viewport::{fit_bounds, Viewport};
