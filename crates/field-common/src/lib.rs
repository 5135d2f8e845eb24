//! Common types and utilities shared across the AgriMitra field-health crates.

pub mod bbox;
pub mod error;
pub mod farm;
pub mod geometry;
pub mod ndvi;
pub mod time;

pub use bbox::BoundingBox;
pub use error::{FieldError, FieldResult};
pub use farm::{demo_farms, Farm, FarmCatalog, FieldFeature, LatLng};
pub use geometry::{derive_bounding_box, extract_coordinate_pairs, Coordinates, Geometry, GeometryKind};
pub use ndvi::{NdviClass, Rgba, NDVI_CLASSES};
pub use time::DateWindow;
