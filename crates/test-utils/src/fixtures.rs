//! Common fixtures for field-health tests.

use bytes::Bytes;
use field_common::{demo_farms, BoundingBox, Farm, FieldFeature, Geometry};
use imagery::ImageryResult;

/// Common bounding boxes as `[minLon, minLat, maxLon, maxLat]`.
pub mod bbox {
    /// Farm 1 demo field near Delhi
    pub const DELHI_FIELD: [f64; 4] = [77.1000, 28.6500, 77.1050, 28.6550];

    /// Unit square at the origin
    pub const UNIT: [f64; 4] = [0.0, 0.0, 1.0, 1.0];

    /// Corners out of order
    pub const INVERTED: [f64; 4] = [10.0, 10.0, 5.0, 5.0];
}

/// The closed ring `[[0,0],[1,0],[1,1],[0,1],[0,0]]` as a polygon.
pub fn unit_square() -> Geometry {
    Geometry::polygon(vec![vec![
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [0.0, 0.0],
    ]])
}

/// A demo farm by id.
///
/// Panics on an unknown id; fixtures are only asked for farms that exist.
pub fn demo_farm(id: &str) -> Farm {
    demo_farms()
        .into_iter()
        .find(|f| f.id == id)
        .unwrap_or_else(|| panic!("no demo farm '{}'", id))
}

/// A farm whose boundary has no points at all.
pub fn farm_without_points(id: &str) -> Farm {
    let mut farm = demo_farm("farm1");
    farm.id = id.to_string();
    farm.field = FieldFeature {
        geometry: None,
        ..farm.field
    };
    farm
}

/// Minimal PNG-signed payload standing in for a rendered NDVI image.
pub fn fake_png(tag: &str) -> Bytes {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(tag.as_bytes());
    Bytes::from(bytes)
}

/// An imagery result carrying `tag` in its payload.
pub fn fake_imagery(tag: &str, bounds: BoundingBox) -> ImageryResult {
    ImageryResult {
        content_type: "image/png".to_string(),
        bytes: fake_png(tag),
        bounds,
    }
}
