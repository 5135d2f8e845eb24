//! GeoJSON geometry handling for field boundaries.
//!
//! Coordinates are kept as an arbitrarily nested tree so the same extraction
//! code serves Polygon, MultiPolygon and every other GeoJSON geometry type.

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::FieldError;

/// GeoJSON geometry type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
    MultiPoint,
    LineString,
    MultiLineString,
    Polygon,
    MultiPolygon,
}

/// A nested GeoJSON coordinate array.
///
/// A leaf is a position (`[lon, lat]` or `[lon, lat, alt]`); anything else is
/// a list of deeper coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinates {
    Position(Vec<f64>),
    Nested(Vec<Coordinates>),
}

impl Coordinates {
    /// Collect every `(lon, lat)` pair at the leaves, depth-first in document order.
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        let mut out = Vec::new();
        self.collect_pairs(&mut out);
        out
    }

    fn collect_pairs(&self, out: &mut Vec<(f64, f64)>) {
        match self {
            Coordinates::Position(values) => {
                if let [lon, lat, ..] = values.as_slice() {
                    out.push((*lon, *lat));
                }
            }
            Coordinates::Nested(children) => {
                for child in children {
                    child.collect_pairs(out);
                }
            }
        }
    }

    /// Read an untyped coordinate tree. Arrays of numbers become positions,
    /// arrays of arrays recurse; anything else contributes nothing.
    pub fn from_value(value: &serde_json::Value) -> Self {
        let Some(items) = value.as_array() else {
            return Coordinates::Nested(Vec::new());
        };
        if !items.is_empty() && items.iter().all(|v| v.is_number()) {
            return Coordinates::Position(items.iter().filter_map(|v| v.as_f64()).collect());
        }
        Coordinates::Nested(
            items
                .iter()
                .filter(|v| v.is_array())
                .map(Coordinates::from_value)
                .collect(),
        )
    }

    /// Build a single-polygon coordinate tree from rings of `[lon, lat]`.
    pub fn from_rings(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Coordinates::Nested(
            rings
                .into_iter()
                .map(|ring| {
                    Coordinates::Nested(
                        ring.into_iter()
                            .map(|p| Coordinates::Position(p.to_vec()))
                            .collect(),
                    )
                })
                .collect(),
        )
    }
}

/// A GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: Coordinates,
}

impl Geometry {
    /// Create a polygon geometry from linear rings (first ring is the exterior).
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Self {
            kind: GeometryKind::Polygon,
            coordinates: Coordinates::from_rings(rings),
        }
    }

    /// Check that this is a well-formed Polygon with a closed exterior ring.
    pub fn validate_polygon(&self) -> Result<(), FieldError> {
        if self.kind != GeometryKind::Polygon {
            return Err(FieldError::Validation(format!(
                "geometry must be a Polygon, got {:?}",
                self.kind
            )));
        }

        let Coordinates::Nested(rings) = &self.coordinates else {
            return Err(FieldError::Validation(
                "polygon coordinates must be an array of rings".to_string(),
            ));
        };

        let Some(exterior) = rings.first() else {
            return Err(FieldError::Validation("polygon has no rings".to_string()));
        };

        for (idx, ring) in rings.iter().enumerate() {
            let Coordinates::Nested(positions) = ring else {
                return Err(FieldError::Validation(format!(
                    "ring {} must be an array of positions",
                    idx
                )));
            };
            for position in positions {
                match position {
                    Coordinates::Position(values) if values.len() >= 2 => {}
                    _ => {
                        return Err(FieldError::Validation(format!(
                            "ring {} contains a malformed position",
                            idx
                        )))
                    }
                }
            }
        }

        let exterior = exterior.pairs();
        if exterior.len() < 4 {
            return Err(FieldError::Validation(format!(
                "exterior ring needs at least 4 positions, got {}",
                exterior.len()
            )));
        }
        if exterior.first() != exterior.last() {
            return Err(FieldError::Validation(
                "exterior ring is not closed".to_string(),
            ));
        }
        Ok(())
    }
}

/// Flatten a geometry into its `(lon, lat)` pairs.
///
/// Missing geometry yields an empty list; this never fails.
pub fn extract_coordinate_pairs(geometry: Option<&Geometry>) -> Vec<(f64, f64)> {
    geometry.map(|g| g.coordinates.pairs()).unwrap_or_default()
}

/// Enclosing bounding box of a geometry, or `None` when it has no points.
pub fn derive_bounding_box(geometry: Option<&Geometry>) -> Option<BoundingBox> {
    BoundingBox::from_points(extract_coordinate_pairs(geometry))
}
