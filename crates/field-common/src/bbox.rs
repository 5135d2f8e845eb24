//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// A geographic bounding box in WGS84 degrees.
///
/// Serialized as `[minLon, minLat, maxLon, maxLat]`, the layout the imagery
/// provider and the web map both expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Smallest box enclosing every `(lon, lat)` pair, or `None` when there are none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        points.into_iter().fold(None, |acc, (lon, lat)| {
            Some(match acc {
                None => BoundingBox::new(lon, lat, lon, lat),
                Some(b) => BoundingBox::new(
                    b.min_lon.min(lon),
                    b.min_lat.min(lat),
                    b.max_lon.max(lon),
                    b.max_lat.max(lat),
                ),
            })
        })
    }

    /// Build a box from a caller-supplied array, rejecting malformed input.
    pub fn from_slice(values: &[f64]) -> Result<Self, FieldError> {
        let [min_lon, min_lat, max_lon, max_lat] = <[f64; 4]>::try_from(values).map_err(|_| {
            FieldError::Validation(format!(
                "bbox must have exactly 4 numbers [minLon, minLat, maxLon, maxLat], got {}",
                values.len()
            ))
        })?;
        let bbox = Self::new(min_lon, min_lat, max_lon, max_lat);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Check ordering and finiteness of the corners.
    pub fn validate(&self) -> Result<(), FieldError> {
        let corners = [self.min_lon, self.min_lat, self.max_lon, self.max_lat];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(FieldError::Validation(format!(
                "bbox contains non-finite values: {:?}",
                corners
            )));
        }
        if self.min_lon > self.max_lon || self.min_lat > self.max_lat {
            return Err(FieldError::Validation(format!(
                "bbox corners out of order: {:?}",
                corners
            )));
        }
        Ok(())
    }

    /// Width of the bounding box in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Height of the bounding box in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Center as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon && lon <= self.max_lon && lat >= self.min_lat && lat <= self.max_lat
    }

    /// Corner pair in the `[[south, west], [north, east]]` order web maps use.
    pub fn to_lat_lng_bounds(&self) -> [[f64; 2]; 2] {
        [[self.min_lat, self.min_lon], [self.max_lat, self.max_lon]]
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        BoundingBox::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        b.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(vec![(1.0, 5.0), (-2.0, 3.0), (4.0, -1.0)]).unwrap();
        assert_eq!(bbox, BoundingBox::new(-2.0, -1.0, 4.0, 5.0));
    }

    #[test]
    fn test_from_points_empty() {
        assert!(BoundingBox::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_serializes_as_array() {
        let bbox = BoundingBox::new(77.1, 28.65, 77.105, 28.655);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[77.1,28.65,77.105,28.655]");
        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bbox);
    }
}
