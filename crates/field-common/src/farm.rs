//! Farm definitions and the farm catalog.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox;
use crate::error::{FieldError, FieldResult};
use crate::geometry::{derive_bounding_box, Geometry};

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Properties attached to a field boundary feature.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A GeoJSON Feature holding a field boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFeature {
    #[serde(rename = "type", default = "feature_type")]
    pub type_: String,

    #[serde(default)]
    pub properties: FieldProperties,

    /// GeoJSON permits a null geometry.
    pub geometry: Option<Geometry>,
}

fn feature_type() -> String {
    "Feature".to_string()
}

impl FieldFeature {
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            type_: feature_type(),
            properties: FieldProperties {
                name: Some(name.into()),
            },
            geometry: Some(geometry),
        }
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        derive_bounding_box(self.geometry.as_ref())
    }
}

/// A farm the user can select.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub location: String,
    pub center: LatLng,
    pub field: FieldFeature,
}

impl Farm {
    pub fn validate(&self) -> FieldResult<()> {
        if self.id.trim().is_empty() {
            return Err(FieldError::Validation("farm id must not be empty".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(FieldError::Validation(format!(
                "farm '{}' must have a name",
                self.id
            )));
        }
        match &self.field.geometry {
            Some(geometry) => geometry.validate_polygon().map_err(|e| {
                FieldError::Validation(format!("farm '{}' field boundary: {}", self.id, e))
            }),
            None => Err(FieldError::Validation(format!(
                "farm '{}' has no field geometry",
                self.id
            ))),
        }
    }
}

/// Farm definitions loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmCatalog {
    pub farms: Vec<Farm>,
}

impl Default for FarmCatalog {
    fn default() -> Self {
        Self {
            farms: demo_farms(),
        }
    }
}

impl FarmCatalog {
    /// Load a catalog from a YAML file, falling back to the demo farms when
    /// the file does not exist.
    pub fn load_from_file(path: impl AsRef<Path>) -> FieldResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Farm catalog not found, using built-in demo farms"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            FieldError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let catalog = Self::from_yaml(&content)?;

        tracing::info!(
            count = catalog.farms.len(),
            path = %path.display(),
            "Loaded farm catalog"
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog.
    pub fn from_yaml(yaml: &str) -> FieldResult<Self> {
        let catalog: FarmCatalog = serde_yaml::from_str(yaml)?;
        if catalog.farms.is_empty() {
            return Err(FieldError::Configuration(
                "farm catalog must define at least one farm".to_string(),
            ));
        }
        for farm in &catalog.farms {
            farm.validate()
                .map_err(|e| FieldError::Configuration(e.to_string()))?;
        }
        Ok(catalog)
    }
}

fn rectangular_field(name: &str, [west, south, east, north]: [f64; 4]) -> FieldFeature {
    FieldFeature::new(
        name,
        Geometry::polygon(vec![vec![
            [west, south],
            [east, south],
            [east, north],
            [west, north],
            [west, south],
        ]]),
    )
}

/// The three demo farms every fresh installation starts with.
pub fn demo_farms() -> Vec<Farm> {
    vec![
        Farm {
            id: "farm1".to_string(),
            name: "Green Valley Farms".to_string(),
            location: "Delhi Test Field".to_string(),
            center: LatLng::new(28.6525, 77.1025),
            field: rectangular_field("demo-field-1", [77.1000, 28.6500, 77.1050, 28.6550]),
        },
        Farm {
            id: "farm2".to_string(),
            name: "Sunshine Acres".to_string(),
            location: "Solapur, Maharashtra".to_string(),
            center: LatLng::new(17.65, 75.85),
            field: rectangular_field("sunshine-field-1", [75.85, 17.65, 75.86, 17.66]),
        },
        Farm {
            id: "farm3".to_string(),
            name: "Mountain View Orchards".to_string(),
            location: "Kolhapur, Maharashtra".to_string(),
            center: LatLng::new(16.65, 74.25),
            field: rectangular_field("mountain-field-1", [74.25, 16.65, 74.26, 16.66]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_farms_valid() {
        let farms = demo_farms();
        assert_eq!(farms.len(), 3);
        for farm in &farms {
            farm.validate().unwrap();
        }
    }

    #[test]
    fn test_farm_without_geometry_rejected() {
        let mut farm = demo_farms().remove(0);
        farm.field.geometry = None;
        assert!(matches!(farm.validate(), Err(FieldError::Validation(_))));
    }
}
