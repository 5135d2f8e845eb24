//! Tests for loading the farm catalog.

use std::io::Write;

use field_common::{FarmCatalog, FieldError};

const CATALOG_YAML: &str = r#"
farms:
  - id: north-plot
    name: North Plot
    location: Nashik, Maharashtra
    center: { lat: 20.005, lon: 73.795 }
    field:
      type: Feature
      properties: { name: north-plot-field }
      geometry:
        type: Polygon
        coordinates:
          - [[73.79, 20.0], [73.80, 20.0], [73.80, 20.01], [73.79, 20.01], [73.79, 20.0]]
"#;

#[test]
fn test_catalog_from_yaml() {
    let catalog = FarmCatalog::from_yaml(CATALOG_YAML).unwrap();
    assert_eq!(catalog.farms.len(), 1);
    let farm = &catalog.farms[0];
    assert_eq!(farm.id, "north-plot");
    let bbox = farm.field.bounding_box().unwrap();
    assert_eq!(bbox.to_array(), [73.79, 20.0, 73.80, 20.01]);
}

#[test]
fn test_catalog_rejects_empty() {
    let result = FarmCatalog::from_yaml("farms: []");
    assert!(matches!(result, Err(FieldError::Configuration(_))));
}

#[test]
fn test_catalog_rejects_invalid_boundary() {
    let yaml = CATALOG_YAML.replace(", [73.79, 20.0]]", "]");
    let result = FarmCatalog::from_yaml(&yaml);
    assert!(matches!(result, Err(FieldError::Configuration(_))));
}

#[test]
fn test_missing_file_falls_back_to_demo_farms() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = FarmCatalog::load_from_file(dir.path().join("missing.yaml")).unwrap();
    assert_eq!(catalog, FarmCatalog::default());
    assert_eq!(catalog.farms[0].id, "farm1");
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CATALOG_YAML.as_bytes()).unwrap();
    let catalog = FarmCatalog::load_from_file(file.path()).unwrap();
    assert_eq!(catalog.farms[0].name, "North Plot");
}
