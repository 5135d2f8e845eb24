//! Tests for coordinate extraction and bounding-box derivation.

use field_common::{
    demo_farms, derive_bounding_box, extract_coordinate_pairs, Coordinates, FieldError, Geometry,
    GeometryKind,
};

fn unit_square() -> Geometry {
    Geometry::polygon(vec![vec![
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 1.0],
        [0.0, 1.0],
        [0.0, 0.0],
    ]])
}

// ============================================================================
// extract_coordinate_pairs
// ============================================================================

#[test]
fn test_unit_square_yields_five_pairs() {
    let geometry = unit_square();
    let pairs = extract_coordinate_pairs(Some(&geometry));
    assert_eq!(pairs.len(), 5);
    assert_eq!(pairs[0], (0.0, 0.0));
    assert_eq!(pairs[2], (1.0, 1.0));
}

#[test]
fn test_missing_geometry_yields_nothing() {
    assert!(extract_coordinate_pairs(None).is_empty());
}

#[test]
fn test_empty_coordinates_yield_nothing() {
    let geometry = Geometry {
        kind: GeometryKind::Polygon,
        coordinates: Coordinates::Nested(vec![]),
    };
    assert!(extract_coordinate_pairs(Some(&geometry)).is_empty());

    let empty_ring = Geometry {
        kind: GeometryKind::Polygon,
        coordinates: Coordinates::Nested(vec![Coordinates::Nested(vec![])]),
    };
    assert!(extract_coordinate_pairs(Some(&empty_ring)).is_empty());
}

#[test]
fn test_multipolygon_pairs_flattened() {
    let json = r#"{
        "type": "MultiPolygon",
        "coordinates": [
            [[[0, 0], [1, 0], [1, 1], [0, 0]]],
            [[[5, 5], [6, 5], [6, 7], [5, 5]], [[5.2, 5.2], [5.4, 5.2], [5.4, 5.4], [5.2, 5.2]]]
        ]
    }"#;
    let geometry: Geometry = serde_json::from_str(json).unwrap();
    assert_eq!(geometry.kind, GeometryKind::MultiPolygon);
    assert_eq!(extract_coordinate_pairs(Some(&geometry)).len(), 12);
}

// ============================================================================
// derive_bounding_box
// ============================================================================

#[test]
fn test_unit_square_bbox() {
    let bbox = derive_bounding_box(Some(&unit_square())).unwrap();
    assert_eq!(bbox.to_array(), [0.0, 0.0, 1.0, 1.0]);
}

#[test]
fn test_empty_geometry_has_no_bbox() {
    assert!(derive_bounding_box(None).is_none());
    let geometry = Geometry {
        kind: GeometryKind::Polygon,
        coordinates: Coordinates::Nested(vec![]),
    };
    assert!(derive_bounding_box(Some(&geometry)).is_none());
}

#[test]
fn test_single_point_bbox() {
    let geometry = Geometry {
        kind: GeometryKind::Polygon,
        coordinates: Coordinates::Nested(vec![Coordinates::Nested(vec![
            Coordinates::Position(vec![12.5, -3.25]),
        ])]),
    };
    let bbox = derive_bounding_box(Some(&geometry)).unwrap();
    assert_eq!(bbox.to_array(), [12.5, -3.25, 12.5, -3.25]);
}

#[test]
fn test_bbox_encloses_every_vertex() {
    // Irregular rings spread over several hemispheres.
    let rings = vec![
        vec![[-70.5, -33.4], [-70.1, -33.9], [-69.8, -33.2], [-70.5, -33.4]],
        vec![[139.7, 35.6], [139.9, 35.7], [139.8, 35.5], [139.7, 35.6]],
        vec![[0.0, 51.5], [0.2, 51.6], [-0.1, 51.4], [0.0, 51.5]],
    ];
    for ring in rings {
        let geometry = Geometry::polygon(vec![ring.clone()]);
        let bbox = derive_bounding_box(Some(&geometry)).unwrap();
        assert!(bbox.min_lon <= bbox.max_lon);
        assert!(bbox.min_lat <= bbox.max_lat);
        for [lon, lat] in ring {
            assert!(bbox.contains_point(lon, lat), "({}, {}) outside {:?}", lon, lat, bbox);
        }
    }
}

#[test]
fn test_demo_farm_bbox() {
    let farm = demo_farms().into_iter().find(|f| f.id == "farm1").unwrap();
    let bbox = farm.field.bounding_box().unwrap();
    assert_eq!(bbox.to_array(), [77.1000, 28.6500, 77.1050, 28.6550]);
}

// ============================================================================
// Polygon validation
// ============================================================================

#[test]
fn test_validate_rejects_non_polygon() {
    let json = r#"{"type":"LineString","coordinates":[[0,0],[1,1]]}"#;
    let geometry: Geometry = serde_json::from_str(json).unwrap();
    assert!(matches!(geometry.validate_polygon(), Err(FieldError::Validation(_))));
}

#[test]
fn test_validate_rejects_open_ring() {
    let geometry = Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]]);
    assert!(matches!(geometry.validate_polygon(), Err(FieldError::Validation(_))));
}

#[test]
fn test_validate_rejects_flat_coordinates() {
    let json = r#"{"type":"Polygon","coordinates":[[0,0],[1,0],[1,1],[0,0]]}"#;
    let geometry: Geometry = serde_json::from_str(json).unwrap();
    assert!(geometry.validate_polygon().is_err());
}

#[test]
fn test_unknown_geometry_type_fails_to_parse() {
    let json = r#"{"type":"Circle","coordinates":[0,0]}"#;
    assert!(serde_json::from_str::<Geometry>(json).is_err());
}
