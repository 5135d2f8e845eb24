//! Direct NDVI imagery and legend handlers.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use field_common::{BoundingBox, FieldError, Geometry, NDVI_CLASSES};
use imagery::ImageUrl;

use crate::error::ApiResult;
use crate::state::AppState;

/// Body of `POST /api/ndvi`.
#[derive(Debug, Deserialize)]
pub struct NdviRequest {
    pub geometry: Geometry,
    pub bbox: Vec<f64>,
}

impl NdviRequest {
    /// Parse and check the body before any provider call.
    pub fn parse(body: &[u8]) -> Result<(Geometry, BoundingBox), FieldError> {
        let request: NdviRequest = serde_json::from_slice(body)?;
        request.geometry.validate_polygon()?;
        let bbox = BoundingBox::from_slice(&request.bbox)?;
        Ok((request.geometry, bbox))
    }
}

/// POST /api/ndvi - render NDVI imagery for an arbitrary polygon
pub async fn ndvi_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<ImageUrl>> {
    let (geometry, bbox) = NdviRequest::parse(&body)?;
    let image = state.imagery.fetch_imagery(&geometry, bbox).await?;
    Ok(Json(ImageUrl::from(&image)))
}

#[derive(Debug, Serialize)]
pub struct LegendEntry {
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub color: String,
}

/// GET /api/ndvi/legend
pub async fn legend_handler() -> Json<Vec<LegendEntry>> {
    Json(
        NDVI_CLASSES
            .iter()
            .map(|class| LegendEntry {
                label: class.label,
                min: class.min,
                max: class.max,
                color: class.color.to_hex(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_polygon() {
        let body = br#"{
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]},
            "bbox": [0, 0, 1, 1]
        }"#;
        let (_, bbox) = NdviRequest::parse(body).unwrap();
        assert_eq!(bbox, BoundingBox::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_parse_rejects_point() {
        let body = br#"{"geometry": {"type": "Point", "coordinates": [0, 0]}, "bbox": [0, 0, 1, 1]}"#;
        assert!(matches!(
            NdviRequest::parse(body),
            Err(FieldError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_short_bbox() {
        let body = br#"{
            "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,1],[0,0]]]},
            "bbox": [0, 0, 1]
        }"#;
        assert!(matches!(
            NdviRequest::parse(body),
            Err(FieldError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            NdviRequest::parse(b"{not json"),
            Err(FieldError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_legend_has_seven_classes() {
        let Json(legend) = legend_handler().await;
        assert_eq!(legend.len(), 7);
        assert_eq!(legend[0].color, "#333333");
        assert_eq!(legend[6].label, "Very healthy vegetation");
        assert_eq!(legend[6].min, Some(0.8));
        assert!(legend[6].max.is_none());
    }
}
