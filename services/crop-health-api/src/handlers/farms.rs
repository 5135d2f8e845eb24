//! Farm catalog and selection handlers.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, Json};
use serde::Deserialize;

use field_common::Farm;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectFarmRequest {
    pub id: String,
}

/// GET /api/farms
pub async fn list_farms_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<Farm>> {
    Json(state.farms.read().await.farms().to_vec())
}

/// POST /api/farms
pub async fn add_farm_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(farm): Json<Farm>,
) -> ApiResult<(StatusCode, Json<Farm>)> {
    state.farms.write().await.add(farm.clone())?;
    Ok((StatusCode::CREATED, Json(farm)))
}

/// GET /api/farms/selected
pub async fn selected_farm_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Farm> {
    Json(state.farms.read().await.selected().clone())
}

/// PUT /api/farms/selected - select a farm and start its NDVI cycle
pub async fn select_farm_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<SelectFarmRequest>,
) -> ApiResult<Json<Farm>> {
    let farm = state.select_farm(&request.id).await?;
    tracing::info!(farm_id = %farm.id, "Farm selected");
    Ok(Json(farm))
}
