//! Crop-health state handlers.

use std::sync::Arc;

use axum::{extract::Extension, Json};

use crate::orchestrator::CropHealthSnapshot;
use crate::state::AppState;

/// GET /api/crop-health - phase and map scene of the selected farm
pub async fn crop_health_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<CropHealthSnapshot> {
    Json(state.orchestrator.snapshot().await)
}

/// POST /api/crop-health/refresh - re-run the cycle for the selected farm
pub async fn refresh_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<CropHealthSnapshot> {
    let pending = state.orchestrator.refresh().await;
    state.orchestrator.spawn(pending);
    Json(state.orchestrator.snapshot().await)
}
