//! Router construction.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the full API router around `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Farms
        .route(
            "/api/farms",
            get(handlers::farms::list_farms_handler).post(handlers::farms::add_farm_handler),
        )
        .route(
            "/api/farms/selected",
            get(handlers::farms::selected_farm_handler).put(handlers::farms::select_farm_handler),
        )
        // Crop health
        .route(
            "/api/crop-health",
            get(handlers::crop_health::crop_health_handler),
        )
        .route(
            "/api/crop-health/refresh",
            post(handlers::crop_health::refresh_handler),
        )
        // Direct NDVI
        .route("/api/ndvi", post(handlers::ndvi::ndvi_handler))
        .route("/api/ndvi/legend", get(handlers::ndvi::legend_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
