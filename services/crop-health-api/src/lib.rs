//! Crop-health service library.
//!
//! Serves the farm catalog, runs NDVI imagery cycles for the selected farm
//! and exposes the resulting map scene to the web front end.

pub mod config;
pub mod error;
pub mod farm_context;
pub mod handlers;
pub mod orchestrator;
pub mod routes;
pub mod state;
