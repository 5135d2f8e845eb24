//! Satellite imagery client for NDVI field-health maps.
//!
//! Exchanges client credentials for a short-lived token, then asks the
//! Sentinel Hub Process API to render a color-classified NDVI image for a
//! field polygon over the trailing 30 days.

pub mod auth;
pub mod client;
pub mod config;
pub mod evalscript;
pub mod request;

pub use client::{ImageUrl, ImageryProvider, ImageryResult, SentinelHubClient};
pub use config::{SentinelCredentials, SentinelHubConfig};
pub use evalscript::ndvi_evalscript;
pub use request::ProcessRequest;
