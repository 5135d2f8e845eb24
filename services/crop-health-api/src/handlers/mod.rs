//! HTTP request handlers for the crop-health API.

pub mod crop_health;
pub mod farms;
pub mod health;
pub mod ndvi;
