//! Service configuration.

use std::path::Path;

use anyhow::{Context, Result};

use field_common::FarmCatalog;
use imagery::SentinelHubConfig;

/// Zoom level a freshly mounted farm map starts at, before any overlay fit.
pub const DEFAULT_MAP_ZOOM: u8 = 15;

/// Everything the service needs at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Farms offered for selection.
    pub catalog: FarmCatalog,

    /// Imagery provider settings. Credentials may be absent; that surfaces as
    /// a configuration error on the first imagery cycle.
    pub sentinel: SentinelHubConfig,

    pub initial_zoom: u8,
}

impl ServiceConfig {
    /// Load the farm catalog from `farms_path` and imagery settings from the
    /// environment.
    pub fn load(farms_path: impl AsRef<Path>) -> Result<Self> {
        let farms_path = farms_path.as_ref();
        let catalog = FarmCatalog::load_from_file(farms_path)
            .with_context(|| format!("Failed to load farm catalog: {}", farms_path.display()))?;

        let sentinel = SentinelHubConfig::from_env();
        if let Err(e) = sentinel.credentials() {
            tracing::warn!(error = %e, "Imagery credentials incomplete; NDVI requests will fail");
        }

        let initial_zoom = std::env::var("MAP_INITIAL_ZOOM")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MAP_ZOOM);

        tracing::info!(
            farms = catalog.farms.len(),
            base_url = %sentinel.base_url,
            "Configuration loaded"
        );

        Ok(Self {
            catalog,
            sentinel,
            initial_zoom,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_catalog_uses_demo_farms() {
        let config = ServiceConfig::load("/nonexistent/farms.yaml").unwrap();
        assert_eq!(config.catalog.farms.len(), 3);
        assert_eq!(config.catalog.farms[0].id, "farm1");
    }
}
