//! Application state for the crop-health API.

use std::sync::Arc;

use anyhow::Result;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

use field_common::{Farm, FieldResult};
use imagery::{ImageryProvider, SentinelHubClient};
use map_renderer::LayeredMap;

use crate::config::ServiceConfig;
use crate::farm_context::FarmContext;
use crate::orchestrator::Orchestrator;

/// Shared application state.
pub struct AppState {
    /// Farm registry and the current selection.
    pub farms: RwLock<FarmContext>,

    /// NDVI cycle driver for the selected farm's map.
    pub orchestrator: Arc<Orchestrator<LayeredMap>>,

    /// Imagery provider, also used directly by `POST /api/ndvi`.
    pub imagery: Arc<dyn ImageryProvider>,

    /// Renders `/metrics`.
    pub prometheus: PrometheusHandle,
}

impl AppState {
    /// Create the state with the Sentinel Hub client described by `config`.
    pub fn new(config: ServiceConfig, prometheus: PrometheusHandle) -> Result<Self> {
        let client = SentinelHubClient::new(config.sentinel.clone())?;
        Self::with_provider(config, Arc::new(client), prometheus)
    }

    /// Create the state around any imagery provider.
    pub fn with_provider(
        config: ServiceConfig,
        imagery: Arc<dyn ImageryProvider>,
        prometheus: PrometheusHandle,
    ) -> Result<Self> {
        let farms = FarmContext::new(config.catalog)?;
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::clone(&imagery),
            LayeredMap::default(),
            config.initial_zoom,
        ));

        Ok(Self {
            farms: RwLock::new(farms),
            orchestrator,
            imagery,
            prometheus,
        })
    }

    /// Select farm `id` and start its NDVI cycle in the background.
    ///
    /// The farms write guard is held until the orchestrator has switched, so
    /// concurrent selections update both in the same order. The orchestrator
    /// never takes the farms lock.
    pub async fn select_farm(&self, id: &str) -> FieldResult<Farm> {
        let mut farms = self.farms.write().await;
        let farm = farms.select(id)?.clone();
        let pending = self.orchestrator.select_farm(&farm).await?;
        drop(farms);

        self.orchestrator.spawn(pending);
        Ok(farm)
    }

    /// Start the first cycle for the initially selected farm.
    pub async fn start(&self) -> Result<()> {
        let id = self.farms.read().await.selected().id.clone();
        self.select_farm(&id).await?;
        Ok(())
    }
}
