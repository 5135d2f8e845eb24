//! Drives the NDVI cycle for the selected farm.
//!
//! A cycle runs bounding-box derivation, the imagery fetch and the map
//! overlay update in that order. Every cycle takes a fresh request token; a
//! response is applied only while its token is still the latest, so a slow
//! reply to a superseded request can never overwrite newer state.
//!
//! The session (token, phase and map) sits behind one async mutex that is
//! released while the imagery request is in flight. Checking the token and
//! applying the result happen under the same lock.

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, warn};

use field_common::{BoundingBox, Farm, FieldError, FieldFeature, FieldResult, Geometry};
use imagery::ImageryProvider;
use map_renderer::{LayeredMap, MapRenderer, MapScene};

/// Message shown when no bounding box can be derived from the field.
pub const BBOX_UNAVAILABLE: &str = "bounding box unavailable";

/// Message shown for provider failures; details go to the log.
pub const IMAGERY_UNAVAILABLE: &str =
    "Failed to load crop health imagery. Please try again later.";

/// Where the current cycle stands.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error { message: String, code: String },
}

impl Phase {
    fn error(message: impl Into<String>, code: &str) -> Self {
        Phase::Error {
            message: message.into(),
            code: code.to_string(),
        }
    }

    /// User-facing state for a failed cycle. Provider failures get a generic
    /// message; configuration problems are shown as they are.
    fn from_error(err: &FieldError) -> Self {
        if err.is_upstream() {
            Phase::error(IMAGERY_UNAVAILABLE, err.code())
        } else {
            Phase::error(err.to_string(), err.code())
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Phase::Loading)
    }
}

/// Point-in-time view of the orchestrator for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct CropHealthSnapshot {
    pub farm_id: Option<String>,
    pub phase: Phase,
    pub scene: MapScene,
}

/// A started cycle waiting for its imagery.
#[derive(Debug)]
pub struct PendingCycle {
    token: u64,
    farm_id: String,
    geometry: Geometry,
    bbox: BoundingBox,
    boundary: FieldFeature,
}

impl PendingCycle {
    pub fn token(&self) -> u64 {
        self.token
    }
}

struct Session<R> {
    token: u64,
    farm: Option<Farm>,
    phase: Phase,
    renderer: R,
}

/// Map container a farm's session is bound to.
pub fn container_id(farm_id: &str) -> String {
    format!("fieldmap-{}", farm_id)
}

pub struct Orchestrator<R: MapRenderer = LayeredMap> {
    provider: Arc<dyn ImageryProvider>,
    session: Mutex<Session<R>>,
    initial_zoom: u8,
}

impl<R: MapRenderer> Orchestrator<R> {
    pub fn new(provider: Arc<dyn ImageryProvider>, renderer: R, initial_zoom: u8) -> Self {
        Self {
            provider,
            session: Mutex::new(Session {
                token: 0,
                farm: None,
                phase: Phase::Idle,
                renderer,
            }),
            initial_zoom,
        }
    }

    /// Point the session at `farm` and start a cycle.
    ///
    /// A different farm tears the map down and mounts a fresh one, which
    /// also cancels whatever was in flight. Reselecting the current farm
    /// keeps the map and simply re-runs the cycle.
    #[instrument(skip(self, farm), fields(farm_id = %farm.id))]
    pub async fn select_farm(&self, farm: &Farm) -> FieldResult<Option<PendingCycle>> {
        let mut session = self.session.lock().await;

        let same_farm = session.renderer.is_mounted()
            && session.farm.as_ref().map(|f| f.id == farm.id).unwrap_or(false);

        if !same_farm {
            session.token += 1;
            session.renderer.unmount();
            session.farm = Some(farm.clone());
            if let Err(e) = session.renderer.mount(
                &container_id(&farm.id),
                farm.center,
                self.initial_zoom,
            ) {
                error!(error = %e, "Failed to mount farm map");
                session.phase = Phase::from_error(&e);
                return Err(e);
            }
            info!(name = %farm.name, "Farm map mounted");
        }

        Ok(Self::begin(&mut session))
    }

    /// Re-run the cycle for the current farm.
    pub async fn refresh(&self) -> Option<PendingCycle> {
        let mut session = self.session.lock().await;
        Self::begin(&mut session)
    }

    fn begin(session: &mut Session<R>) -> Option<PendingCycle> {
        session.token += 1;
        let farm = session.farm.as_ref()?;
        counter!("ndvi_cycles_total").increment(1);

        let (Some(geometry), Some(bbox)) =
            (farm.field.geometry.clone(), farm.field.bounding_box())
        else {
            warn!(farm_id = %farm.id, "Field has no coordinates, skipping imagery request");
            counter!("ndvi_cycle_errors_total").increment(1);
            session.phase = Phase::error(BBOX_UNAVAILABLE, "ValidationError");
            return None;
        };

        let pending = PendingCycle {
            token: session.token,
            farm_id: farm.id.clone(),
            geometry,
            bbox,
            boundary: farm.field.clone(),
        };
        debug!(farm_id = %pending.farm_id, token = pending.token, bbox = ?bbox.to_array(), "Cycle started");
        session.phase = Phase::Loading;
        Some(pending)
    }

    /// Fetch imagery for `pending` and apply it if the cycle is still current.
    ///
    /// Returns whether the result was applied.
    #[instrument(skip(self, pending), fields(farm_id = %pending.farm_id, token = pending.token))]
    pub async fn complete(&self, pending: PendingCycle) -> bool {
        let result = self
            .provider
            .fetch_imagery(&pending.geometry, pending.bbox)
            .await;

        let mut session = self.session.lock().await;
        if session.token != pending.token {
            counter!("ndvi_stale_responses_total").increment(1);
            debug!(latest = session.token, "Discarding superseded imagery response");
            return false;
        }

        let applied = result.and_then(|image| {
            session
                .renderer
                .set_overlay(&image, pending.bbox, &pending.boundary)
        });

        match applied {
            Ok(()) => {
                info!("NDVI overlay updated");
                session.phase = Phase::Success;
            }
            Err(e) => {
                counter!("ndvi_cycle_errors_total").increment(1);
                // Any overlay from an earlier cycle of this farm stays visible.
                match &e {
                    FieldError::Configuration(_) => error!(error = %e, "NDVI cycle misconfigured"),
                    _ => warn!(error = %e, code = e.code(), "NDVI cycle failed"),
                }
                session.phase = Phase::from_error(&e);
            }
        }
        true
    }

    /// Select `farm` and wait for its cycle to finish.
    pub async fn select_and_wait(&self, farm: &Farm) -> FieldResult<Phase> {
        if let Some(pending) = self.select_farm(farm).await? {
            self.complete(pending).await;
        }
        Ok(self.phase().await)
    }

    /// Cancel anything in flight and release the map. Safe to repeat.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        session.token += 1;
        session.renderer.unmount();
        session.farm = None;
        session.phase = Phase::Idle;
    }

    pub async fn phase(&self) -> Phase {
        self.session.lock().await.phase.clone()
    }

    pub async fn snapshot(&self) -> CropHealthSnapshot {
        let session = self.session.lock().await;
        CropHealthSnapshot {
            farm_id: session.farm.as_ref().map(|f| f.id.clone()),
            phase: session.phase.clone(),
            scene: session.renderer.scene(),
        }
    }
}

impl<R: MapRenderer + 'static> Orchestrator<R> {
    /// Finish `pending` in the background.
    pub fn spawn(self: &Arc<Self>, pending: Option<PendingCycle>) {
        if let Some(pending) = pending {
            let orchestrator = Arc::clone(self);
            tokio::spawn(async move {
                orchestrator.complete(pending).await;
            });
        }
    }
}
