//! Fake imagery providers.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use field_common::{BoundingBox, FieldError, FieldResult, Geometry};
use imagery::{ImageryProvider, ImageryResult};
use tokio::sync::oneshot;

use crate::fixtures::fake_imagery;

/// Answers immediately, always the same way.
pub struct FakeImagery {
    failure: Option<FieldError>,
    calls: AtomicUsize,
    requested: Mutex<Vec<BoundingBox>>,
}

impl FakeImagery {
    /// Returns a fake PNG tagged `"ok"` for every request.
    pub fn succeeding() -> Self {
        Self {
            failure: None,
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with `err`.
    pub fn failing(err: FieldError) -> Self {
        Self {
            failure: Some(err),
            ..Self::succeeding()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Bounding boxes requested so far, in call order.
    pub fn requested(&self) -> Vec<BoundingBox> {
        self.requested.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageryProvider for FakeImagery {
    async fn fetch_imagery(
        &self,
        _geometry: &Geometry,
        bbox: BoundingBox,
    ) -> FieldResult<ImageryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(bbox);
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(fake_imagery("ok", bbox)),
        }
    }
}

/// Holds every request open until the test releases it.
///
/// Each call takes the next gate created with [`GatedImagery::gate`], in
/// order, and resolves with whatever the test sends through it.
#[derive(Default)]
pub struct GatedImagery {
    gates: Mutex<VecDeque<oneshot::Receiver<FieldResult<ImageryResult>>>>,
    calls: AtomicUsize,
}

impl GatedImagery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare the gate for the next call.
    pub fn gate(&self) -> oneshot::Sender<FieldResult<ImageryResult>> {
        let (tx, rx) = oneshot::channel();
        if let Ok(mut gates) = self.gates.lock() {
            gates.push_back(rx);
        }
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageryProvider for GatedImagery {
    async fn fetch_imagery(
        &self,
        _geometry: &Geometry,
        _bbox: BoundingBox,
    ) -> FieldResult<ImageryResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().ok().and_then(|mut g| g.pop_front());
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(FieldError::Internal("gate dropped".to_string()))),
            None => Err(FieldError::Internal(
                "no gate prepared for this request".to_string(),
            )),
        }
    }
}
