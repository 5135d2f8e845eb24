//! NDVI cycle tests against fake imagery providers.

use std::sync::Arc;
use std::time::Duration;

use field_common::FieldError;
use imagery::{SentinelHubClient, SentinelHubConfig};
use map_renderer::{LayerKind, LayeredMap};
use test_utils::{demo_farm, fake_imagery, farm_without_points, FakeImagery, GatedImagery};

use crop_health_api::orchestrator::{
    container_id, Orchestrator, Phase, BBOX_UNAVAILABLE, IMAGERY_UNAVAILABLE,
};

fn orchestrator(provider: Arc<dyn imagery::ImageryProvider>) -> Arc<Orchestrator<LayeredMap>> {
    Arc::new(Orchestrator::new(provider, LayeredMap::default(), 15))
}

/// Wait until the gated provider has received `n` requests.
async fn wait_for_calls(provider: &GatedImagery, n: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while provider.call_count() < n {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("imagery request never arrived");
}

// ============================================================================
// Single cycles
// ============================================================================

#[tokio::test]
async fn test_missing_instance_id_ends_in_configuration_error() {
    // Nothing listens on port 1: a network attempt would not be a
    // configuration error.
    let client = SentinelHubClient::new(SentinelHubConfig {
        client_id: Some("id".to_string()),
        client_secret: Some("secret".to_string()),
        instance_id: None,
        base_url: "http://127.0.0.1:1".to_string(),
        ..Default::default()
    })
    .unwrap();
    let orch = orchestrator(Arc::new(client));

    let phase = orch.select_and_wait(&demo_farm("farm1")).await.unwrap();

    let Phase::Error { message, code } = phase else {
        panic!("expected error, got {:?}", phase);
    };
    assert_eq!(code, "ConfigurationError");
    assert!(message.contains("INSTANCE_ID"));
    assert_eq!(orch.snapshot().await.scene.count(LayerKind::ImageOverlay), 0);
}

#[tokio::test]
async fn test_success_overlays_field() {
    let provider = Arc::new(FakeImagery::succeeding());
    let orch = orchestrator(provider.clone());
    let farm = demo_farm("farm1");

    let phase = orch.select_and_wait(&farm).await.unwrap();
    assert_eq!(phase, Phase::Success);

    let snapshot = orch.snapshot().await;
    let bbox = farm.field.bounding_box().unwrap();
    assert_eq!(snapshot.farm_id.as_deref(), Some("farm1"));
    assert_eq!(snapshot.scene.container, Some(container_id("farm1")));
    assert_eq!(snapshot.scene.count(LayerKind::Tile), 1);
    assert_eq!(snapshot.scene.count(LayerKind::ImageOverlay), 1);
    assert_eq!(snapshot.scene.count(LayerKind::Boundary), 1);
    assert_eq!(snapshot.scene.viewport.unwrap().bounds, Some(bbox));
    assert_eq!(provider.requested(), vec![bbox]);
}

#[tokio::test]
async fn test_empty_geometry_skips_provider() {
    let provider = Arc::new(FakeImagery::succeeding());
    let orch = orchestrator(provider.clone());

    let phase = orch
        .select_and_wait(&farm_without_points("empty"))
        .await
        .unwrap();

    assert_eq!(
        phase,
        Phase::Error {
            message: BBOX_UNAVAILABLE.to_string(),
            code: "ValidationError".to_string(),
        }
    );
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_upstream_failure_shows_generic_message() {
    let provider = Arc::new(FakeImagery::failing(FieldError::Upstream {
        context: "Sentinel Hub process request".to_string(),
        status: 500,
        body: "internal".to_string(),
    }));
    let orch = orchestrator(provider);

    let phase = orch.select_and_wait(&demo_farm("farm2")).await.unwrap();
    assert_eq!(
        phase,
        Phase::Error {
            message: IMAGERY_UNAVAILABLE.to_string(),
            code: "UpstreamError".to_string(),
        }
    );
}

#[tokio::test]
async fn test_failure_keeps_previous_overlay() {
    let provider = Arc::new(GatedImagery::new());
    let orch = orchestrator(provider.clone());
    let farm = demo_farm("farm1");
    let bbox = farm.field.bounding_box().unwrap();

    provider.gate().send(Ok(fake_imagery("first", bbox))).ok();
    provider
        .gate()
        .send(Err(FieldError::Timeout("Sentinel Hub process request timed out".to_string())))
        .ok();

    assert_eq!(orch.select_and_wait(&farm).await.unwrap(), Phase::Success);
    let phase = orch.select_and_wait(&farm).await.unwrap();
    assert!(matches!(phase, Phase::Error { ref code, .. } if code == "Timeout"));

    let scene = orch.snapshot().await.scene;
    assert_eq!(scene.count(LayerKind::ImageOverlay), 1);
    assert_eq!(
        scene.overlay().unwrap().image_url,
        fake_imagery("first", bbox).data_uri()
    );
}

#[tokio::test]
async fn test_reselecting_same_farm_reruns_without_remount() {
    let provider = Arc::new(FakeImagery::succeeding());
    let orch = orchestrator(provider.clone());
    let farm = demo_farm("farm3");

    orch.select_and_wait(&farm).await.unwrap();
    orch.select_and_wait(&farm).await.unwrap();

    assert_eq!(provider.call_count(), 2);
    let scene = orch.snapshot().await.scene;
    assert_eq!(scene.container, Some(container_id("farm3")));
    assert_eq!(scene.count(LayerKind::Tile), 1);
    assert_eq!(scene.count(LayerKind::ImageOverlay), 1);
}

#[tokio::test]
async fn test_refresh_without_farm_is_noop() {
    let provider = Arc::new(FakeImagery::succeeding());
    let orch = orchestrator(provider.clone());

    assert!(orch.refresh().await.is_none());
    assert_eq!(orch.phase().await, Phase::Idle);
    assert_eq!(provider.call_count(), 0);
}

// ============================================================================
// Out-of-order responses
// ============================================================================

#[tokio::test]
async fn test_last_request_wins_when_responses_arrive_out_of_order() {
    let provider = Arc::new(GatedImagery::new());
    let orch = orchestrator(provider.clone());
    let farm = demo_farm("farm1");
    let bbox = farm.field.bounding_box().unwrap();

    let gate_a = provider.gate();
    let gate_b = provider.gate();

    let pending_a = orch.select_farm(&farm).await.unwrap().unwrap();
    let pending_b = orch.refresh().await.unwrap();
    assert!(pending_b.token() > pending_a.token());

    let task_a = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.complete(pending_a).await }
    });
    wait_for_calls(&provider, 1).await;
    let task_b = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.complete(pending_b).await }
    });
    wait_for_calls(&provider, 2).await;

    // B answers first, A last.
    gate_b.send(Ok(fake_imagery("b", bbox))).ok();
    assert!(task_b.await.unwrap());
    gate_a.send(Ok(fake_imagery("a", bbox))).ok();
    assert!(!task_a.await.unwrap());

    let snapshot = orch.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Success);
    assert_eq!(snapshot.scene.count(LayerKind::ImageOverlay), 1);
    assert_eq!(
        snapshot.scene.overlay().unwrap().image_url,
        fake_imagery("b", bbox).data_uri()
    );
}

#[tokio::test]
async fn test_switching_farms_discards_late_response() {
    let provider = Arc::new(GatedImagery::new());
    let orch = orchestrator(provider.clone());
    let farm1 = demo_farm("farm1");
    let farm2 = demo_farm("farm2");
    let bbox1 = farm1.field.bounding_box().unwrap();
    let bbox2 = farm2.field.bounding_box().unwrap();

    let gate_1 = provider.gate();
    let gate_2 = provider.gate();

    let pending_1 = orch.select_farm(&farm1).await.unwrap().unwrap();
    let task_1 = tokio::spawn({
        let orch = Arc::clone(&orch);
        async move { orch.complete(pending_1).await }
    });
    wait_for_calls(&provider, 1).await;

    let pending_2 = orch.select_farm(&farm2).await.unwrap().unwrap();
    gate_2.send(Ok(fake_imagery("farm2", bbox2))).ok();
    assert!(orch.complete(pending_2).await);

    gate_1.send(Ok(fake_imagery("farm1", bbox1))).ok();
    assert!(!task_1.await.unwrap());

    let snapshot = orch.snapshot().await;
    assert_eq!(snapshot.farm_id.as_deref(), Some("farm2"));
    assert_eq!(snapshot.scene.container, Some(container_id("farm2")));
    assert_eq!(snapshot.scene.overlay().unwrap().bounds, bbox2);
}

// ============================================================================
// Shutdown
// ============================================================================

#[tokio::test]
async fn test_shutdown_cancels_and_is_idempotent() {
    let provider = Arc::new(FakeImagery::succeeding());
    let orch = orchestrator(provider.clone());

    let pending = orch.select_farm(&demo_farm("farm1")).await.unwrap().unwrap();
    orch.shutdown().await;
    orch.shutdown().await;

    assert!(!orch.complete(pending).await);

    let snapshot = orch.snapshot().await;
    assert_eq!(snapshot.phase, Phase::Idle);
    assert!(snapshot.farm_id.is_none());
    assert!(snapshot.scene.layers.is_empty());
    assert!(snapshot.scene.container.is_none());
}
