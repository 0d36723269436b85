//! Capture pipeline tests
//!
//! Tests cover:
//! - Orchestrator aggregation under every permission combination
//! - Missing camera handle degrading only the photo modality
//! - Per-modality timeout bounds (hung drivers cannot stall the run)
//! - Error-kind bookkeeping on the assembled bundle

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use aegis_capture::audio::SimulatedMicrophone;
use aegis_capture::config::CaptureConfig;
use aegis_capture::location::{Coordinates, Geocoder, LocationBackend};
use aegis_capture::orchestrator::CaptureOrchestrator;
use aegis_capture::permissions::StaticPermissions;
use aegis_capture::photo::CameraHandle;
use aegis_capture::types::{CaptureErrorKind, Modality};
use aegis_foundation::DeviceError;
use aegis_telemetry::PipelineMetrics;

struct FixedPosition;

#[async_trait]
impl LocationBackend for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, DeviceError> {
        Ok(Coordinates {
            latitude: 40.7128,
            longitude: -74.0060,
        })
    }
}

struct HungPosition;

#[async_trait]
impl LocationBackend for HungPosition {
    async fn current_position(&self) -> Result<Coordinates, DeviceError> {
        std::future::pending().await
    }
}

struct StreetGeocoder;

#[async_trait]
impl Geocoder for StreetGeocoder {
    async fn reverse(&self, _position: Coordinates) -> Result<String, DeviceError> {
        Ok("221B Baker Street".into())
    }
}

struct StubCamera;

#[async_trait]
impl CameraHandle for StubCamera {
    async fn capture_still(&self) -> Result<PathBuf, DeviceError> {
        Ok(PathBuf::from("/tmp/still.jpg"))
    }
}

struct DeadCamera;

#[async_trait]
impl CameraHandle for DeadCamera {
    async fn capture_still(&self) -> Result<PathBuf, DeviceError> {
        Err(DeviceError::ActuatorFailed {
            name: "camera".into(),
            reason: "driver reset".into(),
        })
    }
}

fn fast_config() -> CaptureConfig {
    CaptureConfig {
        audio_duration_ms: 20,
        audio_grace_ms: 500,
        location_timeout_ms: 200,
        geocode_timeout_ms: 100,
        photo_warmup_ms: 300,
        photo_timeout_ms: 200,
    }
}

fn orchestrator(
    gate: StaticPermissions,
    location: Box<dyn LocationBackend>,
    geocoder: Option<Box<dyn Geocoder>>,
) -> CaptureOrchestrator {
    CaptureOrchestrator::from_parts(
        Arc::new(gate),
        Box::new(SimulatedMicrophone::new().unwrap()),
        location,
        geocoder,
        fast_config(),
        PipelineMetrics::new(),
    )
}

#[tokio::test]
async fn all_granted_produces_full_bundle() {
    let orch = orchestrator(
        StaticPermissions::allow_all(),
        Box::new(FixedPosition),
        Some(Box::new(StreetGeocoder)),
    );
    let bundle = orch.run(Some(&StubCamera)).await;

    assert!(bundle.audio_uri.is_some());
    let fix = bundle.location.expect("location fix");
    assert_eq!(fix.latitude, 40.7128);
    assert_eq!(fix.address.as_deref(), Some("221B Baker Street"));
    assert_eq!(bundle.photo_uri, Some(PathBuf::from("/tmp/still.jpg")));
    assert!(bundle.capture_errors.is_empty());
}

#[tokio::test]
async fn all_denied_still_assembles_a_bundle() {
    let orch = orchestrator(
        StaticPermissions::deny_all(),
        Box::new(FixedPosition),
        None,
    );
    let bundle = orch.run(Some(&StubCamera)).await;

    assert!(bundle.is_empty());
    assert_eq!(bundle.capture_errors.len(), 3);
    for failure in &bundle.capture_errors {
        assert_eq!(failure.kind, CaptureErrorKind::PermissionDenied);
    }
}

#[tokio::test]
async fn audio_granted_location_denied_camera_granted() {
    // Scenario from the capture contract: bundle carries audio + photo,
    // location stays unset.
    let orch = orchestrator(
        StaticPermissions::new(true, true, false),
        Box::new(FixedPosition),
        None,
    );
    let bundle = orch.run(Some(&StubCamera)).await;

    assert!(bundle.audio_uri.is_some());
    assert!(bundle.location.is_none());
    assert!(bundle.photo_uri.is_some());
    assert_eq!(bundle.capture_errors.len(), 1);
    assert_eq!(bundle.capture_errors[0].modality, Modality::Location);
    assert_eq!(
        bundle.capture_errors[0].kind,
        CaptureErrorKind::PermissionDenied
    );
}

#[tokio::test]
async fn missing_camera_handle_only_degrades_photo() {
    let orch = orchestrator(
        StaticPermissions::allow_all(),
        Box::new(FixedPosition),
        None,
    );
    let bundle = orch.run(None).await;

    assert!(bundle.audio_uri.is_some());
    assert!(bundle.location.is_some());
    assert!(bundle.photo_uri.is_none());
    assert_eq!(bundle.capture_errors.len(), 1);
    assert_eq!(bundle.capture_errors[0].modality, Modality::Photo);
    assert_eq!(bundle.capture_errors[0].kind, CaptureErrorKind::Hardware);
}

#[tokio::test]
async fn camera_driver_error_is_absorbed() {
    let orch = orchestrator(
        StaticPermissions::allow_all(),
        Box::new(FixedPosition),
        None,
    );
    let bundle = orch.run(Some(&DeadCamera)).await;

    assert!(bundle.photo_uri.is_none());
    assert!(bundle
        .capture_errors
        .iter()
        .any(|f| f.modality == Modality::Photo && f.kind == CaptureErrorKind::Hardware));
    // Other modalities unaffected
    assert!(bundle.audio_uri.is_some());
    assert!(bundle.location.is_some());
}

#[tokio::test(start_paused = true)]
async fn hung_location_driver_times_out_and_run_completes() {
    let orch = orchestrator(
        StaticPermissions::allow_all(),
        Box::new(HungPosition),
        None,
    );
    let bundle = orch.run(Some(&StubCamera)).await;

    assert!(bundle.location.is_none());
    assert!(bundle
        .capture_errors
        .iter()
        .any(|f| f.modality == Modality::Location && f.kind == CaptureErrorKind::Timeout));
    assert!(bundle.audio_uri.is_some());
    assert!(bundle.photo_uri.is_some());
}

#[tokio::test]
async fn metrics_track_run_and_errors() {
    let metrics = PipelineMetrics::new();
    let orch = CaptureOrchestrator::from_parts(
        Arc::new(StaticPermissions::deny_all()),
        Box::new(SimulatedMicrophone::new().unwrap()),
        Box::new(FixedPosition),
        None,
        fast_config(),
        metrics.clone(),
    );
    let _ = orch.run(None).await;

    use std::sync::atomic::Ordering;
    assert_eq!(metrics.capture_runs.load(Ordering::Relaxed), 1);
    assert_eq!(metrics.capture_errors.load(Ordering::Relaxed), 3);
    assert_eq!(metrics.audio_captures.load(Ordering::Relaxed), 0);
}
