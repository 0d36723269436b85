use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Instant;

use tracing::{info, warn};

use crate::audio::AudioCapturer;
use crate::bundle::EvidenceBundle;
use crate::config::CaptureConfig;
use crate::location::LocationResolver;
use crate::photo::{CameraHandle, PhotoCapturer};
use crate::types::{CaptureFailure, Modality, ModalityOutcome};
use aegis_telemetry::PipelineMetrics;

/// Coordinates the three evidence modalities under one time budget.
///
/// Audio and location start together; the photo runs after both settle, the
/// camera subsystem being live only once its permission resolves. `run`
/// cannot fail: every modality error is folded into `capture_errors` and the
/// flow proceeds to submission with whatever was captured.
pub struct CaptureOrchestrator {
    audio: AudioCapturer,
    location: LocationResolver,
    photo: PhotoCapturer,
    config: CaptureConfig,
    metrics: PipelineMetrics,
}

impl CaptureOrchestrator {
    pub fn new(
        audio: AudioCapturer,
        location: LocationResolver,
        photo: PhotoCapturer,
        config: CaptureConfig,
        metrics: PipelineMetrics,
    ) -> Self {
        Self {
            audio,
            location,
            photo,
            config,
            metrics,
        }
    }

    pub async fn run(&self, camera: Option<&dyn CameraHandle>) -> EvidenceBundle {
        let started = Instant::now();
        self.metrics.capture_runs.fetch_add(1, Ordering::Relaxed);
        info!("Capture run started");

        // Audio and location share no hardware and have no ordering
        // dependency. The audio wait is fixed-length, so its budget bounds
        // recorder start/finalize on top of the clip itself.
        let (audio_outcome, location_outcome) = tokio::join!(
            self.bounded_audio(),
            self.location.resolve(),
        );

        let photo_outcome = self.photo.capture(camera).await;

        let mut capture_errors = Vec::new();
        let audio_uri =
            self.settle(Modality::Audio, audio_outcome, &mut capture_errors);
        let location =
            self.settle(Modality::Location, location_outcome, &mut capture_errors);
        let photo_uri =
            self.settle(Modality::Photo, photo_outcome, &mut capture_errors);

        self.record_counters(audio_uri.is_some(), location.is_some(), photo_uri.is_some());

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.metrics
            .capture_duration_ms
            .store(elapsed_ms, Ordering::Relaxed);

        let bundle = EvidenceBundle {
            audio_uri,
            location,
            photo_uri,
            capture_errors,
        };
        info!(
            "Capture run settled in {}ms: {}/3 modalities, {} errors",
            elapsed_ms,
            bundle.modalities_captured(),
            bundle.capture_errors.len()
        );
        bundle
    }

    async fn bounded_audio(&self) -> ModalityOutcome<PathBuf> {
        match tokio::time::timeout(self.config.audio_budget(), self.audio.record()).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(
                    "Audio capture exceeded its {}ms budget",
                    self.config.audio_budget().as_millis()
                );
                ModalityOutcome::TimedOut
            }
        }
    }

    fn settle<T>(
        &self,
        modality: Modality,
        outcome: ModalityOutcome<T>,
        errors: &mut Vec<CaptureFailure>,
    ) -> Option<T> {
        if let Some(kind) = outcome.failure_kind() {
            warn!("Modality {} unavailable: {:?}", modality, kind);
            errors.push(CaptureFailure { modality, kind });
            self.metrics.capture_errors.fetch_add(1, Ordering::Relaxed);
        }
        outcome.into_value()
    }

    fn record_counters(&self, audio: bool, location: bool, photo: bool) {
        if audio {
            self.metrics.audio_captures.fetch_add(1, Ordering::Relaxed);
        }
        if location {
            self.metrics.location_fixes.fetch_add(1, Ordering::Relaxed);
        }
        if photo {
            self.metrics.photo_captures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Convenience constructor wiring the three capturers from one gate and
    /// one config.
    pub fn from_parts(
        gate: std::sync::Arc<dyn crate::permissions::PermissionGate>,
        microphone: Box<dyn crate::audio::MicrophoneBackend>,
        location_backend: Box<dyn crate::location::LocationBackend>,
        geocoder: Option<Box<dyn crate::location::Geocoder>>,
        config: CaptureConfig,
        metrics: PipelineMetrics,
    ) -> Self {
        let audio = AudioCapturer::new(gate.clone(), microphone, config.audio_duration());
        let location = LocationResolver::new(
            gate.clone(),
            location_backend,
            geocoder,
            config.location_timeout(),
            config.geocode_timeout(),
        );
        let photo = PhotoCapturer::new(gate, config.photo_warmup(), config.photo_timeout());
        Self::new(audio, location, photo, config, metrics)
    }
}
