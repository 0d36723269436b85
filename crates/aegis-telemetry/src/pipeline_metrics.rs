use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Shared metrics for cross-task pipeline monitoring
#[derive(Clone)]
pub struct PipelineMetrics {
    // Sensor stage
    pub samples_processed: Arc<AtomicU64>,
    pub sample_magnitude_milli_g: Arc<AtomicU64>, // last magnitude * 1000

    // Trigger stage
    pub shake_events: Arc<AtomicU64>,
    pub suppressed_by_cooldown: Arc<AtomicU64>,
    pub last_trigger_time: Arc<RwLock<Option<Instant>>>,

    // Capture stage
    pub capture_runs: Arc<AtomicU64>,
    pub audio_captures: Arc<AtomicU64>,
    pub location_fixes: Arc<AtomicU64>,
    pub photo_captures: Arc<AtomicU64>,
    pub capture_errors: Arc<AtomicU64>,
    pub capture_duration_ms: Arc<AtomicU64>,

    // Alert session
    pub alert_active: Arc<AtomicBool>,
    pub alert_activations: Arc<AtomicU64>,

    // Submission stage
    pub submissions_ok: Arc<AtomicU64>,
    pub submissions_failed: Arc<AtomicU64>,
    pub end_to_end_ms: Arc<AtomicU64>, // trigger to submission result
}

impl Default for PipelineMetrics {
    fn default() -> Self {
        Self {
            samples_processed: Arc::new(AtomicU64::new(0)),
            sample_magnitude_milli_g: Arc::new(AtomicU64::new(0)),

            shake_events: Arc::new(AtomicU64::new(0)),
            suppressed_by_cooldown: Arc::new(AtomicU64::new(0)),
            last_trigger_time: Arc::new(RwLock::new(None)),

            capture_runs: Arc::new(AtomicU64::new(0)),
            audio_captures: Arc::new(AtomicU64::new(0)),
            location_fixes: Arc::new(AtomicU64::new(0)),
            photo_captures: Arc::new(AtomicU64::new(0)),
            capture_errors: Arc::new(AtomicU64::new(0)),
            capture_duration_ms: Arc::new(AtomicU64::new(0)),

            alert_active: Arc::new(AtomicBool::new(false)),
            alert_activations: Arc::new(AtomicU64::new(0)),

            submissions_ok: Arc::new(AtomicU64::new(0)),
            submissions_failed: Arc::new(AtomicU64::new(0)),
            end_to_end_ms: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_sample(&self, magnitude: f32) {
        self.samples_processed.fetch_add(1, Ordering::Relaxed);
        self.sample_magnitude_milli_g
            .store((magnitude * 1000.0) as u64, Ordering::Relaxed);
    }

    pub fn record_shake(&self) {
        self.shake_events.fetch_add(1, Ordering::Relaxed);
        *self.last_trigger_time.write() = Some(Instant::now());
    }

    pub fn record_submission(&self, success: bool) {
        if success {
            self.submissions_ok.fetch_add(1, Ordering::Relaxed);
        } else {
            self.submissions_failed.fetch_add(1, Ordering::Relaxed);
        }
    }
}
