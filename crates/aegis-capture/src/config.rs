use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Minimum camera warm-up; capturing earlier than this races hardware
/// initialization on real devices.
pub const MIN_PHOTO_WARMUP_MS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Fixed length of the emergency audio clip.
    pub audio_duration_ms: u64,
    /// Grace allowed for recorder start/finalize beyond the clip length.
    pub audio_grace_ms: u64,
    /// Bound on acquiring a high-accuracy position fix.
    pub location_timeout_ms: u64,
    /// Bound on the best-effort reverse-geocode enrichment.
    pub geocode_timeout_ms: u64,
    /// Camera warm-up before triggering the still. Clamped to at least
    /// `MIN_PHOTO_WARMUP_MS`.
    pub photo_warmup_ms: u64,
    /// Bound on the still capture itself, after warm-up.
    pub photo_timeout_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            audio_duration_ms: 5_000,
            audio_grace_ms: 2_000,
            location_timeout_ms: 10_000,
            geocode_timeout_ms: 3_000,
            photo_warmup_ms: MIN_PHOTO_WARMUP_MS,
            photo_timeout_ms: 8_000,
        }
    }
}

impl CaptureConfig {
    pub fn audio_duration(&self) -> Duration {
        Duration::from_millis(self.audio_duration_ms)
    }

    pub fn audio_budget(&self) -> Duration {
        Duration::from_millis(self.audio_duration_ms + self.audio_grace_ms)
    }

    pub fn location_timeout(&self) -> Duration {
        Duration::from_millis(self.location_timeout_ms)
    }

    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }

    pub fn photo_warmup(&self) -> Duration {
        Duration::from_millis(self.photo_warmup_ms.max(MIN_PHOTO_WARMUP_MS))
    }

    pub fn photo_timeout(&self) -> Duration {
        Duration::from_millis(self.photo_timeout_ms)
    }
}
