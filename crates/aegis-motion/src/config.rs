use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShakeConfig {
    /// Magnitude (g-equivalent units) a sample must exceed to count as a
    /// shake candidate.
    pub threshold: f32,
    /// Minimum time between two accepted shake events. A sample arriving
    /// exactly `cooldown_ms` after the previous event is eligible.
    pub cooldown_ms: u64,
    /// Polling interval of the sensor pump.
    pub sample_interval_ms: u64,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            threshold: 1.5,
            cooldown_ms: 500,
            sample_interval_ms: 100,
        }
    }
}

impl ShakeConfig {
    /// Samples per cooldown window, rounded up. Used for channel sizing.
    pub fn samples_per_cooldown(&self) -> u64 {
        self.cooldown_ms.div_ceil(self.sample_interval_ms.max(1))
    }
}
