use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Interval of the heavy haptic pulse while the session is active.
    pub haptic_interval_ms: u64,
    /// Brightness the screen is pinned to for the emergency screen.
    pub max_brightness: f32,
    /// Repeating vibration pattern: wait/vibrate millisecond pairs.
    pub vibration_pattern_ms: Vec<u64>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            haptic_interval_ms: 200,
            max_brightness: 1.0,
            vibration_pattern_ms: vec![0, 500, 250],
        }
    }
}

impl AlertConfig {
    pub fn haptic_interval(&self) -> Duration {
        Duration::from_millis(self.haptic_interval_ms.max(1))
    }
}
