use std::sync::Arc;

use tracing::trace;

use aegis_foundation::DeviceError;

/// Screen brightness get/set. The setting is an exclusive, single-owner
/// resource: whoever pins it is responsible for restoring it.
pub trait BrightnessControl: Send + Sync {
    fn brightness(&self) -> Result<f32, DeviceError>;
    fn set_brightness(&self, level: f32) -> Result<(), DeviceError>;
}

/// Repeating vibration pattern. `cancel` must be idempotent.
pub trait Vibrator: Send + Sync {
    fn start_repeating(&self, pattern_ms: &[u64]) -> Result<(), DeviceError>;
    fn cancel(&self) -> Result<(), DeviceError>;
}

/// Single heavy haptic pulse; the session schedules the repetition.
pub trait HapticEngine: Send + Sync {
    fn pulse(&self) -> Result<(), DeviceError>;
}

/// Looping alarm sound at maximum volume. `stop` releases the underlying
/// resource and must be idempotent.
pub trait AlarmSound: Send + Sync {
    fn play_looping(&self) -> Result<(), DeviceError>;
    fn stop(&self) -> Result<(), DeviceError>;
}

/// The four actuators an alert session owns.
#[derive(Clone)]
pub struct AlertDevices {
    pub brightness: Arc<dyn BrightnessControl>,
    pub vibrator: Arc<dyn Vibrator>,
    pub haptics: Arc<dyn HapticEngine>,
    pub sound: Arc<dyn AlarmSound>,
}

impl AlertDevices {
    /// All-no-op device set for platforms without alarm hardware.
    pub fn noop() -> Self {
        Self {
            brightness: Arc::new(NoOpBrightnessControl::default()),
            vibrator: Arc::new(NoOpVibrator),
            haptics: Arc::new(NoOpHapticEngine),
            sound: Arc::new(NoOpAlarmSound),
        }
    }
}

/// Remembers the level it was set to so restoration still round-trips.
pub struct NoOpBrightnessControl {
    level: parking_lot::Mutex<f32>,
}

impl Default for NoOpBrightnessControl {
    fn default() -> Self {
        Self {
            level: parking_lot::Mutex::new(0.5),
        }
    }
}

impl BrightnessControl for NoOpBrightnessControl {
    fn brightness(&self) -> Result<f32, DeviceError> {
        Ok(*self.level.lock())
    }

    fn set_brightness(&self, level: f32) -> Result<(), DeviceError> {
        trace!("NoOpBrightnessControl: set {:.2}", level);
        *self.level.lock() = level;
        Ok(())
    }
}

pub struct NoOpVibrator;

impl Vibrator for NoOpVibrator {
    fn start_repeating(&self, pattern_ms: &[u64]) -> Result<(), DeviceError> {
        trace!("NoOpVibrator: pattern {:?}", pattern_ms);
        Ok(())
    }

    fn cancel(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

pub struct NoOpHapticEngine;

impl HapticEngine for NoOpHapticEngine {
    fn pulse(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

pub struct NoOpAlarmSound;

impl AlarmSound for NoOpAlarmSound {
    fn play_looping(&self) -> Result<(), DeviceError> {
        trace!("NoOpAlarmSound: looping");
        Ok(())
    }

    fn stop(&self) -> Result<(), DeviceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn noop_brightness_round_trips() {
        let b = NoOpBrightnessControl::default();
        let before = b.brightness().unwrap();
        b.set_brightness(1.0).unwrap();
        assert_eq!(b.brightness().unwrap(), 1.0);
        b.set_brightness(before).unwrap();
        assert_eq!(b.brightness().unwrap(), before);
    }

    #[test]
    fn noop_stop_and_cancel_are_idempotent() {
        let v = NoOpVibrator;
        let s = NoOpAlarmSound;
        v.cancel().unwrap();
        v.cancel().unwrap();
        s.stop().unwrap();
        s.stop().unwrap();
    }
}
