use serde::{Deserialize, Serialize};

/// Raw 3-axis reading from the accelerometer, in g-equivalent units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One timestamped sample as seen by the detector.
///
/// Timestamps are milliseconds since the pump started; the debounce contract
/// only depends on differences, never on wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub timestamp_ms: u64,
}

impl AccelerationSample {
    pub fn new(vector: AccelerationVector, timestamp_ms: u64) -> Self {
        Self {
            x: vector.x,
            y: vector.y,
            z: vector.z,
            timestamp_ms,
        }
    }
}

/// Debounced panic-gesture detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShakeEvent {
    pub timestamp_ms: u64,
    pub magnitude: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    /// Not subscribed to the sensor; samples are ignored.
    Idle,
    /// Subscribed and sampling; eligible samples emit shake events.
    Armed,
}
