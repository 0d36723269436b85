use crate::types::AccelerationVector;
use aegis_foundation::DeviceError;

/// Seam to the platform accelerometer.
///
/// The pump polls this at the configured sample interval. Implementations
/// must not block for longer than one interval; a hung driver is surfaced as
/// `DeviceError` and handled by the pump, never by the detector.
pub trait Accelerometer: Send {
    /// One 3-axis reading in g-equivalent units.
    fn read(&mut self) -> Result<AccelerationVector, DeviceError>;

    fn name(&self) -> &'static str;
}

/// Fallback source that reports a device at rest (gravity only).
///
/// Used when no platform sensor is wired in; the trigger arms but never
/// fires.
pub struct RestingAccelerometer;

impl Accelerometer for RestingAccelerometer {
    fn read(&mut self) -> Result<AccelerationVector, DeviceError> {
        Ok(AccelerationVector {
            x: 0.0,
            y: 0.0,
            z: 1.0,
        })
    }

    fn name(&self) -> &'static str {
        "resting"
    }
}
