use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Device subsystem error: {0}")]
    Device(#[from] DeviceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Shutdown requested")]
    ShutdownRequested,

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),

    #[error("Transient error, will retry: {0}")]
    Transient(String),
}

/// Errors raised by the device seams (sensors and alarm actuators).
///
/// These cover acquisition failures only. Once a resource is held, failures
/// during use are absorbed at the owning component and reported as data, not
/// as errors.
#[derive(Error, Debug)]
pub enum DeviceError {
    #[error("Sensor unavailable: {name}")]
    SensorUnavailable { name: String },

    #[error("Sensor subscription failed: {reason}")]
    SubscriptionFailed { reason: String },

    #[error("Actuator unavailable: {name}")]
    ActuatorUnavailable { name: String },

    #[error("Actuator rejected command: {name}: {reason}")]
    ActuatorFailed { name: String, reason: String },

    #[error("No sensor data for {duration:?}")]
    NoDataTimeout { duration: Duration },

    #[error("Fatal error, cannot recover: {0}")]
    Fatal(String),
}

#[derive(Debug, Clone)]
pub enum RecoveryStrategy {
    Retry { max_attempts: u32, delay: Duration },
    Degrade,
    Fatal,
}

impl AppError {
    pub fn recovery_strategy(&self) -> RecoveryStrategy {
        match self {
            AppError::Device(DeviceError::SubscriptionFailed { .. }) => RecoveryStrategy::Retry {
                max_attempts: 3,
                delay: Duration::from_secs(2),
            },
            AppError::Device(DeviceError::NoDataTimeout { .. }) => RecoveryStrategy::Retry {
                max_attempts: 5,
                delay: Duration::from_secs(1),
            },
            AppError::Device(DeviceError::ActuatorUnavailable { .. })
            | AppError::Device(DeviceError::ActuatorFailed { .. }) => RecoveryStrategy::Degrade,
            AppError::Fatal(_) | AppError::ShutdownRequested => RecoveryStrategy::Fatal,
            _ => RecoveryStrategy::Degrade,
        }
    }
}
