pub mod config;
pub mod detector;
pub mod magnitude;
pub mod monitor;
pub mod pump;
pub mod source;
pub mod types;

// Core exports - grouped and sorted alphabetically
pub use config::ShakeConfig;
pub use detector::ShakeDetector;
pub use magnitude::MagnitudeCalculator;
pub use monitor::MotionMonitor;
pub use pump::SensorPump;
pub use source::{Accelerometer, RestingAccelerometer};
pub use types::{AccelerationSample, AccelerationVector, ShakeEvent, TriggerState};
