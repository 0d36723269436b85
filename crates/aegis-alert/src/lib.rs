pub mod config;
pub mod devices;
pub mod session;

pub use config::AlertConfig;
pub use devices::{
    AlarmSound, AlertDevices, BrightnessControl, HapticEngine, NoOpAlarmSound,
    NoOpBrightnessControl, NoOpHapticEngine, NoOpVibrator, Vibrator,
};
pub use session::AlertSession;
