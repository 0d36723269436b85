use serde::{Deserialize, Serialize};
use std::time::Duration;

use aegis_alert::AlertConfig;
use aegis_capture::CaptureConfig;
use aegis_foundation::AppError;
use aegis_motion::ShakeConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Base URL of the emergency-report service.
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8080".to_string(),
            timeout_ms: 15_000,
        }
    }
}

impl SubmitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AegisConfig {
    pub shake: ShakeConfig,
    pub capture: CaptureConfig,
    pub alert: AlertConfig,
    pub submit: SubmitConfig,
}

impl AegisConfig {
    /// Layered load: optional TOML file (`AEGIS_CONFIG` or ./aegis.toml),
    /// then `AEGIS_*` environment overrides, defaults underneath.
    pub fn load() -> Result<Self, AppError> {
        let mut builder = config::Config::builder();

        match std::env::var("AEGIS_CONFIG") {
            Ok(path) => {
                builder = builder.add_source(config::File::with_name(&path));
            }
            Err(_) => {
                builder = builder.add_source(config::File::with_name("aegis").required(false));
            }
        }

        builder = builder.add_source(
            config::Environment::with_prefix("AEGIS")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| AppError::Config(e.to_string()))
    }
}
