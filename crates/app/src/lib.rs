pub mod config;
pub mod runtime;

pub use config::AegisConfig;
pub use runtime::{AppHandle, AppRuntimeOptions};
