pub mod audio;
pub mod bundle;
pub mod config;
pub mod location;
pub mod orchestrator;
pub mod permissions;
pub mod photo;
pub mod types;

// Core exports - grouped and sorted alphabetically
pub use audio::{AudioCapturer, MicrophoneBackend, SimulatedMicrophone};
pub use bundle::EvidenceBundle;
pub use config::CaptureConfig;
pub use location::{Coordinates, Geocoder, LocationBackend, LocationResolver};
pub use orchestrator::CaptureOrchestrator;
pub use permissions::{Permission, PermissionGate, PermissionStatus, StaticPermissions};
pub use photo::{CameraHandle, PhotoCapturer};
pub use types::{CaptureErrorKind, CaptureFailure, GeoFix, Modality, ModalityOutcome};
