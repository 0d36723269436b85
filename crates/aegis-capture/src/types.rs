use serde::{Deserialize, Serialize};

/// One independent, optionally-failing capture channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    Audio,
    Location,
    Photo,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Modality::Audio => write!(f, "audio"),
            Modality::Location => write!(f, "location"),
            Modality::Photo => write!(f, "photo"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureErrorKind {
    PermissionDenied,
    Timeout,
    Hardware,
}

/// Why a modality came back empty. Collected on the bundle so tests and
/// telemetry can assert on the reason, not just the absence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureFailure {
    pub modality: Modality,
    pub kind: CaptureErrorKind,
}

/// Settled result of one modality. Capturers return this instead of `Err`;
/// nothing in the capture path propagates an error past its own modality.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalityOutcome<T> {
    Captured(T),
    Denied,
    TimedOut,
    Failed(String),
}

impl<T> ModalityOutcome<T> {
    pub fn failure_kind(&self) -> Option<CaptureErrorKind> {
        match self {
            ModalityOutcome::Captured(_) => None,
            ModalityOutcome::Denied => Some(CaptureErrorKind::PermissionDenied),
            ModalityOutcome::TimedOut => Some(CaptureErrorKind::Timeout),
            ModalityOutcome::Failed(_) => Some(CaptureErrorKind::Hardware),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            ModalityOutcome::Captured(value) => Some(value),
            _ => None,
        }
    }
}

/// Resolved position with best-effort reverse-geocoded address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}
