use std::path::PathBuf;

use crate::types::{CaptureFailure, GeoFix};

/// Aggregated, possibly-partial result of one capture run.
///
/// Created once per triggered flow, immutable after assembly, and owned by
/// the orchestrator until handed to submission. An entirely empty bundle is
/// valid: the automatic-SOS intent is still worth reporting with zero
/// evidence attached.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceBundle {
    pub audio_uri: Option<PathBuf>,
    pub location: Option<GeoFix>,
    pub photo_uri: Option<PathBuf>,
    pub capture_errors: Vec<CaptureFailure>,
}

impl EvidenceBundle {
    pub fn is_empty(&self) -> bool {
        self.audio_uri.is_none() && self.location.is_none() && self.photo_uri.is_none()
    }

    pub fn modalities_captured(&self) -> usize {
        usize::from(self.audio_uri.is_some())
            + usize::from(self.location.is_some())
            + usize::from(self.photo_uri.is_some())
    }
}
