use serde::Deserialize;

use aegis_capture::EvidenceBundle;

/// Fixed classification for automatically triggered reports. The flow is
/// hands-free, so the user supplies no free text.
pub const REPORT_TYPE: &str = "emergency_auto";
pub const REPORT_TITLE: &str = "Automatic SOS alert";
pub const REPORT_DESCRIPTION: &str =
    "Automatic emergency report triggered by a shake gesture. \
     Captured evidence is attached where available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionErrorKind {
    /// Transport failure: the report may never have reached the service.
    Network,
    /// The service answered but rejected or did not acknowledge the report.
    Validation,
}

/// Outcome of exactly one submission attempt. Reports are not retried
/// automatically; this is the single point where the flow surfaces failure
/// to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionResult {
    pub success: bool,
    pub error_kind: Option<SubmissionErrorKind>,
}

impl SubmissionResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_kind: None,
        }
    }

    pub fn failed(kind: SubmissionErrorKind) -> Self {
        Self {
            success: false,
            error_kind: Some(kind),
        }
    }
}

/// Success envelope returned by the submission endpoint.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Text fields of the multipart payload, in wire order. Geolocation fields
/// are present only when the bundle carries a fix; a missing address omits
/// only `address`.
pub fn report_fields(bundle: &EvidenceBundle) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("type", REPORT_TYPE.to_string()),
        ("title", REPORT_TITLE.to_string()),
        ("description", REPORT_DESCRIPTION.to_string()),
    ];

    if let Some(fix) = &bundle.location {
        fields.push(("latitude", fix.latitude.to_string()));
        fields.push(("longitude", fix.longitude.to_string()));
        if let Some(address) = &fix.address {
            fields.push(("address", address.clone()));
        }
    }

    fields
}
