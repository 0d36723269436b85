use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::report::{report_fields, SubmissionErrorKind, SubmissionResult, SubmitResponse};
use aegis_capture::EvidenceBundle;

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("HTTP client build failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Sends one multipart emergency report per evidence bundle.
///
/// An empty bundle is still sent: the automatic-SOS intent is recorded even
/// with zero evidence. `submit` settles to a `SubmissionResult` for every
/// failure mode; nothing propagates as `Err` and nothing is retried.
pub struct SubmissionClient {
    http: Client,
    base_url: String,
}

impl SubmissionClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, SubmitError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub async fn submit(&self, bundle: &EvidenceBundle) -> SubmissionResult {
        info!(
            "Submitting emergency report ({}/3 modalities attached)",
            bundle.modalities_captured()
        );

        let mut form = Form::new();
        for (name, value) in report_fields(bundle) {
            form = form.text(name, value);
        }

        if let Some(path) = &bundle.audio_uri {
            form = attach_file(form, path, "audio.wav", "audio/wav").await;
        }
        if let Some(path) = &bundle.photo_uri {
            form = attach_file(form, path, "photo.jpg", "image/jpeg").await;
        }

        let url = format!("{}/reports", self.base_url);
        let response = match self.http.post(&url).multipart(form).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Report submission transport failure: {}", e);
                return SubmissionResult::failed(SubmissionErrorKind::Network);
            }
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let result = interpret_response(status, &body);
        if result.success {
            info!("Emergency report accepted");
        } else {
            warn!(
                "Emergency report rejected: status {}, kind {:?}",
                status, result.error_kind
            );
        }
        result
    }
}

/// Maps the endpoint's answer onto the submission contract: missing or false
/// `success` and 4xx answers are validation failures, everything else
/// non-2xx is a network-class failure.
fn interpret_response(status: StatusCode, body: &str) -> SubmissionResult {
    if status.is_client_error() {
        return SubmissionResult::failed(SubmissionErrorKind::Validation);
    }
    if !status.is_success() {
        return SubmissionResult::failed(SubmissionErrorKind::Network);
    }

    match serde_json::from_str::<SubmitResponse>(body) {
        Ok(envelope) if envelope.success => SubmissionResult::ok(),
        Ok(envelope) => {
            debug!("Endpoint did not acknowledge: {:?}", envelope.message);
            SubmissionResult::failed(SubmissionErrorKind::Validation)
        }
        Err(e) => {
            debug!("Unparseable endpoint response: {}", e);
            SubmissionResult::failed(SubmissionErrorKind::Validation)
        }
    }
}

/// Best effort: an unreadable evidence file drops that part, never the
/// report.
async fn attach_file(form: Form, path: &Path, file_name: &'static str, mime: &str) -> Form {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let part = Part::bytes(bytes).file_name(file_name);
            match part.mime_str(mime) {
                Ok(part) => form.part("files", part),
                Err(e) => {
                    warn!("Invalid MIME for {}: {}", file_name, e);
                    form
                }
            }
        }
        Err(e) => {
            warn!("Could not read evidence file {:?}, omitting part: {}", path, e);
            form
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acknowledged_response_is_success() {
        let result = interpret_response(StatusCode::OK, r#"{"success": true}"#);
        assert!(result.success);
        assert!(result.error_kind.is_none());
    }

    #[test]
    fn unacknowledged_response_is_validation_failure() {
        let result = interpret_response(StatusCode::OK, r#"{"success": false, "message": "bad"}"#);
        assert_eq!(result, SubmissionResult::failed(SubmissionErrorKind::Validation));
    }

    #[test]
    fn missing_success_flag_is_validation_failure() {
        let result = interpret_response(StatusCode::OK, r#"{"id": 42}"#);
        assert_eq!(result, SubmissionResult::failed(SubmissionErrorKind::Validation));
    }

    #[test]
    fn malformed_body_is_validation_failure() {
        let result = interpret_response(StatusCode::OK, "<html>oops</html>");
        assert_eq!(result, SubmissionResult::failed(SubmissionErrorKind::Validation));
    }

    #[test]
    fn client_error_is_validation_failure() {
        let result = interpret_response(StatusCode::UNPROCESSABLE_ENTITY, "{}");
        assert_eq!(result, SubmissionResult::failed(SubmissionErrorKind::Validation));
    }

    #[test]
    fn server_error_is_network_failure() {
        let result = interpret_response(StatusCode::BAD_GATEWAY, "");
        assert_eq!(result, SubmissionResult::failed(SubmissionErrorKind::Network));
    }

    #[test]
    fn base_url_is_normalized() {
        let client =
            SubmissionClient::new("https://api.example.test/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://api.example.test");
    }
}
