use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::permissions::{Permission, PermissionGate};
use crate::types::ModalityOutcome;
use aegis_foundation::DeviceError;

/// Narrow capability onto a live camera.
///
/// The presentation layer owns the camera lifecycle; the orchestrator only
/// borrows this handle for the duration of one capture call and never
/// creates or tears the camera down itself.
#[async_trait]
pub trait CameraHandle: Send + Sync {
    async fn capture_still(&self) -> Result<PathBuf, DeviceError>;
}

/// Single still image from an injected camera handle.
pub struct PhotoCapturer {
    gate: Arc<dyn PermissionGate>,
    warmup: Duration,
    timeout: Duration,
}

impl PhotoCapturer {
    pub fn new(gate: Arc<dyn PermissionGate>, warmup: Duration, timeout: Duration) -> Self {
        Self {
            gate,
            warmup,
            timeout,
        }
    }

    pub async fn capture(&self, camera: Option<&dyn CameraHandle>) -> ModalityOutcome<PathBuf> {
        let Some(camera) = camera else {
            debug!("No live camera handle, skipping photo");
            return ModalityOutcome::Failed("no live camera handle".into());
        };

        if !self.gate.request(Permission::Camera).await.is_granted() {
            debug!("Camera permission denied, skipping photo");
            return ModalityOutcome::Denied;
        }

        // Capturing before the hardware settles yields black frames
        tokio::time::sleep(self.warmup).await;

        match tokio::time::timeout(self.timeout, camera.capture_still()).await {
            Err(_) => {
                warn!("Still capture exceeded {:?}", self.timeout);
                ModalityOutcome::TimedOut
            }
            Ok(Err(e)) => {
                warn!("Still capture failed: {}", e);
                ModalityOutcome::Failed(e.to_string())
            }
            Ok(Ok(path)) => {
                debug!("Photo captured at {:?}", path);
                ModalityOutcome::Captured(path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::StaticPermissions;

    pub struct StubCamera {
        path: PathBuf,
    }

    impl StubCamera {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }
    }

    #[async_trait]
    impl CameraHandle for StubCamera {
        async fn capture_still(&self) -> Result<PathBuf, DeviceError> {
            Ok(self.path.clone())
        }
    }

    fn capturer(gate: StaticPermissions) -> PhotoCapturer {
        PhotoCapturer::new(
            Arc::new(gate),
            Duration::from_millis(1),
            Duration::from_millis(100),
        )
    }

    #[tokio::test]
    async fn missing_handle_settles_without_prompting() {
        let c = capturer(StaticPermissions::allow_all());
        assert!(matches!(
            c.capture(None).await,
            ModalityOutcome::Failed(_)
        ));
    }

    #[tokio::test]
    async fn denied_camera_settles_as_denied() {
        let c = capturer(StaticPermissions::deny_all());
        let camera = StubCamera::new("/tmp/still.jpg");
        assert_eq!(c.capture(Some(&camera)).await, ModalityOutcome::Denied);
    }

    #[tokio::test]
    async fn granted_camera_captures_after_warmup() {
        let c = capturer(StaticPermissions::allow_all());
        let camera = StubCamera::new("/tmp/still.jpg");
        match c.capture(Some(&camera)).await {
            ModalityOutcome::Captured(path) => assert_eq!(path, PathBuf::from("/tmp/still.jpg")),
            other => panic!("expected capture, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn hung_camera_times_out() {
        struct HungCamera;

        #[async_trait]
        impl CameraHandle for HungCamera {
            async fn capture_still(&self) -> Result<PathBuf, DeviceError> {
                std::future::pending().await
            }
        }

        let c = capturer(StaticPermissions::allow_all());
        assert_eq!(c.capture(Some(&HungCamera)).await, ModalityOutcome::TimedOut);
    }
}
