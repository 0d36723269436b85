use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::permissions::{Permission, PermissionGate};
use crate::types::ModalityOutcome;
use aegis_foundation::DeviceError;

/// Seam to the platform audio recorder.
///
/// The recording handle is an exclusive, single-owner resource: one
/// `start_recording` must be matched by one `stop_recording` before the next
/// clip can start.
#[async_trait]
pub trait MicrophoneBackend: Send {
    async fn start_recording(&mut self) -> Result<(), DeviceError>;

    /// Stops and finalizes the clip. `Ok(None)` means the recorder stopped
    /// but could not produce a playable file.
    async fn stop_recording(&mut self) -> Result<Option<PathBuf>, DeviceError>;
}

/// Fixed-duration emergency audio clip.
pub struct AudioCapturer {
    gate: Arc<dyn PermissionGate>,
    // Exclusive recording handle; the lock enforces single ownership across
    // overlapping capture runs.
    microphone: Mutex<Box<dyn MicrophoneBackend>>,
    duration: std::time::Duration,
}

impl AudioCapturer {
    pub fn new(
        gate: Arc<dyn PermissionGate>,
        microphone: Box<dyn MicrophoneBackend>,
        duration: std::time::Duration,
    ) -> Self {
        Self {
            gate,
            microphone: Mutex::new(microphone),
            duration,
        }
    }

    /// Records for exactly the configured duration. Denial and hardware
    /// failures settle as outcomes; nothing escapes as `Err`.
    pub async fn record(&self) -> ModalityOutcome<PathBuf> {
        if !self.gate.request(Permission::Microphone).await.is_granted() {
            debug!("Microphone permission denied, skipping audio");
            return ModalityOutcome::Denied;
        }

        let mut microphone = self.microphone.lock().await;

        if let Err(e) = microphone.start_recording().await {
            warn!("Recorder failed to start: {}", e);
            return ModalityOutcome::Failed(e.to_string());
        }

        tokio::time::sleep(self.duration).await;

        match microphone.stop_recording().await {
            Ok(Some(path)) => {
                debug!("Audio clip finalized at {:?}", path);
                ModalityOutcome::Captured(path)
            }
            Ok(None) => {
                warn!("Recorder stopped without a finalized clip");
                ModalityOutcome::Failed("recording could not be finalized".into())
            }
            Err(e) => {
                warn!("Recorder failed to stop: {}", e);
                ModalityOutcome::Failed(e.to_string())
            }
        }
    }
}

/// In-memory recorder that finalizes a silent mono WAV of the recorded
/// length. Stands in for the platform recorder off-device.
pub struct SimulatedMicrophone {
    scratch: tempfile::TempDir,
    sample_rate: u32,
    started: Option<Instant>,
    clips: u32,
}

impl SimulatedMicrophone {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            scratch: tempfile::tempdir()?,
            sample_rate: 16_000,
            started: None,
            clips: 0,
        })
    }
}

#[async_trait]
impl MicrophoneBackend for SimulatedMicrophone {
    async fn start_recording(&mut self) -> Result<(), DeviceError> {
        if self.started.is_some() {
            return Err(DeviceError::ActuatorFailed {
                name: "microphone".into(),
                reason: "recording already in progress".into(),
            });
        }
        self.started = Some(Instant::now());
        Ok(())
    }

    async fn stop_recording(&mut self) -> Result<Option<PathBuf>, DeviceError> {
        let Some(started) = self.started.take() else {
            return Err(DeviceError::ActuatorFailed {
                name: "microphone".into(),
                reason: "no recording in progress".into(),
            });
        };

        self.clips += 1;
        let path = self.scratch.path().join(format!("clip-{:03}.wav", self.clips));
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let samples = (started.elapsed().as_millis() as u64 * self.sample_rate as u64) / 1000;
        let mut writer = hound::WavWriter::create(&path, spec).map_err(|e| {
            DeviceError::ActuatorFailed {
                name: "microphone".into(),
                reason: e.to_string(),
            }
        })?;
        for _ in 0..samples {
            writer.write_sample(0i16).map_err(|e| DeviceError::ActuatorFailed {
                name: "microphone".into(),
                reason: e.to_string(),
            })?;
        }
        writer.finalize().map_err(|e| DeviceError::ActuatorFailed {
            name: "microphone".into(),
            reason: e.to_string(),
        })?;

        Ok(Some(path))
    }
}
