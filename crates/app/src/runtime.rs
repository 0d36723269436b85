use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use aegis_alert::{AlertConfig, AlertDevices, AlertSession};
use aegis_capture::{
    CameraHandle, CaptureOrchestrator, Coordinates, LocationBackend, MicrophoneBackend,
    PermissionGate, SimulatedMicrophone, StaticPermissions,
};
use aegis_foundation::{
    real_clock, AppError, AppState, DeviceError, RecoveryStrategy, StateManager,
};
use aegis_motion::{Accelerometer, MotionMonitor, RestingAccelerometer, SensorPump, ShakeEvent};
use aegis_submit::SubmissionClient;
use aegis_telemetry::PipelineMetrics;

use crate::config::AegisConfig;

/// Positioning backend used when no platform service is wired in; every fix
/// attempt degrades the location modality.
struct UnavailableLocation;

#[async_trait]
impl LocationBackend for UnavailableLocation {
    async fn current_position(&self) -> Result<Coordinates, DeviceError> {
        Err(DeviceError::SensorUnavailable {
            name: "location".into(),
        })
    }
}

/// Options for starting the Aegis runtime. Every seam defaults to the
/// shipped stand-in so the pipeline runs end-to-end off-device.
pub struct AppRuntimeOptions {
    pub config: AegisConfig,
    pub accelerometer: Option<Box<dyn Accelerometer>>,
    pub permissions: Option<Arc<dyn PermissionGate>>,
    pub microphone: Option<Box<dyn MicrophoneBackend>>,
    pub location: Option<Box<dyn LocationBackend>>,
    pub geocoder: Option<Box<dyn aegis_capture::Geocoder>>,
    pub devices: Option<AlertDevices>,
    /// Live camera handle owned by the presentation layer. The pipeline
    /// borrows it per capture run and never manages its lifecycle.
    pub camera: Option<Arc<dyn CameraHandle>>,
}

impl Default for AppRuntimeOptions {
    fn default() -> Self {
        Self {
            config: AegisConfig::default(),
            accelerometer: None,
            permissions: None,
            microphone: None,
            location: None,
            geocoder: None,
            devices: None,
            camera: None,
        }
    }
}

/// Handle to the running pipeline
pub struct AppHandle {
    pub metrics: PipelineMetrics,
    pub state: Arc<StateManager>,
    shake_tx: broadcast::Sender<ShakeEvent>,
    pump_handle: JoinHandle<()>,
    monitor_handle: JoinHandle<()>,
    flow_handle: JoinHandle<()>,
}

impl AppHandle {
    /// Subscribe to accepted shake events (multiple subscribers supported)
    pub fn subscribe_shakes(&self) -> broadcast::Receiver<ShakeEvent> {
        self.shake_tx.subscribe()
    }

    /// Gracefully stop the pipeline and wait for shutdown
    pub async fn shutdown(self) {
        info!("Shutting down Aegis runtime...");

        let _ = self.state.transition(AppState::Stopping);

        // Stop the sample source first to quiesce the pipeline
        self.pump_handle.abort();
        self.monitor_handle.abort();
        self.flow_handle.abort();

        let _ = self.pump_handle.await;
        let _ = self.monitor_handle.await;
        let _ = self.flow_handle.await;

        let _ = self.state.transition(AppState::Stopped);
        info!("Aegis runtime shutdown complete");
    }
}

pub async fn start(options: AppRuntimeOptions) -> Result<AppHandle, AppError> {
    let AppRuntimeOptions {
        config,
        accelerometer,
        permissions,
        microphone,
        location,
        geocoder,
        devices,
        camera,
    } = options;

    let metrics = PipelineMetrics::new();
    let state = Arc::new(StateManager::new());

    let source = accelerometer.unwrap_or_else(|| Box::new(RestingAccelerometer));
    let gate = permissions.unwrap_or_else(|| Arc::new(StaticPermissions::deny_all()));
    let microphone = match microphone {
        Some(microphone) => microphone,
        None => Box::new(
            SimulatedMicrophone::new()
                .map_err(|e| AppError::Config(format!("capture scratch dir: {}", e)))?,
        ),
    };
    let location = location.unwrap_or_else(|| Box::new(UnavailableLocation));
    let devices = devices.unwrap_or_else(AlertDevices::noop);

    // --- 1. Sensor pump ---
    let pump = subscribe_with_retry(source, &config).await?;
    let sample_rx = pump.subscribe();
    let pump_handle = pump.spawn();
    info!("Sensor pump started");

    // --- 2. Motion monitor ---
    let (event_tx, event_rx) = mpsc::channel::<ShakeEvent>(16);
    let monitor_handle =
        MotionMonitor::spawn(&config.shake, sample_rx, event_tx, metrics.clone());
    info!("Motion monitor started");

    // --- 3. Emergency flow ---
    let orchestrator = CaptureOrchestrator::from_parts(
        gate,
        microphone,
        location,
        geocoder,
        config.capture.clone(),
        metrics.clone(),
    );
    let submission = SubmissionClient::new(&config.submit.endpoint, config.submit.timeout())
        .map_err(|e| AppError::Config(e.to_string()))?;

    let (shake_tx, _) = broadcast::channel::<ShakeEvent>(16);
    let flow_handle = tokio::spawn(emergency_flow(
        event_rx,
        orchestrator,
        submission,
        devices,
        config.alert.clone(),
        camera,
        metrics.clone(),
        shake_tx.clone(),
        state.clone(),
    ));
    info!("Emergency flow task started");

    state.transition(AppState::Monitoring)?;

    Ok(AppHandle {
        metrics,
        state,
        shake_tx,
        pump_handle,
        monitor_handle,
        flow_handle,
    })
}

/// Subscription failures follow their recovery strategy before giving up.
async fn subscribe_with_retry(
    mut source: Box<dyn Accelerometer>,
    config: &AegisConfig,
) -> Result<SensorPump, AppError> {
    let mut attempt = 0u32;
    loop {
        match source.read() {
            Ok(_) => break,
            Err(e) => {
                let err = AppError::Device(DeviceError::SubscriptionFailed {
                    reason: format!("{} probe read failed: {}", source.name(), e),
                });
                match err.recovery_strategy() {
                    RecoveryStrategy::Retry {
                        max_attempts,
                        delay,
                    } if attempt < max_attempts => {
                        attempt += 1;
                        warn!(
                            "Sensor subscription failed (attempt {}/{}), retrying: {}",
                            attempt, max_attempts, err
                        );
                        tokio::time::sleep(delay).await;
                    }
                    _ => return Err(err),
                }
            }
        }
    }

    SensorPump::new(source, real_clock(), &config.shake).map_err(AppError::Device)
}

#[allow(clippy::too_many_arguments)]
async fn emergency_flow(
    mut event_rx: mpsc::Receiver<ShakeEvent>,
    orchestrator: CaptureOrchestrator,
    submission: SubmissionClient,
    devices: AlertDevices,
    alert_config: AlertConfig,
    camera: Option<Arc<dyn CameraHandle>>,
    metrics: PipelineMetrics,
    shake_tx: broadcast::Sender<ShakeEvent>,
    state: Arc<StateManager>,
) {
    while let Some(event) = event_rx.recv().await {
        let _ = shake_tx.send(event);
        let flow_started = Instant::now();
        let _ = state.transition(AppState::Alerting);

        // The session guards every exit path below; an early return or
        // panic still restores brightness and silences the actuators.
        let mut session = AlertSession::activate(devices.clone(), &alert_config, metrics.clone());

        let bundle = orchestrator.run(camera.as_deref()).await;
        let result = submission.submit(&bundle).await;
        metrics.record_submission(result.success);
        metrics
            .end_to_end_ms
            .store(flow_started.elapsed().as_millis() as u64, Ordering::Relaxed);

        info!(
            "Emergency flow settled: {}/3 modalities, submission {}",
            bundle.modalities_captured(),
            if result.success { "accepted" } else { "failed" },
        );

        // Dismissal of the alert screen; capture/submission outcome has no
        // bearing on restoration
        session.deactivate();
        let _ = state.transition(AppState::Monitoring);
    }
}
