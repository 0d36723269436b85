use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::AlertConfig;
use crate::devices::AlertDevices;
use aegis_telemetry::PipelineMetrics;

/// Scoped ownership of every device-wide alarm side effect.
///
/// `activate` pins brightness to maximum, starts the repeating vibration
/// pattern, schedules the heavy haptic pulse, and plays the looping alarm
/// sound. One actuator failing to start never stops the others.
///
/// `deactivate` is the mandatory cleanup path on every exit route from the
/// emergency screen. It is idempotent: restoration runs exactly once no
/// matter how many times it is called, and `Drop` calls it as a last resort
/// so abnormal exits still restore the device.
pub struct AlertSession {
    devices: AlertDevices,
    original_brightness: Option<f32>,
    active: Arc<AtomicBool>,
    haptic_task: Option<JoinHandle<()>>,
    metrics: PipelineMetrics,
}

impl AlertSession {
    pub fn activate(devices: AlertDevices, config: &AlertConfig, metrics: PipelineMetrics) -> Self {
        info!("Alert session activating");

        let original_brightness = match devices.brightness.brightness() {
            Ok(level) => Some(level),
            Err(e) => {
                warn!("Could not read current brightness, restore will be skipped: {}", e);
                None
            }
        };

        if let Err(e) = devices.brightness.set_brightness(config.max_brightness) {
            warn!("Failed to pin brightness: {}", e);
        }

        if let Err(e) = devices.vibrator.start_repeating(&config.vibration_pattern_ms) {
            warn!("Failed to start vibration: {}", e);
        }

        let haptic_task = Self::spawn_haptic_pulse(&devices, config);

        if let Err(e) = devices.sound.play_looping() {
            warn!("Failed to start alarm sound: {}", e);
        }

        metrics.alert_active.store(true, Ordering::SeqCst);
        metrics.alert_activations.fetch_add(1, Ordering::Relaxed);

        Self {
            devices,
            original_brightness,
            active: Arc::new(AtomicBool::new(true)),
            haptic_task: Some(haptic_task),
            metrics,
        }
    }

    fn spawn_haptic_pulse(devices: &AlertDevices, config: &AlertConfig) -> JoinHandle<()> {
        let haptics = devices.haptics.clone();
        let interval = config.haptic_interval();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut reported = false;

            loop {
                ticker.tick().await;
                if let Err(e) = haptics.pulse() {
                    if !reported {
                        debug!("Haptic pulse unavailable: {}", e);
                        reported = true;
                    }
                }
            }
        })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stops every actuator and restores brightness. Safe to call any number
    /// of times; only the first call performs restoration.
    pub fn deactivate(&mut self) {
        if !self.active.swap(false, Ordering::SeqCst) {
            return;
        }

        info!("Alert session deactivating");

        if let Some(task) = self.haptic_task.take() {
            task.abort();
        }

        if let Err(e) = self.devices.vibrator.cancel() {
            warn!("Failed to cancel vibration: {}", e);
        }

        if let Err(e) = self.devices.sound.stop() {
            warn!("Failed to stop alarm sound: {}", e);
        }

        if let Some(level) = self.original_brightness {
            if let Err(e) = self.devices.brightness.set_brightness(level) {
                warn!("Failed to restore brightness: {}", e);
            }
        }

        self.metrics.alert_active.store(false, Ordering::SeqCst);
    }
}

impl Drop for AlertSession {
    fn drop(&mut self) {
        self.deactivate();
    }
}
