use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::config::ShakeConfig;
use crate::source::Accelerometer;
use crate::types::AccelerationSample;
use aegis_foundation::{DeviceError, SharedClock};

/// Consecutive read failures tolerated before the pump stops itself.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 10;

/// Polls the accelerometer at a fixed interval and broadcasts timestamped
/// samples to every subscriber.
///
/// The pump is the exclusive owner of the sensor subscription: one pump per
/// source, started once, stopped by dropping the returned handle or closing
/// all receivers.
pub struct SensorPump {
    source: Box<dyn Accelerometer>,
    clock: SharedClock,
    interval: Duration,
    sample_tx: broadcast::Sender<AccelerationSample>,
}

impl SensorPump {
    /// Probes the source once so subscription failures surface to the caller
    /// instead of inside the sampling task.
    pub fn new(
        mut source: Box<dyn Accelerometer>,
        clock: SharedClock,
        config: &ShakeConfig,
    ) -> Result<Self, DeviceError> {
        source.read().map_err(|e| DeviceError::SubscriptionFailed {
            reason: format!("{} probe read failed: {}", source.name(), e),
        })?;

        // Enough capacity that a slow subscriber inside one cooldown window
        // does not lag out
        let capacity = (config.samples_per_cooldown() as usize * 4).max(16);
        let (sample_tx, _) = broadcast::channel(capacity);

        Ok(Self {
            source,
            clock,
            interval: Duration::from_millis(config.sample_interval_ms),
            sample_tx,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AccelerationSample> {
        self.sample_tx.subscribe()
    }

    pub fn spawn(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let epoch = self.clock.now();
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut consecutive_errors = 0u32;

            loop {
                ticker.tick().await;

                match self.source.read() {
                    Ok(vector) => {
                        consecutive_errors = 0;
                        let timestamp_ms =
                            self.clock.now().duration_since(epoch).as_millis() as u64;
                        let sample = AccelerationSample::new(vector, timestamp_ms);
                        if self.sample_tx.send(sample).is_err() {
                            // All receivers gone, sensor released
                            break;
                        }
                    }
                    Err(e) => {
                        consecutive_errors += 1;
                        if consecutive_errors == 1 {
                            warn!("Sensor read failed: {}", e);
                        }
                        if consecutive_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                            error!(
                                "Sensor '{}' failed {} consecutive reads, stopping pump",
                                self.source.name(),
                                consecutive_errors
                            );
                            break;
                        }
                    }
                }
            }
        })
    }
}
