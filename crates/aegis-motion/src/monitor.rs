use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::ShakeConfig;
use crate::detector::ShakeDetector;
use crate::types::{AccelerationSample, ShakeEvent};
use aegis_telemetry::PipelineMetrics;

/// Bridges the sample stream to the emergency flow: runs the debounced
/// detector over broadcast samples and forwards accepted shake events.
pub struct MotionMonitor {
    detector: ShakeDetector,
    sample_rx: broadcast::Receiver<AccelerationSample>,
    event_tx: Sender<ShakeEvent>,
    metrics: PipelineMetrics,
    samples_processed: u64,
    events_emitted: u64,
}

impl MotionMonitor {
    pub fn new(
        config: &ShakeConfig,
        sample_rx: broadcast::Receiver<AccelerationSample>,
        event_tx: Sender<ShakeEvent>,
        metrics: PipelineMetrics,
    ) -> Self {
        let mut detector = ShakeDetector::new(config);
        detector.arm();

        Self {
            detector,
            sample_rx,
            event_tx,
            metrics,
            samples_processed: 0,
            events_emitted: 0,
        }
    }

    pub async fn run(mut self) {
        info!("Motion monitor task started (trigger armed)");

        // Exits when the pump drops its sender side.
        loop {
            match self.sample_rx.recv().await {
                Ok(sample) => self.process_sample(sample).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!("Motion monitor lagged, {} samples skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        info!(
            "Motion monitor shutting down. Samples processed: {}, shakes detected: {}",
            self.samples_processed, self.events_emitted
        );
    }

    async fn process_sample(&mut self, sample: AccelerationSample) {
        let before = self.detector.suppressed();

        if let Some(event) = self.detector.process(&sample) {
            self.events_emitted += 1;
            self.metrics.record_shake();
            info!(
                "Shake detected at t={}ms, magnitude {:.2}g",
                event.timestamp_ms, event.magnitude
            );

            if let Err(e) = self.event_tx.send(event).await {
                error!("Failed to forward shake event: {}", e);
            }
        } else if self.detector.suppressed() > before {
            self.metrics
                .suppressed_by_cooldown
                .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }

        self.samples_processed += 1;
        self.metrics.record_sample(
            (sample.x * sample.x + sample.y * sample.y + sample.z * sample.z).sqrt(),
        );

        if self.samples_processed % 1000 == 0 {
            debug!(
                "Motion monitor: {} samples processed, {} shakes, state {:?}",
                self.samples_processed,
                self.events_emitted,
                self.detector.current_state()
            );
        }
    }

    pub fn spawn(
        config: &ShakeConfig,
        sample_rx: broadcast::Receiver<AccelerationSample>,
        event_tx: Sender<ShakeEvent>,
        metrics: PipelineMetrics,
    ) -> JoinHandle<()> {
        let monitor = MotionMonitor::new(config, sample_rx, event_tx, metrics);

        tokio::spawn(async move {
            monitor.run().await;
        })
    }
}
