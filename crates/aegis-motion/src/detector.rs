use crate::config::ShakeConfig;
use crate::magnitude::MagnitudeCalculator;
use crate::types::{AccelerationSample, ShakeEvent, TriggerState};

/// Debounced shake detection over a stream of accelerometer samples.
///
/// While `Armed`, a sample whose magnitude exceeds the configured threshold
/// emits a `ShakeEvent` unless it falls inside the cooldown window of the
/// previous event. Two events are therefore never closer than `cooldown_ms`;
/// a sample landing exactly on the boundary is accepted.
pub struct ShakeDetector {
    state: TriggerState,

    calculator: MagnitudeCalculator,

    threshold: f32,

    cooldown_ms: u64,

    last_event_ms: Option<u64>,

    samples_seen: u64,

    suppressed: u64,
}

impl ShakeDetector {
    pub fn new(config: &ShakeConfig) -> Self {
        Self {
            state: TriggerState::Idle,
            calculator: MagnitudeCalculator::new(),
            threshold: config.threshold,
            cooldown_ms: config.cooldown_ms,
            last_event_ms: None,
            samples_seen: 0,
            suppressed: 0,
        }
    }

    /// Subscribe the detector to the sample stream.
    pub fn arm(&mut self) {
        self.state = TriggerState::Armed;
    }

    /// Tear down: back to Idle, samples are ignored until re-armed.
    pub fn disarm(&mut self) {
        self.state = TriggerState::Idle;
    }

    pub fn process(&mut self, sample: &AccelerationSample) -> Option<ShakeEvent> {
        if self.state != TriggerState::Armed {
            return None;
        }

        self.samples_seen += 1;
        let magnitude = self.calculator.calculate(sample);

        if magnitude <= self.threshold {
            return None;
        }

        if let Some(last) = self.last_event_ms {
            // Boundary inclusive: elapsed == cooldown is eligible
            if sample.timestamp_ms < last.saturating_add(self.cooldown_ms) {
                self.suppressed += 1;
                return None;
            }
        }

        self.last_event_ms = Some(sample.timestamp_ms);
        Some(ShakeEvent {
            timestamp_ms: sample.timestamp_ms,
            magnitude,
        })
    }

    pub fn current_state(&self) -> TriggerState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = TriggerState::Idle;
        self.last_event_ms = None;
        self.samples_seen = 0;
        self.suppressed = 0;
    }

    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}
