//! Rotation speed estimation from single-edge pulse timestamps.
//!
//! One magnet on the wheel gives one pulse per revolution, so each
//! inter-pulse interval *is* a revolution period. The tracker keeps the
//! last few instantaneous RPM samples in a fixed-capacity window and
//! reports their mean — enough smoothing to swallow sensor jitter
//! without adding meaningful lag on a fast wheel.

use heapless::Deque;

/// Moving-average depth. Three revolutions of history tracks speed
/// changes quickly while still flattening one noisy interval. Tunable.
pub const RPM_WINDOW: usize = 3;

/// Tracks wheel rotation speed from a stream of pulse timestamps.
#[derive(Debug, Default)]
pub struct RotationTracker {
    /// Timestamp of the most recent pulse (monotonic seconds).
    last_pulse_time: Option<f64>,
    /// Most recent instantaneous RPM samples, oldest first.
    samples: Deque<f64, RPM_WINDOW>,
}

impl RotationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one pulse edge at monotonic time `t` (seconds).
    ///
    /// A non-positive interval (duplicate or out-of-order timestamp)
    /// contributes no sample, but the clock reference still advances so
    /// the next interval is measured against the newest timestamp.
    pub fn record_pulse(&mut self, t: f64) {
        if let Some(last) = self.last_pulse_time {
            let period = t - last;
            if period > 0.0 {
                if self.samples.is_full() {
                    self.samples.pop_front();
                }
                // Capacity just freed above; push cannot fail.
                let _ = self.samples.push_back(60.0 / period);
            }
        }
        self.last_pulse_time = Some(t);
    }

    /// Mean of the stored RPM samples.
    ///
    /// Returns `0.0` when no sample exists yet — callers must treat this
    /// as "speed unknown", not "stationary".
    pub fn average_rpm(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Timestamp of the most recent pulse, if any.
    pub fn last_pulse_time(&self) -> Option<f64> {
        self.last_pulse_time
    }

    /// Number of RPM samples currently in the window.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}
