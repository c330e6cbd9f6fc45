//! Hall-effect rotation sensor.
//!
//! ## Hardware
//!
//! A3144 hall switch facing a single magnet on the wheel hub: open
//! collector with pull-up, line reads LOW while the magnet passes. One
//! magnet, so one active window per revolution.
//!
//! ## Edge semantics
//!
//! The *trailing* edge (magnet leaving the sensor) is the revolution
//! boundary; it is sharper than the leading edge because the magnet
//! exits the field faster than it enters at speed. Only trailing edges
//! become pulses on the control channel.
//!
//! The detector is a two-state debouncer: a level change is only
//! committed after it has held for the debounce window, which filters
//! the sub-millisecond chatter the switch produces at the field
//! threshold.

use log::debug;

/// A committed, debounced level transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Magnet arrived (line went active).
    Leading,
    /// Magnet left (line went inactive). The revolution boundary.
    Trailing,
}

/// Debouncing edge detector over a sampled binary level.
///
/// Feed it `(active, t_secs)` samples in timestamp order; it reports an
/// [`Edge`] once a changed level has held for the debounce window.
pub struct EdgeDetector {
    debounce_secs: f64,
    stable: bool,
    candidate: bool,
    candidate_since: f64,
}

impl EdgeDetector {
    /// Starts with the line inactive (no magnet in front of the sensor).
    pub fn new(debounce_ms: u32) -> Self {
        Self {
            debounce_secs: f64::from(debounce_ms) / 1000.0,
            stable: false,
            candidate: false,
            candidate_since: 0.0,
        }
    }

    /// Current debounced level.
    pub fn is_active(&self) -> bool {
        self.stable
    }

    /// Fold in one sample. Returns the committed edge, if any.
    pub fn sample(&mut self, active: bool, t_secs: f64) -> Option<Edge> {
        if active == self.stable {
            // Level agrees with the committed state; any pending
            // candidate was a glitch.
            self.candidate = self.stable;
            return None;
        }

        if self.candidate != active {
            self.candidate = active;
            self.candidate_since = t_secs;
        }

        if t_secs - self.candidate_since < self.debounce_secs {
            return None;
        }

        self.stable = active;
        let edge = if active { Edge::Leading } else { Edge::Trailing };
        debug!("hall: {:?} edge at {:.4}s", edge, t_secs);
        Some(edge)
    }
}

// ── Polling task (target only) ────────────────────────────────

/// Spawn the sensor polling thread.
///
/// Samples the hall GPIO at the configured interval, debounces, and
/// publishes each trailing edge to the control channel stamped with the
/// monotonic clock. Runs for the life of the process.
#[cfg(target_os = "espidf")]
pub fn spawn_hall_poller(config: &crate::config::SystemConfig) -> crate::Result<()> {
    use crate::adapters::time::now_secs;
    use crate::drivers::hw_init;
    use crate::{channels, pins};

    let poll = core::time::Duration::from_millis(u64::from(config.sensor_poll_interval_ms));
    let mut detector = EdgeDetector::new(config.sensor_debounce_ms);

    std::thread::Builder::new()
        .name("hall_poll".into())
        .stack_size(4096)
        .spawn(move || {
            loop {
                // Active-low line.
                let active = !hw_init::gpio_read(pins::HALL_SENSOR_GPIO);
                let t = now_secs();
                if detector.sample(active, t) == Some(Edge::Trailing) {
                    channels::push_pulse(t);
                }
                std::thread::sleep(poll);
            }
        })
        .map_err(|_| crate::Error::Init("hall poller thread spawn failed"))?;

    log::info!("hall poller started ({} ms interval)", config.sensor_poll_interval_ms);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_line_reports_nothing() {
        let mut det = EdgeDetector::new(1);
        assert_eq!(det.sample(false, 0.000), None);
        assert_eq!(det.sample(false, 0.001), None);
        assert!(!det.is_active());
    }

    #[test]
    fn full_pass_gives_leading_then_trailing() {
        let mut det = EdgeDetector::new(1);
        assert_eq!(det.sample(true, 0.000), None); // candidate starts
        assert_eq!(det.sample(true, 0.001), Some(Edge::Leading));
        assert_eq!(det.sample(true, 0.002), None);
        assert_eq!(det.sample(false, 0.003), None);
        assert_eq!(det.sample(false, 0.004), Some(Edge::Trailing));
        assert!(!det.is_active());
    }

    #[test]
    fn glitch_shorter_than_window_is_ignored() {
        let mut det = EdgeDetector::new(2);
        assert_eq!(det.sample(true, 0.0000), None);
        assert_eq!(det.sample(true, 0.0005), None);
        // Line recovers before the window elapses.
        assert_eq!(det.sample(false, 0.0010), None);
        assert_eq!(det.sample(false, 0.0050), None);
        assert!(!det.is_active());
    }

    #[test]
    fn chatter_restarts_the_window() {
        let mut det = EdgeDetector::new(2);
        det.sample(true, 0.0000);
        det.sample(false, 0.0010); // bounce back
        det.sample(true, 0.0015); // candidate restarts here
        assert_eq!(det.sample(true, 0.0030), None); // 1.5 ms held, window is 2
        assert_eq!(det.sample(true, 0.0040), Some(Edge::Leading));
    }

    #[test]
    fn zero_debounce_commits_on_next_sample() {
        let mut det = EdgeDetector::new(0);
        assert_eq!(det.sample(true, 0.0), Some(Edge::Leading));
        assert_eq!(det.sample(false, 0.1), Some(Edge::Trailing));
    }

    #[test]
    fn edges_never_repeat_for_a_held_level() {
        let mut det = EdgeDetector::new(1);
        det.sample(true, 0.000);
        assert_eq!(det.sample(true, 0.002), Some(Edge::Leading));
        for i in 3..20 {
            assert_eq!(det.sample(true, f64::from(i) * 0.001), None);
        }
    }
}
