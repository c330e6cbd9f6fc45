//! Property tests for the timing math, the speed estimator, and the
//! edge detector.

use proptest::prelude::*;

use katapult::release::release_delay;
use katapult::sensors::EdgeDetector;
use katapult::tracker::{RPM_WINDOW, RotationTracker};

proptest! {
    #[test]
    fn delay_stays_within_one_revolution(
        target in -720..720i32,
        reference in 0..360i32,
        rpm in 0.1f64..4000.0,
        latency in 0.0f64..0.5,
    ) {
        let d = release_delay(target, rpm, reference, latency);
        prop_assert!(d >= 0.0);
        // The target is less than a full turn past the sensor.
        prop_assert!(d <= 60.0 / rpm);
    }

    #[test]
    fn unknown_speed_is_always_immediate(
        target in -720..720i32,
        rpm in -1000.0f64..=0.0,
    ) {
        prop_assert_eq!(release_delay(target, rpm, 45, 0.15), 0.0);
    }

    #[test]
    fn longer_latency_never_lengthens_the_wait(
        target in -720..720i32,
        rpm in 0.1f64..4000.0,
        latency in 0.0f64..0.5,
        extra in 0.0f64..0.5,
    ) {
        let base = release_delay(target, rpm, 45, latency);
        let more = release_delay(target, rpm, 45, latency + extra);
        prop_assert!(more <= base);
    }

    #[test]
    fn steady_wheel_converges_to_true_speed(
        period in 0.01f64..10.0,
        pulses in 2usize..12,
    ) {
        let mut tracker = RotationTracker::new();
        for i in 0..pulses {
            tracker.record_pulse(i as f64 * period);
        }
        let expected = 60.0 / period;
        let rpm = tracker.average_rpm();
        prop_assert!((rpm - expected).abs() < expected * 1e-9, "rpm {} vs {}", rpm, expected);
    }

    #[test]
    fn average_bounded_by_recent_instantaneous_rates(
        periods in prop::collection::vec(0.01f64..5.0, 1..10),
    ) {
        let mut tracker = RotationTracker::new();
        let mut t = 0.0;
        tracker.record_pulse(t);

        let mut rates = Vec::new();
        for p in &periods {
            t += p;
            tracker.record_pulse(t);
            rates.push(60.0 / p);
        }

        let window = &rates[rates.len().saturating_sub(RPM_WINDOW)..];
        let lo = window.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = window.iter().copied().fold(0.0f64, f64::max);

        let rpm = tracker.average_rpm();
        prop_assert!(rpm >= lo - lo * 1e-9);
        prop_assert!(rpm <= hi + hi * 1e-9);
    }

    #[test]
    fn detector_edges_always_alternate(levels in prop::collection::vec(any::<bool>(), 1..200)) {
        let mut detector = EdgeDetector::new(0);
        let mut last = None;
        for (i, level) in levels.iter().enumerate() {
            if let Some(edge) = detector.sample(*level, i as f64 * 0.001) {
                if let Some(prev) = last {
                    prop_assert_ne!(prev, edge);
                }
                last = Some(edge);
            }
        }
    }
}
