//! Trigger state and release-delay timing math.
//!
//! The wheel carries the projectile past the hall sensor once per
//! revolution. When armed, the next sensed pulse starts a wait sized so
//! the compartment is at the caller's target angle when the projectile
//! actually exits — the servo's mechanical latency is subtracted from
//! the geometric wait, clamped at zero.

/// Arm/disarm flag plus the angle the next release should hit.
///
/// Owned by the application service; mutated only through [`arm`] and
/// [`disarm`], each of which the service follows with a state broadcast.
///
/// [`arm`]: TriggerState::arm
/// [`disarm`]: TriggerState::disarm
#[derive(Debug, Default, Clone, Copy)]
pub struct TriggerState {
    armed: bool,
    target_angle_deg: i32,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for a release at `target_angle_deg`.
    ///
    /// Rejected (returns `false`, no field changes) when already armed:
    /// the caller layer treats a second arm request as a disarm toggle,
    /// and the stored target must survive it untouched.
    pub fn arm(&mut self, target_angle_deg: i32) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        self.target_angle_deg = target_angle_deg;
        true
    }

    /// Clear the armed flag. The stored target angle is left in place.
    pub fn disarm(&mut self) {
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn target_angle_deg(&self) -> i32 {
        self.target_angle_deg
    }
}

/// Compute the wait (seconds) between a sensed pulse and the servo
/// command so the projectile exits at `target_deg`.
///
/// * `rpm <= 0` means the wheel speed is unknown — release immediately
///   rather than guessing (fail-safe default).
/// * `latency_secs` is the command-to-exit mechanical latency; if it
///   exceeds the geometric wait the result clamps to zero and the
///   release is commanded on the spot.
pub fn release_delay(target_deg: i32, rpm: f64, reference_deg: i32, latency_secs: f64) -> f64 {
    let rps = rpm / 60.0;
    if rps <= 0.0 {
        return 0.0;
    }
    let period_secs = 1.0 / rps;

    // Always in [0, 360): how far past the sensor the target sits.
    let angle_delta = (target_deg - reference_deg).rem_euclid(360);
    let ratio = f64::from(angle_delta) / 360.0;

    (ratio * period_secs - latency_secs).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REF: i32 = 45;
    const LATENCY: f64 = 0.15;
    const EPS: f64 = 1e-9;

    #[test]
    fn unknown_speed_releases_immediately() {
        assert_eq!(release_delay(135, 0.0, REF, LATENCY), 0.0);
        assert_eq!(release_delay(135, -10.0, REF, LATENCY), 0.0);
        assert_eq!(release_delay(0, 0.0, REF, LATENCY), 0.0);
    }

    #[test]
    fn target_at_reference_is_zero_for_any_speed() {
        for rpm in [1.0, 60.0, 600.0, 4000.0] {
            assert_eq!(release_delay(REF, rpm, REF, LATENCY), 0.0);
        }
    }

    #[test]
    fn half_turn_at_sixty_rpm() {
        // 60 rpm → 1 s period; 180° past the sensor → half a period.
        let d = release_delay(REF + 180, 60.0, REF, LATENCY);
        assert!((d - (0.5 - LATENCY)).abs() < EPS);
    }

    #[test]
    fn latency_exceeding_window_clamps_to_zero() {
        // 600 rpm → 0.1 s period; even a full turn (0.1 s) is shorter
        // than the 0.15 s latency.
        assert_eq!(release_delay(REF + 359, 600.0, REF, LATENCY), 0.0);
    }

    #[test]
    fn angle_delta_wraps_below_reference() {
        // Target 10° with sensor at 45° → 325° of travel remaining.
        let d = release_delay(10, 60.0, REF, 0.0);
        assert!((d - 325.0 / 360.0).abs() < EPS);
    }

    #[test]
    fn negative_and_large_targets_fold_into_range() {
        let a = release_delay(-315, 60.0, REF, 0.0); // ≡ 45° ⇒ 0 travel
        assert_eq!(a, 0.0);
        let b = release_delay(405, 60.0, REF, 0.0); // ≡ 45° ⇒ 0 travel
        assert_eq!(b, 0.0);
        let c = release_delay(225 + 720, 60.0, REF, 0.0);
        assert!((c - 0.5).abs() < EPS);
    }

    #[test]
    fn second_arm_is_rejected_and_preserves_target() {
        let mut t = TriggerState::new();
        assert!(t.arm(135));
        assert!(t.is_armed());
        assert!(!t.arm(270));
        assert_eq!(t.target_angle_deg(), 135);
    }

    #[test]
    fn disarm_clears_armed_only() {
        let mut t = TriggerState::new();
        assert!(t.arm(90));
        t.disarm();
        assert!(!t.is_armed());
        assert_eq!(t.target_angle_deg(), 90);
        // Disarming an idle trigger is a no-op.
        t.disarm();
        assert!(!t.is_armed());
    }
}
