//! Monotonic time source.
//!
//! - **`target_os = "espidf"`** — `esp_timer_get_time()`, the ESP-IDF
//!   high-resolution timer (microsecond precision, monotonic).
//! - **everything else** — `std::time::Instant` anchored at first use,
//!   for host-side tests and simulation.
//!
//! All pulse timestamps in the system come from here, so revolution
//! periods are immune to wall-clock adjustments.

/// Seconds since boot as a float, microsecond granularity.
#[cfg(target_os = "espidf")]
pub fn now_secs() -> f64 {
    // SAFETY: esp_timer_get_time is a counter read, callable from any task.
    (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as f64 / 1_000_000.0
}

/// Seconds since boot as a float, microsecond granularity.
#[cfg(not(target_os = "espidf"))]
pub fn now_secs() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_secs_f64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_and_nonnegative() {
        let a = now_secs();
        let b = now_secs();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
