//! System configuration parameters
//!
//! All tunable parameters for the Katapult launcher. The values are
//! compiled-in defaults; nothing is persisted — the spec'd behavior is a
//! clean reset on every boot, servo parked at idle.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Release timing ---
    /// Angular position of the hall sensor's detection point, degrees
    /// relative to the wheel's 0° mark. Calibration constant; immutable
    /// for the process lifetime.
    pub sensor_reference_angle_deg: i32,
    /// Estimated time between commanding the servo open and the
    /// projectile actually leaving the compartment (seconds). Subtracted
    /// from every computed wait so the *exit* lines up with the target.
    pub release_latency_secs: f64,

    // --- Servo geometry ---
    /// Servo angle for the closed/rest gate position (degrees, -90..90).
    pub servo_idle_angle_deg: i32,
    /// Servo angle for the open/release gate position (degrees, -90..90).
    pub servo_active_angle_deg: i32,
    /// Pulse width at -90° (microseconds).
    pub servo_min_pulse_us: u32,
    /// Pulse width at +90° (microseconds).
    pub servo_max_pulse_us: u32,

    // --- Rotation sensor ---
    /// Debounce window for the hall input (milliseconds). The pickup is
    /// a clean digital signal; 1 ms suppresses switching noise without
    /// eating real edges even at high wheel speeds.
    pub sensor_debounce_ms: u32,
    /// Hall input poll interval (milliseconds).
    pub sensor_poll_interval_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Release timing
            sensor_reference_angle_deg: 45,
            release_latency_secs: 0.15,

            // Servo
            servo_idle_angle_deg: -90,
            servo_active_angle_deg: 90,
            servo_min_pulse_us: 500,
            servo_max_pulse_us: 2000,

            // Sensor
            sensor_debounce_ms: 1,
            sensor_poll_interval_ms: 1,
        }
    }
}
