//! GPIO / peripheral pin assignments for the Katapult launcher board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Rotation sensor (A3144 hall-effect pickup on the wheel hub)
// ---------------------------------------------------------------------------

/// Digital input: hall sensor output, active LOW while the magnet passes.
/// One magnet on the wheel → one pulse per revolution.
pub const HALL_SENSOR_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Release servo (standard hobby servo on the compartment gate)
// ---------------------------------------------------------------------------

/// LEDC PWM output driving the release servo signal line.
pub const SERVO_PWM_GPIO: i32 = 32;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  14-bit gives ~1.2 µs duty granularity
/// at 50 Hz, comfortably finer than hobby-servo deadband.
pub const SERVO_PWM_RESOLUTION_BITS: u32 = 14;
/// Standard servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
/// LEDC channel assigned to the servo.
pub const LEDC_CH_SERVO: u32 = 0;
