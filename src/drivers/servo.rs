//! Release-gate servo driver.
//!
//! Standard hobby servo on a 50 Hz LEDC channel. Angle commands map
//! linearly from degrees (-90..90) to pulse width (µs) to 14-bit duty
//! counts. The driver tracks its own commanded state so the rest of the
//! system never reads hardware back.
//!
//! Two positions matter: idle keeps the compartment gate closed, active
//! swings it open to release the projectile. Initialization parks the
//! gate at idle; a failed bring-up leaves the driver unusable on purpose
//! so the launcher cannot run with an unparked gate.

use log::{info, warn};

use crate::app::ports::{ActuatorPort, ReleaseState};
use crate::config::SystemConfig;
use crate::drivers::hw_init;
use crate::pins;
use crate::{Error, Result};

pub struct ServoDriver {
    idle_angle_deg: i32,
    active_angle_deg: i32,
    min_pulse_us: u32,
    max_pulse_us: u32,
    state: ReleaseState,
    ready: bool,
}

impl ServoDriver {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            idle_angle_deg: config.servo_idle_angle_deg,
            active_angle_deg: config.servo_active_angle_deg,
            min_pulse_us: config.servo_min_pulse_us,
            max_pulse_us: config.servo_max_pulse_us,
            state: ReleaseState::Idle,
            ready: false,
        }
    }

    /// Validate the geometry and park the gate at idle.
    ///
    /// Must succeed before anything else may command the servo; the
    /// caller treats a failure here as fatal.
    pub fn initialize(&mut self) -> Result<()> {
        if self.min_pulse_us >= self.max_pulse_us {
            return Err(Error::Config("servo pulse range is empty"));
        }
        self.ready = true;
        self.write_angle(self.idle_angle_deg);
        self.state = ReleaseState::Idle;
        info!(
            "servo: parked at idle ({}°, {} µs)",
            self.idle_angle_deg,
            self.pulse_width_us(self.idle_angle_deg)
        );
        Ok(())
    }

    /// Park the gate at idle and stop driving the signal line.
    /// Idempotent, and safe after a failed [`initialize`](Self::initialize).
    pub fn shutdown(&mut self) {
        if !self.ready {
            return;
        }
        self.write_angle(self.idle_angle_deg);
        self.state = ReleaseState::Idle;
        self.ready = false;
        hw_init::ledc_set(pins::LEDC_CH_SERVO, 0);
        info!("servo: parked and signal released");
    }

    /// Linear map from degrees to pulse width, clamped to the servo's
    /// mechanical range.
    fn pulse_width_us(&self, angle_deg: i32) -> u32 {
        let angle = angle_deg.clamp(-90, 90);
        let span = self.max_pulse_us - self.min_pulse_us;
        self.min_pulse_us + ((angle + 90) as u32 * span) / 180
    }

    /// Duty counts for a pulse width at the configured frame rate and
    /// resolution. 20 ms frame, 14-bit counter.
    fn duty_for_pulse(pulse_us: u32) -> u32 {
        let period_us = 1_000_000 / pins::SERVO_PWM_FREQ_HZ;
        let full_scale = 1u32 << pins::SERVO_PWM_RESOLUTION_BITS;
        ((pulse_us as u64 * full_scale as u64) / period_us as u64) as u32
    }

    fn write_angle(&self, angle_deg: i32) {
        let duty = Self::duty_for_pulse(self.pulse_width_us(angle_deg));
        hw_init::ledc_set(pins::LEDC_CH_SERVO, duty);
    }
}

impl ActuatorPort for ServoDriver {
    fn command(&mut self, state: ReleaseState) {
        if !self.ready {
            warn!("servo: command {:?} before init, ignored", state);
            return;
        }
        let angle = match state {
            ReleaseState::Idle => self.idle_angle_deg,
            ReleaseState::Active => self.active_angle_deg,
        };
        self.write_angle(angle);
        self.state = state;
    }

    fn commanded_state(&self) -> ReleaseState {
        self.state
    }
}
