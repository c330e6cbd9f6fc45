//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the rotation tracker and trigger state and
//! exposes a clean, hardware-agnostic API. All I/O flows through port
//! traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!  pulse edges ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                  │       AppService        │
//!  ActuatorPort ◀──│  Tracker · TriggerState │◀── AppCommand
//!                  └────────────────────────┘
//! ```
//!
//! The service itself is synchronous; the cooperative delay between
//! `plan_release` and `complete_release` lives in the runtime so many
//! releases can be in flight without blocking pulse intake.

use core::time::Duration;
use log::{info, warn};

use crate::config::SystemConfig;
use crate::release::{TriggerState, release_delay};
use crate::tracker::RotationTracker;

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, ReleaseState};

/// The application service orchestrates all domain logic.
pub struct AppService {
    tracker: RotationTracker,
    trigger: TriggerState,
    config: SystemConfig,
}

impl AppService {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            tracker: RotationTracker::new(),
            trigger: TriggerState::new(),
            config,
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (from HTTP, serial, tests).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ToggleArm { angle } => self.toggle_arm(angle, sink),
            AppCommand::ManualRelease => {
                info!("Manual release");
                hw.command(ReleaseState::Active);
            }
            AppCommand::Reset => {
                info!("Reset to idle");
                hw.command(ReleaseState::Idle);
            }
        }
    }

    fn toggle_arm(&mut self, angle: Option<i32>, sink: &mut impl EventSink) {
        if self.trigger.is_armed() {
            // Second toggle while armed: disarm, discard any new angle.
            self.trigger.disarm();
            info!("Trigger disarmed");
            sink.emit(&AppEvent::TriggerStateUpdate { armed: false });
            return;
        }

        let Some(target) = angle else {
            // The adapter layer rejects this before it reaches us; if it
            // slips through, refuse to arm at an undefined angle.
            warn!("Arm request without target angle ignored");
            return;
        };

        self.trigger.arm(target);
        info!("Trigger armed for {}°", target);
        sink.emit(&AppEvent::TriggerStateUpdate { armed: true });
    }

    // ── Pulse-edge pipeline ───────────────────────────────────

    /// First half of the edge handler: if armed, size the wait for the
    /// current target from the rotation history *before* this edge's own
    /// sample is recorded. `None` when disarmed.
    pub fn plan_release(&self) -> Option<Duration> {
        if !self.trigger.is_armed() {
            return None;
        }
        let delay = release_delay(
            self.trigger.target_angle_deg(),
            self.tracker.average_rpm(),
            self.config.sensor_reference_angle_deg,
            self.config.release_latency_secs,
        );
        Some(Duration::from_secs_f64(delay))
    }

    /// Second half of the edge handler, after the planned wait elapses:
    /// open the gate, then drop the armed flag and broadcast.
    ///
    /// Runs unconditionally once a wait has started — a disarm that
    /// raced in during the wait does not cancel the release; it just
    /// makes the final disarm a repeat broadcast.
    pub fn complete_release(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.command(ReleaseState::Active);
        self.trigger.disarm();
        info!("Release fired, trigger disarmed");
        sink.emit(&AppEvent::TriggerStateUpdate { armed: false });
    }

    /// Fold the edge's timestamp into the speed estimate and broadcast
    /// the refreshed average. Always runs, armed or not.
    pub fn record_pulse(&mut self, t_secs: f64, sink: &mut impl EventSink) {
        self.tracker.record_pulse(t_secs);
        let rpm = self.tracker.average_rpm();
        info!("Pulse at {:.4}s, averaged RPM: {:.2}", t_secs, rpm);
        sink.emit(&AppEvent::RpmUpdate { rpm });
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_armed(&self) -> bool {
        self.trigger.is_armed()
    }

    pub fn target_angle_deg(&self) -> i32 {
        self.trigger.target_angle_deg()
    }

    pub fn average_rpm(&self) -> f64 {
        self.tracker.average_rpm()
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }
}
