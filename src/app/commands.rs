//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (HTTP handlers,
//! serial console, tests) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Toggle the release trigger.
    ///
    /// Disarmed → arms for a release at `angle` degrees (the adapter
    /// layer guarantees `angle` is present in that case). Armed →
    /// disarms; any supplied angle is ignored and the stored target is
    /// left untouched.
    ToggleArm { angle: Option<i32> },

    /// Drive the servo to the open position immediately, bypassing the
    /// pulse/delay path (manual override).
    ManualRelease,

    /// Park the servo back at the closed/rest position.
    Reset,
}
