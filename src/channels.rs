//! Control-loop inter-task channel.
//!
//! Everything that mutates trigger state, rotation history, or the servo
//! flows through one bounded `embassy-sync` channel into the control
//! loop, so all mutation happens on a single sequential timeline:
//!
//! ```text
//! ┌──────────────┐               ┌───────────────┐
//! │ Sensor task  │── Pulse ─────▶│               │
//! │ HTTP handlers│── Command ───▶│  Control Loop │
//! │ WS handler   │── Session ───▶│  (executor)   │
//! └──────────────┘               └───────────────┘
//! ```
//!
//! Producers use `try_send`: the pulse path runs in interrupt-adjacent
//! context and must never block, so a full queue drops the message with
//! a warning instead of stalling the sensor.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

use crate::app::commands::AppCommand;
use crate::app::ports::SessionSink;

/// One detected revolution boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseMsg {
    /// Monotonic timestamp of the trailing edge, seconds.
    pub t_secs: f64,
}

/// Messages delivered to the control loop.
pub enum CtrlMsg {
    /// A pulse edge was detected on the rotation sensor.
    Pulse(PulseMsg),
    /// An inbound request-layer command.
    Command(AppCommand),
    /// A new broadcast subscriber connected.
    AddSession {
        id: u32,
        sink: Box<dyn SessionSink + Send>,
    },
    /// A subscriber connection closed.
    RemoveSession { id: u32 },
}

/// Channel depth. Pulses dominate the traffic; at the fastest plausible
/// wheel speed (~10 rev/s) even a briefly stalled consumer leaves slack.
const CTRL_DEPTH: usize = 32;

static CTRL_CHANNEL: Channel<CriticalSectionRawMutex, CtrlMsg, CTRL_DEPTH> = Channel::new();

/// Mirror of the trigger's armed flag, maintained by the control loop so
/// request handlers on other threads can validate without a round-trip.
static ARMED_MIRROR: AtomicBool = AtomicBool::new(false);

// ── Producers ────────────────────────────────────────────────

/// Publish a pulse edge. Never blocks; drops (with a warning) when the
/// control loop has fallen behind.
pub fn push_pulse(t_secs: f64) -> bool {
    let ok = CTRL_CHANNEL
        .try_send(CtrlMsg::Pulse(PulseMsg { t_secs }))
        .is_ok();
    if !ok {
        warn!("control queue full, pulse at {:.4}s dropped", t_secs);
    }
    ok
}

/// Publish a request-layer command.
pub fn push_command(cmd: AppCommand) -> bool {
    let ok = CTRL_CHANNEL.try_send(CtrlMsg::Command(cmd)).is_ok();
    if !ok {
        warn!("control queue full, command {:?} dropped", cmd);
    }
    ok
}

/// Register a broadcast subscriber with the control loop.
pub fn push_add_session(id: u32, sink: Box<dyn SessionSink + Send>) -> bool {
    CTRL_CHANNEL.try_send(CtrlMsg::AddSession { id, sink }).is_ok()
}

/// Deregister a broadcast subscriber.
pub fn push_remove_session(id: u32) -> bool {
    CTRL_CHANNEL.try_send(CtrlMsg::RemoveSession { id }).is_ok()
}

// ── Consumer ─────────────────────────────────────────────────

/// Receive the next control message (control loop only).
pub async fn recv() -> CtrlMsg {
    CTRL_CHANNEL.receive().await
}

/// Non-blocking receive, for draining in tests.
pub fn try_recv() -> Option<CtrlMsg> {
    CTRL_CHANNEL.try_receive().ok()
}

// ── Armed-flag mirror ────────────────────────────────────────

/// Update the armed mirror. Called by the control loop after any
/// state-changing message.
pub fn set_armed_mirror(armed: bool) {
    ARMED_MIRROR.store(armed, Ordering::Release);
}

/// Read the armed mirror (request-handler threads).
pub fn armed_mirror() -> bool {
    ARMED_MIRROR.load(Ordering::Acquire)
}
