//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (servo driver, event broadcaster, WebSocket sessions)
//! implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use super::events::AppEvent;

// ───────────────────────────────────────────────────────────────
// Actuator commanded state
// ───────────────────────────────────────────────────────────────

/// The two commanded states of the release mechanism. No intermediate
/// positions are modeled; either state is reachable from either state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseState {
    /// Gate closed, projectile retained. The fail-safe startup state.
    #[default]
    Idle,
    /// Gate open, projectile releasing.
    Active,
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command the release servo.
pub trait ActuatorPort {
    /// Drive the physical output to `state`. Unconditional; every call
    /// writes the output, even when the commanded state is unchanged.
    fn command(&mut self, state: ReleaseState);

    /// The most recently commanded state.
    fn commanded_state(&self) -> ReleaseState;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → observers)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port after
/// every pulse and every trigger transition.  Implementations must be
/// fire-and-forget: a slow or dead observer must never stall the caller.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Session sink (broadcast hub → one subscriber)
// ───────────────────────────────────────────────────────────────

/// One live subscriber connection owned by the broadcast hub.
///
/// `send_text` must not block: a full per-session queue reports
/// [`SessionSendError::QueueFull`] (the message is dropped for that
/// session only) and a dead peer reports
/// [`SessionSendError::Disconnected`] (the hub prunes the session).
pub trait SessionSink {
    fn send_text(&mut self, text: &str) -> Result<(), SessionSendError>;
}

/// Errors from [`SessionSink::send_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSendError {
    /// The session's bounded queue is full; message dropped.
    QueueFull,
    /// The peer is gone; the session should be removed.
    Disconnected,
}

impl core::fmt::Display for SessionSendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::QueueFull => write!(f, "session queue full"),
            Self::Disconnected => write!(f, "session disconnected"),
        }
    }
}
