//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  The broadcast hub turns
//! them into wire JSON for WebSocket subscribers; tests record them
//! directly.

use serde::Serialize;
use serde_json::{Value, json};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Smoothed wheel speed, re-broadcast after every recorded pulse.
    RpmUpdate { rpm: f64 },

    /// The trigger was armed or disarmed.
    TriggerStateUpdate { armed: bool },
}

/// Wire envelope shared by every broadcast message.
#[derive(Serialize)]
struct WireMessage {
    kind: &'static str,
    data: Value,
}

impl AppEvent {
    /// Encode as the `{kind, data}` JSON envelope the frontend expects.
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        let msg = match self {
            Self::RpmUpdate { rpm } => WireMessage {
                kind: "RPM_UPDATE",
                data: json!({ "rpm": rpm }),
            },
            Self::TriggerStateUpdate { armed } => WireMessage {
                kind: "TRIGGER_STATE_UPDATE",
                data: json!({ "armed": armed }),
            },
        };
        serde_json::to_string(&msg)
    }
}
