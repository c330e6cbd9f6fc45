//! State broadcast hub.
//!
//! Fan-out of [`AppEvent`]s to every live subscriber (WebSocket clients
//! on target, queue-backed mocks in tests). Each subscriber owns its own
//! bounded queue behind a [`SessionSink`]; the hub serialises an event
//! once and `try_send`s it to everyone.
//!
//! Delivery policy, in service of the timing path:
//! - a full session queue drops *that session's* copy and moves on,
//! - a dead session is pruned on the first failed send,
//! - the hub never waits on anyone. New subscribers see only events
//!   published after they joined — no history replay.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SessionSendError, SessionSink};

struct Session {
    id: u32,
    sink: Box<dyn SessionSink + Send>,
}

/// Registry of live broadcast subscribers.
#[derive(Default)]
pub struct BroadcastHub {
    sessions: Vec<Session>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber under `id` (ids are allocated by the
    /// transport adapter; duplicates replace the older session).
    pub fn add_session(&mut self, id: u32, sink: Box<dyn SessionSink + Send>) {
        self.sessions.retain(|s| s.id != id);
        self.sessions.push(Session { id, sink });
        info!("broadcast: session {} added ({} live)", id, self.sessions.len());
    }

    /// Remove a subscriber. Unknown ids are a no-op.
    pub fn remove_session(&mut self, id: u32) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() != before {
            info!("broadcast: session {} removed", id);
        }
    }

    /// Number of live subscribers.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Serialise `event` once and offer it to every session.
    pub fn publish(&mut self, event: &AppEvent) {
        if self.sessions.is_empty() {
            return;
        }
        let text = match event.to_wire_json() {
            Ok(t) => t,
            Err(e) => {
                warn!("broadcast: failed to encode {:?}: {}", event, e);
                return;
            }
        };

        self.sessions.retain_mut(|s| match s.sink.send_text(&text) {
            Ok(()) => true,
            Err(SessionSendError::QueueFull) => {
                warn!("broadcast: session {} queue full, message dropped", s.id);
                true
            }
            Err(SessionSendError::Disconnected) => {
                info!("broadcast: session {} gone, pruned", s.id);
                false
            }
        });
    }
}

impl EventSink for BroadcastHub {
    fn emit(&mut self, event: &AppEvent) {
        self.publish(event);
    }
}
