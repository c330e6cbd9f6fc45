//! Platform adapters.
//!
//! The seams between the portable core and ESP-IDF: monotonic time, the
//! WiFi access point + mDNS bring-up, and the HTTP/WebSocket surface.
//! Pure request/encoding logic is host-testable; everything that touches
//! `esp-idf-svc` handles is `target_os = "espidf"` only.

pub mod http;
pub mod net;
pub mod time;
