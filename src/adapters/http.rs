//! HTTP + WebSocket control surface.
//!
//! Endpoints:
//!
//! | Route                   | Method | Action                              |
//! |-------------------------|--------|-------------------------------------|
//! | `/api/trigger/initiate` | POST   | toggle arm at `{"angle": <deg>}`    |
//! | `/api/trigger/turn`     | POST   | manual release (servo to active)    |
//! | `/api/reset`            | POST   | servo back to idle                  |
//! | `/api/ws`               | WS     | live RPM / trigger-state broadcasts |
//! | `/*`                    | GET    | control page from LittleFS          |
//!
//! Handlers run on the HTTP server's own threads and never touch state
//! directly: they validate against the armed mirror, then enqueue a
//! command for the control loop. Request parsing and the arm/disarm
//! decision are pure functions so the 400 policy is host-testable.

use serde::Deserialize;

use crate::app::commands::AppCommand;

/// Request body for `/api/trigger/initiate`.
#[derive(Debug, Deserialize)]
struct AngleRequest {
    angle: i32,
}

/// Parse an initiate body. `None` for anything that is not a JSON
/// object with an integer `angle`.
pub fn parse_angle_body(body: &[u8]) -> Option<i32> {
    serde_json::from_slice::<AngleRequest>(body)
        .ok()
        .map(|r| r.angle)
}

/// The initiate decision: arming needs a target angle, disarming does
/// not. `None` means the request is invalid (HTTP 400).
pub fn initiate_command(armed: bool, angle: Option<i32>) -> Option<AppCommand> {
    if !armed && angle.is_none() {
        return None;
    }
    Some(AppCommand::ToggleArm { angle })
}

// ── Static content helpers ────────────────────────────────────

/// Mount point of the UI filesystem.
pub const UI_ROOT: &str = "/frontend";

pub fn mime_type(file_name: &str) -> &'static str {
    match file_name.rsplit('.').next() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("txt") => "text/plain",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

/// Split a stored file name into its logical name and the
/// `Content-Encoding` implied by a compression suffix.
pub fn content_encoding(file_name: &str) -> (&str, &'static str) {
    match file_name.rsplit_once('.') {
        Some((stem, "gz")) => (stem, "gzip"),
        Some((stem, "br")) => (stem, "br"),
        _ => (file_name, "identity"),
    }
}

/// Response headers for a stored file, compression suffix included.
pub fn content_headers(file_name: &str) -> [(&'static str, &'static str); 2] {
    let (logical, encoding) = content_encoding(file_name);
    [
        ("Content-Type", mime_type(logical)),
        ("Content-Encoding", encoding),
    ]
}

/// Lookup order for a requested URI path: precompressed variants first,
/// then the plain file, then the same three for a directory index.
pub fn candidate_files(uri_path: &str) -> [String; 6] {
    let rel = uri_path.trim_start_matches('/');
    let base = if rel.is_empty() {
        format!("{}/index.html", UI_ROOT)
    } else {
        format!("{}/{}", UI_ROOT, rel)
    };
    let index = format!("{}/index.html", base);
    [
        format!("{}.gz", base),
        format!("{}.br", base),
        base,
        format!("{}.gz", index),
        format!("{}.br", index),
        index,
    ]
}

// ── Server wiring (target only) ───────────────────────────────

#[cfg(target_os = "espidf")]
mod server {
    use esp_idf_svc::http::server::{Configuration, EspHttpServer};
    use esp_idf_svc::http::Method;
    use esp_idf_svc::io::{EspIOError, Read, Write};
    use esp_idf_svc::sys::EspError;
    use esp_idf_svc::ws::FrameType;
    use log::info;

    use crate::app::commands::AppCommand;
    use crate::app::ports::{SessionSendError, SessionSink};
    use crate::channels;

    use super::{candidate_files, content_headers, initiate_command, parse_angle_body};

    /// Detached WebSocket sender behind the [`SessionSink`] port.
    struct WsSessionSink {
        sender: esp_idf_svc::http::server::ws::EspHttpWsDetachedSender,
    }

    impl SessionSink for WsSessionSink {
        fn send_text(&mut self, text: &str) -> Result<(), SessionSendError> {
            if self.sender.is_closed() {
                return Err(SessionSendError::Disconnected);
            }
            self.sender
                .send(FrameType::Text(false), text.as_bytes())
                .map_err(|_| SessionSendError::Disconnected)
        }
    }

    /// Start the HTTP server and register every route. The returned
    /// handle must stay alive for the life of the process.
    pub fn start_http_server() -> anyhow::Result<EspHttpServer<'static>> {
        let mut server = EspHttpServer::new(&Configuration {
            uri_match_wildcard: true,
            ..Default::default()
        })?;

        server.fn_handler(
            "/api/trigger/initiate",
            Method::Post,
            |mut request| -> Result<(), EspIOError> {
                let mut buf = [0u8; 128];
                let read = request.read(&mut buf)?;

                let angle = if read == 0 {
                    None
                } else {
                    match parse_angle_body(&buf[..read]) {
                        Some(a) => Some(a),
                        None => {
                            request.into_status_response(400)?;
                            return Ok(());
                        }
                    }
                };

                match initiate_command(channels::armed_mirror(), angle) {
                    Some(cmd) => {
                        channels::push_command(cmd);
                        request.into_ok_response()?;
                    }
                    None => {
                        request.into_status_response(400)?;
                    }
                }
                Ok(())
            },
        )?;

        server.fn_handler(
            "/api/trigger/turn",
            Method::Post,
            |request| -> Result<(), EspIOError> {
                channels::push_command(AppCommand::ManualRelease);
                request.into_ok_response()?;
                Ok(())
            },
        )?;

        server.fn_handler(
            "/api/reset",
            Method::Post,
            |request| -> Result<(), EspIOError> {
                channels::push_command(AppCommand::Reset);
                request.into_ok_response()?;
                Ok(())
            },
        )?;

        server.ws_handler("/api/ws", |ws| {
            let session_id = ws.session() as u32;
            if ws.is_new() {
                let sender = ws.create_detached_sender()?;
                channels::push_add_session(session_id, Box::new(WsSessionSink { sender }));
                ws.send(FrameType::Text(false), b"Connected")?;
                info!("ws: session {} opened", session_id);
            } else if ws.is_closed() {
                channels::push_remove_session(session_id);
                info!("ws: session {} closed", session_id);
            }
            Ok::<(), EspError>(())
        })?;

        server.fn_handler("/*", Method::Get, |request| -> Result<(), EspIOError> {
            for path in candidate_files(request.uri()) {
                if let Ok(contents) = std::fs::read(&path) {
                    let mut response =
                        request.into_response(200, Some("OK"), &content_headers(&path))?;
                    response.write_all(&contents)?;
                    return Ok(());
                }
            }
            request.into_status_response(404)?;
            Ok(())
        })?;

        info!("http: server up");
        Ok(server)
    }
}

#[cfg(target_os = "espidf")]
pub use server::start_http_server;
