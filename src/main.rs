//! Katapult firmware — main entry point.
//!
//! Wheel-synchronized projectile launcher: a hall sensor times the
//! wheel, the control loop schedules the release, a servo opens the
//! compartment gate, and a WiFi AP + HTTP/WebSocket surface drives it
//! all from a phone.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                    │
//! │                                                            │
//! │   HTTP/WS surface      WiFi AP + mDNS      Hall poller     │
//! │        │commands            │                   │pulses    │
//! │        ▼                    │                   ▼          │
//! │  ════════════ bounded control channel ═══════════════      │
//! │                         │                                  │
//! │   ┌─────────────────────▼────────────────────────┐         │
//! │   │  Control loop (executor, task per edge)      │         │
//! │   │  AppService · RotationTracker · TriggerState │         │
//! │   └─────────────────────┬────────────────────────┘         │
//! │                         ▼                                  │
//! │                    ServoDriver (LEDC)                      │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use std::ffi::CString;

use anyhow::Result;
use log::{info, warn};

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::fs::littlefs::Littlefs;
use esp_idf_svc::io::vfs::MountedLittlefs;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use katapult::adapters::http;
use katapult::adapters::net::{self, NetConfig};
use katapult::app::service::AppService;
use katapult::broadcast::BroadcastHub;
use katapult::config::SystemConfig;
use katapult::drivers::{hw_init, ServoDriver};
use katapult::{runtime, sensors};

/// Mount the UI partition at [`http::UI_ROOT`]. The returned guard must
/// stay alive for the life of the process.
fn mount_ui_partition() -> Result<MountedLittlefs<Littlefs<CString>>> {
    // SAFETY: called once at startup, before the HTTP server can issue
    // any filesystem reads.
    unsafe {
        let fs = Littlefs::new_partition("lfs")?;
        Ok(MountedLittlefs::mount(fs, http::UI_ROOT)?)
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Katapult v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // Compiled-in defaults; state is intentionally volatile and every
    // boot starts disarmed with the gate closed.
    let config = SystemConfig::default();

    // ── 2. Hardware bring-up (fatal on failure) ───────────────
    hw_init::init_peripherals().map_err(katapult::Error::from)?;

    let mut servo = ServoDriver::new(&config);
    servo.initialize()?;

    // ── 3. Network: soft-AP, mDNS, UI filesystem, HTTP ────────
    let (_wifi, _mdns) = net::start_network(peripherals.modem, sysloop, nvs, &NetConfig::default())?;

    // The launcher stays operable over the API without its UI assets.
    let _ui_fs = match mount_ui_partition() {
        Ok(m) => Some(m),
        Err(e) => {
            warn!("UI partition mount failed ({}), API only", e);
            None
        }
    };

    let _server = http::start_http_server()?;

    // ── 4. Sensor poller ──────────────────────────────────────
    sensors::hall::spawn_hall_poller(&config)?;

    // ── 5. Control loop (never returns) ───────────────────────
    info!("System ready. Entering control loop.");
    runtime::run_control_loop(AppService::new(config), servo, BroadcastHub::new());

    Ok(())
}
