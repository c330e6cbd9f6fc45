//! Katapult firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod broadcast;
pub mod channels;
pub mod config;
pub mod release;
pub mod runtime;
pub mod tracker;

mod error;
mod pins;

pub use error::{ActuatorError, Error, Result, SensorError};

// Re-export the ESP-IDF-leaning modules so the crate compiles on both
// targets; the hardware-touching halves are cfg-gated inside.
pub mod adapters;
pub mod drivers;
pub mod sensors;
