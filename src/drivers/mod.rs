//! Hardware drivers.
//!
//! `hw_init` performs the one-shot peripheral bring-up with raw ESP-IDF
//! calls; `servo` layers the release-gate logic on top of the configured
//! LEDC channel. Off-target every register access is a no-op so the
//! drivers stay compilable and the state machines stay testable.

pub mod hw_init;
pub mod servo;

pub use hw_init::HwInitError;
pub use servo::ServoDriver;
