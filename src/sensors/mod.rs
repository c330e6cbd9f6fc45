//! Rotation sensing.
//!
//! One module: the hall-effect pickup on the wheel hub. The debounce
//! state machine is pure and host-testable; the polling task that feeds
//! it real GPIO levels only exists on target.

pub mod hall;

pub use hall::{Edge, EdgeDetector};
