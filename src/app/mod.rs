//! Application core — hexagonal domain logic plus its port boundary.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
