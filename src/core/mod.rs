//! Core types and constants for the telemetry decoder

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
