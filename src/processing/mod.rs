//! Frame decoding and signal processing

pub mod layout;
pub mod decoder;
pub mod kalman;

pub use layout::{FieldKind, FieldSpec, FrameFormat, FrameLayout, Scale};
pub use decoder::{FrameDecoder, StopReason};
pub use kalman::{Estimate, ScalarKalmanFilter};
