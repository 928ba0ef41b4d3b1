//! PSU Telemetry Toolkit
//!
//! Frame-synchronized decoding of a power-supply controller's telemetry link,
//! plus a two-state recursive estimator for smoothing one noisy channel into
//! a (value, rate) track.

pub mod core;
pub mod processing;
pub mod hardware;
pub mod api;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{ChannelReading, CodeTable, ResolvedCode, Sample, FRAME_MAGIC};
pub use crate::processing::decoder::{FrameDecoder, StopReason};
pub use crate::processing::kalman::{Estimate, ScalarKalmanFilter};
pub use crate::processing::layout::{FieldKind, FieldSpec, FrameFormat, FrameLayout, Scale};
pub use crate::hardware::{ByteSource, MockByteSource, SourceError, SourceResult, StreamSource};
pub use crate::api::{CsvFormatter, JsonFormatter, SampleFormatter, TextFormatter};
pub use crate::utils::{ConfigError, FilterConfig, SessionConfig};
