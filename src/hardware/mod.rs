//! Hardware abstraction layer for the telemetry link
//!
//! The transport itself (port open/configure) is an external collaborator;
//! this module only defines the byte-stream capability the decoder consumes,
//! plus adapters for blocking readers and tests.

pub mod source;
pub mod stream;
pub mod mock;
pub mod error;

pub use source::ByteSource;
pub use stream::StreamSource;
pub use mock::MockByteSource;
pub use error::{SourceError, SourceResult};
