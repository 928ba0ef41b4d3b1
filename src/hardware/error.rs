//! Byte source error types

use std::fmt;

/// Errors reported by a telemetry byte source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// Source closed before the requested read completed
    Exhausted { requested: usize, read: usize },
    /// Underlying transport reported an I/O failure
    Io { message: String },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Exhausted { requested, read } => {
                write!(f, "source exhausted: requested {} bytes, got {}", requested, read)
            }
            SourceError::Io { message } => {
                write!(f, "source I/O error: {}", message)
            }
        }
    }
}

impl std::error::Error for SourceError {}

impl SourceError {
    /// Whether this error is an ordinary end-of-stream rather than a fault
    pub fn is_exhausted(&self) -> bool {
        matches!(self, SourceError::Exhausted { .. })
    }
}

/// Result type for byte source operations
pub type SourceResult<T> = Result<T, SourceError>;
