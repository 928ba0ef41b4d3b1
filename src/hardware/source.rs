//! Byte source interface for the telemetry link

use crate::hardware::{SourceError, SourceResult};

/// Abstraction over the receive side of the telemetry link
///
/// The frame decoder depends only on this capability, not on any particular
/// transport. Implementations block until data is available or the source
/// closes; no timeouts or retries happen at this level.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes, blocking until at least one byte is
    /// available. Returns the number of bytes read; 0 means the source closed.
    fn read(&mut self, buf: &mut [u8]) -> SourceResult<usize>;

    /// Fill `buf` completely, or report the short read via
    /// `SourceError::Exhausted`.
    fn read_exact(&mut self, buf: &mut [u8]) -> SourceResult<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..])? {
                0 => {
                    return Err(SourceError::Exhausted {
                        requested: buf.len(),
                        read: filled,
                    })
                }
                n => filled += n,
            }
        }
        Ok(())
    }
}
