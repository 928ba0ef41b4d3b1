//! Blocking byte source over any `std::io::Read`
//!
//! Covers both live transports (an opened serial device node, configured
//! externally) and recorded captures played back from a file.

use crate::hardware::{ByteSource, SourceError, SourceResult};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Byte source adapter over a blocking reader
#[derive(Debug)]
pub struct StreamSource<R: Read> {
    inner: R,
}

impl<R: Read> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Release the underlying reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl StreamSource<File> {
    /// Open a device node or capture file as a byte source
    pub fn open<P: AsRef<Path>>(path: P) -> SourceResult<Self> {
        let file = File::open(&path).map_err(|e| SourceError::Io {
            message: format!("failed to open '{}': {}", path.as_ref().display(), e),
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> SourceResult<usize> {
        loop {
            match self.inner.read(buf) {
                Ok(n) => return Ok(n),
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(SourceError::Io {
                        message: e.to_string(),
                    })
                }
            }
        }
    }
}
