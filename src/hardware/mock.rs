//! Mock byte source for testing and development

use crate::hardware::{ByteSource, SourceError, SourceResult};
use std::collections::VecDeque;

/// Scripted in-memory byte source
///
/// Bytes are queued up front and handed out on demand. Reads can be capped to
/// a chunk size to exercise partial-read handling, and errors can be injected
/// probabilistically.
pub struct MockByteSource {
    buffer: VecDeque<u8>,
    chunk_limit: Option<usize>,
    simulate_errors: bool,
    error_probability: f32,
}

impl MockByteSource {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::new(),
            chunk_limit: None,
            simulate_errors: false,
            error_probability: 0.0,
        }
    }

    /// Create a source preloaded with `data`
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut source = Self::new();
        source.push_bytes(data);
        source
    }

    /// Append bytes to the end of the stream
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend(data.iter().copied());
    }

    /// Cap each read at `limit` bytes to force partial reads
    pub fn with_chunk_limit(mut self, limit: usize) -> Self {
        self.chunk_limit = Some(limit);
        self
    }

    /// Enable error injection with given probability (0.0 to 1.0)
    pub fn simulate_errors(&mut self, enable: bool, probability: f32) {
        self.simulate_errors = enable;
        self.error_probability = probability.clamp(0.0, 1.0);
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> usize {
        self.buffer.len()
    }

    fn should_simulate_error(&self) -> bool {
        if !self.simulate_errors {
            return false;
        }

        use rand::Rng;
        let mut rng = rand::thread_rng();
        rng.gen::<f32>() < self.error_probability
    }
}

impl Default for MockByteSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for MockByteSource {
    fn read(&mut self, buf: &mut [u8]) -> SourceResult<usize> {
        if self.should_simulate_error() {
            return Err(SourceError::Io {
                message: "simulated read failure".to_string(),
            });
        }

        let want = match self.chunk_limit {
            Some(limit) => buf.len().min(limit),
            None => buf.len(),
        };
        let take = want.min(self.buffer.len());
        for slot in buf.iter_mut().take(take) {
            *slot = self.buffer.pop_front().unwrap_or(0);
        }
        Ok(take)
    }
}
