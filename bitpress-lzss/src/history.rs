//! History window shared by the LZSS encoder and decoder.
//!
//! The window is a plain byte buffer that grows until it would overflow its
//! capacity and is then emptied. It never slides: after a reset, offsets
//! start again at 0 and nothing written before the reset is reachable.
//! Encoder and decoder both drive their window through [`History::append`],
//! so the two sides reset at exactly the same record.

use tracing::trace;

/// Bounded history buffer with full reset on overflow.
#[derive(Debug, Clone)]
pub struct History {
    buf: Vec<u8>,
    capacity: usize,
    resets: u64,
}

impl History {
    /// Create an empty history holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            capacity,
            resets: 0,
        }
    }

    /// Current contents, oldest byte first.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes currently held.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Maximum number of bytes held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of resets so far.
    pub fn resets(&self) -> u64 {
        self.resets
    }

    /// Append the bytes of one record.
    ///
    /// The history is cleared first if the bytes would not fit, and cleared
    /// again afterwards if it ends up exactly full.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.buf.len() + bytes.len() > self.capacity {
            self.reset();
        }
        self.buf.extend_from_slice(bytes);
        if self.buf.len() == self.capacity {
            self.reset();
        }
    }

    /// Bytes `offset..offset + length` of the current window, if in range.
    pub fn get(&self, offset: usize, length: usize) -> Option<&[u8]> {
        let end = offset.checked_add(length)?;
        self.buf.get(offset..end)
    }

    fn reset(&mut self) {
        trace!(len = self.buf.len(), "history reset");
        self.buf.clear();
        self.resets += 1;
    }
}
