//! Leftover-bit queue for record decoders.
//!
//! Decoders pull bits from a [`BitReader`] in buffer-sized chunks, but their
//! records rarely line up with chunk boundaries. `PendingBits` holds the bits
//! that have been read but not yet consumed, so a record split across two
//! chunks is decoded only once all of its bits are present.

use crate::bitstream::BitReader;
use crate::error::Result;
use std::collections::VecDeque;
use std::io::Read;

/// FIFO of `0`/`1` values awaiting interpretation.
#[derive(Debug, Clone, Default)]
pub struct PendingBits {
    bits: VecDeque<u8>,
}

impl PendingBits {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Append bits at the back of the queue.
    pub fn extend_from_slice(&mut self, bits: &[u8]) {
        self.bits.extend(bits.iter().copied());
    }

    /// Append `value` as `width` bits, most significant first.
    pub fn push_value(&mut self, value: u64, width: u8) {
        for shift in (0..width).rev() {
            self.bits.push_back(((value >> shift) & 1) as u8);
        }
    }

    /// Look at the bit `index` positions from the front.
    pub fn peek(&self, index: usize) -> Option<u8> {
        self.bits.get(index).copied()
    }

    /// Consume a `width`-bit MSB-first value from the front.
    ///
    /// Returns `None` and leaves the queue untouched if fewer than `width`
    /// bits are queued.
    pub fn take_value(&mut self, width: u8) -> Option<u64> {
        if self.bits.len() < width as usize {
            return None;
        }
        Some(
            self.bits
                .drain(..width as usize)
                .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit)),
        )
    }

    /// Discard the first `count` bits.
    pub fn skip(&mut self, count: usize) {
        let count = count.min(self.bits.len());
        self.bits.drain(..count);
    }

    /// Discard everything.
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    /// Pull up to `chunk.len()` bits from `reader` into the queue.
    ///
    /// `chunk` is scratch space. Returns the number of bits added; `0` means
    /// the reader is at end of stream.
    pub fn fill_from<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        chunk: &mut [u8],
    ) -> Result<usize> {
        let n = reader.read(chunk)?;
        self.extend_from_slice(&chunk[..n]);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_take_value_waits_for_enough_bits() {
        let mut pending = PendingBits::new();
        pending.extend_from_slice(&[1, 0, 1]);
        assert_eq!(pending.take_value(4), None);
        assert_eq!(pending.len(), 3);

        pending.extend_from_slice(&[1]);
        assert_eq!(pending.take_value(4), Some(0b1011));
        assert!(pending.is_empty());
    }

    #[test]
    fn test_push_value_and_peek() {
        let mut pending = PendingBits::new();
        pending.push_value(0b110, 3);
        assert_eq!(pending.peek(0), Some(1));
        assert_eq!(pending.peek(2), Some(0));
        assert_eq!(pending.peek(3), None);
        pending.skip(1);
        assert_eq!(pending.take_value(2), Some(0b10));
    }

    #[test]
    fn test_skip_and_clear() {
        let mut pending = PendingBits::new();
        pending.extend_from_slice(&[1, 1, 0, 0, 1]);
        pending.skip(1);
        assert_eq!(pending.take_value(3), Some(0b100));

        pending.skip(10);
        assert!(pending.is_empty());

        pending.push_value(0b11, 2);
        pending.clear();
        assert!(pending.is_empty());
    }

    #[test]
    fn test_fill_from_reader() {
        let mut reader = BitReader::with_capacity(Cursor::new(vec![0xF0, 0x0F]), 8);
        let mut pending = PendingBits::new();
        let mut chunk = [0u8; 64];

        assert_eq!(pending.fill_from(&mut reader, &mut chunk).unwrap(), 8);
        assert_eq!(pending.fill_from(&mut reader, &mut chunk).unwrap(), 8);
        assert_eq!(pending.fill_from(&mut reader, &mut chunk).unwrap(), 0);
        assert_eq!(pending.take_value(16), Some(0xF00F));
    }
}
