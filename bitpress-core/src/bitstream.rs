//! Bit-granular I/O over byte-oriented sources and sinks.
//!
//! This module provides `BitReader` and `BitWriter`, which convert between
//! logical bit sequences (one `0` or `1` value per element) and physical
//! bytes. Both stage data in a fixed-capacity bit buffer so that physical
//! reads and writes always happen in whole bytes.
//!
//! # Bit Ordering
//!
//! Bits are packed MSB-first: the first logical bit of a byte is its most
//! significant bit. Writing `[0, 1, 1, 0, 0, 0, 0, 1]` produces `0x61`.
//!
//! # Stream Boundaries
//!
//! A compressed stream rarely ends on a byte boundary. The writer pads the
//! final byte with zeros through [`BitWriter::fill_remainder`], which reports
//! how many bits it added, and the reader drops exactly that many bits once
//! its source reports end of stream ([`BitReader::ignore_last_bits_at_eof`]).
//!
//! # Example
//!
//! ```
//! use bitpress_core::bitstream::{BitReader, BitWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = BitWriter::new(&mut output);
//!     writer.write(&[1, 0, 1]).unwrap();
//!     let padding = writer.fill_remainder().unwrap();
//!     assert_eq!(padding, 5);
//!     writer.flush().unwrap();
//! }
//! assert_eq!(output, vec![0b1010_0000]);
//!
//! let mut reader = BitReader::new(Cursor::new(output));
//! reader.ignore_last_bits_at_eof(5).unwrap();
//! let mut bits = [0u8; 8];
//! assert_eq!(reader.read(&mut bits).unwrap(), 3);
//! assert_eq!(&bits[..3], &[1, 0, 1]);
//! ```

use crate::error::{BitpressError, Result};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Default staging buffer capacity, in bits.
pub const DEFAULT_BUFFER_BITS: usize = 4096 * 8;

/// Read into `buf`, retrying on interruption.
pub(crate) fn read_some<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    loop {
        match reader.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

#[inline]
fn unpack_byte(byte: u8, out: &mut [u8]) {
    for (i, bit) in out.iter_mut().enumerate() {
        *bit = (byte >> (7 - i)) & 1;
    }
}

#[inline]
fn pack_byte(bits: &[u8]) -> u8 {
    bits.iter().fold(0u8, |acc, &bit| (acc << 1) | bit)
}

/// A bit-level reader that wraps any `Read` implementation.
///
/// Bits are handed out as `0`/`1` values from an internal buffer that is
/// refilled, a whole number of bytes at a time, when it runs dry. One byte is
/// always read ahead so the reader knows which refill holds the end of the
/// stream; that is where trailing padding gets dropped.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Unpacked bits, one `0`/`1` value per element.
    bits: Vec<u8>,
    /// Index of the next bit to hand out.
    position: usize,
    /// Number of valid bits in `bits`.
    filled: usize,
    /// Raw byte staging area.
    bytes: Vec<u8>,
    /// Byte read ahead of the buffer to detect end of stream.
    lookahead: Option<u8>,
    /// Whether the source has reported end of stream.
    source_exhausted: bool,
    /// Number of bits to drop from the tail once end of stream is seen.
    ignore_at_eof: usize,
    /// Number of tail bits already dropped.
    trimmed_bits: usize,
    /// Total bits handed out (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` with the default buffer capacity.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_BITS)
    }

    /// Create a new `BitReader` buffering `capacity_bits` bits at a time.
    ///
    /// The capacity is rounded down to whole bytes, with a minimum of one byte.
    pub fn with_capacity(reader: R, capacity_bits: usize) -> Self {
        let capacity_bytes = (capacity_bits / 8).max(1);
        Self {
            reader,
            bits: vec![0; capacity_bytes * 8],
            position: 0,
            filled: 0,
            bytes: vec![0; capacity_bytes],
            lookahead: None,
            source_exhausted: false,
            ignore_at_eof: 0,
            trimmed_bits: 0,
            total_bits_read: 0,
        }
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.reader
    }

    /// Get a mutable reference to the underlying reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consume this `BitReader` and return the underlying reader.
    ///
    /// Buffered bits, including the read-ahead byte, are lost.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Buffer capacity in bits.
    pub fn capacity(&self) -> usize {
        self.bits.len()
    }

    /// Get the current bit position (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Number of bits buffered and not yet handed out.
    pub fn buffered(&self) -> usize {
        self.filled - self.position
    }

    /// Drop the last `count` bits of the stream once end of stream is reached.
    ///
    /// This realizes the pad-count header field: the writer zero-padded the
    /// final byte with `count` bits. If the end of stream has already been
    /// buffered, the truncation applies immediately.
    pub fn ignore_last_bits_at_eof(&mut self, count: usize) -> Result<()> {
        self.ignore_at_eof = count;
        if self.source_exhausted {
            self.trim_tail()?;
        }
        Ok(())
    }

    /// Drop tail bits from the final buffer, up to `ignore_at_eof` in total.
    fn trim_tail(&mut self) -> Result<()> {
        if self.ignore_at_eof <= self.trimmed_bits {
            return Ok(());
        }

        let extra = self.ignore_at_eof - self.trimmed_bits;
        let remaining = self.filled - self.position;
        if extra > remaining {
            return Err(BitpressError::malformed(
                self.total_bits_read,
                format!("cannot ignore {extra} trailing bits, only {remaining} remain"),
            ));
        }

        self.filled -= extra;
        self.trimmed_bits = self.ignore_at_eof;
        Ok(())
    }

    /// Refill the bit buffer from the source.
    fn refill(&mut self) -> Result<()> {
        self.position = 0;
        self.filled = 0;

        let mut count = 0;
        if let Some(byte) = self.lookahead.take() {
            self.bytes[0] = byte;
            count = 1;
        }

        while count < self.bytes.len() && !self.source_exhausted {
            let n = read_some(&mut self.reader, &mut self.bytes[count..])?;
            if n == 0 {
                self.source_exhausted = true;
            } else {
                count += n;
            }
        }

        if !self.source_exhausted {
            let mut probe = [0u8; 1];
            if read_some(&mut self.reader, &mut probe)? == 0 {
                self.source_exhausted = true;
            } else {
                self.lookahead = Some(probe[0]);
            }
        }

        for (i, &byte) in self.bytes[..count].iter().enumerate() {
            unpack_byte(byte, &mut self.bits[i * 8..i * 8 + 8]);
        }
        self.filled = count * 8;

        if self.source_exhausted {
            self.trim_tail()?;
        }

        Ok(())
    }

    /// Read up to `buf.len()` bits.
    ///
    /// Returns the number of bits copied into `buf`; `0` means end of stream.
    /// At most one buffer's worth of bits is returned per call.
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if self.position >= self.filled {
            self.refill()?;
        }

        let n = buf.len().min(self.filled - self.position);
        buf[..n].copy_from_slice(&self.bits[self.position..self.position + n]);
        self.position += n;
        self.total_bits_read += n as u64;

        Ok(n)
    }

    /// Read a single bit, or `None` at end of stream.
    #[inline]
    pub fn read_bit(&mut self) -> Result<Option<u8>> {
        if self.position >= self.filled {
            self.refill()?;
            if self.filled == 0 {
                return Ok(None);
            }
        }

        let bit = self.bits[self.position];
        self.position += 1;
        self.total_bits_read += 1;
        Ok(Some(bit))
    }

    /// Fill `buf` completely, failing if the stream ends first.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut offset = 0;
        while offset < buf.len() {
            let n = self.read(&mut buf[offset..])?;
            if n == 0 {
                return Err(BitpressError::unexpected_eof(self.total_bits_read));
            }
            offset += n;
        }
        Ok(())
    }

    /// Read a `width`-bit unsigned integer, most significant bit first.
    pub fn read_value(&mut self, width: u8) -> Result<u64> {
        debug_assert!(width <= 64, "Cannot read more than 64 bits at once");

        let mut value = 0u64;
        for _ in 0..width {
            let bit = self
                .read_bit()?
                .ok_or_else(|| BitpressError::unexpected_eof(self.total_bits_read))?;
            value = (value << 1) | u64::from(bit);
        }
        Ok(value)
    }

    /// Check whether every bit of the stream has been handed out.
    ///
    /// This may refill the buffer from the source.
    pub fn is_eof(&mut self) -> Result<bool> {
        if self.position >= self.filled {
            self.refill()?;
        }
        Ok(self.position >= self.filled)
    }
}

/// A bit-level writer that wraps any `Write` implementation.
///
/// `BitWriter` accumulates `0`/`1` values and writes packed bytes to the sink
/// whenever its buffer fills. The buffer capacity is a whole number of bytes,
/// so automatic flushes are always byte aligned; an explicit [`flush`] with a
/// partial byte pending is a [`ProtocolViolation`]. Call [`fill_remainder`]
/// first to zero-pad the final byte.
///
/// There is no flush on drop: losing a partial byte silently would hide the
/// protocol violation.
///
/// [`flush`]: BitWriter::flush
/// [`fill_remainder`]: BitWriter::fill_remainder
/// [`ProtocolViolation`]: BitpressError::ProtocolViolation
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Pending bits, one `0`/`1` value per element.
    bits: Vec<u8>,
    /// Number of pending bits.
    pending: usize,
    /// Packed byte staging area.
    bytes: Vec<u8>,
    /// Total bits accepted (excluding raw bytes).
    total_bits_written: u64,
    /// First physical byte written to the sink.
    first_byte: Option<u8>,
}

impl<W: Write> BitWriter<W> {
    /// Create a new `BitWriter` with the default buffer capacity.
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_BUFFER_BITS)
    }

    /// Create a new `BitWriter` buffering up to `capacity_bits` bits.
    ///
    /// The capacity is rounded down to whole bytes, with a minimum of one byte.
    pub fn with_capacity(writer: W, capacity_bits: usize) -> Self {
        let capacity_bytes = (capacity_bits / 8).max(1);
        Self {
            writer,
            bits: vec![0; capacity_bytes * 8],
            pending: 0,
            bytes: vec![0; capacity_bytes],
            total_bits_written: 0,
            first_byte: None,
        }
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Get a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.writer)
    }

    /// Total number of bits written so far, padding included.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Number of bits waiting in the buffer.
    pub fn pending_bits(&self) -> usize {
        self.pending
    }

    /// The first byte that reached the sink, if any.
    pub fn first_byte(&self) -> Option<u8> {
        self.first_byte
    }

    /// Write a sequence of `0`/`1` values.
    ///
    /// Any other value is rejected before anything is buffered.
    pub fn write(&mut self, bits: &[u8]) -> Result<()> {
        if let Some(index) = bits.iter().position(|&bit| bit > 1) {
            return Err(BitpressError::malformed(
                self.total_bits_written + index as u64,
                format!("bit value {} is not 0 or 1", bits[index]),
            ));
        }

        let mut rest = bits;
        while !rest.is_empty() {
            let space = self.bits.len() - self.pending;
            let (head, tail) = rest.split_at(space.min(rest.len()));

            self.bits[self.pending..self.pending + head.len()].copy_from_slice(head);
            self.pending += head.len();
            self.total_bits_written += head.len() as u64;
            rest = tail;

            if self.pending == self.bits.len() {
                self.flush_buffer()?;
            }
        }

        Ok(())
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: u8) -> Result<()> {
        if bit > 1 {
            return Err(BitpressError::malformed(
                self.total_bits_written,
                format!("bit value {bit} is not 0 or 1"),
            ));
        }

        self.bits[self.pending] = bit;
        self.pending += 1;
        self.total_bits_written += 1;

        if self.pending == self.bits.len() {
            self.flush_buffer()?;
        }

        Ok(())
    }

    /// Write `value` as a `width`-bit unsigned integer, most significant bit first.
    pub fn write_value(&mut self, value: u64, width: u8) -> Result<()> {
        debug_assert!(width <= 64, "Cannot write more than 64 bits at once");

        if width < 64 && value >> width != 0 {
            return Err(BitpressError::value_too_wide(value, width));
        }

        for shift in (0..width).rev() {
            self.write_bit(((value >> shift) & 1) as u8)?;
        }
        Ok(())
    }

    /// Zero-pad the pending bits up to the next byte boundary.
    ///
    /// Returns the number of padding bits added (0-7).
    pub fn fill_remainder(&mut self) -> Result<u8> {
        let partial = self.pending % 8;
        if partial == 0 {
            return Ok(0);
        }

        let padding = 8 - partial;
        for _ in 0..padding {
            self.write_bit(0)?;
        }
        Ok(padding as u8)
    }

    /// Pack the pending bits into bytes and write them to the sink.
    fn flush_buffer(&mut self) -> Result<()> {
        if self.pending % 8 != 0 {
            return Err(BitpressError::protocol_violation(self.pending));
        }

        let count = self.pending / 8;
        for (i, byte) in self.bytes[..count].iter_mut().enumerate() {
            *byte = pack_byte(&self.bits[i * 8..i * 8 + 8]);
        }

        if count > 0 {
            if self.first_byte.is_none() {
                self.first_byte = Some(self.bytes[0]);
            }
            self.writer.write_all(&self.bytes[..count])?;
        }

        self.pending = 0;
        Ok(())
    }

    /// Write all pending bits and flush the underlying writer.
    ///
    /// Fails with a protocol violation if the pending bit count is not a
    /// multiple of 8.
    pub fn flush(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write bytes directly to the sink, bypassing bit packing.
    ///
    /// Pending bits are flushed first, so they must be byte aligned.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.flush_buffer()?;
        if self.first_byte.is_none() {
            self.first_byte = bytes.first().copied();
        }
        self.writer.write_all(bytes)?;
        Ok(())
    }
}

impl<W: Write + Seek> BitWriter<W> {
    /// Flush and rewind the sink to offset 0.
    ///
    /// Used to backpatch header fields whose value is only known once the
    /// stream is complete.
    pub fn seek_to_beginning(&mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.writer.seek(SeekFrom::Start(0))?)
    }

    /// Flush and move the sink to its end.
    pub fn seek_to_end(&mut self) -> Result<u64> {
        self.flush()?;
        Ok(self.writer.seek(SeekFrom::End(0))?)
    }
}
