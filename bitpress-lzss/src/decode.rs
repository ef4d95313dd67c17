//! LZSS decoder.
//!
//! Bits arrive from the reader in buffer-sized chunks and are queued in a
//! [`PendingBits`]. A record is parsed only when all of its bits are queued,
//! so a record split across two chunks waits for the next refill instead of
//! being consumed halfway.

use crate::header::LzssHeader;
use crate::history::History;
use bitpress_core::bitstream::BitReader;
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::pending::PendingBits;
use std::io::{Read, Write};
use tracing::debug;

/// Record-level LZSS decoder.
#[derive(Debug, Clone)]
pub struct LzssDecoder {
    header: LzssHeader,
    history: History,
    pending: PendingBits,
    /// Stream position of the first queued bit.
    position: u64,
}

impl LzssDecoder {
    /// Create a decoder for a stream whose header has already been read.
    pub fn new(header: LzssHeader) -> Self {
        let config = header.config();
        Self {
            history: History::new(config.max_history_len()),
            position: header.bit_len(),
            header,
            pending: PendingBits::new(),
        }
    }

    /// The header this decoder was created from.
    pub fn header(&self) -> &LzssHeader {
        &self.header
    }

    /// The history window.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Number of bits queued but not yet decoded.
    pub fn pending_bits(&self) -> usize {
        self.pending.len()
    }

    /// Queue more record-stream bits.
    pub fn push_bits(&mut self, bits: &[u8]) {
        self.pending.extend_from_slice(bits);
    }

    /// Queue the next chunk of bits from `reader`, using `chunk` as scratch.
    ///
    /// Returns the number of bits queued; `0` means end of stream.
    pub fn fill_from<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        chunk: &mut [u8],
    ) -> Result<usize> {
        self.pending.fill_from(reader, chunk)
    }

    /// Decode every complete record in the queue, appending bytes to `out`.
    pub fn decode_available(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let history_bits = self.header.history_bits;
        let match_bits = self.header.match_bits;
        let match_record_bits = 1 + usize::from(history_bits) + usize::from(match_bits);

        while let Some(tag) = self.pending.peek(0) {
            match tag {
                1 => {
                    if self.pending.len() < 9 {
                        break;
                    }
                    self.pending.skip(1);
                    let byte = self.take(8)? as u8;
                    self.position += 9;

                    out.push(byte);
                    self.history.append(&[byte]);
                }
                0 => {
                    if self.pending.len() < match_record_bits {
                        break;
                    }
                    self.pending.skip(1);
                    let offset = self.take(history_bits)? as usize;
                    let length = self.take(match_bits)? as usize;

                    if length == 0 {
                        return Err(BitpressError::malformed(
                            self.position,
                            "match record with zero length",
                        ));
                    }
                    let bytes = self.history.get(offset, length).ok_or_else(|| {
                        BitpressError::malformed(
                            self.position,
                            format!(
                                "match {offset}+{length} outside history of {} bytes",
                                self.history.len()
                            ),
                        )
                    })?;

                    let start = out.len();
                    out.extend_from_slice(bytes);
                    self.history.append(&out[start..]);
                    self.position += match_record_bits as u64;
                }
                bit => {
                    return Err(BitpressError::malformed(
                        self.position,
                        format!("bit value {bit} is not 0 or 1"),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check that no partial record is left over at end of stream.
    pub fn finish(&self) -> Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            Err(BitpressError::malformed(
                self.position,
                format!("truncated record: {} bits left at end of stream", self.pending.len()),
            ))
        }
    }

    fn take(&mut self, width: u8) -> Result<u64> {
        self.pending
            .take_value(width)
            .ok_or_else(|| BitpressError::unexpected_eof(self.position))
    }
}

/// Decode an LZSS stream from `reader` into `writer`.
///
/// Returns the number of bytes written.
pub fn decode_stream<R: Read, W: Write>(reader: R, mut writer: W) -> Result<u64> {
    let mut reader = BitReader::new(reader);
    let header = LzssHeader::read_from(&mut reader)?;
    debug!(
        pad_bits = header.pad_bits,
        history_bits = header.history_bits,
        match_bits = header.match_bits,
        "lzss decode start"
    );

    let mut decoder = LzssDecoder::new(header);
    let mut chunk = vec![0u8; reader.capacity()];
    let mut out = Vec::new();
    let mut written = 0u64;

    loop {
        if decoder.fill_from(&mut reader, &mut chunk)? == 0 {
            break;
        }
        decoder.decode_available(&mut out)?;

        writer.write_all(&out)?;
        written += out.len() as u64;
        out.clear();
    }

    decoder.finish()?;
    writer.flush()?;

    debug!(
        output_bytes = written,
        history_resets = decoder.history().resets(),
        "lzss decode done"
    );

    Ok(written)
}
