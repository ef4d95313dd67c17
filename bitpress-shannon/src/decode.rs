//! Shannon-Fano decoder.
//!
//! Code bits are queued as they arrive and resolved against the parser tree
//! one word at a time; a code cut off by the end of a read waits in the
//! queue for the next one. Decoded words are expanded back into bits, and
//! the last `word_pad_bits` of them are held back until end of stream,
//! where they are dropped: they are the padding added to the final word.

use crate::header::ShannonFanoHeader;
use crate::tree::ParserTree;
use bitpress_core::bitstream::BitReader;
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::pending::PendingBits;
use std::io::{Read, Write};
use tracing::debug;

/// Word-level Shannon-Fano decoder.
#[derive(Debug, Clone)]
pub struct ShannonFanoDecoder {
    tree: ParserTree,
    word_pad_bits: usize,
    code_bits: PendingBits,
    word_bits_out: PendingBits,
    /// Stream position of the first queued code bit.
    position: u64,
    words: u64,
}

impl ShannonFanoDecoder {
    /// Create a decoder from a parsed tree.
    ///
    /// `position` is the stream offset of the first code bit and is only
    /// used in error reports.
    pub fn new(tree: ParserTree, word_pad_bits: u8, position: u64) -> Self {
        Self {
            tree,
            word_pad_bits: usize::from(word_pad_bits),
            code_bits: PendingBits::new(),
            word_bits_out: PendingBits::new(),
            position,
            words: 0,
        }
    }

    /// Words decoded so far.
    pub fn words(&self) -> u64 {
        self.words
    }

    /// Queue more code bits.
    pub fn push_bits(&mut self, bits: &[u8]) {
        self.code_bits.extend_from_slice(bits);
    }

    /// Queue the next chunk of code bits from `reader`, using `chunk` as
    /// scratch. Returns the number of bits queued; `0` means end of stream.
    pub fn fill_from<R: Read>(
        &mut self,
        reader: &mut BitReader<R>,
        chunk: &mut [u8],
    ) -> Result<usize> {
        self.code_bits.fill_from(reader, chunk)
    }

    /// Decode every complete code in the queue and append the whole bytes
    /// that are certain not to be word padding to `out`.
    pub fn decode_available(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let word_bits = self.tree.word_bits();

        while let Some((word, consumed)) = self
            .tree
            .resolve(&self.code_bits)
            .map_err(|e| self.locate(e))?
        {
            self.code_bits.skip(consumed);
            self.position += consumed as u64;
            self.word_bits_out.push_value(word, word_bits);
            self.words += 1;
        }

        while self.word_bits_out.len() >= 8 + self.word_pad_bits {
            if let Some(byte) = self.word_bits_out.take_value(8) {
                out.push(byte as u8);
            }
        }

        Ok(())
    }

    /// Drop the word padding and flush the remaining bytes into `out`.
    pub fn finish(&mut self, out: &mut Vec<u8>) -> Result<()> {
        if !self.code_bits.is_empty() {
            return Err(BitpressError::malformed(
                self.position,
                format!(
                    "{} bits at end of stream do not form a complete code",
                    self.code_bits.len()
                ),
            ));
        }

        let remaining = self.word_bits_out.len();
        if remaining < self.word_pad_bits || (remaining - self.word_pad_bits) % 8 != 0 {
            return Err(BitpressError::malformed(
                self.position,
                format!(
                    "{remaining} decoded bits left with {} bits of word padding",
                    self.word_pad_bits
                ),
            ));
        }

        while self.word_bits_out.len() > self.word_pad_bits {
            if let Some(byte) = self.word_bits_out.take_value(8) {
                out.push(byte as u8);
            }
        }
        self.word_bits_out.clear();
        Ok(())
    }

    fn locate(&self, err: BitpressError) -> BitpressError {
        match err {
            BitpressError::MalformedBits { message, .. } => BitpressError::MalformedBits {
                position: self.position,
                message,
            },
            other => other,
        }
    }
}

/// Decode a Shannon-Fano stream from `reader` into `writer`.
///
/// Returns the number of bytes written.
pub fn decode_stream<R: Read, W: Write>(reader: R, mut writer: W) -> Result<u64> {
    let mut reader = BitReader::new(reader);
    let header = ShannonFanoHeader::read_from(&mut reader)?;
    debug!(
        pad_bits = header.pad_bits,
        word_pad_bits = header.word_pad_bits,
        word_bits = header.word_bits,
        distinct_words = header.tree.as_ref().map_or(0, ParserTree::leaf_count),
        "shannon-fano decode start"
    );

    let Some(tree) = header.tree else {
        writer.flush()?;
        return Ok(0);
    };

    let mut decoder = ShannonFanoDecoder::new(tree, header.word_pad_bits, reader.bit_position());
    let mut chunk = vec![0u8; reader.capacity()];
    let mut out = Vec::new();
    let mut written = 0u64;

    loop {
        let n = decoder.fill_from(&mut reader, &mut chunk)?;
        if n == 0 {
            decoder.finish(&mut out)?;
        } else {
            decoder.decode_available(&mut out)?;
        }

        writer.write_all(&out)?;
        written += out.len() as u64;
        out.clear();

        if n == 0 {
            break;
        }
    }

    writer.flush()?;
    debug!(words = decoder.words(), output_bytes = written, "shannon-fano decode done");
    Ok(written)
}
