//! Shannon-Fano file header.
//!
//! ```text
//! [3-bit pad count][gamma(word_pad_bits)][gamma(word_bits)][tree][codes...]
//! ```
//!
//! An empty input has no words and therefore no tree: the stream ends
//! right after the word width.

use crate::config::{MAX_WORD_BITS, MIN_WORD_BITS};
use crate::tree::ParserTree;
use bitpress_core::bitstream::{BitReader, BitWriter};
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::{gamma, header};
use std::io::{Read, Write};

/// Everything a Shannon-Fano decoder learns before the code stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShannonFanoHeader {
    /// Zero bits padding the final byte.
    pub pad_bits: u8,
    /// Zero bits appended to complete the final word.
    pub word_pad_bits: u8,
    /// Width of one word.
    pub word_bits: u8,
    /// Code tree, absent for an empty input.
    pub tree: Option<ParserTree>,
}

impl ShannonFanoHeader {
    /// Write the header with a placeholder pad count.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        header::write_pad_placeholder(writer)?;
        gamma::write(writer, u64::from(self.word_pad_bits))?;
        gamma::write(writer, u64::from(self.word_bits))?;
        if let Some(tree) = &self.tree {
            tree.write_to(writer)?;
        }
        Ok(())
    }

    /// Read a header and arm `reader` to drop the padding at end of stream.
    pub fn read_from<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let pad_bits = header::read_pad_count(reader)?;

        let position = reader.bit_position();
        let word_pad_bits = gamma::read(reader)?;

        let word_bits = match u8::try_from(gamma::read(reader)?) {
            Ok(bits) if (MIN_WORD_BITS..=MAX_WORD_BITS).contains(&bits) => bits,
            _ => {
                return Err(BitpressError::malformed(
                    position,
                    "word width outside 1..=64",
                ));
            }
        };

        if word_pad_bits >= u64::from(word_bits) {
            return Err(BitpressError::malformed(
                position,
                format!("word padding {word_pad_bits} is not shorter than the {word_bits}-bit word"),
            ));
        }

        let tree = if reader.is_eof()? {
            None
        } else {
            Some(ParserTree::read_from(reader, word_bits)?)
        };

        Ok(Self {
            pad_bits,
            word_pad_bits: word_pad_bits as u8,
            word_bits,
            tree,
        })
    }

    /// Size of the header in bits.
    pub fn bit_len(&self) -> u64 {
        u64::from(header::PAD_FIELD_BITS)
            + u64::from(gamma::encoded_len(u64::from(self.word_pad_bits)))
            + u64::from(gamma::encoded_len(u64::from(self.word_bits)))
            + self.tree.as_ref().map_or(0, ParserTree::header_bits)
    }
}
