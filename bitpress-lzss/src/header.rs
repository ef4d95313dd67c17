//! LZSS file header.
//!
//! ```text
//! [3-bit pad count][gamma(history_bits)][gamma(match_bits)][records...]
//! ```

use crate::config::{LzssConfig, MAX_HISTORY_BITS, MAX_MATCH_BITS, MIN_HISTORY_BITS, MIN_MATCH_BITS};
use bitpress_core::bitstream::{BitReader, BitWriter};
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::{gamma, header};
use std::io::{Read, Write};

/// Parameters recovered from an LZSS header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzssHeader {
    /// Zero bits padding the final byte.
    pub pad_bits: u8,
    /// Width of the offset field.
    pub history_bits: u8,
    /// Width of the length field.
    pub match_bits: u8,
}

impl LzssHeader {
    /// Header for a stream about to be encoded with `config`.
    ///
    /// The pad count is unknown until the stream is finished.
    pub fn for_config(config: &LzssConfig) -> Self {
        Self {
            pad_bits: 0,
            history_bits: config.history_bits,
            match_bits: config.match_bits,
        }
    }

    /// Write the header with a placeholder pad count.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>) -> Result<()> {
        header::write_pad_placeholder(writer)?;
        gamma::write(writer, u64::from(self.history_bits))?;
        gamma::write(writer, u64::from(self.match_bits))?;
        Ok(())
    }

    /// Read a header and arm `reader` to drop the padding at end of stream.
    pub fn read_from<R: Read>(reader: &mut BitReader<R>) -> Result<Self> {
        let pad_bits = header::read_pad_count(reader)?;
        let history_bits = read_width(reader, "history", MIN_HISTORY_BITS, MAX_HISTORY_BITS)?;
        let match_bits = read_width(reader, "match length", MIN_MATCH_BITS, MAX_MATCH_BITS)?;

        Ok(Self {
            pad_bits,
            history_bits,
            match_bits,
        })
    }

    /// Size of the header in bits.
    pub fn bit_len(&self) -> u64 {
        u64::from(header::PAD_FIELD_BITS)
            + u64::from(gamma::encoded_len(u64::from(self.history_bits)))
            + u64::from(gamma::encoded_len(u64::from(self.match_bits)))
    }

    /// Decoding parameters as a configuration value.
    pub fn config(&self) -> LzssConfig {
        LzssConfig::new(self.history_bits, self.match_bits)
    }
}

fn read_width<R: Read>(reader: &mut BitReader<R>, field: &str, min: u8, max: u8) -> Result<u8> {
    let position = reader.bit_position();
    let value = gamma::read(reader)?;
    match u8::try_from(value) {
        Ok(bits) if (min..=max).contains(&bits) => Ok(bits),
        _ => Err(BitpressError::malformed(
            position,
            format!("{field} field width {value} outside {min}..={max}"),
        )),
    }
}
