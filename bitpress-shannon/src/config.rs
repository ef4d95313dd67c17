//! Shannon-Fano encoder configuration.

use bitpress_core::error::{BitpressError, Result};

/// Smallest accepted word width.
pub const MIN_WORD_BITS: u8 = 1;
/// Largest accepted word width.
pub const MAX_WORD_BITS: u8 = 64;

/// Shannon-Fano encoding parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShannonFanoConfig {
    /// Width of one coding word in bits.
    pub word_bits: u8,
}

impl ShannonFanoConfig {
    /// Four-bit words: at most 16 symbols, tiny tree header.
    pub const NIBBLE: Self = Self { word_bits: 4 };

    /// One word per input byte.
    pub const BYTE: Self = Self { word_bits: 8 };

    /// Two-byte words.
    pub const WIDE: Self = Self { word_bits: 16 };

    /// Create a configuration with the given word width.
    pub fn new(word_bits: u8) -> Self {
        Self { word_bits }
    }

    /// Check the word width against its accepted range.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_WORD_BITS..=MAX_WORD_BITS).contains(&self.word_bits) {
            return Err(BitpressError::invalid_parameter(
                "word_bits",
                u64::from(self.word_bits),
                "must be between 1 and 64",
            ));
        }
        Ok(())
    }

    /// Zero bits needed to complete the last word of an `input_bits`-bit input.
    pub fn word_pad_bits(&self, input_bits: u64) -> u8 {
        let word_bits = u64::from(self.word_bits);
        ((word_bits - input_bits % word_bits) % word_bits) as u8
    }
}

impl Default for ShannonFanoConfig {
    fn default() -> Self {
        Self::BYTE
    }
}
