//! Splitting a byte stream into fixed-width words.

use bitpress_core::bitstream::BitReader;
use bitpress_core::error::Result;
use std::io::Read;

/// A word read from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    /// Word value, MSB-first; missing low bits of a short final word are zero.
    pub value: u64,
    /// Number of bits that came from the input.
    pub bits: u8,
}

/// Iterates over the `word_bits`-wide words of a byte stream.
#[derive(Debug)]
pub struct WordReader<R: Read> {
    reader: BitReader<R>,
    word_bits: u8,
}

impl<R: Read> WordReader<R> {
    /// Wrap a byte source.
    pub fn new(reader: R, word_bits: u8) -> Self {
        Self {
            reader: BitReader::new(reader),
            word_bits,
        }
    }

    /// Read the next word, zero-padding a short final word.
    ///
    /// Returns `None` once the input is exhausted.
    pub fn next_word(&mut self) -> Result<Option<Word>> {
        let mut value = 0u64;
        let mut bits = 0u8;

        while bits < self.word_bits {
            match self.reader.read_bit()? {
                Some(bit) => {
                    value = (value << 1) | u64::from(bit);
                    bits += 1;
                }
                None => break,
            }
        }

        if bits == 0 {
            return Ok(None);
        }
        value <<= self.word_bits - bits;
        Ok(Some(Word { value, bits }))
    }

    /// Bits read from the input so far.
    pub fn bits_read(&self) -> u64 {
        self.reader.bit_position()
    }

    /// Return the underlying source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(data: &[u8], word_bits: u8) -> Vec<Word> {
        let mut words = WordReader::new(data, word_bits);
        let mut out = Vec::new();
        while let Some(word) = words.next_word().unwrap() {
            out.push(word);
        }
        out
    }

    #[test]
    fn test_byte_words() {
        let words = collect(b"ab", 8);
        assert_eq!(
            words,
            vec![
                Word { value: 0x61, bits: 8 },
                Word { value: 0x62, bits: 8 }
            ]
        );
    }

    #[test]
    fn test_short_last_word_is_zero_padded() {
        // 11111111 10000000 splits into 11111 11110 00000 0
        let words = collect(&[0xFF, 0x80], 5);
        assert_eq!(
            words,
            vec![
                Word { value: 0b11111, bits: 5 },
                Word { value: 0b11110, bits: 5 },
                Word { value: 0b00000, bits: 5 },
                Word { value: 0b00000, bits: 1 },
            ]
        );
    }

    #[test]
    fn test_wide_words() {
        let words = collect(&[0x12, 0x34, 0x56], 16);
        assert_eq!(
            words,
            vec![
                Word { value: 0x1234, bits: 16 },
                Word { value: 0x5600, bits: 8 },
            ]
        );

        let words = collect(&[0xAB; 9], 64);
        assert_eq!(words[0].value, 0xABAB_ABAB_ABAB_ABAB);
        assert_eq!(words[1], Word { value: 0xAB << 56, bits: 8 });
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"", 8).is_empty());
    }
}
