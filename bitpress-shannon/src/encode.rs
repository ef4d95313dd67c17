//! Two-pass Shannon-Fano encoder.
//!
//! The first pass counts words; the codes built from those counts are then
//! written into the header as a tree, and the second pass re-reads the
//! source from the same starting position to emit one code per word.

use crate::codes::CodeTable;
use crate::config::ShannonFanoConfig;
use crate::frequency::FrequencyTable;
use crate::header::ShannonFanoHeader;
use crate::tree::ParserTree;
use crate::words::WordReader;
use bitpress_core::bitstream::BitWriter;
use bitpress_core::error::{BitpressError, Result};
use bitpress_core::header;
use std::io::{Read, Seek, SeekFrom, Write};
use tracing::debug;

/// Summary of one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShannonFanoStats {
    /// Bits read from the source.
    pub input_bits: u64,
    /// Words coded, including a zero-padded final word.
    pub words: u64,
    /// Distinct words (leaves of the code tree).
    pub distinct_words: usize,
    /// Zero bits appended to complete the final word.
    pub word_pad_bits: u8,
    /// Zero bits padding the final byte.
    pub pad_bits: u8,
    /// Header size in bits, tree included.
    pub header_bits: u64,
    /// Bytes written to the sink.
    pub output_bytes: u64,
}

impl ShannonFanoStats {
    /// Output size as a fraction of input size (0.0 for empty input).
    pub fn ratio(&self) -> f64 {
        if self.input_bits == 0 {
            0.0
        } else {
            (self.output_bytes * 8) as f64 / self.input_bits as f64
        }
    }
}

/// First pass: count every word of `reader`.
///
/// Returns the counts and the number of input bits.
pub fn count_words<R: Read>(reader: R, config: &ShannonFanoConfig) -> Result<(FrequencyTable, u64)> {
    config.validate()?;
    let mut words = WordReader::new(reader, config.word_bits);
    let mut frequencies = FrequencyTable::new();
    while let Some(word) = words.next_word()? {
        frequencies.add(word.value);
    }
    Ok((frequencies, words.bits_read()))
}

/// Compress everything from `reader` into `writer`.
///
/// The source is read twice; it is rewound to the position it had on entry.
/// The sink must start at offset 0: the pad count is patched into the first
/// byte once the code stream is complete.
pub fn compress_stream<R: Read + Seek, W: Write + Seek>(
    mut reader: R,
    writer: W,
    config: &ShannonFanoConfig,
) -> Result<ShannonFanoStats> {
    config.validate()?;
    let origin = reader.stream_position()?;

    let (frequencies, input_bits) = count_words(&mut reader, config)?;
    let codes = CodeTable::build(&frequencies);
    let tree = if codes.is_empty() {
        None
    } else {
        Some(ParserTree::from_codes(&codes, config.word_bits)?)
    };

    let header = ShannonFanoHeader {
        pad_bits: 0,
        word_pad_bits: config.word_pad_bits(input_bits),
        word_bits: config.word_bits,
        tree,
    };
    debug!(
        word_bits = config.word_bits,
        input_bits,
        distinct_words = codes.len(),
        max_code_len = codes.max_code_len(),
        average_code_len = codes.average_code_length(&frequencies),
        "shannon-fano first pass done"
    );

    let mut writer = BitWriter::new(writer);
    header.write_to(&mut writer)?;
    let header_bits = writer.bits_written();

    reader.seek(SeekFrom::Start(origin))?;
    let mut words = WordReader::new(&mut reader, config.word_bits);
    let mut word_count = 0u64;
    while let Some(word) = words.next_word()? {
        let code = codes.code(word.value).ok_or_else(|| {
            BitpressError::malformed(
                words.bits_read(),
                format!("word {:#x} was not seen in the first pass", word.value),
            )
        })?;
        writer.write(code.bits())?;
        word_count += 1;
    }

    let pad_bits = header::finish_with_pad_count(&mut writer)?;
    let stats = ShannonFanoStats {
        input_bits,
        words: word_count,
        distinct_words: codes.len(),
        word_pad_bits: header.word_pad_bits,
        pad_bits,
        header_bits,
        output_bytes: writer.bits_written() / 8,
    };
    writer.into_inner()?;

    debug!(
        words = stats.words,
        header_bits = stats.header_bits,
        output_bytes = stats.output_bytes,
        "shannon-fano encode done"
    );

    Ok(stats)
}
