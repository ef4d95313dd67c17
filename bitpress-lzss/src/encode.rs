//! LZSS encoder.
//!
//! The encoder walks its input one record at a time. At each position it
//! searches the history window for the longest usable prefix of the next
//! `max_match_len` bytes; matches no longer than the break-even point are
//! emitted as literals instead, since a match record would not be shorter.
//!
//! ```text
//! literal:  1 bbbbbbbb
//! match:    0 oooo...o llll...l     (history_bits offset, match_bits length)
//! ```

use crate::config::LzssConfig;
use crate::header::LzssHeader;
use crate::history::History;
use crate::matcher::find_match;
use bitpress_core::bitstream::BitWriter;
use bitpress_core::error::Result;
use bitpress_core::header;
use std::io::{Read, Seek, Write};
use tracing::debug;

/// Bytes requested from the source per refill.
const READ_CHUNK: u64 = 64 * 1024;

/// One encoded unit of the record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// A single byte, stored as is.
    Literal(u8),
    /// A reference to `length` bytes of history starting at `offset`.
    Match {
        /// Start of the referenced bytes in the history window.
        offset: usize,
        /// Number of bytes referenced.
        length: usize,
    },
}

impl Record {
    /// Number of input bytes this record covers.
    pub fn len(&self) -> usize {
        match self {
            Self::Literal(_) => 1,
            Self::Match { length, .. } => *length,
        }
    }

    /// Whether the record covers no input. Never true for a valid record.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of this record in bits under `config`.
    pub fn bit_len(&self, config: &LzssConfig) -> u32 {
        match self {
            Self::Literal(_) => crate::config::LITERAL_RECORD_BITS,
            Self::Match { .. } => config.record_bits(),
        }
    }

    /// Write the record's tag and payload.
    pub fn write_to<W: Write>(&self, writer: &mut BitWriter<W>, config: &LzssConfig) -> Result<()> {
        match *self {
            Self::Literal(byte) => {
                writer.write_bit(1)?;
                writer.write_value(u64::from(byte), 8)
            }
            Self::Match { offset, length } => {
                writer.write_bit(0)?;
                writer.write_value(offset as u64, config.history_bits)?;
                writer.write_value(length as u64, config.match_bits)
            }
        }
    }
}

/// Summary of one compression run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LzssStats {
    /// Bytes read from the source.
    pub input_bytes: u64,
    /// Literal records emitted.
    pub literals: u64,
    /// Match records emitted.
    pub matches: u64,
    /// Times the history window was cleared.
    pub history_resets: u64,
    /// Bits taken by the record stream, header and padding excluded.
    pub payload_bits: u64,
    /// Bytes written to the sink, header included.
    pub output_bytes: u64,
    /// Zero bits padding the final byte.
    pub pad_bits: u8,
}

impl LzssStats {
    /// Output size as a fraction of input size (0.0 for empty input).
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes as f64 / self.input_bytes as f64
        }
    }
}

/// Record-level LZSS encoder.
///
/// Holds the history window between calls, so a stream may be fed through
/// [`LzssEncoder::next_record`] in arbitrary slices as long as each slice
/// starts where the previous record ended.
#[derive(Debug, Clone)]
pub struct LzssEncoder {
    config: LzssConfig,
    history: History,
}

impl LzssEncoder {
    /// Create an encoder, rejecting out-of-range parameters.
    pub fn new(config: LzssConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            history: History::new(config.max_history_len()),
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &LzssConfig {
        &self.config
    }

    /// The history window.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Choose the record for the front of `input` and add its bytes to history.
    ///
    /// Only the first `max_match_len` bytes of `input` are considered.
    /// Returns `None` when `input` is empty.
    pub fn next_record(&mut self, input: &[u8]) -> Option<Record> {
        let &first = input.first()?;
        let lookahead = &input[..input.len().min(self.config.max_match_len())];

        let record = match find_match(self.history.as_slice(), lookahead, self.config.search) {
            Some(m) if m.length > self.config.break_even_point() => Record::Match {
                offset: m.offset,
                length: m.length,
            },
            _ => Record::Literal(first),
        };

        self.history.append(&lookahead[..record.len()]);
        Some(record)
    }

    /// Encode a whole slice into records.
    pub fn encode(&mut self, data: &[u8]) -> Vec<Record> {
        let mut records = Vec::new();
        let mut pos = 0;
        while let Some(record) = self.next_record(&data[pos..]) {
            pos += record.len();
            records.push(record);
        }
        records
    }
}

/// Compress everything from `reader` into `writer`.
///
/// The sink must start at offset 0: the pad count is patched into the
/// first byte once the record stream is complete.
pub fn compress_stream<R: Read, W: Write + Seek>(
    mut reader: R,
    writer: W,
    config: &LzssConfig,
) -> Result<LzssStats> {
    let mut encoder = LzssEncoder::new(*config)?;
    let mut writer = BitWriter::new(writer);
    let mut stats = LzssStats::default();

    LzssHeader::for_config(config).write_to(&mut writer)?;
    debug!(
        history_bits = config.history_bits,
        match_bits = config.match_bits,
        search = %config.search,
        break_even = config.break_even_point(),
        "lzss encode start"
    );

    let max_match = config.max_match_len();
    let mut window: Vec<u8> = Vec::new();
    let mut pos = 0;
    let mut source_done = false;

    loop {
        if !source_done && window.len() - pos < max_match {
            window.drain(..pos);
            pos = 0;
            let n = reader.by_ref().take(READ_CHUNK).read_to_end(&mut window)?;
            if n == 0 {
                source_done = true;
            }
            stats.input_bytes += n as u64;
        }

        let Some(record) = encoder.next_record(&window[pos..]) else {
            if source_done {
                break;
            }
            continue;
        };

        record.write_to(&mut writer, config)?;
        stats.payload_bits += u64::from(record.bit_len(config));
        match record {
            Record::Literal(_) => stats.literals += 1,
            Record::Match { .. } => stats.matches += 1,
        }
        pos += record.len();
    }

    stats.pad_bits = header::finish_with_pad_count(&mut writer)?;
    stats.output_bytes = writer.bits_written() / 8;
    stats.history_resets = encoder.history().resets();
    writer.into_inner()?;

    debug!(
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        literals = stats.literals,
        matches = stats.matches,
        payload_bits = stats.payload_bits,
        history_resets = stats.history_resets,
        "lzss encode done"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchDepth;

    #[test]
    fn test_literals_only() {
        let mut encoder = LzssEncoder::new(LzssConfig::DEFAULT).unwrap();
        let records = encoder.encode(b"abc");
        assert_eq!(
            records,
            vec![
                Record::Literal(b'a'),
                Record::Literal(b'b'),
                Record::Literal(b'c')
            ]
        );
    }

    #[test]
    fn test_repeat_becomes_match() {
        let mut encoder = LzssEncoder::new(LzssConfig::DEFAULT).unwrap();
        let records = encoder.encode(b"abcdabcd");
        assert_eq!(records.len(), 5);
        assert_eq!(records[4], Record::Match { offset: 0, length: 4 });
    }

    #[test]
    fn test_break_even_forces_literals() {
        // history 12 + match 4 + tag = 17 bits, break-even 2: a two-byte
        // repeat stays literal even though it is in history.
        let mut encoder = LzssEncoder::new(LzssConfig::DEFAULT).unwrap();
        let records = encoder.encode(b"abxab");
        assert!(records.iter().all(|r| matches!(r, Record::Literal(_))));

        let records = LzssEncoder::new(LzssConfig::DEFAULT)
            .unwrap()
            .encode(b"abcxabc");
        assert_eq!(records.last(), Some(&Record::Match { offset: 0, length: 3 }));
    }

    #[test]
    fn test_match_capped_at_max_length() {
        let config = LzssConfig::new(8, 2);
        let mut encoder = LzssEncoder::new(config).unwrap();
        let records = encoder.encode(b"abcdefabcdef");
        for record in &records {
            assert!(record.len() <= config.max_match_len());
        }
        assert_eq!(records.iter().map(Record::len).sum::<usize>(), 12);
    }

    #[test]
    fn test_no_match_across_reset() {
        // Window of 7 bytes: the history empties after "abcdefg".
        let config = LzssConfig::new(3, 3);
        let mut encoder = LzssEncoder::new(config).unwrap();
        let records = encoder.encode(b"abcdefgabc");
        assert_eq!(encoder.history().resets(), 1);
        assert!(records.iter().all(|r| matches!(r, Record::Literal(_))));
    }

    #[test]
    fn test_search_depth_changes_choice() {
        let data = b"abxabcxabcdabcd";
        let first = LzssEncoder::new(LzssConfig::new(8, 4).with_search(SearchDepth::First))
            .unwrap()
            .encode(data);
        let best = LzssEncoder::new(LzssConfig::new(8, 4))
            .unwrap()
            .encode(data);
        assert_eq!(first.len(), 12);
        assert_eq!(best.len(), 9);
        assert_eq!(best.last(), Some(&Record::Match { offset: 7, length: 4 }));
    }

    #[test]
    fn test_record_bits() {
        let config = LzssConfig::DEFAULT;
        let mut output = Vec::new();
        let mut writer = BitWriter::new(&mut output);
        Record::Literal(0x61).write_to(&mut writer, &config).unwrap();
        Record::Match { offset: 5, length: 3 }
            .write_to(&mut writer, &config)
            .unwrap();
        assert_eq!(writer.bits_written(), 9 + 17);
        writer.fill_remainder().unwrap();
        writer.flush().unwrap();
        drop(writer);
        // 1 01100001 | 0 000000000101 0011 | 000000
        assert_eq!(output, vec![0b1011_0000, 0b1000_0000, 0b0001_0100, 0b1100_0000]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(LzssEncoder::new(LzssConfig::new(0, 4)).is_err());
    }
}
