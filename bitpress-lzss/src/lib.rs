//! # Bitpress LZSS
//!
//! Bit-granular LZSS compression.
//!
//! The record stream is a sequence of 9-bit literals and fixed-width
//! back-references into a history window of `2^history_bits - 1` bytes.
//! The window is emptied whenever it would overflow, and both the encoder
//! and the decoder apply the same rule, so back-references never point
//! into data from before the last reset.
//!
//! ## File Format
//!
//! ```text
//! [3-bit pad count][gamma(history_bits)][gamma(match_bits)][records...][pad]
//! ```
//!
//! Every parameter a decoder needs is in the header.
//!
//! ## Example
//!
//! ```rust
//! use bitpress_lzss::{LzssConfig, compress_bytes, decode_bytes};
//!
//! let data = b"abracadabra abracadabra abracadabra";
//! let (compressed, stats) = compress_bytes(data, &LzssConfig::DEFAULT).unwrap();
//! assert!(stats.matches > 0);
//!
//! let restored = decode_bytes(&compressed).unwrap();
//! assert_eq!(restored, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod decode;
pub mod encode;
pub mod header;
pub mod history;
pub mod matcher;

pub use config::{LzssConfig, SearchDepth};
pub use decode::{LzssDecoder, decode_stream};
pub use encode::{LzssEncoder, LzssStats, Record, compress_stream};
pub use header::LzssHeader;
pub use history::History;
pub use matcher::{Match, find_match};

use bitpress_core::bitstream::BitReader;
use bitpress_core::error::Result;
use bitpress_core::traits::FileCodec;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;

/// Compress the file at `input` into a new file at `output`.
pub fn compress_file(input: &Path, output: &Path, config: &LzssConfig) -> Result<LzssStats> {
    config.validate()?;
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    compress_stream(reader, writer, config)
}

/// Decode the file at `input` into a new file at `output`.
///
/// Returns the number of bytes written.
pub fn decode_file(input: &Path, output: &Path) -> Result<u64> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    decode_stream(reader, writer)
}

/// Read only the header of an LZSS file.
pub fn read_header(input: &Path) -> Result<LzssHeader> {
    let mut reader = BitReader::new(BufReader::new(File::open(input)?));
    LzssHeader::read_from(&mut reader)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8], config: &LzssConfig) -> Result<(Vec<u8>, LzssStats)> {
    let mut output = Cursor::new(Vec::new());
    let stats = compress_stream(data, &mut output, config)?;
    Ok((output.into_inner(), stats))
}

/// Decode an in-memory LZSS stream.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decode_stream(data, &mut output)?;
    Ok(output)
}

/// [`FileCodec`] wrapper carrying an [`LzssConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LzssCodec {
    config: LzssConfig,
}

impl LzssCodec {
    /// Create a codec that compresses with `config`.
    pub fn new(config: LzssConfig) -> Self {
        Self { config }
    }

    /// The compression parameters.
    pub fn config(&self) -> &LzssConfig {
        &self.config
    }
}

impl FileCodec for LzssCodec {
    fn name(&self) -> &'static str {
        "lzss"
    }

    fn compress(&self, input: &Path, output: &Path) -> Result<()> {
        compress_file(input, output, &self.config).map(|_| ())
    }

    fn decode(&self, input: &Path, output: &Path) -> Result<()> {
        decode_file(input, output).map(|_| ())
    }
}
