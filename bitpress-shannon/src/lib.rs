//! # Bitpress Shannon-Fano
//!
//! Two-pass static Shannon-Fano coding over fixed-width words.
//!
//! The input bit stream is cut into `word_bits`-wide words (the last one
//! zero-padded). A first pass counts them, codes are built by recursively
//! splitting the frequency-sorted word list, and the resulting code tree is
//! stored in the file header so that decoding needs nothing but the file.
//!
//! - [`frequency`]: word counts in first-occurrence order
//! - [`codes`]: the recursive split and the resulting [`CodeTable`]
//! - [`tree`]: arena-backed [`ParserTree`] and its pre-order serialization
//! - [`encode`] / [`decode`]: stream-level codec
//!
//! ## File Format
//!
//! ```text
//! [3-bit pad count][gamma(word_pad_bits)][gamma(word_bits)][tree][codes...][pad]
//! ```
//!
//! ## Example
//!
//! ```rust
//! use bitpress_shannon::{ShannonFanoConfig, compress_bytes, decode_bytes};
//!
//! let data = b"she sells sea shells by the sea shore";
//! let (compressed, stats) = compress_bytes(data, &ShannonFanoConfig::BYTE).unwrap();
//! assert_eq!(stats.words, data.len() as u64);
//!
//! let restored = decode_bytes(&compressed).unwrap();
//! assert_eq!(restored, data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod codes;
pub mod config;
pub mod decode;
pub mod encode;
pub mod frequency;
pub mod header;
pub mod tree;
pub mod words;

pub use codes::{Code, CodeEntry, CodeTable};
pub use config::ShannonFanoConfig;
pub use decode::{ShannonFanoDecoder, decode_stream};
pub use encode::{ShannonFanoStats, compress_stream, count_words};
pub use frequency::FrequencyTable;
pub use header::ShannonFanoHeader;
pub use tree::{Node, NodeId, ParserTree};
pub use words::{Word, WordReader};

use bitpress_core::bitstream::BitReader;
use bitpress_core::error::Result;
use bitpress_core::traits::FileCodec;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor};
use std::path::Path;

/// Compress the file at `input` into a new file at `output`.
pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &ShannonFanoConfig,
) -> Result<ShannonFanoStats> {
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

/// Read only the header (tree included) of a Shannon-Fano file.
pub fn read_header(input: &Path) -> Result<ShannonFanoHeader> {
    let mut reader = BitReader::new(BufReader::new(File::open(input)?));
    ShannonFanoHeader::read_from(&mut reader)
}

/// Compress an in-memory buffer.
pub fn compress_bytes(
    data: &[u8],
    config: &ShannonFanoConfig,
) -> Result<(Vec<u8>, ShannonFanoStats)> {
    let mut output = Cursor::new(Vec::new());
    let stats = compress_stream(Cursor::new(data), &mut output, config)?;
    Ok((output.into_inner(), stats))
}

/// Decode an in-memory Shannon-Fano stream.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decode_stream(data, &mut output)?;
    Ok(output)
}

/// [`FileCodec`] wrapper carrying a [`ShannonFanoConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ShannonFanoCodec {
    config: ShannonFanoConfig,
}

impl ShannonFanoCodec {
    /// Create a codec that compresses with `config`.
    pub fn new(config: ShannonFanoConfig) -> Self {
        Self { config }
    }

    /// The compression parameters.
    pub fn config(&self) -> &ShannonFanoConfig {
        &self.config
    }
}

impl FileCodec for ShannonFanoCodec {
    fn name(&self) -> &'static str {
        "shannon-fano"
    }

    fn compress(&self, input: &Path, output: &Path) -> Result<()> {
        compress_file(input, output, &self.config).map(|_| ())
    }

    fn decode(&self, input: &Path, output: &Path) -> Result<()> {
        decode_file(input, output).map(|_| ())
    }
}
