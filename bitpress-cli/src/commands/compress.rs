//! Compress command implementation.

use crate::{Codec, CodecOptions};
use bitpress_lzss::{LzssConfig, SearchDepth};
use bitpress_shannon::ShannonFanoConfig;
use std::path::Path;
use tracing::info;

/// LZSS parameters from the command line.
pub fn lzss_config(options: &CodecOptions) -> LzssConfig {
    LzssConfig::new(options.history_bits, options.match_bits)
        .with_search(SearchDepth::from_depth(options.search_depth))
}

/// Shannon-Fano parameters from the command line.
pub fn shannon_config(options: &CodecOptions) -> ShannonFanoConfig {
    ShannonFanoConfig::new(options.word_bits)
}

pub fn cmd_compress(
    input: &Path,
    output: &Path,
    options: &CodecOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let (input_bytes, output_bytes) = match options.codec {
        Codec::Lzss => {
            let config = lzss_config(options);
            let stats = bitpress_lzss::compress_file(input, output, &config)?;
            info!(
                history_bits = config.history_bits,
                match_bits = config.match_bits,
                search = %config.search,
                literals = stats.literals,
                matches = stats.matches,
                history_resets = stats.history_resets,
                "lzss compressed"
            );
            (stats.input_bytes, stats.output_bytes)
        }
        Codec::ShannonFano => {
            let config = shannon_config(options);
            let stats = bitpress_shannon::compress_file(input, output, &config)?;
            info!(
                word_bits = config.word_bits,
                words = stats.words,
                distinct_words = stats.distinct_words,
                header_bits = stats.header_bits,
                "shannon-fano compressed"
            );
            (stats.input_bits / 8, stats.output_bytes)
        }
    };

    println!(
        "{} -> {}: {} -> {} bytes ({})",
        input.display(),
        output.display(),
        input_bytes,
        output_bytes,
        format_ratio(input_bytes, output_bytes)
    );

    Ok(())
}

/// Output size as a percentage of input size.
pub fn format_ratio(input_bytes: u64, output_bytes: u64) -> String {
    if input_bytes == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", output_bytes as f64 / input_bytes as f64 * 100.0)
    }
}
