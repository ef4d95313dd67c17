//! Decompress command implementation.

use super::file_codec;
use crate::Codec;
use std::path::Path;
use tracing::info;

pub fn cmd_decompress(
    input: &Path,
    output: &Path,
    codec: Codec,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = file_codec(codec);
    codec.decode(input, output)?;

    let written = std::fs::metadata(output)?.len();
    info!(codec = codec.name(), output_bytes = written, "decoded");
    println!("{} -> {}: {} bytes", input.display(), output.display(), written);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let result = cmd_decompress(
            &dir.path().join("missing.lzss"),
            &dir.path().join("out"),
            Codec::Lzss,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_file_is_malformed() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.sf");
        fs::write(&input, b"").unwrap();

        for codec in [Codec::Lzss, Codec::ShannonFano] {
            let result = cmd_decompress(&input, &dir.path().join("out"), codec);
            assert!(result.is_err(), "{codec:?}");
        }
    }
}
