//! Info command implementation.

use crate::Codec;
use serde::Serialize;
use std::path::Path;

/// Header summary of one compressed file.
#[derive(Debug, Serialize)]
pub struct InfoReport {
    pub file: String,
    pub size_bytes: u64,
    pub pad_bits: u8,
    #[serde(flatten)]
    pub parameters: Parameters,
}

/// Codec-specific header fields.
#[derive(Debug, Serialize)]
#[serde(tag = "codec", rename_all = "kebab-case")]
pub enum Parameters {
    Lzss {
        history_bits: u8,
        match_bits: u8,
        max_history_len: usize,
        max_match_len: usize,
        break_even_point: usize,
        record_bits: u32,
    },
    ShannonFano {
        word_bits: u8,
        word_pad_bits: u8,
        distinct_words: usize,
        max_code_len: usize,
        codes: Vec<CodeLength>,
    },
}

/// Code length of one word in a Shannon-Fano tree.
#[derive(Debug, Serialize)]
pub struct CodeLength {
    pub word: u64,
    pub bits: usize,
}

pub fn build_report(file: &Path, codec: Codec) -> Result<InfoReport, Box<dyn std::error::Error>> {
    let size_bytes = std::fs::metadata(file)?.len();

    let (pad_bits, parameters) = match codec {
        Codec::Lzss => {
            let header = bitpress_lzss::read_header(file)?;
            let config = header.config();
            (
                header.pad_bits,
                Parameters::Lzss {
                    history_bits: header.history_bits,
                    match_bits: header.match_bits,
                    max_history_len: config.max_history_len(),
                    max_match_len: config.max_match_len(),
                    break_even_point: config.break_even_point(),
                    record_bits: config.record_bits(),
                },
            )
        }
        Codec::ShannonFano => {
            let header = bitpress_shannon::read_header(file)?;
            let codes: Vec<CodeLength> = header
                .tree
                .as_ref()
                .map(|tree| tree.code_lengths())
                .unwrap_or_default()
                .into_iter()
                .map(|(word, bits)| CodeLength { word, bits })
                .collect();
            (
                header.pad_bits,
                Parameters::ShannonFano {
                    word_bits: header.word_bits,
                    word_pad_bits: header.word_pad_bits,
                    distinct_words: codes.len(),
                    max_code_len: codes.iter().map(|c| c.bits).max().unwrap_or(0),
                    codes,
                },
            )
        }
    };

    Ok(InfoReport {
        file: file.display().to_string(),
        size_bytes,
        pad_bits,
        parameters,
    })
}

pub fn cmd_info(file: &Path, codec: Codec, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let report = build_report(file, codec)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("File Information");
    println!("================");
    println!("File: {}", report.file);
    println!("Size: {} bytes", report.size_bytes);
    println!("Pad bits: {}", report.pad_bits);
    println!();

    match &report.parameters {
        Parameters::Lzss {
            history_bits,
            match_bits,
            max_history_len,
            max_match_len,
            break_even_point,
            record_bits,
        } => {
            println!("LZSS Header:");
            println!("  History bits: {} ({} bytes)", history_bits, max_history_len);
            println!("  Match bits: {} (up to {} bytes)", match_bits, max_match_len);
            println!("  Match record: {} bits", record_bits);
            println!("  Shortest match: {} bytes", break_even_point + 1);
        }
        Parameters::ShannonFano {
            word_bits,
            word_pad_bits,
            distinct_words,
            max_code_len,
            codes,
        } => {
            println!("Shannon-Fano Header:");
            println!("  Word bits: {}", word_bits);
            println!("  Word padding: {} bits", word_pad_bits);
            println!("  Distinct words: {}", distinct_words);
            println!("  Longest code: {} bits", max_code_len);
            if !codes.is_empty() {
                println!();
                println!("{:>18} {:>6}", "Word", "Bits");
                println!("{}", "-".repeat(25));
                for code in codes {
                    println!("{:>#18x} {:>6}", code.word, code.bits);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitpress_lzss::LzssConfig;
    use bitpress_shannon::ShannonFanoConfig;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lzss_report() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        let packed = dir.path().join("input.lzss");
        fs::write(&input, b"abcabcabcabc").unwrap();
        bitpress_lzss::compress_file(&input, &packed, &LzssConfig::new(8, 3)).unwrap();

        let report = build_report(&packed, Codec::Lzss).unwrap();
        assert_eq!(report.size_bytes, fs::metadata(&packed).unwrap().len());
        let Parameters::Lzss {
            history_bits,
            match_bits,
            max_history_len,
            max_match_len,
            record_bits,
            ..
        } = report.parameters
        else {
            panic!("expected lzss parameters");
        };
        assert_eq!((history_bits, match_bits), (8, 3));
        assert_eq!((max_history_len, max_match_len), (255, 7));
        assert_eq!(record_bits, 12);
    }

    #[test]
    fn test_shannon_report_json() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("input");
        let packed = dir.path().join("input.sf");
        fs::write(&input, b"aaaabbc").unwrap();
        bitpress_shannon::compress_file(&input, &packed, &ShannonFanoConfig::BYTE).unwrap();

        let report = build_report(&packed, Codec::ShannonFano).unwrap();
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["codec"], "shannon-fano");
        assert_eq!(json["word_bits"], 8);
        assert_eq!(json["distinct_words"], 3);
        assert_eq!(json["max_code_len"], 2);
        assert_eq!(json["codes"][0]["word"], u64::from(b'a'));
        assert_eq!(json["codes"][0]["bits"], 1);
    }

    #[test]
    fn test_shannon_report_for_empty_input() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty");
        let packed = dir.path().join("empty.sf");
        fs::write(&input, b"").unwrap();
        bitpress_shannon::compress_file(&input, &packed, &ShannonFanoConfig::BYTE).unwrap();

        let report = build_report(&packed, Codec::ShannonFano).unwrap();
        assert!(matches!(
            report.parameters,
            Parameters::ShannonFano {
                distinct_words: 0,
                max_code_len: 0,
                ..
            }
        ));
    }
}
