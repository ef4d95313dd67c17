//! Round-trip tests for Shannon-Fano coding through files and in-memory streams.

use bitpress_core::BitpressError;
use bitpress_core::traits::FileCodec;
use bitpress_shannon::{
    CodeTable, ShannonFanoCodec, ShannonFanoConfig, compress_bytes, compress_file, count_words,
    decode_bytes, decode_file, read_header,
};
use std::fs;
use tempfile::TempDir;

fn lcg_bytes(size: usize, seed: u64, alphabet: u8) -> Vec<u8> {
    let mut state = seed;
    (0..size)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            ((state >> 33) % u64::from(alphabet)) as u8
        })
        .collect()
}

fn text(size: usize) -> Vec<u8> {
    b"Call me Ishmael. Some years ago, never mind how long precisely, I thought I would sail. "
        .iter()
        .copied()
        .cycle()
        .take(size)
        .collect()
}

// ============================================================================
// In-memory round trips
// ============================================================================

#[test]
fn test_roundtrip_word_width_grid() {
    let inputs = [
        Vec::new(),
        vec![0x5A],
        vec![b'z'; 333],
        text(4000),
        lcg_bytes(2000, 5, 6),
        lcg_bytes(2000, 9, 255),
    ];

    for word_bits in [1u8, 3, 5, 7, 8, 12, 16, 64] {
        let config = ShannonFanoConfig::new(word_bits);
        for input in &inputs {
            let (compressed, stats) = compress_bytes(input, &config).expect("compress failed");
            assert_eq!(stats.input_bits, input.len() as u64 * 8);
            assert_eq!(stats.output_bytes, compressed.len() as u64);
            assert_eq!(stats.word_pad_bits, config.word_pad_bits(stats.input_bits));

            let restored = decode_bytes(&compressed).expect("decode failed");
            assert_eq!(
                &restored,
                input,
                "word_bits {word_bits}, {} bytes",
                input.len()
            );
        }
    }
}

#[test]
fn test_single_word_input() {
    let (compressed, stats) = compress_bytes(&[b'a'; 100], &ShannonFanoConfig::BYTE).unwrap();
    assert_eq!(stats.distinct_words, 1);
    assert_eq!(compressed.len(), 15);
    assert_eq!(decode_bytes(&compressed).unwrap(), vec![b'a'; 100]);
}

#[test]
fn test_skewed_input_compresses() {
    let mut input = vec![b'e'; 9000];
    input.extend(lcg_bytes(1000, 17, 32));
    let (compressed, stats) = compress_bytes(&input, &ShannonFanoConfig::BYTE).unwrap();
    assert!(compressed.len() < input.len() / 3);
    assert!(stats.ratio() < 0.34);
}

#[test]
fn test_byte_count_matches_header_and_codes() {
    let input = text(2500);
    let config = ShannonFanoConfig::BYTE;
    let (compressed, stats) = compress_bytes(&input, &config).unwrap();

    let (frequencies, _) = count_words(&input[..], &config).unwrap();
    let payload_bits = CodeTable::build(&frequencies).encoded_bits();
    let total_bits = stats.header_bits + payload_bits + u64::from(stats.pad_bits);
    assert_eq!(total_bits % 8, 0);
    assert_eq!(total_bits / 8, compressed.len() as u64);
}

#[test]
fn test_truncated_stream_is_rejected() {
    let input = text(600);
    let (mut compressed, _) = compress_bytes(&input, &ShannonFanoConfig::BYTE).unwrap();
    compressed.truncate(compressed.len() / 2);
    match decode_bytes(&compressed) {
        Ok(restored) => assert_ne!(restored, input),
        Err(err) => assert!(err.is_malformed(), "{err}"),
    }
}

#[test]
fn test_invalid_word_width_is_rejected() {
    let result = compress_bytes(b"abc", &ShannonFanoConfig::new(65));
    assert!(matches!(
        result,
        Err(BitpressError::InvalidParameter {
            name: "word_bits",
            ..
        })
    ));
}

// ============================================================================
// File round trips
// ============================================================================

#[test]
fn test_file_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("input.sf");
    let unpacked = dir.path().join("output.txt");

    let data = text(80_000);
    fs::write(&input, &data).unwrap();

    let config = ShannonFanoConfig::new(12);
    let stats = compress_file(&input, &packed, &config).unwrap();
    assert_eq!(stats.output_bytes, fs::metadata(&packed).unwrap().len());

    let header = read_header(&packed).unwrap();
    assert_eq!(header.word_bits, 12);
    assert_eq!(header.word_pad_bits, stats.word_pad_bits);
    assert_eq!(header.pad_bits, stats.pad_bits);
    assert_eq!(header.bit_len(), stats.header_bits);

    let written = decode_file(&packed, &unpacked).unwrap();
    assert_eq!(written, data.len() as u64);
    assert_eq!(fs::read(&unpacked).unwrap(), data);
}

#[test]
fn test_read_header_code_lengths() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("letters");
    let packed = dir.path().join("letters.sf");
    fs::write(&input, b"aaaabbc").unwrap();

    compress_file(&input, &packed, &ShannonFanoConfig::BYTE).unwrap();
    let header = read_header(&packed).unwrap();
    let tree = header.tree.expect("non-empty input has a tree");

    assert_eq!(tree.leaf_count(), 3);
    assert_eq!(
        tree.code_lengths(),
        vec![(u64::from(b'a'), 1), (u64::from(b'b'), 2), (u64::from(b'c'), 2)]
    );
    assert_eq!(tree.header_bits(), 29);
}

#[test]
fn test_read_header_of_empty_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty");
    let packed = dir.path().join("empty.sf");
    fs::write(&input, b"").unwrap();

    compress_file(&input, &packed, &ShannonFanoConfig::NIBBLE).unwrap();
    let header = read_header(&packed).unwrap();
    assert_eq!(header.word_bits, 4);
    assert!(header.tree.is_none());

    let unpacked = dir.path().join("empty.out");
    assert_eq!(decode_file(&packed, &unpacked).unwrap(), 0);
    assert!(fs::read(&unpacked).unwrap().is_empty());
}

#[test]
fn test_codec_trait_roundtrip() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data.bin");
    let packed = dir.path().join("data.sf");
    let unpacked = dir.path().join("data.out");

    let data = lcg_bytes(20_000, 42, 12);
    fs::write(&input, &data).unwrap();

    let codec = ShannonFanoCodec::new(ShannonFanoConfig::WIDE);
    let codec: &dyn FileCodec = &codec;
    assert_eq!(codec.name(), "shannon-fano");
    codec.compress(&input, &packed).unwrap();
    codec.decode(&packed, &unpacked).unwrap();

    assert_eq!(fs::read(&unpacked).unwrap(), data);
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();
    let result = compress_file(
        &dir.path().join("missing"),
        &dir.path().join("out"),
        &ShannonFanoConfig::BYTE,
    );
    assert!(matches!(result, Err(BitpressError::Io(_))));
}
