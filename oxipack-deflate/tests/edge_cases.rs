//! Edge case tests for the Deflate-style, LZ77 and Huffman codecs.

use oxipack_core::{Codec, CodecError};
use oxipack_deflate::{DeflateCodec, HuffmanCodec, Lz77Codec, WindowConfig, deflate, inflate};

fn all_codecs() -> Vec<Box<dyn Codec>> {
    vec![
        Box::new(DeflateCodec::default()),
        Box::new(Lz77Codec::default()),
        Box::new(HuffmanCodec::new()),
    ]
}

fn roundtrip_all(input: &[u8]) {
    for codec in all_codecs() {
        let compressed = codec.compress_to_vec(input).unwrap();
        let decompressed = codec.decompress_to_vec(&compressed).unwrap();
        assert_eq!(decompressed, input, "{} failed", codec.name());
    }
}

#[test]
fn test_empty_input() {
    roundtrip_all(b"");
}

#[test]
fn test_single_byte() {
    roundtrip_all(b"A");
}

#[test]
fn test_all_zeros() {
    let input = vec![0u8; 1000];
    roundtrip_all(&input);

    // Long runs become 18-byte copies, three symbols each.
    let compressed = deflate(&input, WindowConfig::default()).unwrap();
    assert!(compressed.len() < input.len() / 4);
}

#[test]
fn test_max_lookahead() {
    let input = vec![42u8; 2000];
    let compressed = deflate(&input, WindowConfig::MAX).unwrap();
    assert_eq!(inflate(&compressed).unwrap(), input);
}

#[test]
fn test_alternating_pattern() {
    let input: Vec<u8> = (0..1000)
        .map(|i| if i % 2 == 0 { b'A' } else { b'B' })
        .collect();
    roundtrip_all(&input);
}

#[test]
fn test_binary_data() {
    // Binary data with all byte values
    let input: Vec<u8> = (0..=255).cycle().take(5000).collect();
    roundtrip_all(&input);
}

#[test]
fn test_text() {
    let mut input = Vec::new();
    let pattern = b"The quick brown fox jumps over the lazy dog. ";
    while input.len() < 16 * 1024 {
        input.extend_from_slice(pattern);
    }
    roundtrip_all(&input);
}

#[test]
fn test_match_beyond_window() {
    // The repeat is 64 bytes back but the window only holds 32.
    let config = WindowConfig::new(32, 18).unwrap();
    let mut input = b"PATTERN_TO_MATCH".to_vec();
    input.extend((0..48u8).map(|i| i.wrapping_mul(37)));
    input.extend_from_slice(b"PATTERN_TO_MATCH");

    let codec = DeflateCodec::new(config).unwrap();
    let compressed = codec.compress_to_vec(&input).unwrap();
    assert_eq!(codec.decompress_to_vec(&compressed).unwrap(), input);
}

#[test]
fn test_decoder_ignores_encoder_window() {
    // Streams carry everything needed to decode them.
    let input = b"window independent window independent";
    let compressed = deflate(input, WindowConfig::new(8, 4).unwrap()).unwrap();
    assert_eq!(DeflateCodec::default().decompress_to_vec(&compressed).unwrap(), input);
}

#[test]
fn test_invalid_config_rejected() {
    assert!(matches!(
        DeflateCodec::new(WindowConfig {
            window_size: 0,
            lookahead_buffer_size: 18
        }),
        Err(CodecError::InvalidConfig { .. })
    ));
    assert!(matches!(
        Lz77Codec::new(WindowConfig {
            window_size: 4096,
            lookahead_buffer_size: 300
        }),
        Err(CodecError::InvalidConfig { .. })
    ));
}

#[test]
fn test_garbage_input_is_rejected() {
    let garbage = [0xFFu8; 64];
    for codec in all_codecs() {
        let err = codec.decompress_to_vec(&garbage).unwrap_err();
        assert!(err.is_corruption(), "{}: {}", codec.name(), err);
    }
}

#[test]
fn test_truncated_payloads() {
    let input = b"abcdefabcdefabcdef";
    for codec in all_codecs() {
        let compressed = codec.compress_to_vec(input).unwrap();
        let err = codec.decompress_to_vec(&compressed[..2]).unwrap_err();
        assert!(err.is_corruption(), "{}: {}", codec.name(), err);
    }
}
