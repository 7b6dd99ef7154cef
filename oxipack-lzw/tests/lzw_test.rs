//! Comprehensive LZW integration tests.

use oxipack_core::{Codec, CodecError};
use oxipack_lzw::{LzwCodec, LzwConfig, LzwError, compress, decompress};
use proptest::prelude::*;

fn roundtrip(original: &[u8], config: LzwConfig) -> Vec<u8> {
    let compressed = compress(original, config).expect("compression failed");
    let decompressed = decompress(&compressed, config).expect("decompression failed");
    assert_eq!(decompressed, original);
    compressed
}

#[test]
fn test_lzw_roundtrip_simple() {
    roundtrip(b"TOBEORNOTTOBEORTOBEORNOT", LzwConfig::DEFAULT);
}

#[test]
fn test_lzw_single_byte() {
    let compressed = roundtrip(b"A", LzwConfig::DEFAULT);
    assert_eq!(compressed.len(), 2);
}

#[test]
fn test_lzw_all_zeros() {
    let original = vec![0u8; 1000];
    let compressed = roundtrip(&original, LzwConfig::DEFAULT);

    // Highly repetitive data should compress very well
    assert!(
        compressed.len() < original.len() / 5,
        "All-zeros should compress to less than 20% of original"
    );
}

#[test]
fn test_lzw_alternating_pattern() {
    roundtrip(
        b"ABABABABABABABABABABABABABABABABABABAB",
        LzwConfig::COMPACT,
    );
}

#[test]
fn test_lzw_random_like_data() {
    // Data that's hard to compress (pseudo-random sequence)
    let original: Vec<u8> = (0..1000).map(|i| ((i * 31 + 17) % 256) as u8).collect();
    let compressed = roundtrip(&original, LzwConfig::DEFAULT);

    // Random-like data shouldn't compress well
    assert!(
        compressed.len() >= original.len() / 2,
        "Random-like data should not compress significantly"
    );
}

#[test]
fn test_lzw_dictionary_fills_up() {
    // Enough distinct pairs to exhaust a 16384-entry dictionary.
    let original: Vec<u8> = (0..200_000u32)
        .map(|i| (i.wrapping_mul(2654435761) >> 13) as u8)
        .collect();
    roundtrip(&original, LzwConfig::DEFAULT);
    roundtrip(&original, LzwConfig::new(10, 1024).unwrap());
}

#[test]
fn test_lzw_multiple_sizes() {
    // Test various sizes to ensure no boundary issues
    for size in [1, 10, 50, 100, 255, 256, 257, 500, 1000, 4095, 4096, 4097] {
        let original = vec![b'A'; size];
        for config in [LzwConfig::DEFAULT, LzwConfig::COMPACT, LzwConfig::new(9, 512).unwrap()] {
            roundtrip(&original, config);
        }
    }
}

#[test]
fn test_compression_effectiveness() {
    // Test that LZW actually compresses repetitive data
    let test_cases = vec![
        (b"AAAAAAAAAAAAAAAAAAAA".to_vec(), "all same"),
        (b"ABABABABABABABABABAB".to_vec(), "alternating"),
        (
            b"This is a test. This is a test. This is a test.".to_vec(),
            "repeated phrase",
        ),
    ];

    for (data, description) in test_cases {
        let compressed = roundtrip(&data, LzwConfig::COMPACT);
        assert!(
            compressed.len() < data.len(),
            "{} should compress",
            description
        );
    }
}

#[test]
fn test_codec_errors_map_to_codec_error() {
    let codec = LzwCodec::default();
    let err = codec.decompress_to_vec(&[0, b'A', 0]).unwrap_err();
    assert!(matches!(err, CodecError::TruncatedStream { .. }));

    let err = decompress(&[0x7F, 0xFF], LzwConfig::DEFAULT).unwrap_err();
    assert!(matches!(err, LzwError::InvalidCode { code: 0x7FFF, .. }));
}

proptest! {
    #[test]
    fn prop_lzw_roundtrip(data in prop::collection::vec(any::<u8>(), 0..2048)) {
        let codec = LzwCodec::default();
        let compressed = codec.compress_to_vec(&data).unwrap();
        prop_assert_eq!(codec.decompress_to_vec(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_lzw_small_dictionary(
        data in prop::collection::vec(prop::sample::select(b"xyz".to_vec()), 0..2048),
        max_codes in 256u32..=512,
    ) {
        let config = LzwConfig::new(9, max_codes).unwrap();
        let compressed = compress(&data, config).unwrap();
        prop_assert_eq!(decompress(&compressed, config).unwrap(), data);
    }
}
