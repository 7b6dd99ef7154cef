//! Property tests for the LZ77, Huffman and Deflate-style codecs.

use oxipack_core::Codec;
use oxipack_deflate::huffman::{self, FrequencyTable, average_code_length, entropy};
use oxipack_deflate::lz77::{self, Token};
use oxipack_deflate::{DeflateCodec, HuffmanCodec, Lz77Codec, WindowConfig};
use proptest::prelude::*;

fn window_config() -> impl Strategy<Value = WindowConfig> {
    (1usize..64, 1usize..24).prop_map(|(window_size, lookahead_buffer_size)| WindowConfig {
        window_size,
        lookahead_buffer_size,
    })
}

/// Small alphabets produce plenty of matches.
fn repetitive_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"abc".to_vec()), 0..300)
}

proptest! {
    #[test]
    fn prop_deflate_roundtrip(data in prop::collection::vec(any::<u8>(), 0..512), config in window_config()) {
        let codec = DeflateCodec::new(config).unwrap();
        let compressed = codec.compress_to_vec(&data).unwrap();
        prop_assert_eq!(codec.decompress_to_vec(&compressed).unwrap(), data);
    }

    #[test]
    fn prop_repetitive_roundtrip(data in repetitive_bytes(), config in window_config()) {
        for codec in [
            Box::new(DeflateCodec::new(config).unwrap()) as Box<dyn Codec>,
            Box::new(Lz77Codec::new(config).unwrap()),
            Box::new(HuffmanCodec::new()),
        ] {
            let compressed = codec.compress_to_vec(&data).unwrap();
            prop_assert_eq!(codec.decompress_to_vec(&compressed).unwrap(), data.clone());
        }
    }

    #[test]
    fn prop_tokens_respect_window(data in repetitive_bytes(), config in window_config()) {
        let tokens = lz77::tokenize(&data, config).unwrap();

        let terminals = tokens.iter().filter(|t| t.is_terminal()).count();
        prop_assert_eq!(terminals, 1);
        prop_assert!(tokens.last().is_some_and(Token::is_terminal));

        for token in &tokens {
            prop_assert!(token.offset as usize <= config.window_size);
            prop_assert!(token.length as usize <= config.lookahead_buffer_size);
            if token.length == 0 {
                prop_assert_eq!(token.offset, 0);
            } else {
                prop_assert!(token.offset as usize >= token.length as usize);
            }
        }

        prop_assert_eq!(lz77::reconstruct(&tokens).unwrap(), data);
    }

    #[test]
    fn prop_deterministic(data in repetitive_bytes()) {
        let codec = DeflateCodec::default();
        prop_assert_eq!(
            codec.compress_to_vec(&data).unwrap(),
            codec.compress_to_vec(&data).unwrap()
        );
    }

    #[test]
    fn prop_code_is_prefix_free(data in prop::collection::vec(any::<u8>(), 1..400)) {
        let freqs = FrequencyTable::from_symbols(data.iter().copied());
        let table = huffman::build_code(&freqs).unwrap();
        let codes: Vec<_> = table.iter().map(|(_, code)| code).collect();

        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                prop_assert!(!a.is_prefix_of(b) && !b.is_prefix_of(a));
            }
        }

        let h = entropy(&freqs);
        let avg = average_code_length(&freqs, &table);
        prop_assert!(avg >= h - 1e-9);
        prop_assert!(avg < h + 1.0);
    }

    #[test]
    fn prop_bit_flip_never_silently_wrong(data in repetitive_bytes(), flip in any::<prop::sample::Index>()) {
        let codecs: [Box<dyn Codec>; 2] = [Box::new(DeflateCodec::default()), Box::new(HuffmanCodec::new())];
        for codec in &codecs {
            let compressed = codec.compress_to_vec(&data).unwrap();
            let bit = flip.index(compressed.len() * 8);

            let mut corrupted = compressed.clone();
            corrupted[bit / 8] ^= 0x80 >> (bit % 8);

            match codec.decompress_to_vec(&corrupted) {
                Ok(output) => prop_assert_eq!(&output, &data, "{} decoded a flipped bit", codec.name()),
                Err(e) => prop_assert!(e.is_corruption(), "{}: unexpected error: {}", codec.name(), e),
            }
        }
    }
}
