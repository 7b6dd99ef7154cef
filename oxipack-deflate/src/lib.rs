//! # OxiPack Deflate
//!
//! Sliding-window LZ77 tokenization, Huffman coding over arbitrary symbol
//! alphabets, and the Deflate-style codec combining the two.
//!
//! ## Codecs
//!
//! - [`DeflateCodec`]: LZ77 tokens flattened into field symbols, Huffman
//!   coded, followed by a CRC-32 of the original data
//! - [`Lz77Codec`]: raw LZ77 tokens, 3-4 bytes each
//! - [`HuffmanCodec`]: Huffman coding over the input bytes
//!
//! ## Example
//!
//! ```rust
//! use oxipack_deflate::{WindowConfig, deflate, inflate};
//!
//! let original = b"Hello, World! Hello, World!";
//! let compressed = deflate(original, WindowConfig::default()).unwrap();
//!
//! let decompressed = inflate(&compressed).unwrap();
//! assert_eq!(&decompressed, original);
//! ```
//!
//! ## Window configuration
//!
//! - `window_size`: 1-65535 bytes of history (default 4096)
//! - `lookahead_buffer_size`: 1-255 bytes per match (default 18)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod deflate;
pub mod huffman;
pub mod lz77;

// Re-exports
pub use config::WindowConfig;
pub use deflate::{DeflateCodec, DeflateReport, TokenSymbol, deflate, inflate};
pub use huffman::{Code, CodeTable, FrequencyTable, HuffmanCodec, Symbol, SymbolDecoder};
pub use lz77::{Lz77Codec, Token, WindowMatcher};
