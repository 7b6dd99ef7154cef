//! # OxiPack-LZW: Fixed-Width LZW Compression
//!
//! This crate provides LZW (Lempel-Ziv-Welch) compression and decompression
//! with fixed-width codes.
//!
//! ## Format
//!
//! - **Dictionary**: codes 0-255 stand for single bytes; each emitted code
//!   adds one entry (previous string + next byte) until `max_codes` is reached
//! - **Fixed width**: every code takes `code_bits` bits (16 by default, so
//!   each code is two big-endian bytes)
//! - **MSB-first**: codes are packed most significant bit first and the last
//!   byte is zero padded
//! - **No end marker**: the stream ends when fewer than `code_bits` bits remain
//!
//! ## Example
//!
//! ```rust
//! use oxipack_lzw::{LzwConfig, compress, decompress};
//!
//! let original = b"TOBEORNOTTOBEORTOBEORNOT";
//!
//! let compressed = compress(original, LzwConfig::COMPACT).unwrap();
//! let decompressed = decompress(&compressed, LzwConfig::COMPACT).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

mod config;
mod decoder;
mod dictionary;
mod encoder;
mod error;

pub use config::LzwConfig;
pub use decoder::LzwDecoder;
pub use dictionary::LzwDictionary;
pub use encoder::LzwEncoder;
pub use error::{LzwError, Result};

use oxipack_core::traits::{Codec, read_all};
use std::io::{Read, Write};

/// Decompress LZW-compressed data with the given configuration.
///
/// # Example
///
/// ```rust
/// use oxipack_lzw::{decompress, compress, LzwConfig};
///
/// let original = b"Hello, World!";
/// let compressed = compress(original, LzwConfig::DEFAULT).unwrap();
/// let decompressed = decompress(&compressed, LzwConfig::DEFAULT).unwrap();
/// assert_eq!(decompressed, original);
/// ```
pub fn decompress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut decoder = LzwDecoder::new(config)?;
    decoder.decode(data)
}

/// Compress data with LZW using the given configuration.
///
/// # Example
///
/// ```rust
/// use oxipack_lzw::{compress, LzwConfig};
///
/// let data = b"TOBEORNOTTOBEORTOBEORNOT";
/// let compressed = compress(data, LzwConfig::COMPACT).unwrap();
/// assert!(compressed.len() < data.len());
/// ```
pub fn compress(data: &[u8], config: LzwConfig) -> Result<Vec<u8>> {
    let mut encoder = LzwEncoder::new(config)?;
    encoder.encode(data)
}

/// LZW as a [`Codec`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LzwCodec {
    config: LzwConfig,
}

impl LzwCodec {
    /// Create a codec with a validated configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration used on both sides.
    pub fn config(&self) -> LzwConfig {
        self.config
    }
}

impl Codec for LzwCodec {
    fn name(&self) -> &'static str {
        "lzw"
    }

    fn compress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> oxipack_core::Result<()> {
        let data = read_all(source)?;
        sink.write_all(&compress(&data, self.config)?)?;
        Ok(())
    }

    fn decompress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> oxipack_core::Result<()> {
        let data = read_all(source)?;
        sink.write_all(&decompress(&data, self.config)?)?;
        Ok(())
    }
}
