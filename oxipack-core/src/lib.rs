//! # OxiPack Core
//!
//! Core components shared by the OxiPack codecs.
//!
//! This crate provides the fundamental building blocks:
//!
//! - [`bitstream`]: MSB-first bit I/O and the partial-byte payload format
//! - [`crc`]: CRC-32 integrity checksum
//! - [`traits`]: The [`Codec`] contract every algorithm implements
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Front end                                           │
//! │     oxipack CLI (compress / decompress / test / stats)  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codecs                                              │
//! │     Deflate-style (LZ77 + Huffman), LZ77, Huffman, LZW  │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, BitPayload, CRC-32, Codec      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxipack_core::bitstream::BitWriter;
//! use oxipack_core::crc::Crc32;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b1011, 4).unwrap();
//! let payload = writer.into_payload();
//! assert_eq!(payload.partial_len(), 4);
//!
//! let crc = Crc32::compute(b"Hello, World!");
//! assert_eq!(crc, 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod crc;
pub mod error;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{BitPayload, BitReader, BitWriter};
pub use crc::Crc32;
pub use error::{CodecError, Result};
pub use traits::Codec;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitPayload, BitReader, BitWriter};
    pub use crate::crc::Crc32;
    pub use crate::error::{CodecError, Result};
    pub use crate::traits::Codec;
}
