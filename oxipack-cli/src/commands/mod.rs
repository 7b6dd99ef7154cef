//! Command implementations for OxiPack CLI.

pub mod compress;
pub mod stats;

pub use compress::{cmd_compress, cmd_decompress};
pub use stats::cmd_stats;
pub use test::cmd_test;

use clap::{Args, ValueEnum};
use oxipack_core::{Codec, CodecError};
use oxipack_deflate::{DeflateCodec, HuffmanCodec, Lz77Codec, WindowConfig};
use oxipack_lzw::{LzwCodec, LzwConfig};

/// Codec selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CodecKind {
    /// LZ77 tokens entropy-coded with Huffman, CRC-32 trailer
    Deflate,
    /// Raw LZ77 token stream
    Lz77,
    /// Byte-level Huffman coding
    Huffman,
    /// Fixed-width LZW codes
    Lzw,
}

impl CodecKind {
    pub const ALL: [CodecKind; 4] = [
        CodecKind::Deflate,
        CodecKind::Lz77,
        CodecKind::Huffman,
        CodecKind::Lzw,
    ];
}

/// Codec options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct CodecArgs {
    /// Codec to use
    #[arg(short, long, value_enum, default_value = "deflate")]
    pub codec: CodecKind,

    /// History window in bytes (deflate, lz77)
    #[arg(short = 'w', long, default_value_t = WindowConfig::DEFAULT.window_size)]
    pub window_size: usize,

    /// Lookahead buffer in bytes (deflate, lz77)
    #[arg(short = 'l', long, default_value_t = WindowConfig::DEFAULT.lookahead_buffer_size)]
    pub lookahead: usize,

    /// LZW code width in bits
    #[arg(long, default_value_t = LzwConfig::DEFAULT.code_bits)]
    pub code_bits: u8,
}

impl CodecArgs {
    /// Build the selected codec.
    pub fn build(&self) -> Result<Box<dyn Codec>, CodecError> {
        self.build_kind(self.codec)
    }

    /// Build `kind` with these options, ignoring the `--codec` selection.
    pub fn build_kind(&self, kind: CodecKind) -> Result<Box<dyn Codec>, CodecError> {
        let codec: Box<dyn Codec> = match kind {
            CodecKind::Deflate => Box::new(DeflateCodec::new(self.window()?)?),
            CodecKind::Lz77 => Box::new(Lz77Codec::new(self.window()?)?),
            CodecKind::Huffman => Box::new(HuffmanCodec::new()),
            CodecKind::Lzw => Box::new(LzwCodec::new(self.lzw()?)?),
        };
        log::debug!("using codec {}", codec.name());
        Ok(codec)
    }

    pub fn window(&self) -> Result<WindowConfig, CodecError> {
        WindowConfig::new(self.window_size, self.lookahead)
    }

    fn lzw(&self) -> Result<LzwConfig, CodecError> {
        // Narrow widths cannot hold the default dictionary cap.
        let capacity = 1u32
            .checked_shl(u32::from(self.code_bits))
            .unwrap_or(u32::MAX);
        let max_codes = LzwConfig::DEFAULT.max_codes.min(capacity);
        Ok(LzwConfig::new(self.code_bits, max_codes)?)
    }
}
