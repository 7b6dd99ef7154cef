//! Deflate-style compression: LZ77 tokens entropy coded with Huffman.
//!
//! Each token is flattened into field symbols (offset, length, then literal
//! or end marker) and the symbol sequence is Huffman coded as a whole. The
//! container is the Huffman container followed by a 4-byte big-endian
//! CRC-32 of the original data:
//!
//! ```text
//! ┌────────────┬──────────────────────────┬──────────────┐
//! │ code table │ bit payload (r, partial, │ CRC-32 (BE)  │
//! │            │ full bytes)              │              │
//! └────────────┴──────────────────────────┴──────────────┘
//! ```
//!
//! # Symbol encoding in the code table
//!
//! | Symbol        | Bytes                 |
//! |---------------|-----------------------|
//! | `Offset(o)`   | `0x00`, `o` as u16 BE |
//! | `Length(l)`   | `0x01`, `l`           |
//! | `Literal(b)`  | `0x02`, `b`           |
//! | `End`         | `0x03`                |

use crate::config::WindowConfig;
use crate::huffman::{
    self, FrequencyTable, Symbol, SymbolDecoder, average_code_length, entropy, take_bytes,
};
use crate::lz77::{Token, apply_token, tokenize};
use oxipack_core::crc::{self, TRAILER_LEN};
use oxipack_core::error::{CodecError, Result};
use oxipack_core::traits::{Codec, read_all};
use std::io::{Read, Write};

const TAG_OFFSET: u8 = 0;
const TAG_LENGTH: u8 = 1;
const TAG_LITERAL: u8 = 2;
const TAG_END: u8 = 3;

/// A single field of a flattened token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenSymbol {
    /// Back-reference distance.
    Offset(u16),
    /// Back-reference length.
    Length(u8),
    /// Literal byte following the copy.
    Literal(u8),
    /// Marks the terminal token (no literal).
    End,
}

impl Symbol for TokenSymbol {
    fn write_to(&self, out: &mut Vec<u8>) {
        match *self {
            TokenSymbol::Offset(offset) => {
                out.push(TAG_OFFSET);
                out.extend_from_slice(&offset.to_be_bytes());
            }
            TokenSymbol::Length(length) => out.extend_from_slice(&[TAG_LENGTH, length]),
            TokenSymbol::Literal(byte) => out.extend_from_slice(&[TAG_LITERAL, byte]),
            TokenSymbol::End => out.push(TAG_END),
        }
    }

    fn read_from(input: &mut &[u8]) -> Result<Self> {
        let tag = take_bytes(input, 1, "token symbol tag")?[0];
        match tag {
            TAG_OFFSET => {
                let bytes = take_bytes(input, 2, "offset symbol")?;
                Ok(TokenSymbol::Offset(u16::from_be_bytes([bytes[0], bytes[1]])))
            }
            TAG_LENGTH => Ok(TokenSymbol::Length(take_bytes(input, 1, "length symbol")?[0])),
            TAG_LITERAL => Ok(TokenSymbol::Literal(
                take_bytes(input, 1, "literal symbol")?[0],
            )),
            TAG_END => Ok(TokenSymbol::End),
            other => Err(CodecError::malformed_header(format!(
                "unknown token symbol tag {}",
                other
            ))),
        }
    }
}

/// Flatten tokens into their field symbols.
pub fn flatten_tokens(tokens: &[Token]) -> Vec<TokenSymbol> {
    let mut symbols = Vec::with_capacity(tokens.len() * 3);
    for token in tokens {
        symbols.push(TokenSymbol::Offset(token.offset));
        symbols.push(TokenSymbol::Length(token.length));
        symbols.push(match token.literal {
            Some(byte) => TokenSymbol::Literal(byte),
            None => TokenSymbol::End,
        });
    }
    symbols
}

/// Reassembles tokens from a decoded symbol stream.
///
/// Yields tokens up to and including the terminal one. A symbol in the wrong
/// position is `UndecodableSymbol`; running out of symbols mid-token is
/// `TruncatedStream`.
#[derive(Debug)]
pub struct TokenReader<'a> {
    symbols: SymbolDecoder<'a, TokenSymbol>,
    done: bool,
}

impl<'a> TokenReader<'a> {
    /// Wrap a symbol decoder.
    pub fn new(symbols: SymbolDecoder<'a, TokenSymbol>) -> Self {
        Self {
            symbols,
            done: false,
        }
    }

    fn pull(&mut self, field: &str) -> Result<(u64, TokenSymbol)> {
        let position = self.symbols.bit_position();
        match self.symbols.next() {
            Some(symbol) => Ok((position, symbol?)),
            None => Err(CodecError::truncated(format!(
                "payload ends at bit {} before the {} field",
                position, field
            ))),
        }
    }

    fn read_token(&mut self) -> Result<Token> {
        let offset = match self.pull("offset")? {
            (_, TokenSymbol::Offset(offset)) => offset,
            (position, _) => return Err(CodecError::undecodable(position)),
        };
        let length = match self.pull("length")? {
            (_, TokenSymbol::Length(length)) => length,
            (position, _) => return Err(CodecError::undecodable(position)),
        };
        let literal = match self.pull("literal")? {
            (_, TokenSymbol::Literal(byte)) => Some(byte),
            (_, TokenSymbol::End) => None,
            (position, _) => return Err(CodecError::undecodable(position)),
        };
        Ok(Token::new(offset, length, literal))
    }

    /// Check that nothing follows the terminal token.
    pub fn finish(mut self) -> Result<()> {
        if !self.done {
            return Err(CodecError::truncated("token stream has no terminal token"));
        }

        let position = self.symbols.bit_position();
        match self.symbols.next() {
            None => Ok(()),
            Some(Ok(_)) => Err(CodecError::undecodable(position)),
            Some(Err(e)) => Err(e),
        }
    }
}

impl Iterator for TokenReader<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Result<Token>> {
        if self.done {
            return None;
        }

        let result = self.read_token();
        if !matches!(&result, Ok(token) if !token.is_terminal()) {
            self.done = true;
        }
        Some(result)
    }
}

/// Summary of how a buffer compresses, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct DeflateReport {
    /// Input size in bytes.
    pub input_len: usize,
    /// Number of LZ77 tokens, including the terminal one.
    pub token_count: usize,
    /// Tokens carrying a back-reference.
    pub match_count: usize,
    /// Distinct field symbols in the code table.
    pub distinct_symbols: usize,
    /// Shannon entropy of the field symbols, in bits.
    pub entropy: f64,
    /// Expected Huffman code length, in bits.
    pub average_code_length: f64,
    /// Longest Huffman code, in bits.
    pub max_code_length: u8,
    /// Container size in bytes.
    pub output_len: usize,
}

/// LZ77 tokenization followed by Huffman coding, with a CRC-32 trailer.
#[derive(Debug, Clone, Default)]
pub struct DeflateCodec {
    config: WindowConfig,
}

impl DeflateCodec {
    /// Create a codec with a validated window configuration.
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The window configuration used for compression.
    pub fn config(&self) -> WindowConfig {
        self.config
    }

    /// Compress a buffer into a container.
    pub fn compress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let tokens = tokenize(data, self.config)?;
        let symbols = flatten_tokens(&tokens);

        let mut out = huffman::encode_symbols(&symbols)?;
        crc::append_trailer(&mut out, data);

        log::debug!(
            "deflate: {} bytes -> {} tokens -> {} bytes",
            data.len(),
            tokens.len(),
            out.len()
        );
        Ok(out)
    }

    /// Decompress a container, verifying the CRC-32 trailer.
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        let (body, expected) = crc::split_trailer(data)?;
        let (table, payload) = huffman::read_container::<TokenSymbol>(body)?;
        let mut reader = TokenReader::new(table.decoder(&payload));

        let mut output = Vec::new();
        for token in &mut reader {
            apply_token(&mut output, &token?)?;
        }
        reader.finish()?;

        crc::verify(expected, &output)?;
        Ok(output)
    }

    /// Compress `data` and describe the intermediate stages.
    pub fn analyze(&self, data: &[u8]) -> Result<DeflateReport> {
        let tokens = tokenize(data, self.config)?;
        let symbols = flatten_tokens(&tokens);
        let freqs = FrequencyTable::from_symbols(symbols.iter().copied());
        let table = huffman::build_code(&freqs)?;
        let output_len = huffman::encode_symbols(&symbols)?.len() + TRAILER_LEN;

        Ok(DeflateReport {
            input_len: data.len(),
            token_count: tokens.len(),
            match_count: tokens.iter().filter(|t| t.length > 0).count(),
            distinct_symbols: table.len(),
            entropy: entropy(&freqs),
            average_code_length: average_code_length(&freqs, &table),
            max_code_length: table.max_code_length(),
            output_len,
        })
    }
}

impl Codec for DeflateCodec {
    fn name(&self) -> &'static str {
        "deflate"
    }

    fn compress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        let data = read_all(source)?;
        sink.write_all(&self.compress_bytes(&data)?)?;
        Ok(())
    }

    fn decompress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        let data = read_all(source)?;
        sink.write_all(&self.decompress_bytes(&data)?)?;
        Ok(())
    }
}

/// Compress data with the given window configuration (convenience function).
pub fn deflate(data: &[u8], config: WindowConfig) -> Result<Vec<u8>> {
    DeflateCodec::new(config)?.compress_bytes(data)
}

/// Decompress a Deflate-style container (convenience function).
pub fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    DeflateCodec::default().decompress_bytes(data)
}
