//! LZ77 sliding-window tokenizer.
//!
//! The input is split into tokens `(offset, length, literal)`: copy `length`
//! bytes starting `offset` bytes back in the output produced so far, then
//! append `literal`. The very last token has no literal and marks the end of
//! the input; exactly one such token is emitted, even for empty input.
//!
//! # Matching
//!
//! The history window holds the most recent `window_size` committed bytes.
//! At each step the matcher looks for the longest prefix of the lookahead
//! (at most `lookahead_buffer_size` bytes) that occurs entirely inside the
//! history, preferring the most recent occurrence on ties. Matches never
//! extend into the lookahead itself, so offsets always satisfy
//! `offset >= length`.
//!
//! # Wire format
//!
//! The standalone LZ77 codec stores each token as a 2-byte big-endian offset,
//! a 1-byte length and, if present, the literal byte. The terminal token is
//! the one whose 3-byte header ends the stream.

use crate::config::WindowConfig;
use oxipack_core::error::{CodecError, Result};
use oxipack_core::traits::{Codec, read_all};
use std::io::{Read, Write};

/// Size of a serialized token header (offset + length).
const TOKEN_HEADER_LEN: usize = 3;

/// A token produced by the window matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Distance back from the end of the output (0 when `length` is 0).
    pub offset: u16,
    /// Number of bytes to copy.
    pub length: u8,
    /// Byte appended after the copy; `None` only on the terminal token.
    pub literal: Option<u8>,
}

impl Token {
    /// Create a token.
    pub const fn new(offset: u16, length: u8, literal: Option<u8>) -> Self {
        Self {
            offset,
            length,
            literal,
        }
    }

    /// A token that emits a single byte with no copy.
    pub const fn literal(byte: u8) -> Self {
        Self::new(0, 0, Some(byte))
    }

    /// Whether this token ends the stream.
    pub fn is_terminal(&self) -> bool {
        self.literal.is_none()
    }

    /// Number of output bytes this token produces.
    pub fn decoded_len(&self) -> usize {
        self.length as usize + usize::from(self.literal.is_some())
    }
}

/// Find the longest prefix of `lookahead` occurring entirely in `history`.
///
/// Returns `(offset, length)`, or `(0, 0)` when not even the first byte
/// occurs. Among equally long matches the one nearest the end wins.
fn longest_match(history: &[u8], lookahead: &[u8]) -> (usize, usize) {
    let Some(&first) = lookahead.first() else {
        return (0, 0);
    };

    let mut best = (0, 0);
    for start in (0..history.len()).rev() {
        if history[start] != first {
            continue;
        }

        let limit = (history.len() - start).min(lookahead.len());
        let length = history[start..start + limit]
            .iter()
            .zip(lookahead)
            .take_while(|(a, b)| a == b)
            .count();

        if length > best.1 {
            best = (history.len() - start, length);
            if length == lookahead.len() {
                break;
            }
        }
    }

    best
}

/// Sliding-window matcher over an input buffer.
///
/// The history is the `window_size` bytes before the cursor; the lookahead is
/// up to `lookahead_buffer_size` bytes from the cursor on. Iterating the
/// matcher yields the token stream, ending with the terminal token.
#[derive(Debug, Clone)]
pub struct WindowMatcher<'a> {
    input: &'a [u8],
    position: usize,
    config: WindowConfig,
    finished: bool,
}

impl<'a> WindowMatcher<'a> {
    /// Create a matcher at the start of `input`.
    pub fn new(input: &'a [u8], config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            input,
            position: 0,
            config,
            finished: false,
        })
    }

    /// Number of input bytes committed to the history so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The current history window (never longer than `window_size`).
    pub fn history(&self) -> &'a [u8] {
        let start = self.position.saturating_sub(self.config.window_size);
        &self.input[start..self.position]
    }

    /// The current lookahead buffer.
    pub fn lookahead(&self) -> &'a [u8] {
        let end = (self.position + self.config.lookahead_buffer_size).min(self.input.len());
        &self.input[self.position..end]
    }

    /// Longest match of the lookahead inside the history as `(offset, length)`.
    pub fn find_longest_match(&self) -> (u16, u8) {
        let (offset, length) = longest_match(self.history(), self.lookahead());
        // Both bounded by the validated window and lookahead sizes.
        (offset as u16, length as u8)
    }

    /// Commit the next match plus literal to the history and return its token.
    ///
    /// Returns `None` once the terminal token has been produced.
    pub fn advance(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }

        let (offset, length) = self.find_longest_match();
        self.position += length as usize;

        let literal = self.input.get(self.position).copied();
        match literal {
            Some(_) => self.position += 1,
            None => self.finished = true,
        }

        Some(Token::new(offset, length, literal))
    }
}

impl Iterator for WindowMatcher<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.advance()
    }
}

/// Tokenize `data` with the given window configuration.
pub fn tokenize(data: &[u8], config: WindowConfig) -> Result<Vec<Token>> {
    let tokens: Vec<Token> = WindowMatcher::new(data, config)?.collect();
    log::debug!("lz77: {} bytes -> {} tokens", data.len(), tokens.len());
    Ok(tokens)
}

/// Append the bytes described by `token` to `output`.
///
/// The copy runs byte by byte, so a source range overlapping the bytes being
/// produced is allowed.
pub fn apply_token(output: &mut Vec<u8>, token: &Token) -> Result<()> {
    let offset = token.offset as usize;
    let length = token.length as usize;
    let produced = output.len();

    if length == 0 {
        if offset != 0 {
            return Err(CodecError::invalid_back_reference(offset, length, produced));
        }
    } else {
        if offset == 0 || offset > produced {
            return Err(CodecError::invalid_back_reference(offset, length, produced));
        }

        let start = produced - offset;
        output.reserve(length + 1);
        for i in 0..length {
            let byte = output[start + i];
            output.push(byte);
        }
    }

    if let Some(byte) = token.literal {
        output.push(byte);
    }

    Ok(())
}

/// Rebuild the original bytes from a complete token sequence.
///
/// The sequence must end with its only terminal token.
pub fn reconstruct(tokens: &[Token]) -> Result<Vec<u8>> {
    let mut output = Vec::with_capacity(tokens.iter().map(Token::decoded_len).sum());

    for (i, token) in tokens.iter().enumerate() {
        apply_token(&mut output, token)?;
        if token.is_terminal() {
            if i + 1 != tokens.len() {
                return Err(CodecError::malformed_header(format!(
                    "{} tokens follow the terminal token",
                    tokens.len() - i - 1
                )));
            }
            return Ok(output);
        }
    }

    Err(CodecError::truncated("token sequence has no terminal token"))
}

/// Serialize tokens in the standalone LZ77 wire format.
pub fn write_tokens(tokens: &[Token], out: &mut Vec<u8>) {
    out.reserve(tokens.len() * (TOKEN_HEADER_LEN + 1));
    for token in tokens {
        out.extend_from_slice(&token.offset.to_be_bytes());
        out.push(token.length);
        if let Some(byte) = token.literal {
            out.push(byte);
        }
    }
}

/// Parse tokens from the standalone LZ77 wire format.
pub fn parse_tokens(input: &[u8]) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(input.len() / (TOKEN_HEADER_LEN + 1) + 1);
    let mut pos = 0;

    loop {
        let Some(header) = input.get(pos..pos + TOKEN_HEADER_LEN) else {
            return Err(CodecError::truncated(format!(
                "token header at byte {} needs {} bytes, {} left",
                pos,
                TOKEN_HEADER_LEN,
                input.len() - pos
            )));
        };
        pos += TOKEN_HEADER_LEN;

        let offset = u16::from_be_bytes([header[0], header[1]]);
        let length = header[2];
        let literal = input.get(pos).copied();
        tokens.push(Token::new(offset, length, literal));

        match literal {
            Some(_) => pos += 1,
            None => return Ok(tokens),
        }
    }
}

/// Standalone LZ77 codec (tokens stored without entropy coding).
#[derive(Debug, Clone, Default)]
pub struct Lz77Codec {
    config: WindowConfig,
}

impl Lz77Codec {
    /// Create a codec with a validated window configuration.
    pub fn new(config: WindowConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The window configuration used for compression.
    pub fn config(&self) -> WindowConfig {
        self.config
    }
}

impl Codec for Lz77Codec {
    fn name(&self) -> &'static str {
        "lz77"
    }

    fn compress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        let data = read_all(source)?;
        let tokens = tokenize(&data, self.config)?;

        let mut out = Vec::new();
        write_tokens(&tokens, &mut out);
        sink.write_all(&out)?;
        Ok(())
    }

    fn decompress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        let data = read_all(source)?;
        let tokens = parse_tokens(&data)?;
        let output = reconstruct(&tokens)?;
        sink.write_all(&output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(data: &[u8]) -> Vec<Token> {
        tokenize(data, WindowConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_input() {
        let tokens = tokens_of(b"");
        assert_eq!(tokens, vec![Token::new(0, 0, None)]);
        assert_eq!(reconstruct(&tokens).unwrap(), b"");
    }

    #[test]
    fn test_repeated_char() {
        let tokens = tokens_of(b"AAAAAA");
        assert_eq!(
            tokens,
            vec![
                Token::literal(b'A'),
                Token::new(1, 1, Some(b'A')),
                Token::new(3, 3, None),
            ]
        );
        assert_eq!(reconstruct(&tokens).unwrap(), b"AAAAAA");
    }

    #[test]
    fn test_alternating_pattern() {
        let tokens = tokens_of(b"ABABAB");
        assert_eq!(tokens[0], Token::literal(b'A'));
        assert_eq!(tokens[1], Token::literal(b'B'));
        assert_eq!(tokens[2], Token::new(2, 2, Some(b'A')));
        assert_eq!(tokens[3], Token::new(2, 1, None));
        assert_eq!(reconstruct(&tokens).unwrap(), b"ABABAB");
    }

    #[test]
    fn test_input_ending_on_literal() {
        let tokens = tokens_of(b"AB");
        assert_eq!(
            tokens,
            vec![
                Token::literal(b'A'),
                Token::literal(b'B'),
                Token::new(0, 0, None)
            ]
        );
    }

    #[test]
    fn test_most_recent_match_wins() {
        // At the second repeat "XY" occurs 6 and 3 bytes back.
        let tokens = tokens_of(b"XYaXYbXYc");
        assert_eq!(tokens[3], Token::new(3, 2, Some(b'b')));
        assert_eq!(tokens[4], Token::new(3, 2, Some(b'c')));
    }

    #[test]
    fn test_window_bounds_history() {
        let config = WindowConfig::new(4, 3).unwrap();
        let data = b"abcdefghabcdefgh";
        let mut matcher = WindowMatcher::new(data, config).unwrap();

        while let Some(token) = matcher.advance() {
            assert!(matcher.history().len() <= 4);
            assert!(token.offset as usize <= 4);
            assert!(token.length as usize <= 3);
        }
        // The repeat is 8 bytes back, beyond the 4-byte window.
        let tokens = tokenize(data, config).unwrap();
        assert!(tokens.iter().all(|t| t.length == 0));
    }

    #[test]
    fn test_match_never_overlaps_lookahead() {
        let tokens = tokens_of(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        for token in &tokens {
            assert!(token.length == 0 || token.offset as usize >= token.length as usize);
        }
        assert_eq!(reconstruct(&tokens).unwrap(), vec![b'a'; 32]);
    }

    #[test]
    fn test_apply_overlapping_copy() {
        let mut output = b"ab".to_vec();
        apply_token(&mut output, &Token::new(2, 5, Some(b'!'))).unwrap();
        assert_eq!(output, b"abababa!");
    }

    #[test]
    fn test_invalid_back_references() {
        let mut output = b"abc".to_vec();
        let err = apply_token(&mut output, &Token::new(4, 1, Some(b'x'))).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidBackReference {
                offset: 4,
                length: 1,
                produced: 3
            }
        ));

        assert!(apply_token(&mut output, &Token::new(0, 2, None)).is_err());
        assert!(apply_token(&mut output, &Token::new(1, 0, Some(b'x'))).is_err());
        assert_eq!(output, b"abc");
    }

    #[test]
    fn test_reconstruct_requires_single_terminal() {
        let missing = [Token::literal(b'a')];
        assert!(matches!(
            reconstruct(&missing),
            Err(CodecError::TruncatedStream { .. })
        ));

        let extra = [Token::new(0, 0, None), Token::literal(b'a')];
        assert!(reconstruct(&extra).is_err());
    }

    #[test]
    fn test_wire_format() {
        let tokens = tokens_of(b"AAAAAA");
        let mut out = Vec::new();
        write_tokens(&tokens, &mut out);
        assert_eq!(out, [0, 0, 0, b'A', 0, 1, 1, b'A', 0, 3, 3]);
        assert_eq!(parse_tokens(&out).unwrap(), tokens);
    }

    #[test]
    fn test_parse_truncated() {
        assert!(matches!(
            parse_tokens(&[]),
            Err(CodecError::TruncatedStream { .. })
        ));
        assert!(matches!(
            parse_tokens(&[0, 0, 0, b'A', 0, 1]),
            Err(CodecError::TruncatedStream { .. })
        ));
    }

    #[test]
    fn test_codec_roundtrip() {
        let codec = Lz77Codec::default();
        let data = b"the rain in spain stays mainly in the plain";
        let compressed = codec.compress_to_vec(data).unwrap();
        assert_eq!(codec.decompress_to_vec(&compressed).unwrap(), data);

        let empty = codec.compress_to_vec(b"").unwrap();
        assert_eq!(empty, [0, 0, 0]);
        assert_eq!(codec.decompress_to_vec(&empty).unwrap(), b"");
    }
}
