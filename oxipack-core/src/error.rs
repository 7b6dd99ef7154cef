//! Error types for OxiPack codecs.
//!
//! Every codec reports failures through [`CodecError`]. The variants mirror the
//! places where a compressed stream can go wrong: the self-describing header,
//! the packed bit region, the back-references replayed during reconstruction,
//! and the integrity trailer.

use std::io;
use thiserror::Error;

/// The main error type for OxiPack operations.
#[derive(Debug, Error)]
pub enum CodecError {
    /// I/O error from the underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The code table or partial-byte length could not be parsed.
    #[error("Malformed header: {message}")]
    MalformedHeader {
        /// Description of the header error.
        message: String,
    },

    /// The stream ended before the header or payload promised.
    #[error("Truncated stream: {message}")]
    TruncatedStream {
        /// Description of what was missing.
        message: String,
    },

    /// The bit buffer can no longer match any code table entry.
    #[error("Undecodable symbol at bit position {bit_position}")]
    UndecodableSymbol {
        /// Bit position where decoding desynchronized.
        bit_position: u64,
    },

    /// A token points outside the output produced so far.
    #[error(
        "Invalid back-reference: offset {offset}, length {length} with {produced} bytes produced"
    )]
    InvalidBackReference {
        /// Backward distance carried by the token.
        offset: usize,
        /// Number of bytes the token copies.
        length: usize,
        /// Bytes of output produced before the token.
        produced: usize,
    },

    /// A code cannot be built over this many distinct symbols.
    #[error("Unsupported alphabet size: {size}")]
    UnsupportedAlphabetSize {
        /// Number of distinct symbols offered.
        size: usize,
    },

    /// The decoded data does not match the stored checksum.
    #[error("Checksum mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    ChecksumMismatch {
        /// Checksum stored in the stream.
        expected: u32,
        /// Checksum of the decoded data.
        computed: u32,
    },

    /// A codec was configured with out-of-range parameters.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the rejected parameter.
        message: String,
    },
}

/// Result type alias for OxiPack operations.
pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    /// Create a malformed header error.
    pub fn malformed_header(message: impl Into<String>) -> Self {
        Self::MalformedHeader {
            message: message.into(),
        }
    }

    /// Create a truncated stream error.
    pub fn truncated(message: impl Into<String>) -> Self {
        Self::TruncatedStream {
            message: message.into(),
        }
    }

    /// Create an undecodable symbol error.
    pub fn undecodable(bit_position: u64) -> Self {
        Self::UndecodableSymbol { bit_position }
    }

    /// Create an invalid back-reference error.
    pub fn invalid_back_reference(offset: usize, length: usize, produced: usize) -> Self {
        Self::InvalidBackReference {
            offset,
            length,
            produced,
        }
    }

    /// Create an unsupported alphabet size error.
    pub fn unsupported_alphabet(size: usize) -> Self {
        Self::UnsupportedAlphabetSize { size }
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, computed: u32) -> Self {
        Self::ChecksumMismatch { expected, computed }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error means the compressed stream itself is corrupt,
    /// as opposed to an I/O or configuration problem.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader { .. }
                | Self::TruncatedStream { .. }
                | Self::UndecodableSymbol { .. }
                | Self::InvalidBackReference { .. }
                | Self::ChecksumMismatch { .. }
        )
    }
}
