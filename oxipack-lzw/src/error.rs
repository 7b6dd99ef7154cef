//! LZW-specific error types.

use oxipack_core::error::CodecError;
use thiserror::Error;

/// LZW compression/decompression errors.
#[derive(Debug, Error)]
pub enum LzwError {
    /// A code that is neither in the dictionary nor the next one to be added.
    #[error("Invalid LZW code {code} at bit position {position}")]
    InvalidCode {
        /// The offending code.
        code: u32,
        /// Bit position where the code starts.
        position: u64,
    },

    /// Invalid code width specified.
    #[error("Invalid code width: {0} (must be 9-24)")]
    InvalidBitWidth(u8),

    /// Dictionary capacity does not fit the code width.
    #[error("Invalid dictionary size {max_codes} for {code_bits}-bit codes")]
    InvalidMaxCodes {
        /// Requested capacity.
        max_codes: u32,
        /// Configured code width.
        code_bits: u8,
    },

    /// Unexpected end of data.
    #[error("Unexpected end of data at bit position {position}")]
    UnexpectedEof {
        /// Bit position where EOF occurred.
        position: u64,
    },
}

/// Result type for LZW operations.
pub type Result<T> = std::result::Result<T, LzwError>;

impl From<LzwError> for CodecError {
    fn from(err: LzwError) -> Self {
        match err {
            LzwError::InvalidCode { position, .. } => CodecError::undecodable(position),
            LzwError::InvalidBitWidth(_) | LzwError::InvalidMaxCodes { .. } => {
                CodecError::invalid_config(err.to_string())
            }
            LzwError::UnexpectedEof { .. } => CodecError::truncated(err.to_string()),
        }
    }
}
