//! LZW configuration.

use crate::error::{LzwError, Result};

/// LZW configuration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LzwConfig {
    /// Width of every code in bits (9-24).
    pub code_bits: u8,
    /// Dictionary capacity, including the 256 single-byte codes.
    ///
    /// Once full, no more entries are added on either side.
    pub max_codes: u32,
}

impl LzwConfig {
    /// Smallest supported code width.
    pub const MIN_CODE_BITS: u8 = 9;

    /// Largest supported code width.
    pub const MAX_CODE_BITS: u8 = 24;

    /// Default configuration.
    ///
    /// - 16-bit codes (each code is two big-endian bytes)
    /// - 16384-entry dictionary
    pub const DEFAULT: Self = Self {
        code_bits: 16,
        max_codes: 1 << 14,
    };

    /// Same dictionary as [`DEFAULT`](Self::DEFAULT), packed into 14-bit codes.
    pub const COMPACT: Self = Self {
        code_bits: 14,
        max_codes: 1 << 14,
    };

    /// Create a validated configuration.
    pub fn new(code_bits: u8, max_codes: u32) -> Result<Self> {
        let config = Self {
            code_bits,
            max_codes,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the code width and dictionary capacity.
    pub fn validate(&self) -> Result<()> {
        if !(Self::MIN_CODE_BITS..=Self::MAX_CODE_BITS).contains(&self.code_bits) {
            return Err(LzwError::InvalidBitWidth(self.code_bits));
        }

        if self.max_codes < self.first_code() || self.max_codes > 1 << self.code_bits {
            return Err(LzwError::InvalidMaxCodes {
                max_codes: self.max_codes,
                code_bits: self.code_bits,
            });
        }

        Ok(())
    }

    /// The first code available for multi-byte strings.
    pub fn first_code(&self) -> u32 {
        256
    }
}

impl Default for LzwConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LzwConfig::default();
        assert_eq!(config.code_bits, 16);
        assert_eq!(config.max_codes, 16384);
        assert_eq!(config.first_code(), 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_compact_config() {
        let config = LzwConfig::COMPACT;
        assert_eq!(config.code_bits, 14);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            LzwConfig::new(8, 256),
            Err(LzwError::InvalidBitWidth(8))
        ));
        assert!(matches!(
            LzwConfig::new(25, 1 << 20),
            Err(LzwError::InvalidBitWidth(25))
        ));
        // 1024 codes do not fit in 9 bits.
        assert!(matches!(
            LzwConfig::new(9, 1024),
            Err(LzwError::InvalidMaxCodes { .. })
        ));
        assert!(LzwConfig::new(9, 100).is_err());
        assert!(LzwConfig::new(9, 512).is_ok());
    }
}
