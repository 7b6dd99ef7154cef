//! Window matcher configuration.

use oxipack_core::error::{CodecError, Result};

/// Sliding-window parameters for the LZ77 stage.
///
/// Tokens carry a 2-byte offset and a 1-byte length, which bounds both
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Capacity of the history window in bytes (1-65535).
    pub window_size: usize,
    /// Maximum number of bytes examined ahead of the cursor (1-255).
    pub lookahead_buffer_size: usize,
}

impl WindowConfig {
    /// Largest window a 2-byte offset can address.
    pub const MAX_WINDOW_SIZE: usize = u16::MAX as usize;

    /// Largest lookahead a 1-byte length can describe.
    pub const MAX_LOOKAHEAD_BUFFER_SIZE: usize = u8::MAX as usize;

    /// Default configuration: 4 KiB window, 18-byte lookahead.
    pub const DEFAULT: Self = Self {
        window_size: 4096,
        lookahead_buffer_size: 18,
    };

    /// Largest configuration the token format allows.
    pub const MAX: Self = Self {
        window_size: Self::MAX_WINDOW_SIZE,
        lookahead_buffer_size: Self::MAX_LOOKAHEAD_BUFFER_SIZE,
    };

    /// Create a validated configuration.
    pub fn new(window_size: usize, lookahead_buffer_size: usize) -> Result<Self> {
        let config = Self {
            window_size,
            lookahead_buffer_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check both parameters against the token format.
    pub fn validate(&self) -> Result<()> {
        if self.window_size == 0 || self.window_size > Self::MAX_WINDOW_SIZE {
            return Err(CodecError::invalid_config(format!(
                "window size {} outside 1..={}",
                self.window_size,
                Self::MAX_WINDOW_SIZE
            )));
        }

        if self.lookahead_buffer_size == 0
            || self.lookahead_buffer_size > Self::MAX_LOOKAHEAD_BUFFER_SIZE
        {
            return Err(CodecError::invalid_config(format!(
                "lookahead buffer size {} outside 1..={}",
                self.lookahead_buffer_size,
                Self::MAX_LOOKAHEAD_BUFFER_SIZE
            )));
        }

        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WindowConfig::default();
        assert_eq!(config.window_size, 4096);
        assert_eq!(config.lookahead_buffer_size, 18);
        assert!(config.validate().is_ok());
        assert!(WindowConfig::MAX.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert!(matches!(
            WindowConfig::new(0, 18),
            Err(CodecError::InvalidConfig { .. })
        ));
        assert!(WindowConfig::new(65536, 18).is_err());
        assert!(WindowConfig::new(4096, 0).is_err());
        assert!(WindowConfig::new(4096, 256).is_err());
        assert!(WindowConfig::new(65535, 255).is_ok());
    }
}
