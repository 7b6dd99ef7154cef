//! LZW encoder (compression).

use crate::config::LzwConfig;
use crate::dictionary::LzwDictionary;
use crate::error::{LzwError, Result};
use oxipack_core::bitstream::BitWriter;

/// LZW encoder for compression.
#[derive(Debug)]
pub struct LzwEncoder {
    /// Dictionary for string lookup.
    dict: LzwDictionary,
}

impl LzwEncoder {
    /// Create a new LZW encoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        let dict = LzwDictionary::new(config)?;
        Ok(Self { dict })
    }

    /// Encode data with LZW compression.
    ///
    /// # Algorithm
    ///
    /// 1. Initialize dictionary with single-byte codes (0-255)
    /// 2. Extend the current string while it stays in the dictionary
    /// 3. Output the code for the current string
    /// 4. Add string + next byte to the dictionary (while not full)
    /// 5. Restart from the next byte
    ///
    /// Codes are written with a fixed width, MSB-first, and the last byte is
    /// zero padded. Empty input produces empty output.
    pub fn encode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.dict.reset();

        let Some((&first, rest)) = input.split_first() else {
            return Ok(Vec::new());
        };

        let bits = self.dict.config().code_bits;
        let mut writer = BitWriter::with_capacity(input.len());
        let mut current = u32::from(first);
        let mut codes = 0usize;

        for &byte in rest {
            if let Some(code) = self.dict.find_code(current, byte) {
                current = code;
            } else {
                write_code(&mut writer, current, bits)?;
                codes += 1;
                self.dict.add_string(current, byte);
                current = u32::from(byte);
            }
        }

        write_code(&mut writer, current, bits)?;
        codes += 1;

        log::debug!(
            "lzw: {} bytes -> {} codes, dictionary {} entries",
            input.len(),
            codes,
            self.dict.next_code()
        );
        Ok(writer.into_padded_bytes())
    }
}

fn write_code(writer: &mut BitWriter, code: u32, bits: u8) -> Result<()> {
    writer
        .write_bits(code, bits)
        .map_err(|_| LzwError::InvalidBitWidth(bits))
}
