//! LZW decoder (decompression).

use crate::config::LzwConfig;
use crate::dictionary::LzwDictionary;
use crate::error::{LzwError, Result};
use oxipack_core::bitstream::BitReader;

/// LZW decoder for decompression.
#[derive(Debug)]
pub struct LzwDecoder {
    /// Dictionary for code lookup.
    dict: LzwDictionary,
}

impl LzwDecoder {
    /// Create a new LZW decoder with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        let dict = LzwDictionary::new(config)?;
        Ok(Self { dict })
    }

    /// Decode LZW-compressed data.
    ///
    /// Codes are read while at least one full code width remains. Fewer
    /// than 8 leftover bits are padding; a whole leftover byte means the
    /// stream was cut inside a code.
    pub fn decode(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        self.dict.reset();

        let bits = self.dict.config().code_bits;
        let mut reader = BitReader::new(input);
        let mut output = Vec::with_capacity(input.len() * 2);

        // Previous code (for dictionary building)
        let mut prev_code: Option<u32> = None;

        while reader.remaining_bits() >= u64::from(bits) {
            let position = reader.bit_position();
            let code = reader
                .read_bits(bits)
                .map_err(|_| LzwError::UnexpectedEof { position })?;

            let start = output.len();
            if self.dict.get_string(code, &mut output) {
                // Code exists in dictionary - the common case
            } else if let Some(prev) =
                prev_code.filter(|_| code == self.dict.next_code() && !self.dict.is_full())
            {
                // Code not yet in dictionary ("cScSc" pattern):
                // the string is prev_string + prev_string[0]
                self.dict.get_string(prev, &mut output);
                let first = output[start];
                output.push(first);
            } else {
                return Err(LzwError::InvalidCode { code, position });
            }

            if let Some(prev) = prev_code {
                self.dict.add_string_decode(prev, output[start]);
            }

            prev_code = Some(code);
        }

        if reader.remaining_bits() >= 8 {
            return Err(LzwError::UnexpectedEof {
                position: reader.bit_position(),
            });
        }

        log::debug!(
            "lzw: {} bytes -> {} bytes, dictionary {} entries",
            input.len(),
            output.len(),
            self.dict.next_code()
        );
        Ok(output)
    }
}
