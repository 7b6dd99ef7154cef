//! LZW dictionary (code table) management.

use crate::config::LzwConfig;
use crate::error::Result;
use std::collections::HashMap;

/// LZW dictionary for encoding and decoding.
///
/// Each code above 255 stands for an earlier code's string extended by one
/// byte, so entries are stored as `(prefix code, byte)` pairs. For encoding,
/// a reverse mapping from pair to code is kept as well.
#[derive(Debug)]
pub struct LzwDictionary {
    /// Code table: code -> (prefix code, last byte). Roots have no prefix.
    table: Vec<(Option<u32>, u8)>,
    /// String length per code.
    lengths: Vec<u32>,
    /// Reverse lookup: (prefix code, byte) -> code (for encoding only).
    reverse: HashMap<(u32, u8), u32>,
    /// Configuration.
    config: LzwConfig,
}

impl LzwDictionary {
    /// Create a new LZW dictionary with the given configuration.
    pub fn new(config: LzwConfig) -> Result<Self> {
        config.validate()?;

        let mut dict = Self {
            table: Vec::with_capacity(config.max_codes as usize),
            lengths: Vec::with_capacity(config.max_codes as usize),
            reverse: HashMap::new(),
            config,
        };

        dict.reset();
        Ok(dict)
    }

    /// Reset the dictionary to its initial state.
    pub fn reset(&mut self) {
        self.table.clear();
        self.lengths.clear();
        self.reverse.clear();

        // Initialize with single-byte codes (0-255)
        for byte in 0..=255u8 {
            self.table.push((None, byte));
            self.lengths.push(1);
        }
    }

    /// Add `prefix` extended by `byte` (for encoding).
    ///
    /// Returns the assigned code, or `None` if the table is full.
    pub fn add_string(&mut self, prefix: u32, byte: u8) -> Option<u32> {
        let code = self.add_string_decode(prefix, byte)?;
        self.reverse.insert((prefix, byte), code);
        Some(code)
    }

    /// Add `prefix` extended by `byte` (for decoding).
    ///
    /// Similar to `add_string` but doesn't update the reverse map.
    pub fn add_string_decode(&mut self, prefix: u32, byte: u8) -> Option<u32> {
        if self.is_full() {
            return None;
        }

        let prefix_len = *self.lengths.get(prefix as usize)?;
        let code = self.next_code();
        self.table.push((Some(prefix), byte));
        self.lengths.push(prefix_len + 1);
        Some(code)
    }

    /// Find the code for `prefix` extended by `byte` (for encoding).
    pub fn find_code(&self, prefix: u32, byte: u8) -> Option<u32> {
        self.reverse.get(&(prefix, byte)).copied()
    }

    /// Append the byte sequence for `code` to `out`.
    ///
    /// Returns `false` (leaving `out` untouched) if the code is unassigned.
    pub fn get_string(&self, code: u32, out: &mut Vec<u8>) -> bool {
        let Some(&len) = self.lengths.get(code as usize) else {
            return false;
        };

        let start = out.len();
        out.resize(start + len as usize, 0);

        let mut cursor = Some(code);
        let mut index = out.len();
        while let Some(c) = cursor {
            let (prefix, byte) = self.table[c as usize];
            index -= 1;
            out[index] = byte;
            cursor = prefix;
        }

        true
    }

    /// Check if the dictionary is full.
    pub fn is_full(&self) -> bool {
        self.table.len() as u32 >= self.config.max_codes
    }

    /// Get the next code that will be assigned.
    pub fn next_code(&self) -> u32 {
        self.table.len() as u32
    }

    /// Get the configuration.
    pub fn config(&self) -> &LzwConfig {
        &self.config
    }
}
