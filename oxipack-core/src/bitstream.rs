//! Bit-level I/O for prefix codes and fixed-width code streams.
//!
//! This module provides [`BitWriter`] and [`BitReader`] for writing and reading
//! data at the bit level, plus [`BitPayload`], the serialized form of a bit
//! sequence whose length is not a multiple of eight.
//!
//! # Bit Ordering
//!
//! All OxiPack formats use MSB-first ordering: the first bit written lands in
//! the most significant bit of the first byte.
//!
//! # Partial Bytes
//!
//! A bit sequence does not self-terminate at a byte boundary, so a payload
//! stores its trailing partial byte separately together with the number of
//! valid bits in it:
//!
//! ```text
//! ┌──────────┬──────────────────────┬───────────────────────────┐
//! │ r (1 B)  │ partial byte (if r>0)│ full bytes (MSB-first)    │
//! └──────────┴──────────────────────┴───────────────────────────┘
//! ```
//!
//! The partial byte holds the *last* `r` bits of the sequence, left-packed.
//!
//! # Example
//!
//! ```
//! use oxipack_core::bitstream::{BitPayload, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0xFF, 8).unwrap();
//! let payload = writer.into_payload();
//! assert_eq!(payload.bit_len(), 11);
//!
//! let mut encoded = Vec::new();
//! payload.write_to(&mut encoded).unwrap();
//! let parsed = BitPayload::parse(&encoded).unwrap();
//! assert_eq!(parsed, payload);
//!
//! let mut reader = parsed.reader();
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
//! assert!(reader.is_empty());
//! ```

use crate::error::{CodecError, Result};
use std::io::Write;

/// A bit sequence split into full bytes and a trailing partial byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitPayload {
    /// Full bytes, MSB-first.
    bytes: Vec<u8>,
    /// Trailing partial byte, left-packed. Unused low bits are zero.
    partial: u8,
    /// Number of valid bits in `partial` (0-7).
    partial_len: u8,
}

impl BitPayload {
    /// Create a payload from its parts.
    ///
    /// Bits of `partial` beyond `partial_len` are cleared.
    pub fn new(bytes: Vec<u8>, partial: u8, partial_len: u8) -> Result<Self> {
        if partial_len > 7 {
            return Err(CodecError::malformed_header(format!(
                "partial-byte length {} exceeds 7",
                partial_len
            )));
        }

        Ok(Self {
            bytes,
            partial: partial & Self::partial_mask(partial_len),
            partial_len,
        })
    }

    /// Mask selecting the top `len` bits of a byte.
    #[inline]
    fn partial_mask(len: u8) -> u8 {
        if len == 0 { 0 } else { 0xFF << (8 - len) }
    }

    /// Total number of bits in the payload.
    pub fn bit_len(&self) -> u64 {
        self.bytes.len() as u64 * 8 + self.partial_len as u64
    }

    /// Check if the payload holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bit_len() == 0
    }

    /// The full bytes of the payload.
    pub fn full_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The trailing partial byte (left-packed).
    pub fn partial_byte(&self) -> u8 {
        self.partial
    }

    /// Number of valid bits in the partial byte.
    pub fn partial_len(&self) -> u8 {
        self.partial_len
    }

    /// Number of bytes [`write_to`](Self::write_to) produces.
    pub fn serialized_len(&self) -> usize {
        1 + usize::from(self.partial_len > 0) + self.bytes.len()
    }

    /// Serialize: partial length, partial byte (if any), then full bytes.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&[self.partial_len])?;
        if self.partial_len > 0 {
            writer.write_all(&[self.partial])?;
        }
        writer.write_all(&self.bytes)?;
        Ok(())
    }

    /// Parse a serialized payload. The payload extends to the end of `input`.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let (&partial_len, rest) = input
            .split_first()
            .ok_or_else(|| CodecError::truncated("missing partial-byte length"))?;

        if partial_len > 7 {
            return Err(CodecError::malformed_header(format!(
                "partial-byte length {} exceeds 7",
                partial_len
            )));
        }

        if partial_len == 0 {
            return Self::new(rest.to_vec(), 0, 0);
        }

        let (&partial, bytes) = rest.split_first().ok_or_else(|| {
            CodecError::truncated(format!("missing partial byte of {} bits", partial_len))
        })?;

        Self::new(bytes.to_vec(), partial, partial_len)
    }

    /// Create a reader over the bits of this payload.
    pub fn reader(&self) -> BitReader<'_> {
        BitReader {
            data: &self.bytes,
            partial: self.partial,
            partial_len: self.partial_len,
            position: 0,
        }
    }

    /// Pad the partial byte with zeros and return plain bytes.
    pub fn into_padded_bytes(mut self) -> Vec<u8> {
        if self.partial_len > 0 {
            self.bytes.push(self.partial);
        }
        self.bytes
    }
}

/// A bit-level writer accumulating MSB-first bits into memory.
///
/// Complete bytes are appended to the output as soon as they fill. The final
/// partial byte is kept separate until [`into_payload`](Self::into_payload).
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Complete output bytes.
    output: Vec<u8>,
    /// Bit buffer (MSB-first, low `bits_in_buffer` bits are valid).
    buffer: u64,
    /// Number of bits in buffer (always < 8 between calls).
    bits_in_buffer: u8,
}

impl BitWriter {
    /// Create a new empty `BitWriter`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with room for `bytes` complete bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Move complete bytes from the buffer to the output.
    #[inline]
    fn flush_bytes(&mut self) {
        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }
        self.buffer &= (1u64 << self.bits_in_buffer) - 1;
    }

    /// Write up to 32 bits, most significant first.
    ///
    /// # Arguments
    ///
    /// * `value` - The bits to write, right-aligned
    /// * `count` - Number of bits to write (0-32)
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) -> Result<()> {
        if count > 32 {
            return Err(CodecError::invalid_config(format!(
                "cannot write {} bits at once",
                count
            )));
        }

        if count == 0 {
            return Ok(());
        }

        let mask = if count == 32 {
            u32::MAX
        } else {
            (1u32 << count).wrapping_sub(1)
        };

        self.buffer = (self.buffer << count) | u64::from(value & mask);
        self.bits_in_buffer += count;

        self.flush_bytes();
        Ok(())
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.buffer = (self.buffer << 1) | u64::from(bit);
        self.bits_in_buffer += 1;

        if self.bits_in_buffer == 8 {
            self.flush_bytes();
        }
    }

    /// Write the low `count` bits of a 64-bit value (0-64), most significant first.
    pub fn write_bits_u64(&mut self, value: u64, count: u8) -> Result<()> {
        if count > 64 {
            return Err(CodecError::invalid_config(format!(
                "cannot write {} bits at once",
                count
            )));
        }

        if count > 32 {
            self.write_bits((value >> 32) as u32, count - 32)?;
            self.write_bits(value as u32, 32)
        } else {
            self.write_bits(value as u32, count)
        }
    }

    /// Finish writing and return the bits as a payload.
    pub fn into_payload(self) -> BitPayload {
        let partial_len = self.bits_in_buffer;
        let partial = if partial_len == 0 {
            0
        } else {
            (self.buffer << (8 - partial_len)) as u8
        };

        BitPayload {
            bytes: self.output,
            partial,
            partial_len,
        }
    }

    /// Finish writing, zero-pad the final byte and return the bytes.
    pub fn into_padded_bytes(self) -> Vec<u8> {
        self.into_payload().into_padded_bytes()
    }
}

/// A bit-level reader over a byte slice plus an optional partial byte.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Full bytes.
    data: &'a [u8],
    /// Trailing partial byte (left-packed).
    partial: u8,
    /// Valid bits in the partial byte.
    partial_len: u8,
    /// Index of the next bit to read.
    position: u64,
}

impl<'a> BitReader<'a> {
    /// Create a reader over whole bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            partial: 0,
            partial_len: 0,
            position: 0,
        }
    }

    /// Total number of bits available.
    pub fn bit_len(&self) -> u64 {
        self.data.len() as u64 * 8 + self.partial_len as u64
    }

    /// Get the current bit position (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.position
    }

    /// Number of bits left to read.
    pub fn remaining_bits(&self) -> u64 {
        self.bit_len() - self.position
    }

    /// Check if every bit has been consumed.
    pub fn is_empty(&self) -> bool {
        self.remaining_bits() == 0
    }

    /// Read a single bit, or `None` at the end of the stream.
    #[inline]
    pub fn read_bit(&mut self) -> Option<bool> {
        let full_bits = self.data.len() as u64 * 8;
        let bit = if self.position < full_bits {
            let byte = self.data[(self.position / 8) as usize];
            (byte >> (7 - (self.position % 8) as u8)) & 1
        } else if self.position < full_bits + self.partial_len as u64 {
            let index = (self.position - full_bits) as u8;
            (self.partial >> (7 - index)) & 1
        } else {
            return None;
        };

        self.position += 1;
        Some(bit == 1)
    }

    /// Read up to 32 bits, most significant first.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        if count > 32 {
            return Err(CodecError::invalid_config(format!(
                "cannot read {} bits at once",
                count
            )));
        }

        if self.remaining_bits() < u64::from(count) {
            return Err(CodecError::truncated(format!(
                "needed {} bits at bit position {}, {} left",
                count,
                self.position,
                self.remaining_bits()
            )));
        }

        let mut value = 0u32;
        for _ in 0..count {
            let bit = self.read_bit().unwrap_or(false);
            value = (value << 1) | u32::from(bit);
        }
        Ok(value)
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining_bits() as usize;
        (remaining, Some(remaining))
    }
}
