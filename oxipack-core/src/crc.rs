//! CRC-32 (ISO 3309) and the checksum trailer shared by the containers.
//!
//! Containers that entropy-code their input end with the big-endian CRC-32
//! of the original data. A flipped bit that still decodes cleanly is caught
//! here as [`CodecError::ChecksumMismatch`].

use crate::error::{CodecError, Result};

/// Size of the checksum trailer in bytes.
pub const TRAILER_LEN: usize = 4;

/// Byte-at-a-time lookup table for the reflected polynomial 0xEDB88320.
const TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 == 1 { 0xEDB88320 ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
};

/// Running CRC-32 state.
///
/// ```
/// use oxipack_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.finalize(), Crc32::compute(b"Hello, World!"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Start a new checksum.
    pub fn new() -> Self {
        Self { state: !0 }
    }

    /// Feed more data.
    pub fn update(&mut self, data: &[u8]) {
        self.state = data.iter().fold(self.state, |c, &b| {
            TABLE[usize::from(c as u8 ^ b)] ^ (c >> 8)
        });
    }

    /// The checksum of everything fed so far.
    pub fn finalize(self) -> u32 {
        !self.state
    }

    /// Checksum of one buffer.
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Append the trailer for `original` to `out`.
pub fn append_trailer(out: &mut Vec<u8>, original: &[u8]) {
    out.extend_from_slice(&Crc32::compute(original).to_be_bytes());
}

/// Split a container into its body and the checksum its trailer records.
pub fn split_trailer(data: &[u8]) -> Result<(&[u8], u32)> {
    if data.len() < TRAILER_LEN {
        return Err(CodecError::truncated(format!(
            "stream of {} bytes cannot hold the checksum trailer",
            data.len()
        )));
    }

    let (body, trailer) = data.split_at(data.len() - TRAILER_LEN);
    let expected = u32::from_be_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    Ok((body, expected))
}

/// Check decoded output against the checksum taken from the trailer.
pub fn verify(expected: u32, output: &[u8]) -> Result<()> {
    let computed = Crc32::compute(output);
    if computed != expected {
        return Err(CodecError::checksum_mismatch(expected, computed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_known_values() {
        assert_eq!(Crc32::compute(b""), 0);
        assert_eq!(Crc32::compute(b"123456789"), 0xCBF43926);
        assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
    }

    #[test]
    fn test_crc32_incremental() {
        let data: Vec<u8> = (0..1000u32).map(|i| (i * 31 + 7) as u8).collect();
        let mut crc = Crc32::new();
        for chunk in data.chunks(7) {
            crc.update(chunk);
        }
        assert_eq!(crc.finalize(), Crc32::compute(&data));
    }

    #[test]
    fn test_trailer_roundtrip() {
        let mut container = b"body".to_vec();
        append_trailer(&mut container, b"123456789");
        assert_eq!(&container[4..], &[0xCB, 0xF4, 0x39, 0x26]);

        let (body, expected) = split_trailer(&container).unwrap();
        assert_eq!(body, b"body");
        assert!(verify(expected, b"123456789").is_ok());
        assert!(matches!(
            verify(expected, b"123456780"),
            Err(CodecError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_short_trailer() {
        assert!(matches!(
            split_trailer(&[1, 2, 3]),
            Err(CodecError::TruncatedStream { .. })
        ));
        assert_eq!(split_trailer(&[0; 4]).unwrap(), (&[][..], 0));
    }
}
