//! The codec contract shared by every OxiPack algorithm.
//!
//! A [`Codec`] is a one-shot, synchronous transform: `compress` reads the whole
//! source, writes the whole encoded stream, and either succeeds with a
//! byte-exact round trip or fails with a typed [`CodecError`]. Codec values
//! only carry configuration. All working state (history window, frequency
//! and code tables, bit buffers) lives inside a single call, so one codec
//! value can serve any number of calls, including concurrent ones.
//!
//! [`CodecError`]: crate::error::CodecError

use crate::error::Result;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// A lossless byte-stream codec.
///
/// The trait is object safe so callers can pick a codec at runtime
/// (`Box<dyn Codec>`).
pub trait Codec {
    /// Short lowercase identifier of the codec (e.g. `"deflate"`).
    fn name(&self) -> &'static str;

    /// Compress everything readable from `source` into `sink`.
    fn compress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()>;

    /// Decompress everything readable from `source` into `sink`.
    fn decompress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()>;

    /// Compress a slice into a new vector (convenience method).
    fn compress_to_vec(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut source = data;
        let mut output = Vec::new();
        self.compress(&mut source, &mut output)?;
        Ok(output)
    }

    /// Decompress a slice into a new vector (convenience method).
    fn decompress_to_vec(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut source = data;
        let mut output = Vec::new();
        self.decompress(&mut source, &mut output)?;
        Ok(output)
    }

    /// Compress the file at `src` into `dest`.
    ///
    /// The destination is only created once the whole output is known to be
    /// valid; on failure no partial output is left behind.
    fn compress_file(&self, src: &Path, dest: &Path) -> Result<()> {
        let input = fs::read(src)?;
        let output = self.compress_to_vec(&input)?;
        write_file_atomic(dest, &output)
    }

    /// Decompress the file at `src` into `dest`.
    ///
    /// The destination is only created once the whole stream has decoded
    /// successfully; on failure no partial output is left behind.
    fn decompress_file(&self, src: &Path, dest: &Path) -> Result<()> {
        let input = fs::read(src)?;
        let output = self.decompress_to_vec(&input)?;
        write_file_atomic(dest, &output)
    }
}

impl<C: Codec + ?Sized> Codec for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn compress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        (**self).compress(source, sink)
    }

    fn decompress(&self, source: &mut dyn Read, sink: &mut dyn Write) -> Result<()> {
        (**self).decompress(source, sink)
    }
}

/// Read a source to the end.
///
/// Codecs need the whole input before frequency analysis can start.
pub fn read_all(source: &mut dyn Read) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;
    Ok(data)
}

/// Temporary sibling path used while writing `dest`.
fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.oxipack-partial", name))
}

/// Write `data` to `dest` through a staging file renamed into place.
pub fn write_file_atomic(dest: &Path, data: &[u8]) -> Result<()> {
    let staging = staging_path(dest);

    let result = (|| -> std::io::Result<()> {
        let mut file = fs::File::create(&staging)?;
        file.write_all(data)?;
        file.sync_all()?;
        fs::rename(&staging, dest)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&staging);
        return Err(e.into());
    }

    log::debug!("wrote {} bytes to {}", data.len(), dest.display());
    Ok(())
}
