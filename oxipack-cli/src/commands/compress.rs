//! Compress and decompress command implementations.

use super::CodecArgs;
use crate::utils::{format_ratio, format_size};
use std::fs;
use std::path::Path;
use std::time::Instant;

pub fn cmd_compress(
    src: &Path,
    dest: &Path,
    args: &CodecArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = args.build()?;
    let start = Instant::now();
    codec.compress_file(src, dest)?;

    let original = fs::metadata(src)?.len();
    let compressed = fs::metadata(dest)?.len();
    log::info!(
        "{} compressed {} in {:.2?}",
        codec.name(),
        src.display(),
        start.elapsed()
    );

    println!(
        "{} -> {} [{}] {} -> {} ({})",
        src.display(),
        dest.display(),
        codec.name(),
        format_size(original),
        format_size(compressed),
        format_ratio(original, compressed)
    );
    Ok(())
}

pub fn cmd_decompress(
    src: &Path,
    dest: &Path,
    args: &CodecArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = args.build()?;
    let start = Instant::now();
    codec.decompress_file(src, dest)?;

    let restored = fs::metadata(dest)?.len();
    log::info!(
        "{} decompressed {} in {:.2?}",
        codec.name(),
        src.display(),
        start.elapsed()
    );

    println!(
        "{} -> {} [{}] {}",
        src.display(),
        dest.display(),
        codec.name(),
        format_size(restored)
    );
    Ok(())
}
