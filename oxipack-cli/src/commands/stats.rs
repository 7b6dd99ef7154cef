//! Stats command implementation.

use super::{CodecArgs, CodecKind};
use crate::utils::{format_ratio, format_size};
use oxipack_deflate::huffman::{self, FrequencyTable};
use oxipack_deflate::{DeflateCodec, DeflateReport};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// JSON output structure for stats.
#[derive(Debug, Serialize)]
struct StatsJson {
    file: String,
    size: u64,
    bytes: ByteStatsJson,
    deflate: DeflateStatsJson,
    codecs: Vec<CodecSizeJson>,
}

#[derive(Debug, Serialize)]
struct ByteStatsJson {
    distinct: usize,
    entropy: f64,
    average_code_length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_code_length: Option<u8>,
}

#[derive(Debug, Serialize)]
struct DeflateStatsJson {
    window_size: usize,
    lookahead_buffer_size: usize,
    tokens: usize,
    matches: usize,
    distinct_symbols: usize,
    entropy: f64,
    average_code_length: f64,
    max_code_length: u8,
}

#[derive(Debug, Serialize)]
struct CodecSizeJson {
    codec: &'static str,
    compressed_size: u64,
    ratio: f64,
}

pub fn cmd_stats(
    file: &Path,
    args: &CodecArgs,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(file)?;
    let size = data.len() as u64;

    let bytes = byte_stats(&data)?;
    let window = args.window()?;
    let report = DeflateCodec::new(window)?.analyze(&data)?;

    let mut codecs = Vec::with_capacity(CodecKind::ALL.len());
    for kind in CodecKind::ALL {
        let codec = args.build_kind(kind)?;
        let compressed = codec.compress_to_vec(&data)?.len() as u64;
        codecs.push(CodecSizeJson {
            codec: codec.name(),
            compressed_size: compressed,
            ratio: ratio(size, compressed),
        });
    }

    let deflate = deflate_stats(&report, window.window_size, window.lookahead_buffer_size);

    if json {
        let output = StatsJson {
            file: file.display().to_string(),
            size,
            bytes,
            deflate,
            codecs,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("File: {}", file.display());
    println!("Size: {} ({} bytes)", format_size(size), size);
    println!();
    println!("Byte statistics:");
    println!("  Distinct bytes: {}", bytes.distinct);
    println!("  Entropy: {:.4} bits/byte", bytes.entropy);
    println!(
        "  Huffman average code length: {:.4} bits",
        bytes.average_code_length
    );
    if let Some(max) = bytes.max_code_length {
        println!("  Longest code: {} bits", max);
    }
    println!();
    println!(
        "Deflate (window {}, lookahead {}):",
        deflate.window_size, deflate.lookahead_buffer_size
    );
    println!("  Tokens: {} ({} matches)", deflate.tokens, deflate.matches);
    println!("  Distinct symbols: {}", deflate.distinct_symbols);
    println!("  Symbol entropy: {:.4} bits", deflate.entropy);
    println!(
        "  Average code length: {:.4} bits",
        deflate.average_code_length
    );
    println!("  Longest code: {} bits", deflate.max_code_length);
    println!();
    println!("{:<10} {:>12} {:>8}", "Codec", "Size", "Ratio");
    println!("{}", "-".repeat(32));
    for entry in &codecs {
        println!(
            "{:<10} {:>12} {:>8}",
            entry.codec,
            format_size(entry.compressed_size),
            format_ratio(size, entry.compressed_size)
        );
    }

    Ok(())
}

fn byte_stats(data: &[u8]) -> Result<ByteStatsJson, Box<dyn std::error::Error>> {
    let freqs = FrequencyTable::from_symbols(data.iter().copied());
    if freqs.is_empty() {
        return Ok(ByteStatsJson {
            distinct: 0,
            entropy: 0.0,
            average_code_length: 0.0,
            max_code_length: None,
        });
    }

    let table = huffman::build_code(&freqs)?;
    Ok(ByteStatsJson {
        distinct: freqs.len(),
        entropy: huffman::entropy(&freqs),
        average_code_length: huffman::average_code_length(&freqs, &table),
        max_code_length: Some(table.max_code_length()),
    })
}

fn deflate_stats(
    report: &DeflateReport,
    window_size: usize,
    lookahead_buffer_size: usize,
) -> DeflateStatsJson {
    DeflateStatsJson {
        window_size,
        lookahead_buffer_size,
        tokens: report.token_count,
        matches: report.match_count,
        distinct_symbols: report.distinct_symbols,
        entropy: report.entropy,
        average_code_length: report.average_code_length,
        max_code_length: report.max_code_length,
    }
}

/// Compressed size as a fraction of the original; 0 for empty input.
fn ratio(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        0.0
    } else {
        compressed as f64 / original as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_stats_empty() {
        let stats = byte_stats(b"").unwrap();
        assert_eq!(stats.distinct, 0);
        assert_eq!(stats.max_code_length, None);
    }

    #[test]
    fn test_byte_stats_skewed() {
        let stats = byte_stats(b"AABC").unwrap();
        assert_eq!(stats.distinct, 3);
        assert!((stats.entropy - 1.5).abs() < 1e-9);
        assert!((stats.average_code_length - 1.5).abs() < 1e-9);
        assert_eq!(stats.max_code_length, Some(2));
    }

    #[test]
    fn test_ratio() {
        assert_eq!(ratio(0, 5), 0.0);
        assert!((ratio(200, 50) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_json_shape() {
        let stats = byte_stats(b"").unwrap();
        let value = serde_json::to_value(&stats).unwrap();
        assert!(value.get("max_code_length").is_none());
        assert_eq!(value["distinct"], 0);
    }
}
