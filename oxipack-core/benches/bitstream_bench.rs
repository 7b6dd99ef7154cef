//! Benchmarks for the MSB-first bitstream and CRC-32.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use oxipack_core::bitstream::{BitPayload, BitWriter};
use oxipack_core::crc::Crc32;
use std::hint::black_box;

/// Standard data sizes for benchmarking
mod data_sizes {
    pub const SMALL: usize = 256;
    pub const MEDIUM: usize = 4 * 1024;
    pub const LARGE: usize = 64 * 1024;
}

/// Text-like data - realistic scenario
fn text_like(size: usize) -> Vec<u8> {
    let text = b"The quick brown fox jumps over the lazy dog. \
                 Pack my box with five dozen liquor jugs. ";
    text.iter().copied().cycle().take(size).collect()
}

/// Benchmark writing variable-length codes (1-13 bits each)
fn bench_write_codes(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitwriter_codes");

    for (name, size) in [
        ("256B", data_sizes::SMALL),
        ("4KB", data_sizes::MEDIUM),
        ("64KB", data_sizes::LARGE),
    ] {
        let data = text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| {
                let mut writer = BitWriter::with_capacity(data.len());
                for &byte in data {
                    let len = (byte % 13) + 1;
                    writer.write_bits(byte as u32, len).unwrap();
                }
                black_box(writer.into_payload());
            });
        });
    }

    group.finish();
}

/// Benchmark reading a payload back bit by bit
fn bench_read_bits(c: &mut Criterion) {
    let mut group = c.benchmark_group("bitreader_bits");

    let data = text_like(data_sizes::LARGE);
    let payload = BitPayload::new(data, 0b1010_0000, 3).unwrap();

    group.throughput(Throughput::Bytes(data_sizes::LARGE as u64));
    group.bench_function("64KB", |b| {
        b.iter(|| {
            let ones = payload.reader().filter(|&bit| bit).count();
            black_box(ones);
        });
    });

    group.finish();
}

/// Benchmark CRC-32 across different data sizes
fn bench_crc32_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("crc32_sizes");

    for (name, size) in [
        ("256B", data_sizes::SMALL),
        ("4KB", data_sizes::MEDIUM),
        ("64KB", data_sizes::LARGE),
    ] {
        let data = text_like(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| black_box(Crc32::compute(black_box(data))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_write_codes, bench_read_bits, bench_crc32_sizes);
criterion_main!(benches);
