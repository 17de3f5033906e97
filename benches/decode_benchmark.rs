// benches/decode_benchmark.rs
use binload_lz4::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

/// Hybrid file with one compressed segment built from a literal-heavy pattern
fn build_input(size: usize) -> Vec<u8> {
    let data: Vec<u8> = (0..size).map(|i| ((i / 7) ^ (i % 251)) as u8).collect();
    let mut block = vec![0xF0];
    let mut rest = data.len() - 15;
    while rest >= 255 {
        block.push(0xFF);
        rest -= 255;
    }
    block.push(rest as u8);
    block.extend_from_slice(&data);

    let mut input = vec![0xFF, 0xFF, 0x00, 0x40, 0x00, 0x00, 0x01];
    input.extend_from_slice(&block);
    input
}

fn benchmark_decode_literals(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_literals");

    for size in [1000, 10000, 60000].iter() {
        let input = build_input(*size);
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| convert_bytes(input, &ConvertOptions::strict()).unwrap());
        });
    }

    group.finish();
}

fn benchmark_decode_overlap(c: &mut Criterion) {
    // one literal followed by a long distance-1 match
    let mut block = vec![0x1F, 0x55, 0x01, 0x00];
    block.extend(std::iter::repeat(0xFF).take(200));
    block.extend_from_slice(&[0x00, 0x00]);

    c.bench_function("decode_overlap_run", |b| {
        b.iter(|| decompress_block(&block).unwrap());
    });
}

criterion_group!(benches, benchmark_decode_literals, benchmark_decode_overlap);
criterion_main!(benches);
