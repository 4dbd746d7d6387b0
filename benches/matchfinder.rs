//! Criterion benchmarks comparing HC, BT, and CEHC over a few synthetic
//! input shapes (repeating pattern, pseudo-random, text-like).
//!
//! Run with:
//!   cargo bench --bench matchfinder

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lz_matchfinder::{Algorithm, Config};

fn repeating_pattern(size: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog "
        .iter()
        .cycle()
        .take(size)
        .copied()
        .collect()
}

fn pseudo_random(size: usize) -> Vec<u8> {
    let mut state = 0x243F_6A88_85A3_08D3u64;
    (0..size)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state & 0xff) as u8
        })
        .collect()
}

fn run_finder(algorithm: Algorithm, cut_value: u32, data: &[u8]) {
    let mut finder = Config::new(1 << 20)
        .algorithm(algorithm)
        .cut_value(cut_value)
        .match_max_len(273)
        .nice_len(64)
        .build()
        .unwrap();

    let mut src = data;
    finder.feed(&mut src).unwrap();
    finder.finish();

    while finder.available_bytes() > 0 {
        let _ = finder.get_matches();
    }
}

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("matchfinder");
    let size = 1 << 18;
    let inputs: [(&str, Vec<u8>); 2] = [
        ("repeating", repeating_pattern(size)),
        ("random", pseudo_random(size)),
    ];

    for (name, data) in &inputs {
        group.throughput(Throughput::Bytes(data.len() as u64));
        for &(algo_name, algorithm) in &[("hc", Algorithm::Hc), ("bt", Algorithm::Bt), ("cehc", Algorithm::Cehc)] {
            for &cut_value in &[16u32, 64] {
                group.bench_with_input(
                    BenchmarkId::new(format!("{name}/{algo_name}"), cut_value),
                    data,
                    |b, data| b.iter(|| run_finder(algorithm, cut_value, data)),
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_algorithms);
criterion_main!(benches);
