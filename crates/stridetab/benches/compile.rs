//! Compilation throughput over synthetic pattern sets.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use stridetab::TableCompiler;

/// Deterministic pseudo-random byte patterns, 4-12 bytes each.
fn synthetic_patterns(count: usize) -> Vec<Vec<u8>> {
    let mut seed = 0x2545f4914f6cdd1du64;
    let mut patterns = Vec::with_capacity(count);
    for _ in 0..count {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let len = 4 + (seed % 9) as usize;
        let pattern: Vec<u8> = (0..len)
            .map(|i| (seed.rotate_left(i as u32 * 8) & 0x7f) as u8)
            .collect();
        patterns.push(pattern);
    }
    patterns
}

fn bench_compile(c: &mut Criterion) {
    let patterns = synthetic_patterns(64);

    let mut group = c.benchmark_group("compile");
    for stride in [1usize, 2] {
        group.bench_with_input(
            BenchmarkId::new("64_patterns", stride),
            &stride,
            |b, &stride| {
                let compiler = TableCompiler::new(stride, 0).unwrap();
                b.iter(|| compiler.compile(&patterns).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
