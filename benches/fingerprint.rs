//! Performance benchmarks for fingerprint generation.
//!
//! Run with: `cargo bench --bench fingerprint`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Single record, radius 2 | <1ms | Parse + enumerate + fold + trace |
//! | Batch of 1000 | Linear scaling | Chunked, parallel within chunks |
//! | Radius sweep | Polynomial growth | Environment count grows with radius |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

use ecfp_kernel::{
    BatchOptions, BatchProcessor, FingerprintConfig, FingerprintEngine, SmilesProvider,
};

const ETHANOL: &str = "CCO";
const ASPIRIN: &str = "CC(=O)Oc1ccccc1C(=O)O";
const CAFFEINE: &str = "Cn1cnc2c1c(=O)n(C)c(=O)n2C";

fn engine(config: FingerprintConfig) -> FingerprintEngine<SmilesProvider> {
    FingerprintEngine::new(Arc::new(SmilesProvider::new()), config)
}

/// Benchmark single-record processing across molecule sizes.
fn bench_single_record(c: &mut Criterion) {
    let e = engine(FingerprintConfig::default());
    let mut group = c.benchmark_group("single_record");

    for (name, smiles) in [
        ("ethanol", ETHANOL),
        ("aspirin", ASPIRIN),
        ("caffeine", CAFFEINE),
    ] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("molecule", name), &smiles, |b, smiles| {
            b.iter(|| {
                let record = e.process(black_box(smiles));
                assert!(record.valid);
                record
            })
        });
    }

    group.finish();
}

/// Benchmark the effect of the environment radius.
fn bench_radius_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("radius_sweep");

    for radius in [1u32, 2, 3, 4] {
        let e = engine(FingerprintConfig {
            radius,
            ..FingerprintConfig::default()
        });
        group.bench_with_input(BenchmarkId::new("radius", radius), &radius, |b, _| {
            b.iter(|| e.process(black_box(ASPIRIN)))
        });
    }

    group.finish();
}

/// Benchmark chunked batch processing.
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");

    for batch_size in [10usize, 100, 1000] {
        let inputs: Vec<String> = (0..batch_size)
            .map(|i| match i % 3 {
                0 => ETHANOL.to_string(),
                1 => ASPIRIN.to_string(),
                _ => CAFFEINE.to_string(),
            })
            .collect();
        let processor = BatchProcessor::new(
            Arc::new(SmilesProvider::new()),
            BatchOptions {
                chunk_size: 100,
                ..BatchOptions::default()
            },
        );

        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(
            BenchmarkId::new("records", batch_size),
            &inputs,
            |b, inputs| b.iter(|| processor.process(black_box(inputs))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_record, bench_radius_sweep, bench_batch);
criterion_main!(benches);
