//! Criterion benchmarks for structural checks and document I/O.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use pon_bench::{chain_profile, reference_profile, stress_profile};
use pon_io::{topology_from_str, topology_to_string};
use pon_topology::check;

/// Benchmark: full structural audit of the reference tree.
fn bench_check_reference(c: &mut Criterion) {
    let t = reference_profile().unwrap();
    c.bench_function("check_reference_256", |b| {
        b.iter(|| black_box(check(black_box(&t))));
    });
}

/// Benchmark: full structural audit of the stress tree.
fn bench_check_stress(c: &mut Criterion) {
    let t = stress_profile().unwrap();
    c.bench_function("check_stress_8k", |b| {
        b.iter(|| black_box(check(&t)));
    });
}

/// Benchmark: cycle and reachability search down a deep chain.
fn bench_check_chain(c: &mut Criterion) {
    let t = chain_profile(10_000).unwrap();
    c.bench_function("check_chain_10k", |b| {
        b.iter(|| black_box(check(&t)));
    });
}

/// Benchmark: JSON export and import of the reference tree.
fn bench_document_round_trip(c: &mut Criterion) {
    let t = reference_profile().unwrap();
    let json = topology_to_string(&t, None).unwrap();
    c.bench_function("export_reference_256", |b| {
        b.iter(|| black_box(topology_to_string(&t, None).unwrap()));
    });
    c.bench_function("import_reference_256", |b| {
        b.iter(|| black_box(topology_from_str(black_box(&json)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_check_reference,
    bench_check_stress,
    bench_check_chain,
    bench_document_round_trip
);
criterion_main!(benches);
