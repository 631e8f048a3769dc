//! # Hypergraph Benchmarks
//!
//! Performance benchmarks for hyperweave-core construction and stats.
//!
//! Run with: `cargo bench -p hyperweave-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use hyperweave_core::{
    FilterMode, Hypergraph, SimplicialComplex, SimplicialityParams, StatsAccess,
    edit_simpliciality,
};
use std::hint::black_box;

/// Edges of three consecutive nodes sliding along a line: `{i, i+1, i+2}`.
fn sliding_edges(size: usize) -> Vec<Vec<i64>> {
    (0..size as i64).map(|i| vec![i, i + 1, i + 2]).collect()
}

fn create_sliding_hypergraph(size: usize) -> Hypergraph {
    let mut hg = Hypergraph::new();
    hg.add_edges_from(sliding_edges(size)).expect("edges");
    hg
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_edge_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("edge_insertion");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_sliding_hypergraph(size)));
        });
    }

    group.finish();
}

fn bench_simplex_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplex_insertion");

    for order in [2usize, 4, 6].iter() {
        let simplices: Vec<Vec<i64>> = (0..100i64)
            .map(|i| (i..=i + *order as i64).collect())
            .collect();
        group.bench_with_input(
            BenchmarkId::new("order", order),
            &simplices,
            |b, simplices| {
                b.iter(|| {
                    let mut sc = SimplicialComplex::new();
                    sc.add_simplices_from(simplices.clone(), None)
                        .expect("simplices");
                    black_box(sc)
                });
            },
        );
    }

    group.finish();
}

fn bench_degree_stat(c: &mut Criterion) {
    let mut group = c.benchmark_group("degree_stat");

    for size in [100, 1000, 10000].iter() {
        let hg = create_sliding_hypergraph(*size);

        group.bench_with_input(BenchmarkId::new("as_map", size), &hg, |b, hg| {
            b.iter(|| black_box(hg.node_view().stat("degree").expect("stat").as_map()));
        });

        group.bench_with_input(BenchmarkId::new("filterby", size), &hg, |b, hg| {
            b.iter(|| black_box(hg.node_view().filterby("degree", 3, FilterMode::Eq)));
        });
    }

    group.finish();
}

fn bench_simpliciality(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_simpliciality");

    for size in [100, 1000].iter() {
        let hg = create_sliding_hypergraph(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &hg, |b, hg| {
            b.iter(|| black_box(edit_simpliciality(hg, SimplicialityParams::default())));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_edge_insertion,
    bench_simplex_insertion,
    bench_degree_stat,
    bench_simpliciality,
);
criterion_main!(benches);
