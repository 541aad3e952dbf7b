//! Benchmarks for top-k node matching.
//!
//! Run with: cargo bench -p numeric-annotation-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use numeric_annotation_core::models::{DeclaredEntity, Metadata, Value};
use numeric_annotation_core::{BackgroundKnowledgeGraph, CoreConfig, Learner, Table, TopKNodesMatcher};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Table with a region column and one numeric column declaring `uri`
fn table(rng: &mut StdRng, index: usize, rows: usize) -> Table {
    let mut metadata = Metadata::default();
    metadata
        .declared_properties
        .insert(1, DeclaredEntity::with_uri(format!("dbo:property{}", index % 50)));

    let scale = (index % 50 + 1) as f64 * 100.0;
    let regions = ["north", "south", "east", "west"];
    let data = (0..rows)
        .map(|row| {
            let region = regions[row % regions.len()];
            let offset = (row % regions.len()) as f64 * scale;
            vec![Value::from(region), Value::Numeric(offset + rng.gen_range(0.0..scale))]
        })
        .collect();

    Table::from_rows(
        Some(format!("table{}.csv", index)),
        vec!["Region".to_string(), format!("Measure {}", index)],
        data,
        metadata,
    )
    .expect("benchmark table is well formed")
}

fn build_graph(tables: usize) -> BackgroundKnowledgeGraph {
    let mut rng = StdRng::seed_from_u64(42);
    let learner = Learner::from_config(&CoreConfig::default()).expect("default config is valid");
    let mut graph = BackgroundKnowledgeGraph::new("bench");
    for index in 0..tables {
        learner.learn_into(&mut graph, &table(&mut rng, index, 40));
    }
    graph
}

fn bench_match_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_values");
    let matcher = TopKNodesMatcher::default();
    let query: Vec<f64> = (0..40).map(|i| i as f64 * 25.0).collect();

    for tables in [10, 100, 500] {
        let graph = build_graph(tables);
        group.bench_with_input(BenchmarkId::new("k50", graph.node_count()), &graph, |b, graph| {
            b.iter(|| {
                let found = matcher.match_values(graph, black_box(&query), 50).expect("valid query");
                black_box(found.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_match_values);
criterion_main!(benches);
