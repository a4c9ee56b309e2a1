use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use sport_search::config::SearchConfig;
use sport_search::query::builder::QueryBuilder;

fn bench_query_builder(c: &mut Criterion) {
    let builder = QueryBuilder::from_config(&SearchConfig::default());

    c.bench_function("fuzzy_multi_match", |b| {
        b.iter(|| builder.query_for(black_box("marathon")))
    });
    c.bench_function("prefixed_match", |b| {
        b.iter(|| builder.query_for(black_box("description:=halftime report")))
    });
    c.bench_function("empty_passthrough", |b| {
        b.iter(|| builder.query_for(black_box("")))
    });
}

criterion_group!(benches, bench_query_builder);
criterion_main!(benches);
