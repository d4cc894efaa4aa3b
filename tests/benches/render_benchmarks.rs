//! # AnyChart Render Benchmarks
//!
//! | Stage | Target |
//! |-------|--------|
//! | JSONPath extraction (1k items) | < 1ms |
//! | Token splicing (100 tokens) | < 1ms |
//! | Full fixture render | < 1ms |

use std::collections::HashMap;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};

use ac_03_render_engine::{extract, splice, ChartRenderApi, JsonPath};
use ac_tests::fixtures::Stack;
use shared_types::{placeholder_token, Params};

fn items(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| json!({ "date": format!("d{i}"), "value": i }))
        .collect();
    json!({ "items": items })
}

fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    let compiled = JsonPath::parse("$.items[*].value").expect("valid path");
    for size in [10, 100, 1_000] {
        let document = items(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("wildcard", size), &document, |b, doc| {
            b.iter(|| black_box(compiled.extract(doc)))
        });
    }

    let document = items(100);
    group.bench_function("parse_and_extract", |b| {
        b.iter(|| black_box(extract(&document, "$.items[50].date")))
    });

    group.finish();
}

fn bench_splice(c: &mut Criterion) {
    let mut group = c.benchmark_group("splice");

    for tokens in [1, 10, 100] {
        let series: Vec<Value> = (0..tokens)
            .map(|i| json!({ "name": format!("s{i}"), "data": placeholder_token(&format!("k{i}")) }))
            .collect();
        let template = json!({ "title": { "text": "bench" }, "series": series });
        let values: HashMap<String, Value> = (0..tokens)
            .map(|i| (format!("k{i}"), json!([1, 2, 3])))
            .collect();

        group.throughput(Throughput::Elements(tokens as u64));
        group.bench_with_input(BenchmarkId::new("tokens", tokens), &template, |b, template| {
            b.iter(|| {
                let mut tree = template.clone();
                black_box(splice(&mut tree, &values))
            })
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.measurement_time(Duration::from_secs(5));

    let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
    let stack = runtime.block_on(async { Stack::demo(Duration::from_secs(1)) });
    let params = Params::new();

    for chart in ["sales-bar", "distribution-pie", "db-product-sales"] {
        group.bench_function(chart, |b| {
            b.iter(|| {
                runtime
                    .block_on(stack.service.render_chart(chart, &params))
                    .expect("render succeeds")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_splice, bench_render);
criterion_main!(benches);
