use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heka_exporter::prometheus::{format_prometheus, ProcessCounters};
use heka_exporter::{normalize, translate, StatusDocument};
use serde_json::{json, Map, Value};

/// Build a report with `components` plugins per section, each with `fields` fields.
fn build_report(components: usize, fields: usize) -> StatusDocument {
    let mut root = Map::new();

    for section in ["decoders", "filters", "outputs"] {
        let entries: Vec<Value> = (0..components)
            .map(|i| {
                let mut entry = Map::new();
                entry.insert("Name".to_string(), json!(format!("Plugin{}", i)));
                for j in 0..fields {
                    entry.insert(
                        format!("ProcessMessageField{}", j),
                        json!({ "representation": "count", "value": (i * j) as f64 }),
                    );
                }
                Value::Object(entry)
            })
            .collect();
        root.insert(section.to_string(), Value::Array(entries));
    }

    StatusDocument::from_value(Value::Object(root)).unwrap()
}

/// Benchmark translation of reports with varying sizes
fn bench_translate_varying_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("translate");

    let configs = vec![
        ("small", 2, 5),     // 2 plugins per section, 5 fields each
        ("medium", 10, 10),  // 10 plugins per section, 10 fields each
        ("large", 50, 20),   // 50 plugins per section, 20 fields each
    ];

    for (name, components, fields) in configs {
        let report = build_report(components, fields);
        group.throughput(Throughput::Elements((3 * components * fields) as u64));

        group.bench_with_input(BenchmarkId::from_parameter(name), &report, |b, report| {
            b.iter(|| black_box(translate(report)));
        });
    }
    group.finish();
}

/// Benchmark rendering of a translated report
fn bench_render(c: &mut Criterion) {
    let records = translate(&build_report(10, 10)).records;

    c.bench_function("format_prometheus", |b| {
        b.iter(|| {
            black_box(format_prometheus(
                &records,
                "heka",
                ProcessCounters::default(),
            ))
        });
    });
}

/// Benchmark name normalization
fn bench_normalize(c: &mut Criterion) {
    c.bench_function("normalize", |b| {
        b.iter(|| black_box(normalize(black_box("ProcessMessageAvgDuration"))));
    });
}

criterion_group!(benches, bench_translate_varying_sizes, bench_render, bench_normalize);
criterion_main!(benches);
