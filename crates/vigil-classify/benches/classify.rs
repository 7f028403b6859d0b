//! Classification Benchmarks
//!
//! Scoring throughput for both domains plus raw-input extraction.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vigil_classify::{
    extract_network, FeatureRecord, NetworkClassifier, TextClassifier, TextSample,
};

fn bench_text_scoring(c: &mut Criterion) {
    let classifier = TextClassifier::new();
    let mut group = c.benchmark_group("text");

    for (name, body) in [
        (
            "lure",
            "URGENT ACTION: verify account now, click here immediately to avoid suspension",
        ),
        (
            "clean",
            "minutes from the quarterly planning meeting are attached for review",
        ),
    ] {
        let sample = TextSample::new(body).unwrap();
        group.throughput(Throughput::Bytes(body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &sample, |b, sample| {
            b.iter(|| classifier.classify(black_box(sample)))
        });
    }
    group.finish();
}

fn bench_large_sample(c: &mut Criterion) {
    let classifier = TextClassifier::new();
    let body = "dear customer, your invoice is ready for review. ".repeat(320);
    let sample = TextSample::new(body.clone()).unwrap();

    let mut group = c.benchmark_group("text_large");
    group.throughput(Throughput::Bytes(body.len() as u64));
    group.bench_function("scan_16k", |b| {
        b.iter(|| classifier.classify(black_box(&sample)))
    });
    group.finish();
}

fn bench_network_classification(c: &mut Criterion) {
    let classifier = NetworkClassifier::new();
    let flood = FeatureRecord {
        flag: "S0".to_string(),
        count: 150,
        ..FeatureRecord::default()
    };
    let quiet = FeatureRecord::default();

    let mut group = c.benchmark_group("network");
    group.bench_function("syn_flood", |b| {
        b.iter(|| classifier.classify_record(black_box(&flood)))
    });
    group.bench_function("quiet", |b| {
        b.iter(|| classifier.classify_record(black_box(&quiet)))
    });
    group.finish();
}

fn bench_extraction(c: &mut Criterion) {
    let mut fields = vec!["0".to_string(); 41];
    fields[1] = "tcp".to_string();
    fields[2] = "private".to_string();
    fields[3] = "REJ".to_string();
    fields[22] = "150".to_string();
    let row = fields.join(",");
    let json = r#"{"protocol_type":"udp","wrong_fragment":1,"count":42}"#;

    let mut group = c.benchmark_group("extract");
    group.bench_function("positional", |b| b.iter(|| extract_network(black_box(&row))));
    group.bench_function("structured", |b| b.iter(|| extract_network(black_box(json))));
    group.finish();
}

criterion_group!(
    benches,
    bench_text_scoring,
    bench_large_sample,
    bench_network_classification,
    bench_extraction,
);

criterion_main!(benches);
