//! Latency benchmarks for the classifier adapter
//!
//! `adapter_overhead` measures the reshape the adapter adds on top of a
//! backend. `distilbert_cpu` measures the real model and only runs when
//! `FOODCHECK_RUN_EXTERNAL_ML_TESTS=1` is set.
//!
//! Run with: cargo bench -p foodcheck-classifiers

use async_trait::async_trait;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use foodcheck_classifiers::{
    ClassifierAdapter, ClassifierConfig, DevicePreference, InferenceBackend,
};
use foodcheck_core::{LabelScore, Result};
use std::sync::Arc;
use tokio::runtime::Runtime;

const INPUTS: [(&str, &str); 3] = [
    ("empty", ""),
    (
        "food",
        "A delicious photo of a plate of scrambled eggs, bacon and toast.",
    ),
    (
        "not_food",
        "I whipped up a fresh batch of code, but it seems to have a syntax error.",
    ),
];

struct StaticBackend {
    labels: Vec<String>,
}

#[async_trait]
impl InferenceBackend for StaticBackend {
    async fn infer(&self, _text: &str) -> Result<Vec<LabelScore>> {
        Ok(vec![
            LabelScore::new("not_food", 0.2),
            LabelScore::new("food", 0.8),
        ])
    }

    fn model_id(&self) -> &str {
        "static"
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

fn benchmark_adapter_overhead(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let adapter = ClassifierAdapter::new(Arc::new(StaticBackend {
        labels: vec!["not_food".to_string(), "food".to_string()],
    }));

    let mut group = c.benchmark_group("adapter_overhead");
    for (name, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new("classify", name), &text, |b, text| {
            b.iter(|| rt.block_on(async { adapter.classify(black_box(text)).await.unwrap() }));
        });
    }
    group.finish();
}

fn benchmark_distilbert_cpu(c: &mut Criterion) {
    let enabled = std::env::var("FOODCHECK_RUN_EXTERNAL_ML_TESTS")
        .ok()
        .is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));
    if !enabled {
        return;
    }

    let rt = Runtime::new().unwrap();
    let config = ClassifierConfig::default().with_device(DevicePreference::Cpu);
    let adapter = ClassifierAdapter::load(&config).expect("Failed to load model");

    let mut group = c.benchmark_group("distilbert_cpu");
    group.sample_size(20);
    for (name, text) in INPUTS {
        group.bench_with_input(BenchmarkId::new("classify", name), &text, |b, text| {
            b.iter(|| rt.block_on(async { adapter.classify(black_box(text)).await.unwrap() }));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_adapter_overhead, benchmark_distilbert_cpu);
criterion_main!(benches);
