//! Performance benchmarks for the EQI engine
//!
//! Tracks the end-to-end evaluation cost across recording sizes, plus
//! the windowing stage in isolation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eqi_processing::{sliding_window, EqiConfig, QualityIndex};
use eqi_simulation::{EegConfig, EegSimulator};

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let durations = [10.0, 30.0];
    let channel_counts = [2, 8];

    for &duration in &durations {
        for &channels in &channel_counts {
            let clean = EegSimulator::new(EegConfig {
                seed: Some(1),
                ..EegConfig::resting(250.0, channels, duration)
            })
            .unwrap()
            .generate()
            .unwrap();
            let test = EegSimulator::new(EegConfig {
                seed: Some(2),
                ..EegConfig::degraded(250.0, channels, duration)
            })
            .unwrap()
            .generate()
            .unwrap();

            group.bench_with_input(
                BenchmarkId::new("full", format!("{}s_{}ch", duration, channels)),
                &(clean, test),
                |b, (clean, test)| {
                    let mut engine = QualityIndex::new(EqiConfig::uniform(125, 10)).unwrap();
                    b.iter(|| {
                        let report = engine.evaluate(black_box(clean), black_box(test)).unwrap();
                        black_box(report)
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_windowing(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowing");

    let recording = EegSimulator::new(EegConfig {
        seed: Some(3),
        ..EegConfig::resting(250.0, 8, 60.0)
    })
    .unwrap()
    .generate()
    .unwrap();

    for &stride in &[5usize, 25, 125] {
        group.bench_with_input(
            BenchmarkId::new("stride", stride),
            &stride,
            |b, &stride| {
                b.iter(|| {
                    let windows = sliding_window(black_box(&recording), 125, stride).unwrap();
                    black_box(windows)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_windowing);
criterion_main!(benches);
