//! Criterion benchmarks for phasewarp-analysis components
//!
//! Run with: cargo bench -p phasewarp-analysis

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use phasewarp_analysis::{AnalyzerSettings, display_levels, spectrum_analyzer};
use std::f32::consts::PI;

const FFT_ORDERS: &[u32] = &[9, 10, 11, 12, 13];

/// Generate a test signal with a few harmonics
fn generate_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / 48000.0;
            let f1 = (2.0 * PI * 440.0 * t).sin();
            let f2 = 0.5 * (2.0 * PI * 880.0 * t).sin();
            let f3 = 0.25 * (2.0 * PI * 1320.0 * t).sin();
            (f1 + f2 + f3) * 0.5
        })
        .collect()
}

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("Producer");
    let (mut producer, _analyzer) = spectrum_analyzer(AnalyzerSettings::default());

    for &block_size in &[64usize, 256, 1024] {
        let block = generate_signal(block_size);
        group.bench_with_input(
            BenchmarkId::new("push_buffer", block_size),
            &block,
            |b, block| b.iter(|| producer.push_buffer(black_box(block))),
        );
    }

    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("Analyzer");

    for &order in FFT_ORDERS {
        let (mut producer, mut analyzer) = spectrum_analyzer(AnalyzerSettings {
            fft_order: order,
            ..AnalyzerSettings::default()
        });
        let block = generate_signal(1 << order);

        group.bench_with_input(BenchmarkId::new("tick", 1usize << order), &order, |b, _| {
            b.iter(|| {
                producer.push_buffer(&block);
                black_box(analyzer.tick())
            })
        });
    }

    group.finish();
}

fn bench_display(c: &mut Criterion) {
    let mut group = c.benchmark_group("Display");
    let (mut producer, mut analyzer) = spectrum_analyzer(AnalyzerSettings::default());
    producer.push_buffer(&generate_signal(analyzer.fft_size()));
    analyzer.tick();

    group.bench_function("display_levels", |b| {
        b.iter(|| black_box(display_levels(analyzer.magnitudes(), analyzer.fft_size())))
    });

    group.finish();
}

criterion_group!(benches, bench_push, bench_tick, bench_display);
criterion_main!(benches);
