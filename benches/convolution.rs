//! Benchmarks for the convolution engine and session updates.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use conv_viz::{
    compute::{ConvolutionEngine, ModelRng, NumericModel, Session},
    schema::{KernelPosition, VisualizationConfig},
};

fn bench_compute_all(c: &mut Criterion) {
    let model = NumericModel::generate(&mut ModelRng::new(42));
    let mut engine = ConvolutionEngine::new();

    c.bench_function("compute_all", |b| {
        b.iter(|| engine.compute_all(black_box(&model)));
    });
}

fn bench_compute_at(c: &mut Criterion) {
    let model = NumericModel::generate(&mut ModelRng::new(42));
    let mut engine = ConvolutionEngine::from_model(&model);

    c.bench_function("compute_at", |b| {
        b.iter(|| engine.compute_at(black_box(&model), black_box(KernelPosition::new(3, 4))));
    });
}

fn bench_sweep_cycle(c: &mut Criterion) {
    let config = VisualizationConfig {
        random_seed: Some(42),
        ..Default::default()
    };
    let mut session = Session::new(&config).expect("valid config");

    c.bench_function("sweep_cycle_36", |b| {
        b.iter(|| {
            for tick in 0..36 {
                let _ = black_box(session.advance(tick as f64));
            }
        });
    });
}

fn bench_display_frame(c: &mut Criterion) {
    let config = VisualizationConfig {
        random_seed: Some(42),
        ..Default::default()
    };
    let session = Session::new(&config).expect("valid config");

    c.bench_function("display_frame", |b| {
        b.iter(|| black_box(session.display_frame()));
    });
}

criterion_group!(
    benches,
    bench_compute_all,
    bench_compute_at,
    bench_sweep_cycle,
    bench_display_frame
);
criterion_main!(benches);
