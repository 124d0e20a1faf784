use criterion::{criterion_group, criterion_main, Criterion};
use emri_core::{GlitchThreshold, NUM_PARAMETERS};
use emri_stats::{summarize, BiasArray, FisherMatrix, Statistic, ThresholdInput};
use ndarray::Array2;

fn build_fisher() -> FisherMatrix {
    let rows: Vec<Vec<f64>> = (0..NUM_PARAMETERS)
        .map(|i| {
            (0..NUM_PARAMETERS)
                .map(|j| if i == j { 10.0 + i as f64 } else { 0.1 })
                .collect()
        })
        .collect();
    FisherMatrix::from_rows(&rows).unwrap()
}

fn build_inputs() -> Vec<ThresholdInput> {
    GlitchThreshold::study_ladder()
        .into_iter()
        .enumerate()
        .map(|(offset, threshold)| ThresholdInput {
            threshold,
            biases: BiasArray::new(Array2::from_shape_fn((500, NUM_PARAMETERS), |(r, c)| {
                ((r * 31 + c * 7 + offset) % 97) as f64 * 1e-3
            })),
        })
        .collect()
}

fn bench_summaries(c: &mut Criterion) {
    let fisher = build_fisher();
    let inputs = build_inputs();
    c.bench_function("total_bias_four_thresholds", |b| {
        b.iter(|| summarize(&fisher, &inputs, Statistic::TotalBias).unwrap())
    });
    c.bench_function("total_precision_four_thresholds", |b| {
        b.iter(|| {
            summarize(
                &fisher,
                &inputs,
                Statistic::TotalPrecision {
                    noise_samples: 2_000,
                    seed: 1234,
                },
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_summaries);
criterion_main!(benches);
