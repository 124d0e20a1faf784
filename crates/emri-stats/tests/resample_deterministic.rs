use emri_stats::{column_std, resample_rows, sample_noise, total_precision, BiasArray};
use nalgebra::DMatrix;
use ndarray::Array2;
use proptest::prelude::*;

fn ramp(rows: usize, cols: usize) -> BiasArray {
    let data: Vec<Vec<f64>> = (0..rows)
        .map(|r| (0..cols).map(|c| (r * cols + c) as f64).collect())
        .collect();
    BiasArray::from_rows(&data).unwrap()
}

#[test]
fn resampled_rows_come_from_the_source() {
    let biases = ramp(10, 3);
    let resampled = resample_rows(&biases, 40, 1234).unwrap();
    assert_eq!(resampled.backgrounds(), 40);
    for row in resampled.values().rows() {
        let first = row[0] as usize;
        assert_eq!(first % 3, 0);
        assert_eq!(row.to_vec(), biases.values().row(first / 3).to_vec());
    }
}

#[test]
fn different_seeds_draw_different_rows() {
    let biases = ramp(100, 2);
    let a = resample_rows(&biases, 50, 1).unwrap();
    let b = resample_rows(&biases, 50, 2).unwrap();
    assert_ne!(a, b);
}

#[test]
fn noise_draws_follow_the_covariance() {
    let covariance = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 9.0]);
    let draws = sample_noise(&covariance, 20_000, 99).unwrap();
    assert_eq!(draws.dim(), (20_000, 2));
    let std = column_std(&draws).unwrap();
    assert!((std[0] - 2.0).abs() < 0.1, "std {std:?}");
    assert!((std[1] - 3.0).abs() < 0.15, "std {std:?}");
    assert_eq!(draws, sample_noise(&covariance, 20_000, 99).unwrap());
}

#[test]
fn indefinite_covariance_cannot_be_sampled() {
    let covariance = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, -1.0]);
    let err = sample_noise(&covariance, 10, 0).unwrap_err();
    assert_eq!(err.info().code, "covariance-indefinite");
}

#[test]
fn zero_glitch_bias_leaves_precision_at_noise_level() {
    let biases = BiasArray::new(Array2::zeros((5, 2)));
    let covariance = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 4.0]);
    let draws = sample_noise(&covariance, 20_000, 7).unwrap();
    let ratio = total_precision(&biases, &draws, &[1.0, 2.0], 1234).unwrap();
    for value in ratio {
        assert!((value - 1.0).abs() < 0.05, "ratio {value}");
    }
}

proptest! {
    #[test]
    fn resampling_is_deterministic_per_seed(seed in any::<u64>(), rows in 1usize..20, n in 0usize..64) {
        let biases = ramp(rows, 4);
        let first = resample_rows(&biases, n, seed).unwrap();
        let second = resample_rows(&biases, n, seed).unwrap();
        prop_assert_eq!(first, second);
    }
}
