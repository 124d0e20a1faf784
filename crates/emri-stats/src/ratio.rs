//! Relative error matrices (R) and the rankings built on them.

use emri_core::EmriError;
use ndarray::{Array2, ArrayView1, Axis};

use crate::matrix::BiasArray;

/// Elementwise `|bias / std|`, one row per background.
pub fn relative_errors(biases: &BiasArray, std: &[f64]) -> Result<BiasArray, EmriError> {
    biases.ensure_usable(std.len())?;
    let mut ratios: Array2<f64> = biases.values().clone();
    for mut row in ratios.axis_iter_mut(Axis(0)) {
        for (value, sigma) in row.iter_mut().zip(std) {
            *value = (*value / sigma).abs();
        }
    }
    Ok(BiasArray::new(ratios))
}

fn max_with_index(row: ArrayView1<'_, f64>) -> (usize, f64) {
    let mut best_index = 0;
    let mut best = f64::NEG_INFINITY;
    for (index, value) in row.iter().enumerate() {
        if value.is_nan() {
            return (index, f64::NAN);
        }
        if *value > best {
            best = *value;
            best_index = index;
        }
    }
    (best_index, best)
}

/// Largest ratio of each background (NaN if the row holds a NaN).
pub fn row_max(ratios: &BiasArray) -> Vec<f64> {
    ratios
        .values()
        .axis_iter(Axis(0))
        .map(|row| max_with_index(row).1)
        .collect()
}

/// Index of the most affected parameter for each background; the first
/// occurrence wins ties.
pub fn row_argmax(ratios: &BiasArray) -> Vec<usize> {
    ratios
        .values()
        .axis_iter(Axis(0))
        .map(|row| max_with_index(row).0)
        .collect()
}

/// Number of backgrounds whose most affected parameter is each column.
pub fn argmax_counts(ratios: &BiasArray) -> Vec<u64> {
    let mut counts = vec![0u64; ratios.parameters()];
    for index in row_argmax(ratios) {
        if let Some(slot) = counts.get_mut(index) {
            *slot += 1;
        }
    }
    counts
}
