//! Column-wise bias and precision statistics.
//!
//! Every statistic treats parameter columns independently.

use emri_core::{EmriError, ErrorInfo};
use ndarray::{Array2, Axis};

use crate::matrix::BiasArray;

/// Total bias: mean of the per-background biases for each parameter.
pub fn column_mean(biases: &BiasArray) -> Result<Vec<f64>, EmriError> {
    biases.ensure_usable(biases.parameters())?;
    Ok(biases
        .values()
        .mean_axis(Axis(0))
        .map(|mean| mean.to_vec())
        .unwrap_or_default())
}

/// Total precision: population standard deviation (ddof = 0) per parameter.
pub fn column_std(values: &Array2<f64>) -> Result<Vec<f64>, EmriError> {
    if values.nrows() == 0 {
        return Err(EmriError::Shape(ErrorInfo::new(
            "bias-empty",
            "cannot take the spread of zero samples",
        )));
    }
    Ok(values.std_axis(Axis(0), 0.0).to_vec())
}

fn check_lengths(values: &[f64], std: &[f64]) -> Result<(), EmriError> {
    if values.len() != std.len() {
        return Err(EmriError::shape("std-length", std.len(), values.len()));
    }
    Ok(())
}

/// `values_i / std_i`.
pub fn normalized(values: &[f64], std: &[f64]) -> Result<Vec<f64>, EmriError> {
    check_lengths(values, std)?;
    Ok(values.iter().zip(std).map(|(v, s)| v / s).collect())
}

/// `|values_i / std_i|`.
pub fn normalized_abs(values: &[f64], std: &[f64]) -> Result<Vec<f64>, EmriError> {
    Ok(normalized(values, std)?.into_iter().map(f64::abs).collect())
}

/// Total bias normalised by the noise-induced uncertainty.
pub fn normalized_total_bias(biases: &BiasArray, std: &[f64]) -> Result<Vec<f64>, EmriError> {
    biases.ensure_usable(std.len())?;
    normalized_abs(&column_mean(biases)?, std)
}
