//! Noise-induced covariance derived from a Fisher matrix.

use emri_core::{EmriError, ErrorInfo};
use nalgebra::DMatrix;
use tracing::{debug, warn};

use crate::matrix::FisherMatrix;

fn singular(dim: usize) -> EmriError {
    EmriError::LinAlg(
        ErrorInfo::new("fisher-singular", "Fisher matrix is not invertible")
            .with_context("dim", dim.to_string())
            .with_hint("check the Fisher matrix for degenerate parameters"),
    )
}

/// Inverts the Fisher matrix to obtain the noise covariance.
///
/// Singular or numerically degenerate matrices fail with a `LinAlg` error;
/// callers propagate it rather than retry.
pub fn noise_covariance(fisher: &FisherMatrix) -> Result<DMatrix<f64>, EmriError> {
    let dim = fisher.dim();
    if fisher.is_diagonal() {
        let diagonal = fisher.matrix().diagonal();
        if diagonal.iter().any(|value| *value == 0.0) {
            return Err(singular(dim));
        }
        return Ok(DMatrix::from_diagonal(&diagonal.map(|value| 1.0 / value)));
    }
    let inverse = fisher
        .matrix()
        .clone()
        .try_inverse()
        .ok_or_else(|| singular(dim))?;
    if inverse.iter().any(|value| !value.is_finite()) {
        return Err(singular(dim));
    }
    debug!(dim, "inverted Fisher matrix");
    Ok(inverse)
}

/// Per-parameter standard deviations implied by detector noise.
///
/// Square root of the diagonal of the inverse Fisher matrix, in input order.
/// Diagonal Fisher matrices yield exactly `1 / sqrt(f_i)`.
pub fn noise_std(fisher: &FisherMatrix) -> Result<Vec<f64>, EmriError> {
    if fisher.is_diagonal() {
        let diagonal = fisher.matrix().diagonal();
        if diagonal.iter().any(|value| *value == 0.0) {
            return Err(singular(fisher.dim()));
        }
        let std: Vec<f64> = diagonal.iter().map(|value| 1.0 / value.sqrt()).collect();
        warn_negative(&std);
        return Ok(std);
    }
    let covariance = noise_covariance(fisher)?;
    Ok(std_from_covariance(&covariance))
}

/// Square root of a covariance diagonal.
pub fn std_from_covariance(covariance: &DMatrix<f64>) -> Vec<f64> {
    let std: Vec<f64> = covariance.diagonal().iter().map(|value| value.sqrt()).collect();
    warn_negative(&std);
    std
}

fn warn_negative(std: &[f64]) {
    for (index, value) in std.iter().enumerate() {
        if value.is_nan() {
            warn!(parameter = index, "negative noise variance, standard deviation is NaN");
        }
    }
}
