//! Seeded resampling of glitch biases and Gaussian noise draws.

use emri_core::{seeded_rng, EmriError, ErrorInfo};
use nalgebra::{Cholesky, DMatrix, DVector, SymmetricEigen};
use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use tracing::{debug, warn};

use crate::aggregate::{column_std, normalized};
use crate::matrix::BiasArray;

/// Draws `n_samples` rows with replacement.
///
/// The RNG is seeded from `seed` alone, so identical inputs and seed always
/// give identical output.
pub fn resample_rows(
    biases: &BiasArray,
    n_samples: usize,
    seed: u64,
) -> Result<BiasArray, EmriError> {
    biases.ensure_usable(biases.parameters())?;
    let mut rng = seeded_rng(seed);
    let source = biases.values();
    let rows = source.nrows();
    let mut out = Array2::zeros((n_samples, source.ncols()));
    for mut target in out.rows_mut() {
        let pick = rng.gen_range(0..rows);
        target.assign(&source.row(pick));
    }
    Ok(BiasArray::new(out))
}

fn sampling_factor(covariance: &DMatrix<f64>) -> Result<DMatrix<f64>, EmriError> {
    let symmetric = 0.5 * (covariance + covariance.transpose());
    if let Some(cholesky) = Cholesky::new(symmetric.clone()) {
        return Ok(cholesky.l());
    }
    warn!("noise covariance is not positive definite, falling back to eigen factorisation");
    let eigen = SymmetricEigen::new(symmetric);
    let scale = eigen
        .eigenvalues
        .iter()
        .fold(0.0_f64, |acc, value| acc.max(value.abs()));
    if eigen
        .eigenvalues
        .iter()
        .any(|value| *value < -1e-10 * scale)
    {
        return Err(EmriError::Sampling(
            ErrorInfo::new(
                "covariance-indefinite",
                "noise covariance has negative eigenvalues",
            )
            .with_hint("the Fisher matrix is probably not positive definite"),
        ));
    }
    let roots = eigen.eigenvalues.map(|value| value.max(0.0).sqrt());
    Ok(&eigen.eigenvectors * DMatrix::from_diagonal(&roots))
}

/// Draws `n_samples` zero-mean Gaussian vectors with the given covariance.
pub fn sample_noise(
    covariance: &DMatrix<f64>,
    n_samples: usize,
    seed: u64,
) -> Result<Array2<f64>, EmriError> {
    if covariance.nrows() != covariance.ncols() {
        return Err(EmriError::shape(
            "covariance-square",
            covariance.nrows(),
            covariance.ncols(),
        ));
    }
    let dim = covariance.nrows();
    let factor = sampling_factor(covariance)?;
    let mut rng = seeded_rng(seed);
    let mut draws = Array2::zeros((n_samples, dim));
    for mut row in draws.rows_mut() {
        let z = DVector::from_iterator(dim, (0..dim).map(|_| rng.sample::<f64, _>(StandardNormal)));
        let x = &factor * z;
        for (slot, value) in row.iter_mut().zip(x.iter()) {
            *slot = *value;
        }
    }
    debug!(n_samples, dim, "sampled noise-induced errors");
    Ok(draws)
}

/// Spread of glitch plus noise errors relative to noise alone.
///
/// Glitch biases are resampled (with `seed`) to the number of noise draws,
/// added to them, and the column standard deviation is divided by `std`.
pub fn total_precision(
    biases: &BiasArray,
    noise_draws: &Array2<f64>,
    std: &[f64],
    seed: u64,
) -> Result<Vec<f64>, EmriError> {
    biases.ensure_usable(std.len())?;
    if noise_draws.ncols() != std.len() {
        return Err(EmriError::shape("noise-columns", std.len(), noise_draws.ncols()));
    }
    let resampled = resample_rows(biases, noise_draws.nrows(), seed)?;
    let total = resampled.values() + noise_draws;
    normalized(&column_std(&total)?, std)
}
