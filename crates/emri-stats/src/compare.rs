//! Agreement between Fisher-approximated and MCMC-derived biases.

use emri_core::EmriError;
use ndarray::{Array2, Axis};

use crate::aggregate::normalized_abs;

/// Posterior mean minus the true parameter values.
pub fn mcmc_bias(samples: &Array2<f64>, truth: &[f64]) -> Result<Vec<f64>, EmriError> {
    if samples.ncols() != truth.len() {
        return Err(EmriError::shape("chain-columns", truth.len(), samples.ncols()));
    }
    let mean = samples
        .mean_axis(Axis(0))
        .ok_or_else(|| EmriError::shape("chain-rows", ">= 1", 0))?;
    Ok(mean.iter().zip(truth).map(|(m, t)| m - t).collect())
}

/// `|(fisher_bias - mcmc_bias) / std|` per parameter.
pub fn fisher_mcmc_discrepancy(
    fisher_bias: &[f64],
    mcmc_bias: &[f64],
    std: &[f64],
) -> Result<Vec<f64>, EmriError> {
    if fisher_bias.len() != mcmc_bias.len() {
        return Err(EmriError::shape(
            "bias-length",
            fisher_bias.len(),
            mcmc_bias.len(),
        ));
    }
    let difference: Vec<f64> = fisher_bias
        .iter()
        .zip(mcmc_bias)
        .map(|(f, m)| f - m)
        .collect();
    normalized_abs(&difference, std)
}
