//! The shared "Fisher matrix + bias arrays → summary vectors" computation.
//!
//! Figures are produced elsewhere; this module only computes numbers.

use emri_core::{stream_seed, EmriError, ErrorInfo, GlitchThreshold};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aggregate::normalized_total_bias;
use crate::covariance::{noise_covariance, noise_std};
use crate::matrix::{BiasArray, FisherMatrix};
use crate::ratio::{argmax_counts, relative_errors, row_max};
use crate::resample::{sample_noise, total_precision};

/// Stream of the run seed that feeds the Gaussian noise draws.
pub const NOISE_STREAM: u64 = 0;

/// Summary statistic computed per mitigation threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Statistic {
    /// `|mean bias| / σ` per parameter.
    TotalBias,
    /// `std(resampled glitch bias + noise) / σ` per parameter.
    TotalPrecision {
        /// Number of noise draws (and resampled glitch biases).
        noise_samples: usize,
        /// Seed for both the resampling and the noise draws.
        seed: u64,
    },
    /// Largest `R` of every background.
    MaxRatio,
    /// How often each parameter is the most affected one.
    ArgmaxCounts,
}

/// Bias array of one mitigation threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdInput {
    /// Mitigation threshold the biases were computed under.
    pub threshold: GlitchThreshold,
    /// Per-background biases.
    pub biases: BiasArray,
}

/// Summary vector of one mitigation threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSummary {
    /// Mitigation threshold.
    pub threshold: GlitchThreshold,
    /// Number of backgrounds aggregated.
    pub backgrounds: usize,
    /// Per-parameter (or per-background for `MaxRatio`) values.
    pub values: Vec<f64>,
}

/// Output of [`summarize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Statistic that produced the values.
    pub statistic: Statistic,
    /// Noise-induced standard deviations used for normalisation.
    pub noise_std: Vec<f64>,
    /// One summary per threshold, in input order.
    pub thresholds: Vec<ThresholdSummary>,
}

impl PipelineSummary {
    /// Element-wise sum of all threshold summaries.
    pub fn summed(&self) -> Vec<f64> {
        let width = self
            .thresholds
            .iter()
            .map(|summary| summary.values.len())
            .max()
            .unwrap_or(0);
        let mut total = vec![0.0; width];
        for summary in &self.thresholds {
            for (slot, value) in total.iter_mut().zip(&summary.values) {
                *slot += value;
            }
        }
        total
    }
}

/// Computes `statistic` for every threshold from a Fisher matrix and the
/// per-threshold bias arrays.
pub fn summarize(
    fisher: &FisherMatrix,
    inputs: &[ThresholdInput],
    statistic: Statistic,
) -> Result<PipelineSummary, EmriError> {
    let std = noise_std(fisher)?;
    let noise = match statistic {
        Statistic::TotalPrecision {
            noise_samples,
            seed,
        } => {
            let covariance = noise_covariance(fisher)?;
            Some(sample_noise(
                &covariance,
                noise_samples,
                stream_seed(seed, NOISE_STREAM),
            )?)
        }
        _ => None,
    };

    let mut thresholds = Vec::with_capacity(inputs.len());
    for input in inputs {
        let values = match (statistic, noise.as_ref()) {
            (Statistic::TotalPrecision { seed, .. }, Some(draws)) => {
                total_precision(&input.biases, draws, &std, seed)?
            }
            (Statistic::MaxRatio, _) => row_max(&relative_errors(&input.biases, &std)?),
            (Statistic::ArgmaxCounts, _) => argmax_counts(&relative_errors(&input.biases, &std)?)
                .into_iter()
                .map(|count| count as f64)
                .collect(),
            _ => normalized_total_bias(&input.biases, &std)?,
        };
        debug!(threshold = %input.threshold, backgrounds = input.biases.backgrounds(), "summarised threshold");
        thresholds.push(ThresholdSummary {
            threshold: input.threshold,
            backgrounds: input.biases.backgrounds(),
            values,
        });
    }
    Ok(PipelineSummary {
        statistic,
        noise_std: std,
        thresholds,
    })
}

/// Ranking statistics over relative-error matrices that were computed
/// upstream (no Fisher matrix needed).
pub fn summarize_ratios(
    inputs: &[ThresholdInput],
    statistic: Statistic,
) -> Result<Vec<ThresholdSummary>, EmriError> {
    inputs
        .iter()
        .map(|input| {
            let ratios = &input.biases;
            ratios.ensure_usable(ratios.parameters())?;
            let values = match statistic {
                Statistic::MaxRatio => row_max(ratios),
                Statistic::ArgmaxCounts => argmax_counts(ratios)
                    .into_iter()
                    .map(|count| count as f64)
                    .collect(),
                other => {
                    return Err(EmriError::Config(
                        ErrorInfo::new(
                            "statistic-needs-fisher",
                            "statistic requires a Fisher matrix",
                        )
                        .with_context("statistic", format!("{other:?}")),
                    ))
                }
            };
            Ok(ThresholdSummary {
                threshold: input.threshold,
                backgrounds: ratios.backgrounds(),
                values,
            })
        })
        .collect()
}
