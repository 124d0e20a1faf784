#![deny(missing_docs)]
#![doc = "Noise covariance derivation, bias/precision aggregation and histogram helpers for EMRI glitch studies."]

/// Column-wise bias and precision statistics.
pub mod aggregate;
/// Fisher versus MCMC bias comparison.
pub mod compare;
/// Noise covariance from Fisher matrices.
pub mod covariance;
/// Histogram, CDF and percentile helpers.
pub mod histogram;
/// Fisher matrix and bias array wrappers.
pub mod matrix;
/// Pure per-threshold summary pipeline.
pub mod pipeline;
/// Relative error (R) matrices and rankings.
pub mod ratio;
/// Seeded resampling and noise draws.
pub mod resample;

pub use aggregate::{column_mean, column_std, normalized, normalized_abs, normalized_total_bias};
pub use compare::{fisher_mcmc_discrepancy, mcmc_bias};
pub use covariance::{noise_covariance, noise_std, std_from_covariance};
pub use histogram::{log_edges_for, logspace_edges, percentile, Histogram};
pub use matrix::{BiasArray, FisherMatrix};
pub use pipeline::{summarize, summarize_ratios, PipelineSummary, Statistic, ThresholdInput, ThresholdSummary};
pub use ratio::{argmax_counts, relative_errors, row_argmax, row_max};
pub use resample::{resample_rows, sample_noise, total_precision};
