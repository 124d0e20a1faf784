//! Histogram, cumulative distribution and percentile helpers.

use emri_core::{EmriError, ErrorInfo};
use serde::{Deserialize, Serialize};

/// Binned counts over explicit edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges (inclusive of the left edge, exclusive of the right edge except the last bin).
    pub edges: Vec<f64>,
    /// Counts recorded per bin.
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bins `values` over `edges`; values outside the edges are dropped.
    pub fn from_values(values: &[f64], edges: Vec<f64>) -> Result<Self, EmriError> {
        if edges.len() < 2 {
            return Err(EmriError::shape("histogram-edges", ">= 2", edges.len()));
        }
        if edges.windows(2).any(|pair| pair[0] > pair[1]) || edges.iter().any(|e| !e.is_finite())
        {
            return Err(EmriError::Config(ErrorInfo::new(
                "histogram-edges",
                "bin edges must be finite and increasing",
            )));
        }
        let bins = edges.len() - 1;
        let first = edges[0];
        let last = edges[bins];
        let mut counts = vec![0u64; bins];
        for value in values.iter().copied() {
            if !(first..=last).contains(&value) {
                continue;
            }
            let idx = edges.partition_point(|edge| *edge <= value).saturating_sub(1);
            counts[idx.min(bins - 1)] += 1;
        }
        Ok(Self { edges, counts })
    }

    /// Total number of binned values.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Cumulative fraction of values up to the right edge of each bin.
    ///
    /// Matches a density-normalised cumulative histogram: the last entry is 1
    /// unless the histogram is empty.
    pub fn cumulative_fraction(&self) -> Vec<f64> {
        let total = self.total();
        let mut running = 0u64;
        self.counts
            .iter()
            .map(|count| {
                running += count;
                if total == 0 {
                    0.0
                } else {
                    running as f64 / total as f64
                }
            })
            .collect()
    }
}

/// `num` edges spaced evenly in log10 between `start` and `stop`.
pub fn logspace_edges(start: f64, stop: f64, num: usize) -> Result<Vec<f64>, EmriError> {
    if !(start > 0.0 && stop > 0.0 && start.is_finite() && stop.is_finite()) {
        return Err(EmriError::Config(
            ErrorInfo::new("log-bins", "logarithmic bins need positive finite limits")
                .with_context("start", start.to_string())
                .with_context("stop", stop.to_string()),
        ));
    }
    if num < 2 {
        return Err(EmriError::shape("log-bins", ">= 2", num));
    }
    if start == stop {
        return Ok(vec![start; num]);
    }
    let (lo, hi) = (start.log10(), stop.log10());
    let step = (hi - lo) / (num - 1) as f64;
    Ok((0..num)
        .map(|idx| {
            if idx == num - 1 {
                stop
            } else if idx == 0 {
                start
            } else {
                10f64.powf(lo + idx as f64 * step)
            }
        })
        .collect())
}

/// Log-spaced edges spanning the positive finite range of `values`.
pub fn log_edges_for(values: &[f64], num: usize) -> Result<Vec<f64>, EmriError> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    logspace_edges(min, max, num)
}

/// Percentile `q` in `[0, 100]` with linear interpolation between ranks.
pub fn percentile(values: &[f64], q: f64) -> Result<f64, EmriError> {
    if values.is_empty() {
        return Err(EmriError::Shape(ErrorInfo::new(
            "percentile-empty",
            "percentile of an empty sample",
        )));
    }
    if !(0.0..=100.0).contains(&q) {
        return Err(EmriError::Config(
            ErrorInfo::new("percentile-range", "percentile must lie in [0, 100]")
                .with_context("q", q.to_string()),
        ));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let position = q / 100.0 * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        Ok(sorted[lower])
    } else {
        let weight = position - lower as f64;
        Ok(sorted[lower] * (1.0 - weight) + sorted[upper] * weight)
    }
}
