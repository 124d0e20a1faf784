use std::error::Error;

use clap::Args;
use emri_core::{parameter_labels, EmriConfiguration, GlitchThreshold};
use emri_figures::{Figure, PieSlice};
use emri_io::BiasSource;
use emri_stats::{summarize, summarize_ratios, Statistic, ThresholdSummary};
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::summary::{write_summary, ProvenanceBuilder};

#[derive(Args, Debug)]
pub struct ArgmaxArgs {
    /// EMRI preset name or label.
    #[arg(long, default_value = "prograde")]
    pub emri: String,
    /// Read precomputed `R` arrays instead of deriving them from biases.
    #[arg(long)]
    pub from_r_arrays: bool,
    /// Mitigation thresholds to aggregate (default: configured ladder).
    #[arg(long, num_args = 1..)]
    pub thresholds: Option<Vec<GlitchThreshold>>,
}

#[derive(Debug, Serialize)]
struct ArgmaxSummary {
    labels: Vec<String>,
    counts: Vec<f64>,
    thresholds: Vec<ThresholdSummary>,
}

/// Element-wise sum of the per-threshold counts.
fn total_counts(summaries: &[ThresholdSummary]) -> Vec<f64> {
    let width = summaries.iter().map(|s| s.values.len()).max().unwrap_or(0);
    summaries.iter().fold(vec![0.0; width], |mut total, summary| {
        for (slot, value) in total.iter_mut().zip(&summary.values) {
            *slot += value;
        }
        total
    })
}

/// Pie of how often each parameter carries the largest `R`.
pub fn run(args: &ArgmaxArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let emri = EmriConfiguration::from_name(&args.emri)?;
    let thresholds = ctx.thresholds(&args.thresholds);
    let mut provenance = ProvenanceBuilder::new();
    let summaries = if args.from_r_arrays {
        let inputs = ctx.load_ratio_inputs(&emri.label, &thresholds, &mut provenance)?;
        summarize_ratios(&inputs, Statistic::ArgmaxCounts)?
    } else {
        let fisher = ctx.load_fisher(&emri.label, &mut provenance)?;
        let inputs =
            ctx.load_bias_inputs(BiasSource::Biases, &emri.label, &thresholds, &mut provenance)?;
        summarize(&fisher, &inputs, Statistic::ArgmaxCounts)?.thresholds
    };

    let counts = total_counts(&summaries);
    let labels = parameter_labels();
    let slices = labels
        .iter()
        .zip(&counts)
        .map(|(label, count)| PieSlice {
            label: label.clone(),
            value: *count,
        })
        .collect();
    let name = format!("{}_argmax_R", emri.label);
    ctx.sink.emit(&name, &Figure::pie(slices))?;
    let summary = ArgmaxSummary {
        labels,
        counts,
        thresholds: summaries,
    };
    write_summary(ctx.out_dir(), &name, &summary, &provenance.finish()?)?;
    info!(emri = %emri.label, from_r_arrays = args.from_r_arrays, "argmax R done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_sum_over_thresholds() {
        let summaries = vec![
            ThresholdSummary {
                threshold: GlitchThreshold::UNMITIGATED,
                backgrounds: 3,
                values: vec![2.0, 1.0, 0.0],
            },
            ThresholdSummary {
                threshold: GlitchThreshold::new(8.0).unwrap(),
                backgrounds: 3,
                values: vec![0.0, 1.0, 2.0],
            },
        ];
        assert_eq!(total_counts(&summaries), vec![2.0, 2.0, 2.0]);
        assert_eq!(total_counts(&[]), Vec::<f64>::new());
    }
}
