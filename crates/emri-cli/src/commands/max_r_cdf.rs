use std::error::Error;

use clap::Args;
use emri_core::{EmriConfiguration, GlitchThreshold};
use emri_figures::{AxisSpec, BinnedSeries, Figure, Panel, ReferenceLine};
use emri_io::BiasSource;
use emri_stats::{log_edges_for, summarize, summarize_ratios, Histogram, Statistic};
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::summary::{write_summary, ProvenanceBuilder};

#[derive(Args, Debug)]
pub struct MaxRCdfArgs {
    /// EMRI preset name or label.
    #[arg(long, default_value = "prograde")]
    pub emri: String,
    /// Number of log-spaced bin edges (default: `cdf_bins` from the config).
    #[arg(long)]
    pub bins: Option<usize>,
    /// Read precomputed `R` arrays instead of deriving them from errors.
    #[arg(long)]
    pub from_r_arrays: bool,
    /// Mitigation thresholds to plot (default: configured ladder).
    #[arg(long, num_args = 1..)]
    pub thresholds: Option<Vec<GlitchThreshold>>,
}

#[derive(Debug, Serialize)]
struct CdfCurve {
    threshold: GlitchThreshold,
    max_r: Vec<f64>,
    edges: Vec<f64>,
    cumulative: Vec<f64>,
}

/// Cumulative distribution of the per-background maximum `R`.
pub fn run(args: &MaxRCdfArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let emri = EmriConfiguration::from_name(&args.emri)?;
    let thresholds = ctx.thresholds(&args.thresholds);
    let bins = args.bins.unwrap_or(ctx.config.cdf_bins);
    let mut provenance = ProvenanceBuilder::new();
    let summaries = if args.from_r_arrays {
        let inputs = ctx.load_ratio_inputs(&emri.label, &thresholds, &mut provenance)?;
        summarize_ratios(&inputs, Statistic::MaxRatio)?
    } else {
        let fisher = ctx.load_fisher(&emri.label, &mut provenance)?;
        let inputs =
            ctx.load_bias_inputs(BiasSource::Errors, &emri.label, &thresholds, &mut provenance)?;
        summarize(&fisher, &inputs, Statistic::MaxRatio)?.thresholds
    };

    let mut panel = Panel::new(
        AxisSpec::log("Parameter-wise max(R)"),
        AxisSpec::linear("Cumulative probability"),
    )
    .with_legend();
    let mut curves = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let edges = log_edges_for(&summary.values, bins)?;
        let histogram = Histogram::from_values(&summary.values, edges)?;
        let cumulative = histogram.cumulative_fraction();
        panel = panel.with_binned(BinnedSeries::step(
            Some(summary.threshold.legend()),
            histogram.edges.clone(),
            cumulative.clone(),
        ));
        curves.push(CdfCurve {
            threshold: summary.threshold,
            max_r: summary.values,
            edges: histogram.edges,
            cumulative,
        });
    }
    let panel = panel.with_reference_line(ReferenceLine {
        x: 1.0,
        label: Some("R = 1".to_string()),
    });

    let name = format!("{}_max_R_CDF", emri.label);
    ctx.sink.emit(&name, &Figure::single(panel))?;
    write_summary(ctx.out_dir(), &name, &curves, &provenance.finish()?)?;
    info!(emri = %emri.label, bins, "max R CDF done");
    Ok(())
}
