use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use emri_core::EmriError;
use emri_figures::{AxisSpec, BinnedSeries, Figure, Panel};
use emri_io::{load_vector, read_text_table};
use emri_stats::{log_edges_for, logspace_edges, percentile, Histogram};
use serde::Serialize;
use tracing::info;

use super::Context;
use crate::summary::{write_summary, ProvenanceBuilder};

pub const FIGURE_NAME: &str = "glitch_catalogue_SNR_hist";
const REPORTED_PERCENTILES: [f64; 5] = [10.0, 25.0, 50.0, 75.0, 90.0];

#[derive(Args, Debug)]
pub struct CatalogueArgs {
    /// Dataset of simulated LISA glitch SNRs.
    #[arg(long)]
    pub lisa: PathBuf,
    /// Key of the SNR dataset inside `--lisa`.
    #[arg(long, default_value = "SNR")]
    pub lisa_key: String,
    /// LPF effective glitch parameter tables (SNR in the last column).
    #[arg(long, num_args = 1..)]
    pub lpf: Vec<PathBuf>,
    /// Number of log-spaced bin edges (default: `catalogue_bins` from the config).
    #[arg(long)]
    pub bins: Option<usize>,
}

#[derive(Debug, Serialize)]
struct CatalogueSummary {
    count: usize,
    percentiles: BTreeMap<String, f64>,
    histogram: Histogram,
    cumulative: Vec<f64>,
    lpf: Option<Histogram>,
}

fn lpf_snrs(paths: &[PathBuf], provenance: &mut ProvenanceBuilder) -> Result<Vec<f64>, EmriError> {
    let mut snrs = Vec::new();
    for path in paths {
        let table = read_text_table(path)?;
        provenance.record(path)?;
        if let Some(last) = table.ncols().checked_sub(1) {
            snrs.extend(table.column(last).iter().map(|value| value.abs()));
        }
    }
    Ok(snrs)
}

/// SNR histogram and cumulative density of the glitch catalogue.
///
/// Bins span the 1st to 99th percentile because the catalogue has a long
/// tail of extreme outliers.
pub fn run(args: &CatalogueArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let bins = args.bins.unwrap_or(ctx.config.catalogue_bins);
    let mut provenance = ProvenanceBuilder::new();
    let snrs = load_vector(&args.lisa, &args.lisa_key)?;
    provenance.record(&args.lisa)?;

    let mut percentiles = BTreeMap::new();
    for q in REPORTED_PERCENTILES {
        let value = percentile(&snrs, q)?;
        info!(percentile = q, snr = value, "catalogue SNR percentile");
        percentiles.insert(format!("{q:.0}th"), value);
    }

    let edges = logspace_edges(percentile(&snrs, 1.0)?, percentile(&snrs, 99.0)?, bins)?;
    let histogram = Histogram::from_values(&snrs, edges)?;
    let cumulative = histogram.cumulative_fraction();
    let counts: Vec<f64> = histogram.counts.iter().map(|&count| count as f64).collect();

    let lpf = if args.lpf.is_empty() {
        None
    } else {
        let lpf = lpf_snrs(&args.lpf, &mut provenance)?;
        Some(Histogram::from_values(&lpf, log_edges_for(&lpf, bins)?)?)
    };

    let counts_panel = Panel::new(AxisSpec::log(""), AxisSpec::linear("Counts"))
        .with_binned(BinnedSeries::bars(None, histogram.edges.clone(), counts));
    let cumulative_panel = Panel::new(
        AxisSpec::log("Network SNR"),
        AxisSpec::linear("Cumulative density"),
    )
    .with_binned(BinnedSeries::step(
        None,
        histogram.edges.clone(),
        cumulative.clone(),
    ));
    ctx.sink
        .emit(FIGURE_NAME, &Figure::stacked(vec![counts_panel, cumulative_panel]))?;

    let summary = CatalogueSummary {
        count: snrs.len(),
        percentiles,
        histogram,
        cumulative,
        lpf,
    };
    write_summary(ctx.out_dir(), FIGURE_NAME, &summary, &provenance.finish()?)?;
    info!(glitches = summary.count, bins, "catalogue histogram done");
    Ok(())
}
