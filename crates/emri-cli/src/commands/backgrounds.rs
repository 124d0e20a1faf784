use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use emri_core::{EmriError, GlitchThreshold};
use emri_figures::{AxisSpec, BinnedSeries, Figure, Panel};
use emri_io::{background_index, load_scalar, DatasetFormat};
use emri_stats::{log_edges_for, Histogram};
use serde::Serialize;
use tracing::{debug, info};

use super::Context;
use crate::summary::{write_summary, ProvenanceBuilder};

pub const FIGURE_NAME: &str = "optimal_BG_SNRs_across_max_SNRs";

#[derive(Args, Debug)]
pub struct BackgroundsArgs {
    /// Number of log-spaced bin edges (default: `background_bins` from the config).
    #[arg(long)]
    pub bins: Option<usize>,
    /// Key of the optimal SNR inside each background file.
    #[arg(long, default_value = "SNR")]
    pub key: String,
    /// Mitigation thresholds to plot (default: configured ladder).
    #[arg(long, num_args = 1..)]
    pub thresholds: Option<Vec<GlitchThreshold>>,
}

#[derive(Debug, Serialize)]
struct BackgroundSnrs {
    threshold: GlitchThreshold,
    indices: Vec<String>,
    snrs: Vec<f64>,
    histogram: Histogram,
}

/// `BG_<idx>_AET.*` files of `dir` in name order.
fn background_files(dir: &Path) -> Result<Vec<PathBuf>, EmriError> {
    let entries = fs::read_dir(dir).map_err(|err| EmriError::io("backgrounds-dir", dir, err))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| background_index(path).is_some())
        .filter(|path| DatasetFormat::from_path(path).is_ok())
        .collect();
    files.sort();
    Ok(files)
}

/// Histogram of the optimal SNR of every glitch background, per threshold.
pub fn run(args: &BackgroundsArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let bins = args.bins.unwrap_or(ctx.config.background_bins);
    let thresholds = ctx.thresholds(&args.thresholds);
    let mut provenance = ProvenanceBuilder::new();
    let mut panel = Panel::new(AxisSpec::log("Optimal SNR"), AxisSpec::linear("Counts")).with_legend();
    let mut per_threshold = Vec::with_capacity(thresholds.len());
    let mut last_count = 0;

    for threshold in thresholds {
        let dir = ctx.config.layout.backgrounds_dir(threshold);
        let files = background_files(&dir)?;
        if files.is_empty() {
            return Err(Box::new(EmriError::io(
                "backgrounds-empty",
                &dir,
                "no BG_<idx>_AET files found",
            )));
        }
        let mut indices = Vec::with_capacity(files.len());
        let mut snrs = Vec::with_capacity(files.len());
        for path in &files {
            snrs.push(load_scalar(path, &args.key)?);
            indices.push(background_index(path).unwrap_or_default().to_string());
            provenance.record(path)?;
        }
        debug!(%threshold, backgrounds = snrs.len(), "loaded background SNRs");
        let histogram = Histogram::from_values(&snrs, log_edges_for(&snrs, bins)?)?;
        let counts = histogram.counts.iter().map(|&count| count as f64).collect();
        panel = panel.with_binned(
            BinnedSeries::bars(Some(threshold.legend()), histogram.edges.clone(), counts)
                .with_opacity(0.7),
        );
        last_count = files.len();
        per_threshold.push(BackgroundSnrs {
            threshold,
            indices,
            snrs,
            histogram,
        });
    }

    let figure = Figure::single(panel)
        .with_title(format!("Optimal SNRs of {last_count} glitch backgrounds"));
    ctx.sink.emit(FIGURE_NAME, &figure)?;
    write_summary(ctx.out_dir(), FIGURE_NAME, &per_threshold, &provenance.finish()?)?;
    info!(thresholds = per_threshold.len(), "background SNRs done");
    Ok(())
}
