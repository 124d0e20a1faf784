use std::error::Error;

use clap::Args;
use emri_core::{EmriConfiguration, GlitchThreshold};
use emri_figures::{AxisSpec, Figure};
use emri_io::BiasSource;
use emri_stats::{summarize, Statistic};
use tracing::info;

use super::{parameter_scatter, Context};
use crate::summary::{write_summary, ProvenanceBuilder};

#[derive(Args, Debug)]
pub struct PrecisionsArgs {
    /// EMRI preset name or label.
    #[arg(long, default_value = "prograde")]
    pub emri: String,
    /// Mitigation thresholds to plot (default: configured ladder).
    #[arg(long, num_args = 1..)]
    pub thresholds: Option<Vec<GlitchThreshold>>,
    /// Noise draws (and resampled glitch biases) per threshold.
    #[arg(long)]
    pub noise_samples: Option<usize>,
    /// Seed of the resampling and the noise draws.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// `SD(glitch + noise) / SD(noise)` per parameter and threshold.
pub fn run(args: &PrecisionsArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let emri = EmriConfiguration::from_name(&args.emri)?;
    let thresholds = ctx.thresholds(&args.thresholds);
    let seed = args.seed.unwrap_or(ctx.config.seed);
    let noise_samples = args.noise_samples.unwrap_or(ctx.config.noise_samples);
    let mut provenance = ProvenanceBuilder::new().with_seed(seed);
    let fisher = ctx.load_fisher(&emri.label, &mut provenance)?;
    let inputs = ctx.load_bias_inputs(BiasSource::Errors, &emri.label, &thresholds, &mut provenance)?;
    let summary = summarize(
        &fisher,
        &inputs,
        Statistic::TotalPrecision {
            noise_samples,
            seed,
        },
    )?;

    let panel = parameter_scatter(
        AxisSpec::linear("SD(Δθ_total) / SD(Δθ_noise)"),
        &summary.thresholds,
    );
    let name = format!("{}_total_precisions", emri.label);
    ctx.sink.emit(&name, &Figure::single(panel))?;
    write_summary(ctx.out_dir(), &name, &summary, &provenance.finish()?)?;
    info!(emri = %emri.label, seed, noise_samples, "total precisions done");
    Ok(())
}
