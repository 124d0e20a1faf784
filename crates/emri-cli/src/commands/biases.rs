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
pub struct BiasesArgs {
    /// EMRI preset name or label.
    #[arg(long, default_value = "prograde")]
    pub emri: String,
    /// Mitigation thresholds to plot (default: configured ladder).
    #[arg(long, num_args = 1..)]
    pub thresholds: Option<Vec<GlitchThreshold>>,
}

/// `|mean glitch bias| / σ_noise` per parameter and threshold.
pub fn run(args: &BiasesArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let emri = EmriConfiguration::from_name(&args.emri)?;
    let thresholds = ctx.thresholds(&args.thresholds);
    let mut provenance = ProvenanceBuilder::new();
    let fisher = ctx.load_fisher(&emri.label, &mut provenance)?;
    let inputs = ctx.load_bias_inputs(BiasSource::Biases, &emri.label, &thresholds, &mut provenance)?;
    let summary = summarize(&fisher, &inputs, Statistic::TotalBias)?;

    let panel = parameter_scatter(
        AxisSpec::log("|β_glitches| / SD(Δθ_noise)"),
        &summary.thresholds,
    );
    let name = format!("{}_glitch_biases", emri.label);
    ctx.sink.emit(&name, &Figure::single(panel))?;
    write_summary(ctx.out_dir(), &name, &summary, &provenance.finish()?)?;
    info!(emri = %emri.label, thresholds = thresholds.len(), "glitch biases done");
    Ok(())
}
