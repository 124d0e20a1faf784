use std::error::Error;

use clap::Args;
use emri_core::{EmriConfiguration, EmriError, GlitchThreshold};
use emri_figures::{AxisSpec, Figure};
use emri_io::{label_from_samples_file, load_chain, load_matrix, load_true_values, BiasSource};
use emri_stats::{fisher_mcmc_discrepancy, mcmc_bias, noise_std, ThresholdSummary};
use serde::Serialize;
use tracing::{debug, info};

use super::{parameter_scatter, Context, BIAS_KEY};
use crate::summary::{write_summary, ProvenanceBuilder};

#[derive(Args, Debug)]
pub struct AccuracyArgs {
    /// Glitch-free chain file name; the EMRI label is its `<label>_M-` prefix.
    #[arg(long)]
    pub samples_file: String,
    /// EMRI preset, when it differs from the one encoded in the file name.
    #[arg(long)]
    pub emri: Option<String>,
    /// Glitch background injected into the glitchy chains.
    #[arg(long, default_value_t = 0)]
    pub background: usize,
    /// Leading iterations discarded from every chain.
    #[arg(long)]
    pub burn_in: Option<usize>,
    /// Dataset holding the chain (default: eryn layout for HDF5, `chain` otherwise).
    #[arg(long)]
    pub chain_key: Option<String>,
    /// Mitigation thresholds to plot (default: configured ladder).
    #[arg(long, num_args = 1..)]
    pub thresholds: Option<Vec<GlitchThreshold>>,
}

#[derive(Debug, Serialize)]
struct AccuracySummary {
    background: usize,
    burn_in: usize,
    noise_std: Vec<f64>,
    thresholds: Vec<ThresholdSummary>,
}

/// `|Δθ_FM - Δθ_MCMC| / σ_noise` for one background across thresholds.
pub fn run(args: &AccuracyArgs, ctx: &mut Context) -> Result<(), Box<dyn Error>> {
    let label = match &args.emri {
        Some(name) => EmriConfiguration::from_name(name)?.label,
        None => label_from_samples_file(&args.samples_file).to_string(),
    };
    let thresholds = ctx.thresholds(&args.thresholds);
    let burn_in = args.burn_in.unwrap_or(ctx.config.burn_in);
    let layout = ctx.config.layout.clone();
    let mut provenance = ProvenanceBuilder::new();

    let params_path = layout.params_path(&args.samples_file);
    let truth = load_true_values(&params_path)?;
    provenance.record(&params_path)?;
    let std = noise_std(&ctx.load_fisher(&label, &mut provenance)?)?;

    let mut summaries = Vec::with_capacity(thresholds.len());
    for threshold in thresholds {
        let chain_path = layout.glitchy_samples_path(&args.samples_file, args.background, threshold);
        let samples = load_chain(&chain_path, args.chain_key.as_deref(), burn_in)?;
        provenance.record(&chain_path)?;
        let posterior_bias = mcmc_bias(&samples, &truth)?;

        let bias_path = layout.bias_path(BiasSource::Errors, &label, threshold);
        let fm_biases = load_matrix(&bias_path, BIAS_KEY)?;
        provenance.record(&bias_path)?;
        if args.background >= fm_biases.nrows() {
            return Err(Box::new(
                EmriError::shape("background-index", format!("< {}", fm_biases.nrows()), args.background)
                    .with_context("path", bias_path.display().to_string()),
            ));
        }
        let fm_bias: Vec<f64> = fm_biases.row(args.background).to_vec();
        let values = fisher_mcmc_discrepancy(&fm_bias, &posterior_bias, &std)?;
        debug!(%threshold, samples = samples.nrows(), "compared FM and MCMC biases");
        summaries.push(ThresholdSummary {
            threshold,
            backgrounds: 1,
            values,
        });
    }

    let panel = parameter_scatter(
        AxisSpec::log("(θ̂_FM - θ̂_MCMC) / SD(Δθ_noise)"),
        &summaries,
    );
    let name = format!("{label}_relative_biases_comparison");
    ctx.sink.emit(&name, &Figure::single(panel))?;
    let summary = AccuracySummary {
        background: args.background,
        burn_in,
        noise_std: std,
        thresholds: summaries,
    };
    write_summary(ctx.out_dir(), &name, &summary, &provenance.finish()?)?;
    info!(emri = %label, background = args.background, "accuracy of errors done");
    Ok(())
}
