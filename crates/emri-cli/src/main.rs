use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use emri_figures::DirectorySink;
use tracing_subscriber::EnvFilter;

use commands::{
    accuracy::{self, AccuracyArgs},
    argmax::{self, ArgmaxArgs},
    backgrounds::{self, BackgroundsArgs},
    biases::{self, BiasesArgs},
    catalogue::{self, CatalogueArgs},
    convert::{self, ConvertArgs},
    max_r_cdf::{self, MaxRCdfArgs},
    precisions::{self, PrecisionsArgs},
    presets::{self, PresetsArgs},
    Context,
};
use config::AnalysisConfig;

mod commands;
mod config;
mod summary;

#[derive(Parser, Debug)]
#[command(
    name = "emri-glitch",
    version,
    about = "Glitch-bias figures for EMRI parameter estimation"
)]
struct Cli {
    /// YAML analysis configuration (data layout, thresholds, seeds, bins).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Overrides `data_root` from the configuration.
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,
    /// Overrides `out_dir` (figures and summaries) from the configuration.
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,
    /// Raise the log level (repeatable).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the EMRI presets as JSON after checking their physical ranges.
    Presets(PresetsArgs),
    /// Total glitch bias normalised by the noise uncertainty.
    Biases(BiasesArgs),
    /// Total precision ratio with resampled glitch biases plus noise.
    Precisions(PrecisionsArgs),
    /// Fisher versus MCMC bias discrepancy for one glitch background.
    Accuracy(AccuracyArgs),
    /// Pie chart of the most affected parameter per background.
    Argmax(ArgmaxArgs),
    /// Cumulative distribution of the per-background maximum R.
    MaxRCdf(MaxRCdfArgs),
    /// Glitch catalogue SNR histogram and percentiles.
    Catalogue(CatalogueArgs),
    /// Optimal SNRs of the glitch backgrounds per threshold.
    Backgrounds(BackgroundsArgs),
    /// Convert .npy/.npz files to delimited text and/or HDF5.
    Convert(ConvertArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn context(cli: &Cli) -> Result<Context, Box<dyn Error>> {
    let mut config = AnalysisConfig::load(cli.config.as_deref())?;
    if let Some(root) = &cli.data_root {
        config.layout.data_root = root.clone();
    }
    if let Some(out_dir) = &cli.out_dir {
        config.out_dir = out_dir.clone();
    }
    let sink = DirectorySink::new(config.out_dir.clone(), config.figure);
    Ok(Context::new(config, Box::new(sink)))
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match &cli.command {
        Command::Presets(args) => presets::run(args),
        Command::Convert(args) => convert::run(args),
        Command::Biases(args) => biases::run(args, &mut context(&cli)?),
        Command::Precisions(args) => precisions::run(args, &mut context(&cli)?),
        Command::Accuracy(args) => accuracy::run(args, &mut context(&cli)?),
        Command::Argmax(args) => argmax::run(args, &mut context(&cli)?),
        Command::MaxRCdf(args) => max_r_cdf::run(args, &mut context(&cli)?),
        Command::Catalogue(args) => catalogue::run(args, &mut context(&cli)?),
        Command::Backgrounds(args) => backgrounds::run(args, &mut context(&cli)?),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
