use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use emri_export::{convert, ConversionOptions, Delimiter, FloatFormat, OutputFormat};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Root directory to search.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,
    /// File name patterns, matched recursively.
    #[arg(long, num_args = 1.., default_values = ["*.npy", "*.npz"])]
    pub patterns: Vec<String>,
    /// Directory for exported text files (and the default HDF5 file).
    #[arg(long, default_value = "exports")]
    pub outdir: PathBuf,
    /// What to write: text, hdf5 or both.
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
    /// Text delimiter: `,`, `tab` or `space`.
    #[arg(long, default_value = ",")]
    pub delimiter: Delimiter,
    /// printf-style format for floating point values.
    #[arg(long = "floatfmt", default_value = "%.10g")]
    pub float_format: FloatFormat,
    /// HDF5 output file (default: `<outdir>/data.h5`).
    #[arg(long)]
    pub hdf5_path: Option<PathBuf>,
}

pub fn run(args: &ConvertArgs) -> Result<(), Box<dyn Error>> {
    let options = ConversionOptions {
        root: args.root.clone(),
        patterns: args.patterns.clone(),
        outdir: args.outdir.clone(),
        format: args.format,
        delimiter: args.delimiter,
        float_format: args.float_format.clone(),
        hdf5_path: args.hdf5_path.clone(),
    };
    let report = convert(&options)?;
    if report.matched == 0 {
        println!("No files matched; check --root and --patterns.");
        return Ok(());
    }
    println!("Found {} file(s). Converting...", report.matched);
    for file in &report.converted {
        let rel = file.source.strip_prefix(&options.root).unwrap_or(&file.source);
        println!("Converted: {}", rel.display());
    }
    println!("Done.");
    if let Some(path) = &report.hdf5_path {
        println!("HDF5 written to: {}", path.display());
    }
    if options.format.writes_text() {
        println!("Text files written under: {}", options.outdir.display());
    }
    Ok(())
}
