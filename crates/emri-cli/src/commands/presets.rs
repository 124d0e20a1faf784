use std::error::Error;

use clap::Args;
use emri_core::{EmriConfiguration, EmriError, EmriPreset, ErrorInfo};

use crate::summary::to_canonical_json_bytes;

#[derive(Args, Debug)]
pub struct PresetsArgs {
    /// Print only this preset (`prograde`, `Strongfield_EMRI`, ...).
    #[arg(long)]
    pub name: Option<String>,
}

pub fn run(args: &PresetsArgs) -> Result<(), Box<dyn Error>> {
    let configurations = match &args.name {
        Some(name) => vec![EmriConfiguration::from_name(name)?],
        None => EmriPreset::all()
            .into_iter()
            .map(EmriPreset::configuration)
            .collect(),
    };
    for configuration in &configurations {
        if !configuration.physical_ranges_hold() {
            return Err(Box::new(EmriError::Config(
                ErrorInfo::new("preset-range", "preset violates its physical ranges")
                    .with_context("label", configuration.label.clone()),
            )));
        }
    }
    let json = to_canonical_json_bytes(&configurations)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}
