use std::fs;
use std::path::{Path, PathBuf};

use emri_core::{EmriError, ErrorInfo, GlitchThreshold, DEFAULT_SEED};
use emri_figures::FigureConfig;
use emri_io::DataLayout;
use serde::{Deserialize, Serialize};

/// Settings shared by every analysis command, loaded from YAML.
///
/// Missing keys fall back to the study defaults; command-line flags win
/// over both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    #[serde(flatten)]
    pub layout: DataLayout,
    pub out_dir: PathBuf,
    pub thresholds: Vec<GlitchThreshold>,
    pub seed: u64,
    pub noise_samples: usize,
    pub burn_in: usize,
    pub cdf_bins: usize,
    pub catalogue_bins: usize,
    pub background_bins: usize,
    pub figure: FigureConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            layout: DataLayout::default(),
            out_dir: PathBuf::from("."),
            thresholds: GlitchThreshold::study_ladder(),
            seed: DEFAULT_SEED,
            noise_samples: 10_000,
            burn_in: 2_000,
            cdf_bins: 20,
            catalogue_bins: 40,
            background_bins: 30,
            figure: FigureConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Reads `path`, or returns the defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, EmriError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|err| EmriError::io("config-read", path, err))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(&text).map_err(|err| {
            EmriError::Config(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), EmriError> {
        if self.thresholds.is_empty() {
            return Err(EmriError::Config(ErrorInfo::new(
                "config-thresholds",
                "at least one glitch threshold is required",
            )));
        }
        for (field, bins) in [
            ("cdf_bins", self.cdf_bins),
            ("catalogue_bins", self.catalogue_bins),
            ("background_bins", self.background_bins),
        ] {
            if bins < 2 {
                return Err(EmriError::Config(
                    ErrorInfo::new("config-bins", "histograms need at least two bin edges")
                        .with_context("field", field)
                        .with_context("value", bins.to_string()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: AnalysisConfig = serde_yaml::from_str(
            "data_root: /scratch/emri\nfisher_extension: npy\nthresholds: [inf, 8]\nseed: 7\n",
        )
        .unwrap();
        assert_eq!(config.layout.data_root, PathBuf::from("/scratch/emri"));
        assert_eq!(config.layout.fisher_extension, "npy");
        assert_eq!(config.layout.errors_subdir, "EMRI_errors");
        assert_eq!(config.thresholds.len(), 2);
        assert!(config.thresholds[0].is_unmitigated());
        assert_eq!(config.seed, 7);
        assert_eq!(config.noise_samples, 10_000);
        assert_eq!(config.cdf_bins, 20);
    }

    #[test]
    fn empty_threshold_list_is_rejected() {
        let config = AnalysisConfig {
            thresholds: Vec::new(),
            ..AnalysisConfig::default()
        };
        assert_eq!(config.validate().unwrap_err().info().code, "config-thresholds");
    }
}
