//! Paths of the study's data tree.
//!
//! Every artifact lives under `data_root`, in a subdirectory per artifact
//! kind and, below that, one `max_glitch_SNR_<t>` directory per threshold.

use std::path::{Path, PathBuf};

use emri_core::GlitchThreshold;
use serde::{Deserialize, Serialize};

/// Resolves artifact paths from a data root and subdirectory names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataLayout {
    /// Root of the data tree.
    pub data_root: PathBuf,
    /// Fisher matrices.
    pub fisher_subdir: String,
    /// Extension of Fisher matrix files.
    pub fisher_extension: String,
    /// Per-background FM errors (precision, CDF inputs).
    pub errors_subdir: String,
    /// Per-background FM biases (bias and argmax inputs).
    pub biases_subdir: String,
    /// MCMC chains and true-parameter dictionaries.
    pub samples_subdir: String,
    /// Glitch background AET files.
    pub backgrounds_subdir: String,
    /// Directory holding precomputed R arrays.
    pub ratios_dir: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data_files"),
            fisher_subdir: "EMRI_fisher".to_string(),
            fisher_extension: "h5".to_string(),
            errors_subdir: "EMRI_errors".to_string(),
            biases_subdir: "EMRI_biases".to_string(),
            samples_subdir: "EMRI_mcmc_samples".to_string(),
            backgrounds_subdir: "glitch_bg_AET".to_string(),
            ratios_dir: PathBuf::from("."),
        }
    }
}

/// Which per-background array directory to read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BiasSource {
    /// `errors_subdir`.
    Errors,
    /// `biases_subdir`.
    Biases,
}

impl DataLayout {
    /// Layout rooted at `data_root` with default subdirectory names.
    pub fn with_root(data_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            ..Self::default()
        }
    }

    fn threshold_dir(&self, subdir: &str, threshold: GlitchThreshold) -> PathBuf {
        self.data_root
            .join(subdir)
            .join(threshold.directory_name())
    }

    /// `<root>/<fisher>/Fisher_<label>.<ext>`.
    pub fn fisher_path(&self, label: &str) -> PathBuf {
        self.data_root
            .join(&self.fisher_subdir)
            .join(format!("Fisher_{label}.{}", self.fisher_extension))
    }

    /// Per-background bias array of one EMRI and threshold.
    pub fn bias_path(&self, source: BiasSource, label: &str, threshold: GlitchThreshold) -> PathBuf {
        let subdir = match source {
            BiasSource::Errors => &self.errors_subdir,
            BiasSource::Biases => &self.biases_subdir,
        };
        self.threshold_dir(subdir, threshold)
            .join(format!("{label}_delta_theta_arr.npy"))
    }

    /// Precomputed relative-error array of one EMRI and threshold.
    pub fn ratio_path(&self, label: &str, threshold: GlitchThreshold) -> PathBuf {
        self.ratios_dir
            .join(format!("{label}_R_glitches_max_SNR_{threshold}.npy"))
    }

    /// Chain directory of one threshold.
    pub fn samples_dir(&self, threshold: GlitchThreshold) -> PathBuf {
        self.threshold_dir(&self.samples_subdir, threshold)
    }

    /// Chain of `samples_file` with glitch background `background` injected.
    pub fn glitchy_samples_path(
        &self,
        samples_file: &str,
        background: usize,
        threshold: GlitchThreshold,
    ) -> PathBuf {
        self.samples_dir(threshold)
            .join(format!("BG_{background:0>4}_PLUS_{samples_file}"))
    }

    /// True-parameter dictionary stored next to the glitch-free chain.
    pub fn params_path(&self, samples_file: &str) -> PathBuf {
        self.samples_dir(GlitchThreshold::UNMITIGATED)
            .join(format!("PARAMS_{samples_file}"))
    }

    /// Directory of the glitch background files of one threshold.
    pub fn backgrounds_dir(&self, threshold: GlitchThreshold) -> PathBuf {
        self.threshold_dir(&self.backgrounds_subdir, threshold)
    }
}

/// EMRI label encoded in a chain file name (`<label>_M-...`).
pub fn label_from_samples_file(samples_file: &str) -> &str {
    let name = Path::new(samples_file)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(samples_file);
    name.split("_M-").next().unwrap_or(name)
}

/// Background index of a `BG_<idx>_AET.<ext>` file name.
pub fn background_index(path: &Path) -> Option<&str> {
    let name = path.file_name()?.to_str()?;
    let mut parts = name.split('_');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("BG"), Some(index), Some(rest)) if rest.starts_with("AET") => Some(index),
        _ => None,
    }
}
