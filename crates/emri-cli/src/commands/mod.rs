pub mod accuracy;
pub mod argmax;
pub mod backgrounds;
pub mod biases;
pub mod catalogue;
pub mod convert;
pub mod max_r_cdf;
pub mod precisions;
pub mod presets;

use std::path::Path;

use emri_core::{parameter_labels, EmriError, GlitchThreshold};
use emri_figures::{AxisSpec, FigureSink, Panel, ScatterSeries};
use emri_io::{load_matrix, BiasSource};
use emri_stats::{BiasArray, FisherMatrix, ThresholdInput, ThresholdSummary};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::summary::ProvenanceBuilder;

/// Dataset key of the Fisher matrix inside keyed containers.
pub const FISHER_KEY: &str = "Fisher";
/// Dataset key of bias arrays inside keyed containers.
pub const BIAS_KEY: &str = "delta_theta";

/// What every command runs against: resolved configuration plus the figure
/// destination.
pub struct Context {
    pub config: AnalysisConfig,
    pub sink: Box<dyn FigureSink>,
}

impl Context {
    pub fn new(config: AnalysisConfig, sink: Box<dyn FigureSink>) -> Self {
        Self { config, sink }
    }

    pub fn out_dir(&self) -> &Path {
        &self.config.out_dir
    }

    /// Threshold override from the command line, else the configured ladder.
    pub fn thresholds(&self, overrides: &Option<Vec<GlitchThreshold>>) -> Vec<GlitchThreshold> {
        match overrides {
            Some(list) if !list.is_empty() => list.clone(),
            _ => self.config.thresholds.clone(),
        }
    }

    pub fn load_fisher(
        &self,
        label: &str,
        provenance: &mut ProvenanceBuilder,
    ) -> Result<FisherMatrix, EmriError> {
        let path = self.config.layout.fisher_path(label);
        let fisher = FisherMatrix::from_array(&load_matrix(&path, FISHER_KEY)?)?;
        provenance.record(&path)?;
        debug!(path = %path.display(), dim = fisher.dim(), "loaded Fisher matrix");
        Ok(fisher)
    }

    pub fn load_bias_inputs(
        &self,
        source: BiasSource,
        label: &str,
        thresholds: &[GlitchThreshold],
        provenance: &mut ProvenanceBuilder,
    ) -> Result<Vec<ThresholdInput>, EmriError> {
        thresholds
            .iter()
            .map(|&threshold| {
                let path = self.config.layout.bias_path(source, label, threshold);
                let biases = BiasArray::new(load_matrix(&path, BIAS_KEY)?);
                provenance.record(&path)?;
                Ok(ThresholdInput { threshold, biases })
            })
            .collect()
    }

    /// Precomputed `R` arrays, one per threshold.
    pub fn load_ratio_inputs(
        &self,
        label: &str,
        thresholds: &[GlitchThreshold],
        provenance: &mut ProvenanceBuilder,
    ) -> Result<Vec<ThresholdInput>, EmriError> {
        thresholds
            .iter()
            .map(|&threshold| {
                let path = self.config.layout.ratio_path(label, threshold);
                let biases = BiasArray::new(load_matrix(&path, "R")?);
                provenance.record(&path)?;
                Ok(ThresholdInput { threshold, biases })
            })
            .collect()
    }
}

/// Per-parameter scatter, one series per threshold, parameters on a
/// categorical x axis.
pub fn parameter_scatter(y_axis: AxisSpec, summaries: &[ThresholdSummary]) -> Panel {
    let x_axis = AxisSpec::categorical("Parameter", parameter_labels());
    summaries
        .iter()
        .fold(Panel::new(x_axis, y_axis).with_legend(), |panel, summary| {
            panel.with_scatter(ScatterSeries::indexed(
                summary.threshold.legend(),
                summary.values.clone(),
            ))
        })
}
