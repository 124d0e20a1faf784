//! Catalogue of the parameters estimated by the Fisher and MCMC pipelines.

use serde::{Deserialize, Serialize};

/// One of the twelve estimated EMRI parameters.
///
/// `x0` and `Phi_theta0` are fixed by the waveform model and never estimated,
/// so they have no entry here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Parameter {
    /// Primary mass.
    #[serde(rename = "M")]
    Mass,
    /// Secondary mass.
    #[serde(rename = "mu")]
    SecondaryMass,
    /// Dimensionless primary spin.
    #[serde(rename = "a")]
    Spin,
    /// Initial semi-latus rectum.
    #[serde(rename = "p0")]
    SemiLatusRectum,
    /// Initial eccentricity.
    #[serde(rename = "e0")]
    Eccentricity,
    /// Luminosity distance.
    #[serde(rename = "dist")]
    Distance,
    /// Sky polar angle.
    #[serde(rename = "qS")]
    SkyPolar,
    /// Sky azimuthal angle.
    #[serde(rename = "phiS")]
    SkyAzimuth,
    /// Spin polar angle.
    #[serde(rename = "qK")]
    SpinPolar,
    /// Spin azimuthal angle.
    #[serde(rename = "phiK")]
    SpinAzimuth,
    /// Initial azimuthal phase.
    #[serde(rename = "Phi_phi0")]
    AzimuthalPhase,
    /// Initial radial phase.
    #[serde(rename = "Phi_r0")]
    RadialPhase,
}

/// Estimated parameters in the order used by every Fisher matrix and bias
/// array on disk.
pub const ESTIMATED_PARAMETERS: [Parameter; 12] = [
    Parameter::Mass,
    Parameter::SecondaryMass,
    Parameter::Spin,
    Parameter::SemiLatusRectum,
    Parameter::Eccentricity,
    Parameter::Distance,
    Parameter::SkyPolar,
    Parameter::SkyAzimuth,
    Parameter::SpinPolar,
    Parameter::SpinAzimuth,
    Parameter::AzimuthalPhase,
    Parameter::RadialPhase,
];

impl Parameter {
    /// Key used for this parameter in true-value dictionaries.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Mass => "M",
            Parameter::SecondaryMass => "mu",
            Parameter::Spin => "a",
            Parameter::SemiLatusRectum => "p0",
            Parameter::Eccentricity => "e0",
            Parameter::Distance => "dist",
            Parameter::SkyPolar => "qS",
            Parameter::SkyAzimuth => "phiS",
            Parameter::SpinPolar => "qK",
            Parameter::SpinAzimuth => "phiK",
            Parameter::AzimuthalPhase => "Phi_phi0",
            Parameter::RadialPhase => "Phi_r0",
        }
    }

    /// Axis label used in figures.
    pub fn label(self) -> &'static str {
        match self {
            Parameter::Mass => "M",
            Parameter::SecondaryMass => "μ",
            Parameter::Spin => "a",
            Parameter::SemiLatusRectum => "p₀",
            Parameter::Eccentricity => "e₀",
            Parameter::Distance => "d_L",
            Parameter::SkyPolar => "θ_S",
            Parameter::SkyAzimuth => "φ_S",
            Parameter::SpinPolar => "θ_K",
            Parameter::SpinAzimuth => "φ_K",
            Parameter::AzimuthalPhase => "Φ_φ0",
            Parameter::RadialPhase => "Φ_r0",
        }
    }

    /// Physical unit, empty for dimensionless parameters.
    pub fn unit(self) -> &'static str {
        match self {
            Parameter::Mass | Parameter::SecondaryMass => "M_sun",
            Parameter::Spin | Parameter::SemiLatusRectum | Parameter::Eccentricity => "",
            Parameter::Distance => "Gpc",
            _ => "rad",
        }
    }

    /// Column index of the parameter in Fisher matrices and bias arrays.
    pub fn index(self) -> usize {
        ESTIMATED_PARAMETERS
            .iter()
            .position(|candidate| *candidate == self)
            .unwrap_or_default()
    }

    /// Looks a parameter up by its dictionary key.
    pub fn from_name(name: &str) -> Option<Self> {
        ESTIMATED_PARAMETERS
            .iter()
            .copied()
            .find(|parameter| parameter.name() == name)
    }
}

/// Figure labels for all estimated parameters, in column order.
pub fn parameter_labels() -> Vec<String> {
    ESTIMATED_PARAMETERS
        .iter()
        .map(|parameter| parameter.label().to_string())
        .collect()
}

/// Dictionary keys for all estimated parameters, in column order.
pub fn parameter_names() -> Vec<&'static str> {
    ESTIMATED_PARAMETERS.iter().map(|p| p.name()).collect()
}
