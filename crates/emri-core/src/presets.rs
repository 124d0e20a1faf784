//! Fixed EMRI configurations studied in the glitch analysis.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{EmriError, ErrorInfo};
use crate::params::{Parameter, ESTIMATED_PARAMETERS};

/// Waveform model every preset was generated with.
pub const WAVEFORM_MODEL: &str = "FastKerrEccentricEquatorialFlux";

/// The three astrophysical regimes of the study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmriPreset {
    /// Prograde orbit around a rapidly spinning primary.
    Prograde,
    /// Heavy primary, orbit deep in the strong field.
    Strongfield,
    /// Light primary, retrograde orbit.
    Retrograde,
}

impl EmriPreset {
    /// All presets in study order.
    pub fn all() -> [EmriPreset; 3] {
        [
            EmriPreset::Prograde,
            EmriPreset::Strongfield,
            EmriPreset::Retrograde,
        ]
    }

    /// Label used for file names and figure titles.
    pub fn label(self) -> &'static str {
        match self {
            EmriPreset::Prograde => "Prograde_EMRI",
            EmriPreset::Strongfield => "Strongfield_EMRI",
            EmriPreset::Retrograde => "Retrograde_EMRI",
        }
    }

    /// Builds the fully populated configuration for this preset.
    pub fn configuration(self) -> EmriConfiguration {
        let (mass, p0, e0, dist, dt, a) = match self {
            EmriPreset::Prograde => (1e6, 7.728, 0.730, 1.3242, 5.0, 0.998),
            EmriPreset::Strongfield => (1e7, 2.120, 0.425, 1.3536, 5.0, 0.998),
            EmriPreset::Retrograde => (1e5, 26.192, 0.800, 0.38055, 2.0, -0.500),
        };
        EmriConfiguration {
            label: self.label().to_string(),
            waveform_model: WAVEFORM_MODEL.to_string(),
            mass,
            mu: 1e1,
            a,
            p0,
            e0,
            x0: 1.0,
            dist,
            q_s: 0.8,
            phi_s: 2.2,
            q_k: 1.6,
            phi_k: 1.2,
            phi_phi0: 2.0,
            phi_theta0: 0.0,
            phi_r0: 3.0,
            dt,
        }
    }

    /// Resolves a preset from a short name (`prograde`) or its label
    /// (`Prograde_EMRI`), ignoring case.
    pub fn from_name(name: &str) -> Result<Self, EmriError> {
        let lowered = name.trim().to_ascii_lowercase();
        let short = lowered.strip_suffix("_emri").unwrap_or(&lowered);
        match short {
            "prograde" => Ok(EmriPreset::Prograde),
            "strongfield" => Ok(EmriPreset::Strongfield),
            "retrograde" => Ok(EmriPreset::Retrograde),
            _ => Err(EmriError::Config(
                ErrorInfo::new("unknown-preset", format!("no EMRI preset named '{name}'"))
                    .with_hint("expected one of prograde, strongfield, retrograde"),
            )),
        }
    }
}

impl fmt::Display for EmriPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable parameter bundle describing one EMRI source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmriConfiguration {
    /// Label used for file names.
    pub label: String,
    /// Waveform model identifier (affects the SNR).
    pub waveform_model: String,
    /// Primary mass in solar masses.
    #[serde(rename = "M")]
    pub mass: f64,
    /// Secondary mass in solar masses.
    pub mu: f64,
    /// Dimensionless primary spin.
    pub a: f64,
    /// Initial semi-latus rectum.
    pub p0: f64,
    /// Initial eccentricity.
    pub e0: f64,
    /// Cosine of the orbital inclination.
    pub x0: f64,
    /// Luminosity distance in Gpc.
    pub dist: f64,
    /// Sky polar angle.
    #[serde(rename = "qS")]
    pub q_s: f64,
    /// Sky azimuthal angle.
    #[serde(rename = "phiS")]
    pub phi_s: f64,
    /// Spin polar angle.
    #[serde(rename = "qK")]
    pub q_k: f64,
    /// Spin azimuthal angle.
    #[serde(rename = "phiK")]
    pub phi_k: f64,
    /// Initial azimuthal phase.
    #[serde(rename = "Phi_phi0")]
    pub phi_phi0: f64,
    /// Initial polar phase.
    #[serde(rename = "Phi_theta0")]
    pub phi_theta0: f64,
    /// Initial radial phase.
    #[serde(rename = "Phi_r0")]
    pub phi_r0: f64,
    /// Sampling interval in seconds.
    pub dt: f64,
}

impl EmriConfiguration {
    /// Builds the configuration of the named preset.
    pub fn from_name(name: &str) -> Result<Self, EmriError> {
        EmriPreset::from_name(name).map(EmriPreset::configuration)
    }

    /// True value of an estimated parameter.
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Mass => self.mass,
            Parameter::SecondaryMass => self.mu,
            Parameter::Spin => self.a,
            Parameter::SemiLatusRectum => self.p0,
            Parameter::Eccentricity => self.e0,
            Parameter::Distance => self.dist,
            Parameter::SkyPolar => self.q_s,
            Parameter::SkyAzimuth => self.phi_s,
            Parameter::SpinPolar => self.q_k,
            Parameter::SpinAzimuth => self.phi_k,
            Parameter::AzimuthalPhase => self.phi_phi0,
            Parameter::RadialPhase => self.phi_r0,
        }
    }

    /// True values of the estimated parameters in column order.
    pub fn estimated_values(&self) -> Vec<f64> {
        ESTIMATED_PARAMETERS
            .iter()
            .map(|parameter| self.value(*parameter))
            .collect()
    }

    /// Checks the documented physical ranges of every field.
    pub fn physical_ranges_hold(&self) -> bool {
        let angles = [
            self.q_s,
            self.phi_s,
            self.q_k,
            self.phi_k,
            self.phi_phi0,
            self.phi_theta0,
            self.phi_r0,
        ];
        (-1.0..=1.0).contains(&self.a)
            && (0.0..=1.0).contains(&self.e0)
            && (-1.0..=1.0).contains(&self.x0)
            && [self.mass, self.mu, self.dist, self.p0, self.dt]
                .iter()
                .all(|value| value.is_finite() && *value > 0.0)
            && angles.iter().all(|angle| angle.is_finite())
            && !self.label.is_empty()
            && !self.waveform_model.is_empty()
    }
}
