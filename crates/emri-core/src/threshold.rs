//! Glitch-mitigation thresholds (maximum glitch SNR kept in a background).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{EmriError, ErrorInfo};

/// Maximum SNR of glitches retained in a simulated background.
///
/// Glitches louder than the threshold are assumed to be mitigated upstream;
/// `inf` means no mitigation. The `Display` form is the directory suffix
/// used on disk (`inf`, `400.0`, `8.0`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct GlitchThreshold(f64);

impl GlitchThreshold {
    /// No mitigation: every glitch is kept.
    pub const UNMITIGATED: GlitchThreshold = GlitchThreshold(f64::INFINITY);

    /// Creates a threshold, rejecting NaN and non-positive values.
    pub fn new(value: f64) -> Result<Self, EmriError> {
        if value.is_nan() || value <= 0.0 {
            return Err(EmriError::Config(
                ErrorInfo::new("invalid-threshold", "glitch SNR threshold must be positive")
                    .with_context("value", value.to_string()),
            ));
        }
        Ok(Self(value))
    }

    /// Raw SNR value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this threshold keeps every glitch.
    pub fn is_unmitigated(self) -> bool {
        self.0.is_infinite()
    }

    /// Mitigation ladder used throughout the study.
    pub fn study_ladder() -> Vec<GlitchThreshold> {
        vec![
            GlitchThreshold::UNMITIGATED,
            GlitchThreshold(400.0),
            GlitchThreshold(90.0),
            GlitchThreshold(8.0),
        ]
    }

    /// Directory name holding the artifacts of this threshold.
    pub fn directory_name(self) -> String {
        format!("max_glitch_SNR_{self}")
    }

    /// Legend entry used in figures.
    pub fn legend(self) -> String {
        format!("Glitch SNRs ≤ {self}")
    }
}

impl fmt::Display for GlitchThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        if value.is_infinite() || (1e-4..1e16).contains(&value) {
            // Debug keeps the trailing `.0` and prints `inf`.
            return write!(f, "{value:?}");
        }
        // Directory names on disk spell the exponent with a sign and at
        // least two digits: `1e+16`, `1e-05`.
        let scientific = format!("{value:e}");
        let Some((mantissa, exponent)) = scientific.split_once('e') else {
            return f.write_str(&scientific);
        };
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        write!(f, "{mantissa}e{sign}{digits:0>2}")
    }
}

impl FromStr for GlitchThreshold {
    type Err = EmriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s.trim().parse().map_err(|_| {
            EmriError::Config(
                ErrorInfo::new("invalid-threshold", format!("cannot parse '{s}' as an SNR"))
                    .with_hint("use a positive number or 'inf'"),
            )
        })?;
        GlitchThreshold::new(value)
    }
}

impl Serialize for GlitchThreshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ThresholdRepr {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for GlitchThreshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parsed = match ThresholdRepr::deserialize(deserializer)? {
            ThresholdRepr::Number(value) => GlitchThreshold::new(value),
            ThresholdRepr::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
