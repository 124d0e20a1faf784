#![deny(missing_docs)]
#![doc = "EMRI presets, the estimated-parameter catalogue, glitch thresholds and the shared error type and seeding helpers of the glitch-bias toolkit."]

pub mod errors;
pub mod params;
pub mod presets;
pub mod rng;
pub mod threshold;

pub use errors::{EmriError, ErrorInfo};
pub use params::{parameter_labels, parameter_names, Parameter, ESTIMATED_PARAMETERS};
pub use presets::{EmriConfiguration, EmriPreset, WAVEFORM_MODEL};
pub use rng::{seeded_rng, stream_seed, DEFAULT_SEED};
pub use threshold::GlitchThreshold;

/// Number of parameters estimated for every EMRI.
pub const NUM_PARAMETERS: usize = ESTIMATED_PARAMETERS.len();
