#![deny(missing_docs)]
#![doc = "Readers for the artifacts the glitch-bias study consumes: NumPy arrays, keyed JSON and HDF5 datasets, MCMC chains, true-parameter dictionaries and whitespace tables."]

/// MCMC chain flattening with burn-in.
pub mod chain;
/// Extension-dispatched dataset loading.
pub mod dataset;
#[cfg(feature = "hdf5")]
/// HDF5 dataset access (feature `hdf5`).
pub mod hdf5_io;
/// Directory layout of the study's data tree.
pub mod layout;
/// Dtype-preserving `.npy` / `.npz` readers.
pub mod npy;
/// Whitespace-delimited numeric tables.
pub mod table;
/// True parameter dictionaries.
pub mod truth;

pub use chain::{cold_chain, load_chain};
pub use dataset::{load_array, load_matrix, load_scalar, load_vector, DatasetFormat};
pub use layout::{background_index, label_from_samples_file, BiasSource, DataLayout};
pub use npy::{read_npy_any, read_npz_entries, LoadedArray, NpyData};
pub use table::read_text_table;
pub use truth::{load_parameter_map, load_true_values, true_values_from_map};

/// Whether the crate was built with HDF5 support.
pub const HDF5_ENABLED: bool = cfg!(feature = "hdf5");
