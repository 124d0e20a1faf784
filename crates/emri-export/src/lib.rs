#![deny(missing_docs)]
//! Export of NumPy artifacts to human-readable text and a consolidated HDF5
//! file.

/// Conversion driver and its options/report types.
pub mod convert;
/// Recursive pattern discovery.
pub mod discover;
/// printf-style float formatting.
pub mod floatfmt;
#[cfg(feature = "hdf5")]
/// HDF5 output (feature `hdf5`).
pub mod hdf5_out;
/// Delimited text output.
pub mod text;

pub use convert::{
    convert, ConversionOptions, ConversionReport, ConvertedArray, ConvertedFile, Delimiter,
    OutputFormat, HDF5_MISSING_MESSAGE,
};
pub use discover::discover_files;
pub use floatfmt::FloatFormat;
pub use text::{shape_tuple, write_text};
