use std::path::Path;

use emri_core::{EmriError, ErrorInfo};
use ndarray::ArrayD;
use tracing::debug;

fn hdf5_error(code: &str, path: &Path, key: &str, err: hdf5::Error) -> EmriError {
    EmriError::Format(
        ErrorInfo::new(code, err.to_string())
            .with_context("path", path.display().to_string())
            .with_context("key", key),
    )
}

/// Reads dataset `key` (a `/`-separated path) as `f64`.
pub fn read_dataset(path: &Path, key: &str) -> Result<ArrayD<f64>, EmriError> {
    if !path.is_file() {
        return Err(EmriError::io("input-missing", path, "file not found"));
    }
    let file = hdf5::File::open(path).map_err(|err| hdf5_error("hdf5-open", path, key, err))?;
    let dataset = file
        .dataset(key)
        .map_err(|err| hdf5_error("dataset-key", path, key, err))?;
    let array = dataset
        .read_dyn::<f64>()
        .map_err(|err| hdf5_error("hdf5-read", path, key, err))?;
    debug!(path = %path.display(), key, shape = ?array.shape(), "read hdf5 dataset");
    Ok(array)
}
