//! Keyed dataset loading, dispatched on the file extension.

use std::fs;
use std::path::Path;

use emri_core::{EmriError, ErrorInfo};
use ndarray::{Array2, ArrayD, Ix2, IxDyn};
use serde_json::Value;

use crate::npy::{read_npy_any, read_npz_entry};

/// On-disk container of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// Single NumPy array; the key is ignored.
    Npy,
    /// NumPy archive; the key names the member.
    Npz,
    /// JSON object; the key names a top-level member.
    Json,
    /// HDF5 file; the key names a dataset path.
    Hdf5,
}

impl DatasetFormat {
    /// Picks the format from the path extension.
    pub fn from_path(path: &Path) -> Result<Self, EmriError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "npy" => Ok(Self::Npy),
            "npz" => Ok(Self::Npz),
            "json" => Ok(Self::Json),
            "h5" | "hdf5" => Ok(Self::Hdf5),
            _ => Err(EmriError::Format(
                ErrorInfo::new("dataset-extension", "unsupported dataset extension")
                    .with_context("path", path.display().to_string())
                    .with_hint("expected .npy, .npz, .json, .h5 or .hdf5"),
            )),
        }
    }
}

/// Loads `key` from `path` as a float array of any rank.
pub fn load_array(path: &Path, key: &str) -> Result<ArrayD<f64>, EmriError> {
    match DatasetFormat::from_path(path)? {
        DatasetFormat::Npy => Ok(read_npy_any(path)?.to_f64()),
        DatasetFormat::Npz => Ok(read_npz_entry(path, key)?.to_f64()),
        DatasetFormat::Json => load_json(path, key),
        DatasetFormat::Hdf5 => load_hdf5(path, key),
    }
}

/// Loads a two-dimensional dataset.
pub fn load_matrix(path: &Path, key: &str) -> Result<Array2<f64>, EmriError> {
    let array = load_array(path, key)?;
    let shape = array.shape().to_vec();
    array.into_dimensionality::<Ix2>().map_err(|_| {
        EmriError::shape("dataset-rank", "(rows, cols)", format!("{shape:?}"))
            .with_context("path", path.display().to_string())
            .with_context("key", key)
    })
}

/// Loads a one-dimensional dataset; a scalar becomes a single-element vector.
pub fn load_vector(path: &Path, key: &str) -> Result<Vec<f64>, EmriError> {
    let array = load_array(path, key)?;
    if array.ndim() > 1 {
        return Err(
            EmriError::shape("dataset-rank", "(n,)", format!("{:?}", array.shape()))
                .with_context("path", path.display().to_string())
                .with_context("key", key),
        );
    }
    Ok(array.iter().copied().collect())
}

/// Loads a single value (any array holding exactly one element).
pub fn load_scalar(path: &Path, key: &str) -> Result<f64, EmriError> {
    let array = load_array(path, key)?;
    if array.len() != 1 {
        return Err(
            EmriError::shape("dataset-scalar", "()", format!("{:?}", array.shape()))
                .with_context("path", path.display().to_string())
                .with_context("key", key),
        );
    }
    array
        .iter()
        .next()
        .copied()
        .ok_or_else(|| EmriError::shape("dataset-scalar", "()", "[]"))
}

fn format_error(path: &Path, key: &str, message: impl Into<String>) -> EmriError {
    EmriError::Format(
        ErrorInfo::new("json-dataset", message)
            .with_context("path", path.display().to_string())
            .with_context("key", key),
    )
}

fn load_json(path: &Path, key: &str) -> Result<ArrayD<f64>, EmriError> {
    let raw = fs::read_to_string(path).map_err(|err| EmriError::io("input-missing", path, err))?;
    let document: Value =
        serde_json::from_str(&raw).map_err(|err| format_error(path, key, err.to_string()))?;
    let member = document
        .get(key)
        .ok_or_else(|| format_error(path, key, "JSON object has no member with this key"))?;
    json_to_array(member).map_err(|message| format_error(path, key, message))
}

fn json_shape(value: &Value) -> Vec<usize> {
    let mut shape = Vec::new();
    let mut cursor = value;
    while let Value::Array(items) = cursor {
        shape.push(items.len());
        match items.first() {
            Some(first) => cursor = first,
            None => break,
        }
    }
    shape
}

fn flatten_json(
    value: &Value,
    depth: usize,
    shape: &[usize],
    out: &mut Vec<f64>,
) -> Result<(), String> {
    match value {
        Value::Array(items) => {
            if depth >= shape.len() || items.len() != shape[depth] {
                return Err("nested arrays are not rectangular".to_string());
            }
            for item in items {
                flatten_json(item, depth + 1, shape, out)?;
            }
            Ok(())
        }
        Value::Number(number) if depth == shape.len() => {
            out.push(number.as_f64().ok_or("number out of range")?);
            Ok(())
        }
        Value::Bool(flag) if depth == shape.len() => {
            out.push(if *flag { 1.0 } else { 0.0 });
            Ok(())
        }
        Value::Number(_) | Value::Bool(_) => Err("nested arrays are not rectangular".to_string()),
        other => Err(format!("expected a number, found {other}")),
    }
}

fn json_to_array(value: &Value) -> Result<ArrayD<f64>, String> {
    let shape = json_shape(value);
    let mut flat = Vec::new();
    flatten_json(value, 0, &shape, &mut flat)?;
    ArrayD::from_shape_vec(IxDyn(&shape), flat).map_err(|err| err.to_string())
}

#[cfg(feature = "hdf5")]
fn load_hdf5(path: &Path, key: &str) -> Result<ArrayD<f64>, EmriError> {
    crate::hdf5_io::read_dataset(path, key)
}

#[cfg(not(feature = "hdf5"))]
fn load_hdf5(path: &Path, _key: &str) -> Result<ArrayD<f64>, EmriError> {
    Err(EmriError::Config(
        ErrorInfo::new("hdf5-unavailable", "HDF5 support is not compiled in")
            .with_context("path", path.display().to_string())
            .with_hint("rebuild with `--features hdf5` or convert the file to .npy/.json"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shapes_follow_nesting() {
        let scalar = json_to_array(&serde_json::json!(3.5)).unwrap();
        assert_eq!(scalar.ndim(), 0);
        let matrix = json_to_array(&serde_json::json!([[1, 2], [3, 4]])).unwrap();
        assert_eq!(matrix.shape(), &[2, 2]);
        assert!(json_to_array(&serde_json::json!([[1, 2], [3]])).is_err());
        assert!(json_to_array(&serde_json::json!(["a"])).is_err());
    }
}
