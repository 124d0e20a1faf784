//! True parameter values of an injected EMRI.
//!
//! The dictionaries come either as JSON objects or as Python pickles of a
//! `dict[str, float]`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use emri_core::{EmriError, ErrorInfo, ESTIMATED_PARAMETERS};
use serde_pickle::{DeOptions, HashableValue, Value as PickleValue};
use serde_json::Value as JsonValue;
use tracing::warn;

fn pickle_number(value: &PickleValue) -> Option<f64> {
    match value {
        PickleValue::F64(v) => Some(*v),
        PickleValue::I64(v) => Some(*v as f64),
        PickleValue::Int(v) => v.to_string().parse().ok(),
        PickleValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Whether the pickle calls `numpy.core.multiarray.scalar`, which is how
/// numpy scalars such as `np.float64` are stored.
fn references_numpy_scalars(bytes: &[u8]) -> bool {
    let contains = |needle: &[u8]| bytes.windows(needle.len()).any(|window| window == needle);
    contains(b"multiarray") && contains(b"scalar")
}

fn numpy_scalar_error(path: &Path) -> EmriError {
    EmriError::Format(
        ErrorInfo::new(
            "truth-numpy-scalar",
            "true values are pickled numpy scalars, which cannot be decoded",
        )
        .with_context("path", path.display().to_string())
        .with_hint("pickle plain floats, e.g. {name: float(value)}, or save the dict as JSON"),
    )
}

fn from_pickle(path: &Path) -> Result<BTreeMap<String, f64>, EmriError> {
    let bytes = fs::read(path).map_err(|err| EmriError::io("input-missing", path, err))?;
    let numpy_scalars = references_numpy_scalars(&bytes);
    let value = serde_pickle::value_from_slice(&bytes, DeOptions::new().replace_unresolved_globals())
        .map_err(|err| {
            if numpy_scalars {
                return numpy_scalar_error(path);
            }
            EmriError::Format(
                ErrorInfo::new("pickle-decode", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
    let PickleValue::Dict(entries) = value else {
        return Err(EmriError::Format(
            ErrorInfo::new("pickle-decode", "pickle does not hold a dict")
                .with_context("path", path.display().to_string()),
        ));
    };
    let mut map = BTreeMap::new();
    for (key, value) in &entries {
        let name = match key {
            HashableValue::String(name) => name.clone(),
            HashableValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            _ => continue,
        };
        match pickle_number(value) {
            Some(number) => {
                map.insert(name, number);
            }
            // Unresolved numpy globals decode to None; only a parameter
            // that is needed makes this fatal.
            None if numpy_scalars
                && matches!(value, PickleValue::None)
                && ESTIMATED_PARAMETERS.iter().any(|p| p.name() == name) =>
            {
                return Err(numpy_scalar_error(path).with_context("key", name));
            }
            None => warn!(path = %path.display(), key = %name, "skipping non-numeric entry"),
        }
    }
    Ok(map)
}

fn from_json(path: &Path) -> Result<BTreeMap<String, f64>, EmriError> {
    let raw = fs::read_to_string(path).map_err(|err| EmriError::io("input-missing", path, err))?;
    let document: JsonValue = serde_json::from_str(&raw).map_err(|err| {
        EmriError::Format(
            ErrorInfo::new("json-decode", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    let JsonValue::Object(entries) = document else {
        return Err(EmriError::Format(
            ErrorInfo::new("json-decode", "expected a JSON object")
                .with_context("path", path.display().to_string()),
        ));
    };
    let mut map = BTreeMap::new();
    for (name, value) in entries {
        match value.as_f64() {
            Some(number) => {
                map.insert(name, number);
            }
            None => warn!(path = %path.display(), key = %name, "skipping non-numeric entry"),
        }
    }
    Ok(map)
}

/// Loads a `name -> value` mapping; `.json` files are parsed as JSON, every
/// other extension as a pickle.
pub fn load_parameter_map(path: &Path) -> Result<BTreeMap<String, f64>, EmriError> {
    if !path.is_file() {
        return Err(EmriError::io("input-missing", path, "file not found"));
    }
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        from_json(path)
    } else {
        from_pickle(path)
    }
}

/// Values of the estimated parameters, in catalogue order.
pub fn true_values_from_map(map: &BTreeMap<String, f64>) -> Result<Vec<f64>, EmriError> {
    ESTIMATED_PARAMETERS
        .iter()
        .map(|parameter| {
            map.get(parameter.name()).copied().ok_or_else(|| {
                EmriError::Config(
                    ErrorInfo::new("truth-missing", "true value missing for parameter")
                        .with_context("parameter", parameter.name()),
                )
            })
        })
        .collect()
}

/// [`load_parameter_map`] followed by [`true_values_from_map`].
pub fn load_true_values(path: &Path) -> Result<Vec<f64>, EmriError> {
    true_values_from_map(&load_parameter_map(path)?)
        .map_err(|err| err.with_context("path", path.display().to_string()))
}
