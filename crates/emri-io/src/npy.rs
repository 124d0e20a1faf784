//! Reading `.npy` and `.npz` payloads without knowing their dtype up front.
//!
//! `ndarray-npy` reads one element type at a time, so decoding walks a fixed
//! list of dtypes until the header descriptor matches.

use std::fs::File;
use std::path::Path;

use emri_core::{EmriError, ErrorInfo};
use ndarray::{ArrayD, IxDyn, OwnedRepr};
use ndarray_npy::{read_npy, NpzReader, ReadableElement};
use tracing::debug;

/// Element storage of a decoded array, widened to 64 bits.
#[derive(Debug, Clone, PartialEq)]
pub enum NpyData {
    /// `float32` / `float64`.
    Float(ArrayD<f64>),
    /// Signed integers.
    Int(ArrayD<i64>),
    /// Unsigned integers.
    UInt(ArrayD<u64>),
    /// Booleans.
    Bool(ArrayD<bool>),
}

/// A decoded array together with its on-disk dtype name.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedArray {
    /// NumPy dtype name (`float64`, `int32`, `bool`, ...).
    pub dtype: &'static str,
    /// Decoded elements.
    pub data: NpyData,
}

impl LoadedArray {
    /// Array shape.
    pub fn shape(&self) -> &[usize] {
        match &self.data {
            NpyData::Float(array) => array.shape(),
            NpyData::Int(array) => array.shape(),
            NpyData::UInt(array) => array.shape(),
            NpyData::Bool(array) => array.shape(),
        }
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Whether the elements are floating point.
    pub fn is_float(&self) -> bool {
        matches!(self.data, NpyData::Float(_))
    }

    /// Element-wise conversion to `f64` (booleans map to 0 / 1).
    pub fn to_f64(&self) -> ArrayD<f64> {
        match &self.data {
            NpyData::Float(array) => array.clone(),
            NpyData::Int(array) => array.mapv(|v| v as f64),
            NpyData::UInt(array) => array.mapv(|v| v as f64),
            NpyData::Bool(array) => array.mapv(|v| if v { 1.0 } else { 0.0 }),
        }
    }
}

trait ArraySource {
    fn read<T: ReadableElement>(&mut self) -> Result<ArrayD<T>, String>;
}

struct NpyFile<'a>(&'a Path);

impl ArraySource for NpyFile<'_> {
    fn read<T: ReadableElement>(&mut self) -> Result<ArrayD<T>, String> {
        read_npy::<_, ArrayD<T>>(self.0).map_err(|err| err.to_string())
    }
}

struct NpzMember<'a> {
    reader: &'a mut NpzReader<File>,
    index: usize,
}

impl ArraySource for NpzMember<'_> {
    fn read<T: ReadableElement>(&mut self) -> Result<ArrayD<T>, String> {
        self.reader
            .by_index::<OwnedRepr<T>, IxDyn>(self.index)
            .map_err(|err| err.to_string())
    }
}

macro_rules! attempt {
    ($source:expr, $last:ident, $ty:ty => $target:ty, $dtype:literal, $variant:ident) => {
        match $source.read::<$ty>() {
            Ok(array) => {
                return Ok(LoadedArray {
                    dtype: $dtype,
                    data: NpyData::$variant(array.mapv(|v| v as $target)),
                })
            }
            Err(err) => $last = err,
        }
    };
}

fn decode<S: ArraySource>(source: &mut S) -> Result<LoadedArray, String> {
    let mut last = String::new();
    attempt!(source, last, f64 => f64, "float64", Float);
    attempt!(source, last, f32 => f64, "float32", Float);
    attempt!(source, last, i64 => i64, "int64", Int);
    attempt!(source, last, i32 => i64, "int32", Int);
    attempt!(source, last, i16 => i64, "int16", Int);
    attempt!(source, last, i8 => i64, "int8", Int);
    attempt!(source, last, u64 => u64, "uint64", UInt);
    attempt!(source, last, u32 => u64, "uint32", UInt);
    attempt!(source, last, u16 => u64, "uint16", UInt);
    attempt!(source, last, u8 => u64, "uint8", UInt);
    attempt!(source, last, bool => bool, "bool", Bool);
    Err(last)
}

fn unsupported(path: &Path, reason: String) -> EmriError {
    EmriError::Format(
        ErrorInfo::new("npy-decode", reason)
            .with_context("path", path.display().to_string())
            .with_hint("only numeric and boolean dtypes are supported"),
    )
}

fn ensure_exists(path: &Path) -> Result<(), EmriError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(EmriError::io("input-missing", path, "file not found"))
    }
}

/// Reads a `.npy` file of any supported dtype.
pub fn read_npy_any(path: &Path) -> Result<LoadedArray, EmriError> {
    ensure_exists(path)?;
    let loaded = decode(&mut NpyFile(path)).map_err(|reason| unsupported(path, reason))?;
    debug!(path = %path.display(), dtype = loaded.dtype, shape = ?loaded.shape(), "read npy");
    Ok(loaded)
}

/// Reads every member of a `.npz` archive, keyed by member name without the
/// `.npy` suffix, in archive order.
pub fn read_npz_entries(path: &Path) -> Result<Vec<(String, LoadedArray)>, EmriError> {
    ensure_exists(path)?;
    let file = File::open(path).map_err(|err| EmriError::io("input-open", path, err))?;
    let mut reader = NpzReader::new(file).map_err(|err| unsupported(path, err.to_string()))?;
    let names = reader
        .names()
        .map_err(|err| unsupported(path, err.to_string()))?;
    let mut entries = Vec::with_capacity(names.len());
    for (index, raw) in names.iter().enumerate() {
        let key = raw.strip_suffix(".npy").unwrap_or(raw).to_string();
        let loaded = decode(&mut NpzMember {
            reader: &mut reader,
            index,
        })
        .map_err(|reason| {
            EmriError::Format(
                ErrorInfo::new("npy-decode", reason)
                    .with_context("path", path.display().to_string())
                    .with_context("key", key.clone()),
            )
        })?;
        entries.push((key, loaded));
    }
    Ok(entries)
}

/// Reads one `.npz` member; `key` may carry the `.npy` suffix or not.
pub fn read_npz_entry(path: &Path, key: &str) -> Result<LoadedArray, EmriError> {
    let wanted = key.strip_suffix(".npy").unwrap_or(key);
    let entries = read_npz_entries(path)?;
    let available: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
    entries
        .into_iter()
        .find(|(name, _)| name == wanted)
        .map(|(_, array)| array)
        .ok_or_else(|| {
            EmriError::Format(
                ErrorInfo::new("dataset-key", "archive has no member with this key")
                    .with_context("path", path.display().to_string())
                    .with_context("key", key)
                    .with_context("available", available.join(",")),
            )
        })
}
