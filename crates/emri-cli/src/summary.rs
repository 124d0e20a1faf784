//! JSON summaries written next to every figure.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use emri_core::{EmriError, ErrorInfo};
use serde::Serialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::info;

fn serde_error(code: &str, err: impl ToString) -> EmriError {
    EmriError::Format(ErrorInfo::new(code, err.to_string()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let ordered = map
                .into_iter()
                .map(|(key, value)| (key, canonicalize(value)))
                .collect::<BTreeMap<_, _>>();
            Value::Object(Map::from_iter(ordered))
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Serializes a value into canonical JSON bytes with deterministic ordering.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, EmriError> {
    let value = serde_json::to_value(value).map_err(|err| serde_error("json-encode", err))?;
    serde_json::to_vec(&canonicalize(value)).map_err(|err| serde_error("json-write", err))
}

/// Hex SHA-256 of the canonical JSON form of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, EmriError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(hex::encode(Sha256::digest(bytes)))
}

/// Hex SHA-256 of the file at `path`, read in fixed-size chunks so large
/// chains and Fisher arrays never sit in memory whole.
pub fn file_sha256(path: &Path) -> Result<String, EmriError> {
    let mut file = File::open(path).map_err(|err| EmriError::io("input-hash", path, err))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|err| EmriError::io("input-hash", path, err))?;
    Ok(hex::encode(hasher.finalize()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputRecord {
    pub path: String,
    pub sha256: String,
}

/// Which files a figure was computed from, and with which seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub inputs: Vec<InputRecord>,
    pub input_hash: String,
    pub seed: Option<u64>,
    pub version: String,
}

#[derive(Debug, Default)]
pub struct ProvenanceBuilder {
    inputs: Vec<InputRecord>,
    seed: Option<u64>,
}

impl ProvenanceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Hashes the bytes of `path` and records it as an input.
    pub fn record(&mut self, path: &Path) -> Result<(), EmriError> {
        let sha256 = file_sha256(path)?;
        self.inputs.push(InputRecord {
            path: path.display().to_string(),
            sha256,
        });
        Ok(())
    }

    pub fn finish(self) -> Result<Provenance, EmriError> {
        let input_hash = stable_hash_string(&self.inputs)?;
        Ok(Provenance {
            inputs: self.inputs,
            input_hash,
            seed: self.seed,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

#[derive(Debug, Serialize)]
struct SummaryFile<'a, T: Serialize> {
    figure: &'a str,
    data: &'a T,
    provenance: &'a Provenance,
}

/// Writes `<out_dir>/<name>.json` with keys in canonical order.
pub fn write_summary<T: Serialize>(
    out_dir: &Path,
    name: &str,
    data: &T,
    provenance: &Provenance,
) -> Result<PathBuf, EmriError> {
    fs::create_dir_all(out_dir).map_err(|err| EmriError::io("summary-dir", out_dir, err))?;
    let payload = SummaryFile {
        figure: name,
        data,
        provenance,
    };
    let value = serde_json::to_value(&payload).map_err(|err| serde_error("json-encode", err))?;
    let json = serde_json::to_string_pretty(&canonicalize(value))
        .map_err(|err| serde_error("json-write", err))?;
    let path = out_dir.join(format!("{name}.json"));
    fs::write(&path, json).map_err(|err| EmriError::io("summary-write", &path, err))?;
    info!(path = %path.display(), "wrote summary");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn canonical_bytes_ignore_insertion_order() {
        let mut first = Map::new();
        first.insert("b".into(), json!(1));
        first.insert("a".into(), json!({"y": 2, "x": 3}));
        let mut second = Map::new();
        second.insert("a".into(), json!({"x": 3, "y": 2}));
        second.insert("b".into(), json!(1));
        assert_eq!(
            to_canonical_json_bytes(&Value::Object(first)).unwrap(),
            to_canonical_json_bytes(&Value::Object(second)).unwrap()
        );
    }

    #[test]
    fn input_hash_tracks_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bias.npy");
        fs::write(&path, b"one").unwrap();
        let mut builder = ProvenanceBuilder::new().with_seed(1234);
        builder.record(&path).unwrap();
        let before = builder.finish().unwrap();

        fs::write(&path, b"two").unwrap();
        let mut builder = ProvenanceBuilder::new().with_seed(1234);
        builder.record(&path).unwrap();
        let after = builder.finish().unwrap();

        assert_eq!(before.input_hash.len(), 64);
        assert_ne!(before.input_hash, after.input_hash);
        assert_eq!(before.seed, Some(1234));
    }

    #[test]
    fn file_hash_streams_multi_chunk_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chain.json");
        let bytes: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &bytes).unwrap();
        assert_eq!(file_sha256(&path).unwrap(), hex::encode(Sha256::digest(&bytes)));
    }

    #[test]
    fn missing_input_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.npy");
        let err = ProvenanceBuilder::new().record(&path).unwrap_err();
        assert_eq!(err.info().code, "input-hash");
        assert_eq!(err.info().context["path"], path.display().to_string());
    }
}
