use std::path::{Path, PathBuf};

use emri_core::{EmriError, ErrorInfo};
use emri_io::{LoadedArray, NpyData};
use hdf5::{File, Group, H5Type};
use ndarray::ArrayD;

fn hdf5_error(code: &str, path: &Path, err: impl ToString) -> EmriError {
    EmriError::Export(
        ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
    )
}

/// Consolidated HDF5 output; truncated on creation.
pub struct Hdf5Output {
    path: PathBuf,
    file: File,
}

impl Hdf5Output {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: &Path) -> Result<Self, EmriError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| EmriError::io("hdf5-dir", parent, err))?;
        }
        let file = File::create(path).map_err(|err| hdf5_error("hdf5-create", path, err))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    /// Location of the file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn require_group(&self, group_path: &str) -> Result<Group, EmriError> {
        let mut group = self
            .file
            .as_group()
            .map_err(|err| hdf5_error("hdf5-group", &self.path, err))?;
        for part in group_path.split('/').filter(|part| !part.is_empty() && *part != ".") {
            group = if group.link_exists(part) {
                group.group(part)
            } else {
                group.create_group(part)
            }
            .map_err(|err| hdf5_error("hdf5-group", &self.path, err).with_context("group", group_path))?;
        }
        Ok(group)
    }

    fn write<T: H5Type>(&self, group: &Group, name: &str, data: &ArrayD<T>) -> Result<(), EmriError> {
        group
            .new_dataset_builder()
            .with_data(data)
            .create(name)
            .map(|_| ())
            .map_err(|err| hdf5_error("hdf5-dataset", &self.path, err).with_context("dataset", name))
    }

    /// Stores `array` as `<group_path>/<name>`, replacing any existing
    /// dataset at that path. Returns the dataset path.
    pub fn add(&self, group_path: &str, name: &str, array: &LoadedArray) -> Result<String, EmriError> {
        let group = self.require_group(group_path)?;
        if group.link_exists(name) {
            group
                .unlink(name)
                .map_err(|err| hdf5_error("hdf5-dataset", &self.path, err).with_context("dataset", name))?;
        }
        match &array.data {
            NpyData::Float(data) => self.write(&group, name, data)?,
            NpyData::Int(data) => self.write(&group, name, data)?,
            NpyData::UInt(data) => self.write(&group, name, data)?,
            NpyData::Bool(data) => self.write(&group, name, data)?,
        }
        let trimmed = group_path.trim_matches('/');
        Ok(if trimmed.is_empty() || trimmed == "." {
            name.to_string()
        } else {
            format!("{trimmed}/{name}")
        })
    }
}
