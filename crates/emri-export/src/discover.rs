use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use emri_core::{EmriError, ErrorInfo};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

fn glob_error(pattern: &str, err: impl ToString) -> EmriError {
    EmriError::Config(ErrorInfo::new("glob", err.to_string()).with_context("pattern", pattern))
}

/// Each pattern matches at any depth below the root, like `Path::rglob`.
fn build_globset(patterns: &[String]) -> Result<GlobSet, EmriError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let recursive = format!("**/{}", pattern.trim_start_matches("./"));
        let glob = GlobBuilder::new(&recursive)
            .literal_separator(true)
            .build()
            .map_err(|err| glob_error(pattern, err))?;
        builder.add(glob);
    }
    builder.build().map_err(|err| glob_error("*", err))
}

fn normalise(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Files below `root` matching any pattern, sorted and de-duplicated.
///
/// Anything inside `exclude` (the output directory) is skipped so repeated
/// runs never convert their own exports.
pub fn discover_files(
    root: &Path,
    patterns: &[String],
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, EmriError> {
    if !root.is_dir() {
        return Err(EmriError::io("root-missing", root, "search root is not a directory"));
    }
    let globset = build_globset(patterns)?;
    let excluded = exclude.map(absolute);
    let mut found = BTreeSet::new();
    for entry in WalkDir::new(root).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if !globset.is_match(normalise(rel)) {
            continue;
        }
        if let Some(excluded) = &excluded {
            if absolute(entry.path()).starts_with(excluded) {
                debug!(path = %entry.path().display(), "skipping exported file");
                continue;
            }
        }
        found.insert(entry.path().to_path_buf());
    }
    Ok(found.into_iter().collect())
}
