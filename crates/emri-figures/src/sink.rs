//! Destinations for rendered figures.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use emri_core::{EmriError, ErrorInfo};
use tracing::info;

use crate::figure::{Figure, FigureConfig};
use crate::svg::render_svg;

/// Receives named figures. Names carry no extension.
pub trait FigureSink {
    /// Renders and stores `figure`; returns where it went.
    fn emit(&mut self, name: &str, figure: &Figure) -> Result<PathBuf, EmriError>;
}

fn check_name(name: &str) -> Result<(), EmriError> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(EmriError::Render(
            ErrorInfo::new("figure-name", "figure names must be plain file stems")
                .with_context("name", name),
        ));
    }
    Ok(())
}

/// Writes `<dir>/<name>.svg`, replacing any existing file.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    config: FigureConfig,
}

impl DirectorySink {
    /// Sink writing into `dir`, created on first use.
    pub fn new(dir: impl Into<PathBuf>, config: FigureConfig) -> Self {
        Self {
            dir: dir.into(),
            config,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl FigureSink for DirectorySink {
    fn emit(&mut self, name: &str, figure: &Figure) -> Result<PathBuf, EmriError> {
        check_name(name)?;
        fs::create_dir_all(&self.dir)
            .map_err(|err| EmriError::io("figure-dir", &self.dir, err))?;
        let path = self.dir.join(format!("{name}.svg"));
        let svg = render_svg(figure, &self.config)?;
        fs::write(&path, svg).map_err(|err| EmriError::io("figure-write", &path, err))?;
        info!(path = %path.display(), "wrote figure");
        Ok(path)
    }
}

/// Keeps rendered SVG in memory, keyed by figure name.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    config: FigureConfig,
    figures: BTreeMap<String, String>,
}

impl MemorySink {
    /// Empty sink rendering at `config`.
    pub fn new(config: FigureConfig) -> Self {
        Self {
            config,
            figures: BTreeMap::new(),
        }
    }

    /// SVG text of the figure emitted as `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.figures.get(name).map(String::as_str)
    }

    /// Emitted names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.figures.keys().map(String::as_str).collect()
    }

    /// Number of stored figures.
    pub fn len(&self) -> usize {
        self.figures.len()
    }

    /// Whether nothing was emitted yet.
    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}

impl FigureSink for MemorySink {
    fn emit(&mut self, name: &str, figure: &Figure) -> Result<PathBuf, EmriError> {
        check_name(name)?;
        let svg = render_svg(figure, &self.config)?;
        self.figures.insert(name.to_string(), svg);
        Ok(PathBuf::from(format!("{name}.svg")))
    }
}
