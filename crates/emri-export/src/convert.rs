use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use emri_core::{EmriError, ErrorInfo};
use emri_io::{read_npy_any, read_npz_entries, LoadedArray};
use serde::Serialize;
use tracing::{debug, info};

use crate::discover::discover_files;
use crate::floatfmt::FloatFormat;
use crate::text::{table_dims, write_text};

/// Message of the error raised when HDF5 output is requested from a build
/// without the `hdf5` feature.
pub const HDF5_MISSING_MESSAGE: &str = "HDF5 support is not compiled in but --format includes hdf5";

/// Which outputs a conversion writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Delimited text only.
    #[default]
    Text,
    /// One consolidated HDF5 file only.
    Hdf5,
    /// Text files and the HDF5 file.
    Both,
}

impl OutputFormat {
    /// Whether delimited text files are written.
    pub fn writes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    /// Whether the HDF5 file is written.
    pub fn writes_hdf5(self) -> bool {
        matches!(self, OutputFormat::Hdf5 | OutputFormat::Both)
    }
}

impl FromStr for OutputFormat {
    type Err = EmriError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "text" => Ok(OutputFormat::Text),
            "hdf5" => Ok(OutputFormat::Hdf5),
            "both" => Ok(OutputFormat::Both),
            other => Err(EmriError::Config(
                ErrorInfo::new("output-format", format!("unknown output format `{other}`"))
                    .with_hint("expected one of: text, hdf5, both"),
            )),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Text => "text",
            OutputFormat::Hdf5 => "hdf5",
            OutputFormat::Both => "both",
        })
    }
}

/// Column separator of text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// `,`
    #[default]
    Comma,
    /// A tab character.
    Tab,
    /// A single space.
    Space,
}

impl Delimiter {
    /// The separator byte.
    pub fn as_byte(self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
            Delimiter::Space => b' ',
        }
    }
}

impl FromStr for Delimiter {
    type Err = EmriError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "," | "comma" => Ok(Delimiter::Comma),
            "tab" | "\t" => Ok(Delimiter::Tab),
            "space" | " " => Ok(Delimiter::Space),
            other => Err(EmriError::Config(
                ErrorInfo::new("delimiter", format!("unknown delimiter `{other}`"))
                    .with_hint("expected one of: ',', tab, space"),
            )),
        }
    }
}

impl Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "tab",
            Delimiter::Space => "space",
        })
    }
}

/// Inputs of [`convert`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Directory searched recursively.
    pub root: PathBuf,
    /// File name patterns, matched at any depth.
    pub patterns: Vec<String>,
    /// Destination of text files (and of `data.h5` by default).
    pub outdir: PathBuf,
    /// Outputs to write.
    pub format: OutputFormat,
    /// Text column separator.
    pub delimiter: Delimiter,
    /// Format applied to floating point elements.
    pub float_format: FloatFormat,
    /// Explicit HDF5 file location.
    pub hdf5_path: Option<PathBuf>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            patterns: vec!["*.npy".to_string(), "*.npz".to_string()],
            outdir: PathBuf::from("exports"),
            format: OutputFormat::default(),
            delimiter: Delimiter::default(),
            float_format: FloatFormat::default(),
            hdf5_path: None,
        }
    }
}

impl ConversionOptions {
    /// Where the HDF5 file goes: `hdf5_path` or `<outdir>/data.h5`.
    pub fn resolved_hdf5_path(&self) -> PathBuf {
        self.hdf5_path
            .clone()
            .unwrap_or_else(|| self.outdir.join("data.h5"))
    }
}

/// One exported array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedArray {
    /// `.npz` member name; `None` for `.npy` files.
    pub key: Option<String>,
    /// Source shape.
    pub shape: Vec<usize>,
    /// Source dtype.
    pub dtype: String,
    /// Rows of the text table.
    pub rows: usize,
    /// Columns of the text table.
    pub cols: usize,
    /// Text file written, if any.
    pub text_path: Option<PathBuf>,
    /// HDF5 dataset path written, if any.
    pub hdf5_dataset: Option<String>,
}

/// All arrays exported from one source file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertedFile {
    /// Source file.
    pub source: PathBuf,
    /// Exported arrays in file order.
    pub arrays: Vec<ConvertedArray>,
}

/// Outcome of [`convert`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConversionReport {
    /// Files that matched the patterns (outdir excluded).
    pub matched: usize,
    /// Per file results.
    pub converted: Vec<ConvertedFile>,
    /// HDF5 file written, if any.
    pub hdf5_path: Option<PathBuf>,
}

impl ConversionReport {
    /// Number of text files written.
    pub fn text_outputs(&self) -> usize {
        self.converted
            .iter()
            .flat_map(|file| &file.arrays)
            .filter(|array| array.text_path.is_some())
            .count()
    }
}

#[cfg(feature = "hdf5")]
type Hdf5Target = crate::hdf5_out::Hdf5Output;

#[cfg(not(feature = "hdf5"))]
enum Hdf5Target {}

#[cfg(feature = "hdf5")]
fn open_hdf5(path: &Path) -> Result<Hdf5Target, EmriError> {
    Hdf5Target::create(path)
}

#[cfg(not(feature = "hdf5"))]
fn open_hdf5(_path: &Path) -> Result<Hdf5Target, EmriError> {
    Err(hdf5_unavailable())
}

#[cfg(feature = "hdf5")]
fn store_hdf5(
    target: &Hdf5Target,
    group: &str,
    name: &str,
    array: &LoadedArray,
) -> Result<String, EmriError> {
    target.add(group, name, array)
}

#[cfg(not(feature = "hdf5"))]
fn store_hdf5(
    target: &Hdf5Target,
    _group: &str,
    _name: &str,
    _array: &LoadedArray,
) -> Result<String, EmriError> {
    match *target {}
}

fn hdf5_unavailable() -> EmriError {
    EmriError::Config(
        ErrorInfo::new("hdf5-unavailable", HDF5_MISSING_MESSAGE)
            .with_hint("rebuild with `--features hdf5` or use --format text"),
    )
}

fn relative_parent(source: &Path, root: &Path) -> PathBuf {
    source
        .strip_prefix(root)
        .unwrap_or(source)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

fn group_path(rel_parent: &Path) -> String {
    rel_parent
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn load_members(source: &Path) -> Result<Vec<(Option<String>, LoadedArray)>, EmriError> {
    let is_npz = source
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("npz"));
    if is_npz {
        Ok(read_npz_entries(source)?
            .into_iter()
            .map(|(key, array)| (Some(key), array))
            .collect())
    } else {
        Ok(vec![(None, read_npy_any(source)?)])
    }
}

struct Converter<'a> {
    options: &'a ConversionOptions,
    hdf5: Option<Hdf5Target>,
}

impl Converter<'_> {
    fn convert_file(&self, source: &Path) -> Result<ConvertedFile, EmriError> {
        let rel_parent = relative_parent(source, &self.options.root);
        let group = group_path(&rel_parent);
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut arrays = Vec::new();
        for (key, array) in load_members(source)? {
            let name = match &key {
                Some(key) => format!("{stem}__{key}"),
                None => stem.clone(),
            };
            let (rows, cols) = table_dims(array.shape());
            let text_path = if self.options.format.writes_text() {
                let out = self.options.outdir.join(&rel_parent).join(format!("{name}.csv"));
                write_text(
                    &array,
                    &out,
                    self.options.delimiter.as_byte(),
                    &self.options.float_format,
                )?;
                debug!(path = %out.display(), rows, cols, "wrote text table");
                Some(out)
            } else {
                None
            };
            let hdf5_dataset = match &self.hdf5 {
                Some(target) => Some(store_hdf5(target, &group, &name, &array)?),
                None => None,
            };
            arrays.push(ConvertedArray {
                key,
                shape: array.shape().to_vec(),
                dtype: array.dtype.to_string(),
                rows,
                cols,
                text_path,
                hdf5_dataset,
            });
        }
        Ok(ConvertedFile {
            source: source.to_path_buf(),
            arrays,
        })
    }
}

/// Converts every matching `.npy` / `.npz` file below `options.root`.
///
/// HDF5 availability is checked before anything touches the filesystem.
pub fn convert(options: &ConversionOptions) -> Result<ConversionReport, EmriError> {
    if options.format.writes_hdf5() && !emri_io::HDF5_ENABLED {
        return Err(hdf5_unavailable());
    }
    fs::create_dir_all(&options.outdir)
        .map_err(|err| EmriError::io("outdir", &options.outdir, err))?;

    let hdf5_path = options
        .format
        .writes_hdf5()
        .then(|| options.resolved_hdf5_path());
    let hdf5 = hdf5_path.as_deref().map(open_hdf5).transpose()?;

    let files = discover_files(&options.root, &options.patterns, Some(&options.outdir))?;
    let mut report = ConversionReport {
        matched: files.len(),
        converted: Vec::with_capacity(files.len()),
        hdf5_path: hdf5_path.clone(),
    };
    if files.is_empty() {
        info!("No files matched; check --root and --patterns.");
        return Ok(report);
    }
    info!(count = files.len(), "found files, converting");

    let converter = Converter { options, hdf5 };
    for source in &files {
        let converted = converter
            .convert_file(source)
            .map_err(|err| err.with_context("source", source.display().to_string()))?;
        info!(
            path = %source.strip_prefix(&options.root).unwrap_or(source).display(),
            "converted"
        );
        report.converted.push(converted);
    }
    if let Some(path) = &hdf5_path {
        info!(path = %path.display(), "HDF5 written");
    }
    if options.format.writes_text() {
        info!(outdir = %options.outdir.display(), "text files written");
    }
    Ok(report)
}
