//! Failures of the glitch-bias toolkit.
//!
//! The variant names the stage that failed. Inside it, [`ErrorInfo`] carries
//! a stable code for scripts to match on, with paths, shapes and offending
//! values kept in the context map instead of the message.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code, message and context of one failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case identifier, stable across releases.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Paths, shapes and values involved, sorted by key.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How to fix it, when that is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records `key = value`, replacing an earlier value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Renders as `[code] message (key=value, ...); hint`.
impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut open = " (";
        for (key, value) in &self.context {
            write!(f, "{open}{key}={value}")?;
            open = ", ";
        }
        if !self.context.is_empty() {
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; {hint}"),
            None => Ok(()),
        }
    }
}

/// Error type of every fallible operation in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum EmriError {
    /// A preset name, threshold or configuration value was rejected.
    #[error("config {0}")]
    Config(ErrorInfo),
    /// An input could not be read or an output could not be written.
    #[error("io {0}")]
    Io(ErrorInfo),
    /// A file was read but its payload could not be decoded.
    #[error("format {0}")]
    Format(ErrorInfo),
    /// Array dimensions do not line up.
    #[error("shape {0}")]
    Shape(ErrorInfo),
    /// The Fisher matrix could not be inverted.
    #[error("linalg {0}")]
    LinAlg(ErrorInfo),
    /// Noise draws or resampling could not be produced.
    #[error("sampling {0}")]
    Sampling(ErrorInfo),
    /// A figure could not be drawn or stored.
    #[error("render {0}")]
    Render(ErrorInfo),
    /// Array conversion failed.
    #[error("export {0}")]
    Export(ErrorInfo),
}

impl EmriError {
    /// Stage that failed, as used in the serialized `family` tag.
    pub fn family(&self) -> &'static str {
        match self {
            Self::Config(_) => "Config",
            Self::Io(_) => "Io",
            Self::Format(_) => "Format",
            Self::Shape(_) => "Shape",
            Self::LinAlg(_) => "LinAlg",
            Self::Sampling(_) => "Sampling",
            Self::Render(_) => "Render",
            Self::Export(_) => "Export",
        }
    }

    /// Payload of any variant.
    pub fn info(&self) -> &ErrorInfo {
        let (Self::Config(info)
        | Self::Io(info)
        | Self::Format(info)
        | Self::Shape(info)
        | Self::LinAlg(info)
        | Self::Sampling(info)
        | Self::Render(info)
        | Self::Export(info)) = self;
        info
    }

    fn info_mut(&mut self) -> &mut ErrorInfo {
        let (Self::Config(info)
        | Self::Io(info)
        | Self::Format(info)
        | Self::Shape(info)
        | Self::LinAlg(info)
        | Self::Sampling(info)
        | Self::Render(info)
        | Self::Export(info)) = self;
        info
    }

    /// Records `key = value` without changing the stage.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info_mut().context.insert(key.into(), value.into());
        self
    }

    /// Filesystem failure on `path`.
    pub fn io(code: &str, path: &Path, err: impl Display) -> Self {
        Self::Io(ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()))
    }

    /// Dimension mismatch between what was `expected` and what was found.
    pub fn shape(code: &str, expected: impl Display, actual: impl Display) -> Self {
        Self::Shape(
            ErrorInfo::new(code, "array shape mismatch")
                .with_context("expected", expected.to_string())
                .with_context("actual", actual.to_string()),
        )
    }
}
