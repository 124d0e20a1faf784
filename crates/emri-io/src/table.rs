use std::fs;
use std::path::Path;

use emri_core::{EmriError, ErrorInfo};
use ndarray::Array2;

/// Reads a whitespace-delimited numeric table; `#` starts a comment.
pub fn read_text_table(path: &Path) -> Result<Array2<f64>, EmriError> {
    let raw = fs::read_to_string(path).map_err(|err| EmriError::io("input-missing", path, err))?;
    let mut width = None;
    let mut rows = 0;
    let mut values = Vec::new();
    for (line_no, line) in raw.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let before = values.len();
        for token in content.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| {
                EmriError::Format(
                    ErrorInfo::new("table-value", "not a number")
                        .with_context("path", path.display().to_string())
                        .with_context("line", (line_no + 1).to_string())
                        .with_context("token", token),
                )
            })?;
            values.push(value);
        }
        let count = values.len() - before;
        match width {
            None => width = Some(count),
            Some(expected) if expected != count => {
                return Err(EmriError::shape("table-columns", expected, count)
                    .with_context("path", path.display().to_string())
                    .with_context("line", (line_no + 1).to_string()));
            }
            Some(_) => {}
        }
        rows += 1;
    }
    let cols = width.unwrap_or(0);
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|err| EmriError::shape("table-columns", cols, err.to_string()))
}
