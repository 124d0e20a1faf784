use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use emri_core::{EmriError, ErrorInfo};
use emri_io::{LoadedArray, NpyData};
use ndarray::ArrayD;

use crate::floatfmt::FloatFormat;

/// Note appended to the header when a rank > 2 array is folded into rows.
pub const RESHAPE_NOTE: &str = " reshaped_to_rows=arr.shape[0], cols=product(remaining_dims)";

/// NumPy tuple notation of a shape: `()`, `(3,)`, `(2, 3)`.
pub fn shape_tuple(shape: &[usize]) -> String {
    match shape {
        [] => "()".to_string(),
        [only] => format!("({only},)"),
        dims => format!(
            "({})",
            dims.iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// Rows and columns of the written table for an array of `shape`.
///
/// Rank 0 and 1 arrays are one value per line; rank 2 keeps its shape; higher
/// ranks keep the leading axis and fold the rest into columns.
pub fn table_dims(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [n] => (*n, 1),
        [rows, rest @ ..] => (*rows, rest.iter().product()),
    }
}

fn cells<T>(array: &ArrayD<T>, render: impl Fn(&T) -> String) -> Vec<String> {
    array.iter().map(render).collect()
}

fn export_error(path: &Path, err: impl ToString) -> EmriError {
    EmriError::Export(
        ErrorInfo::new("text-write", err.to_string())
            .with_context("path", path.display().to_string()),
    )
}

/// Writes `array` as a delimited text table with a `# original_shape=...`
/// header. Returns the `(rows, cols)` written.
pub fn write_text(
    array: &LoadedArray,
    out_path: &Path,
    delimiter: u8,
    float_format: &FloatFormat,
) -> Result<(usize, usize), EmriError> {
    if let Some(parent) = out_path.parent() {
        fs::create_dir_all(parent).map_err(|err| EmriError::io("text-dir", parent, err))?;
    }
    let shape = array.shape().to_vec();
    let (rows, cols) = table_dims(&shape);
    let mut header = format!(
        "# original_shape={} dtype={}",
        shape_tuple(&shape),
        array.dtype
    );
    if shape.len() > 2 {
        header.push_str(RESHAPE_NOTE);
    }

    // Logical (row-major) order, so consecutive `cols` cells form one row.
    let values = match &array.data {
        NpyData::Float(data) => cells(data, |v| float_format.format(*v)),
        NpyData::Int(data) => cells(data, i64::to_string),
        NpyData::UInt(data) => cells(data, u64::to_string),
        NpyData::Bool(data) => cells(data, |v| if *v { "True" } else { "False" }.to_string()),
    };

    let mut file = File::create(out_path).map_err(|err| export_error(out_path, err))?;
    writeln!(file, "{header}").map_err(|err| export_error(out_path, err))?;
    if cols == 0 {
        // Rows without columns still get a line each.
        file.write_all(&b"\n".repeat(rows))
            .map_err(|err| export_error(out_path, err))?;
        return Ok((rows, cols));
    }
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Never)
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    for row in values.chunks(cols) {
        writer
            .write_record(row)
            .map_err(|err| export_error(out_path, err))?;
    }
    writer.flush().map_err(|err| export_error(out_path, err))?;
    Ok((rows, cols))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_print_as_tuples() {
        assert_eq!(shape_tuple(&[]), "()");
        assert_eq!(shape_tuple(&[4]), "(4,)");
        assert_eq!(shape_tuple(&[2, 3, 4]), "(2, 3, 4)");
    }

    #[test]
    fn higher_ranks_fold_into_columns() {
        assert_eq!(table_dims(&[5]), (5, 1));
        assert_eq!(table_dims(&[2, 3]), (2, 3));
        assert_eq!(table_dims(&[2, 3, 4]), (2, 12));
        assert_eq!(table_dims(&[0, 3, 4]), (0, 12));
    }
}
