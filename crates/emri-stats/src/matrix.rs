use emri_core::{EmriError, ErrorInfo};
use nalgebra::DMatrix;
use ndarray::{Array2, ArrayView1};

/// Square Fisher information matrix over the estimated parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FisherMatrix {
    matrix: DMatrix<f64>,
}

impl FisherMatrix {
    /// Wraps a matrix after checking it is square and finite.
    pub fn new(matrix: DMatrix<f64>) -> Result<Self, EmriError> {
        if matrix.nrows() != matrix.ncols() {
            return Err(EmriError::shape(
                "fisher-square",
                format!("({0}, {0})", matrix.nrows()),
                format!("({}, {})", matrix.nrows(), matrix.ncols()),
            ));
        }
        if matrix.nrows() == 0 {
            return Err(EmriError::Shape(ErrorInfo::new(
                "fisher-empty",
                "Fisher matrix has no parameters",
            )));
        }
        if matrix.iter().any(|value| !value.is_finite()) {
            return Err(EmriError::LinAlg(ErrorInfo::new(
                "fisher-non-finite",
                "Fisher matrix contains NaN or infinite entries",
            )));
        }
        Ok(Self { matrix })
    }

    /// Builds a Fisher matrix from row vectors.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, EmriError> {
        let n = rows.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != n) {
            return Err(EmriError::shape("fisher-square", n, bad.len()));
        }
        Self::new(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Builds a Fisher matrix from a loaded two-dimensional array.
    pub fn from_array(array: &Array2<f64>) -> Result<Self, EmriError> {
        let (rows, cols) = array.dim();
        if rows != cols {
            return Err(EmriError::shape(
                "fisher-square",
                format!("({rows}, {rows})"),
                format!("({rows}, {cols})"),
            ));
        }
        Self::new(DMatrix::from_fn(rows, cols, |i, j| array[[i, j]]))
    }

    /// Number of parameters.
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Underlying matrix.
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    /// Whether every off-diagonal entry is exactly zero.
    pub fn is_diagonal(&self) -> bool {
        let n = self.dim();
        (0..n).all(|i| (0..n).all(|j| i == j || self.matrix[(i, j)] == 0.0))
    }
}

/// Per-background parameter biases, one row per glitch background.
#[derive(Debug, Clone, PartialEq)]
pub struct BiasArray {
    values: Array2<f64>,
}

impl BiasArray {
    /// Wraps a `(backgrounds, parameters)` array.
    pub fn new(values: Array2<f64>) -> Self {
        Self { values }
    }

    /// Builds a bias array from row vectors of equal length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, EmriError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(EmriError::shape("bias-rows", cols, bad.len()));
        }
        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let values = Array2::from_shape_vec((rows.len(), cols), flat)
            .map_err(|err| EmriError::Shape(ErrorInfo::new("bias-rows", err.to_string())))?;
        Ok(Self { values })
    }

    /// Number of glitch backgrounds (rows).
    pub fn backgrounds(&self) -> usize {
        self.values.nrows()
    }

    /// Number of parameters (columns).
    pub fn parameters(&self) -> usize {
        self.values.ncols()
    }

    /// Whether the array holds no backgrounds.
    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Raw values.
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consumes the wrapper.
    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }

    /// Bias vector of one background.
    pub fn row(&self, index: usize) -> Option<ArrayView1<'_, f64>> {
        (index < self.backgrounds()).then(|| self.values.row(index))
    }

    /// Fails unless the array has `expected` columns and at least one row.
    pub fn ensure_usable(&self, expected: usize) -> Result<(), EmriError> {
        if self.is_empty() {
            return Err(EmriError::Shape(
                ErrorInfo::new("bias-empty", "bias array holds no backgrounds")
                    .with_hint("summary statistics are undefined without backgrounds"),
            ));
        }
        if self.parameters() != expected {
            return Err(EmriError::shape(
                "bias-columns",
                expected,
                self.parameters(),
            ));
        }
        Ok(())
    }
}
