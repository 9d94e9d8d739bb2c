//! Core matrix types

use std::fmt;

use matvec_core::{display, MatvecError, Number};
use nalgebra::DMatrix;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Largest side for which `MatrixMode::Auto` keeps exact arithmetic
pub const DEFAULT_EXACT_LIMIT: usize = 10;

/// Matrix computation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixMode {
    /// Use exact Number (DBig) arithmetic
    Exact,
    /// Use f64 floating point arithmetic
    Fast,
    /// Automatically choose based on size
    #[default]
    Auto,
}

impl MatrixMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "exact" => Some(MatrixMode::Exact),
            "fast" | "float" => Some(MatrixMode::Fast),
            "auto" => Some(MatrixMode::Auto),
            _ => None,
        }
    }

    fn use_exact(&self, rows: usize, cols: usize) -> bool {
        match self {
            MatrixMode::Exact => true,
            MatrixMode::Fast => false,
            MatrixMode::Auto => rows <= DEFAULT_EXACT_LIMIT && cols <= DEFAULT_EXACT_LIMIT,
        }
    }
}

/// A rectangular matrix using either exact or floating-point arithmetic.
///
/// Always at least 1×1 with every row the same length.
#[derive(Debug, Clone)]
pub enum Matrix {
    Exact(ExactMatrix),
    Float(FloatMatrix),
}

/// Matrix using exact Number arithmetic
#[derive(Debug, Clone)]
pub struct ExactMatrix {
    pub data: Vec<Vec<Number>>,
    pub rows: usize,
    pub cols: usize,
}

/// Matrix using f64 floating-point arithmetic
#[derive(Debug, Clone)]
pub struct FloatMatrix {
    pub data: DMatrix<f64>,
}

fn check_shape(rows: usize, cols: usize) -> Result<(), MatvecError> {
    if rows == 0 || cols == 0 {
        return Err(MatvecError::shape_mismatch(format!(
            "a {}×{} matrix is not allowed: both sides must be at least 1",
            rows, cols
        )));
    }
    Ok(())
}

impl Matrix {
    /// Create from rows, choosing the representation from `mode`
    pub fn from_rows(data: Vec<Vec<Number>>, mode: MatrixMode) -> Result<Self, MatvecError> {
        if data.is_empty() {
            return Err(MatvecError::shape_mismatch("matrix must have at least one row"));
        }

        let rows = data.len();
        let cols = data[0].len();
        if cols == 0 {
            return Err(MatvecError::shape_mismatch("matrix must have at least one column"));
        }

        for (i, row) in data.iter().enumerate() {
            if row.len() != cols {
                return Err(MatvecError::shape_mismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
        }

        if mode.use_exact(rows, cols) {
            Ok(Matrix::Exact(ExactMatrix { data, rows, cols }))
        } else {
            let float_data = DMatrix::from_fn(rows, cols, |i, j| data[i][j].to_f64().unwrap_or(f64::NAN));
            Ok(Matrix::Float(FloatMatrix { data: float_data }))
        }
    }

    /// Create from nalgebra DMatrix
    pub fn from_dmatrix(data: DMatrix<f64>) -> Self {
        Matrix::Float(FloatMatrix { data })
    }

    /// rows × cols of zeros
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, MatvecError> {
        check_shape(rows, cols)?;
        let data = vec![vec![Number::zero(); cols]; rows];
        Ok(Matrix::Exact(ExactMatrix { data, rows, cols }))
    }

    pub fn identity(n: usize) -> Result<Self, MatvecError> {
        check_shape(n, n)?;
        let data = (0..n)
            .map(|i| (0..n).map(|j| if i == j { Number::one() } else { Number::zero() }).collect())
            .collect();
        Ok(Matrix::Exact(ExactMatrix { data, rows: n, cols: n }))
    }

    pub fn rows(&self) -> usize {
        match self {
            Matrix::Exact(m) => m.rows,
            Matrix::Float(m) => m.data.nrows(),
        }
    }

    pub fn cols(&self) -> usize {
        match self {
            Matrix::Exact(m) => m.cols,
            Matrix::Float(m) => m.data.ncols(),
        }
    }

    pub fn is_square(&self) -> bool {
        self.rows() == self.cols()
    }

    pub fn is_exact(&self) -> bool {
        matches!(self, Matrix::Exact(_))
    }

    /// Get element at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Option<Number> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        match self {
            Matrix::Exact(m) => Some(m.data[row][col].clone()),
            Matrix::Float(m) => Some(Number::from_f64(m.data[(row, col)])),
        }
    }

    /// Replace one cell
    pub fn set(&mut self, row: usize, col: usize, value: Number) -> Result<(), MatvecError> {
        if row >= self.rows() || col >= self.cols() {
            return Err(MatvecError::shape_mismatch(format!(
                "index ({}, {}) out of bounds for {}×{} matrix",
                row,
                col,
                self.rows(),
                self.cols()
            )));
        }
        match self {
            Matrix::Exact(m) => m.data[row][col] = value,
            Matrix::Float(m) => m.data[(row, col)] = value.to_f64().unwrap_or(f64::NAN),
        }
        Ok(())
    }

    /// Change the shape, keeping every cell that still fits and padding new
    /// cells with zero.
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), MatvecError> {
        check_shape(rows, cols)?;
        match self {
            Matrix::Exact(m) => {
                m.data.truncate(rows);
                for row in m.data.iter_mut() {
                    row.resize(cols, Number::zero());
                }
                m.data.resize(rows, vec![Number::zero(); cols]);
                m.rows = rows;
                m.cols = cols;
            }
            Matrix::Float(m) => {
                let old = &m.data;
                let resized = DMatrix::from_fn(rows, cols, |i, j| {
                    if i < old.nrows() && j < old.ncols() {
                        old[(i, j)]
                    } else {
                        0.0
                    }
                });
                m.data = resized;
            }
        }
        Ok(())
    }

    /// Copy with column `col` replaced by `values`
    pub fn with_column(&self, col: usize, values: &[Number]) -> Result<Matrix, MatvecError> {
        if col >= self.cols() || values.len() != self.rows() {
            return Err(MatvecError::shape_mismatch(format!(
                "cannot place a column of length {} at index {} of a {}×{} matrix",
                values.len(),
                col,
                self.rows(),
                self.cols()
            )));
        }
        let mut out = self.clone();
        for (row, value) in values.iter().enumerate() {
            out.set(row, col, value.clone())?;
        }
        Ok(out)
    }

    /// Convert to f64 DMatrix (for nalgebra operations)
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        match self {
            Matrix::Float(m) => m.data.clone(),
            Matrix::Exact(m) => {
                DMatrix::from_fn(m.rows, m.cols, |i, j| m.data[i][j].to_f64().unwrap_or(f64::NAN))
            }
        }
    }

    /// Convert to rows of Numbers
    pub fn to_rows(&self) -> Vec<Vec<Number>> {
        match self {
            Matrix::Exact(m) => m.data.clone(),
            Matrix::Float(m) => (0..m.data.nrows())
                .map(|i| (0..m.data.ncols()).map(|j| Number::from_f64(m.data[(i, j)])).collect())
                .collect(),
        }
    }

    /// Rows of display strings (6 decimal places)
    pub fn to_display_rows(&self) -> Vec<Vec<String>> {
        match self {
            Matrix::Exact(m) => m
                .data
                .iter()
                .map(|row| row.iter().map(|n| n.to_string()).collect())
                .collect(),
            Matrix::Float(m) => (0..m.data.nrows())
                .map(|i| (0..m.data.ncols()).map(|j| display(m.data[(i, j)])).collect())
                .collect(),
        }
    }

    /// Elementwise comparison within `tol`
    pub fn approx_eq(&self, other: &Matrix, tol: f64) -> bool {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            return false;
        }
        let (a, b) = (self.to_dmatrix(), other.to_dmatrix());
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tol)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, row) in self.to_display_rows().iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}]", row.join(", "))?;
        }
        write!(f, "]")
    }
}

/// Serializes as rows of 6-place decimal strings
impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows = self.to_display_rows();
        let mut seq = serializer.serialize_seq(Some(rows.len()))?;
        for row in &rows {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: i64) -> Number {
        Number::from_i64(v)
    }

    fn two_by_two() -> Matrix {
        Matrix::from_rows(vec![vec![n(1), n(2)], vec![n(3), n(4)]], MatrixMode::Auto).unwrap()
    }

    #[test]
    fn test_matrix_creation() {
        let m = two_by_two();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 2);
        assert!(m.is_square());
        assert!(m.is_exact());
        assert_eq!(m.get(1, 1), Some(n(4)));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_ragged_and_empty_rejected() {
        assert!(Matrix::from_rows(vec![], MatrixMode::Auto).is_err());
        assert!(Matrix::from_rows(vec![vec![]], MatrixMode::Auto).is_err());
        let ragged = vec![vec![n(1), n(2)], vec![n(3)]];
        let err = Matrix::from_rows(ragged, MatrixMode::Auto).unwrap_err();
        assert_eq!(err.code, matvec_core::ErrorCode::ShapeMismatch);
    }

    #[test]
    fn test_matrix_mode() {
        let size = 15;
        let data: Vec<Vec<Number>> = (0..size)
            .map(|i| (0..size).map(|j| n((i * size + j) as i64)).collect())
            .collect();
        let m = Matrix::from_rows(data, MatrixMode::Auto).unwrap();
        assert!(!m.is_exact());
        assert_eq!(MatrixMode::from_str("FLOAT"), Some(MatrixMode::Fast));
        assert_eq!(MatrixMode::from_str("bogus"), None);
    }

    #[test]
    fn test_set_replaces_one_cell() {
        let mut m = two_by_two();
        m.set(0, 1, n(9)).unwrap();
        assert_eq!(m.get(0, 1), Some(n(9)));
        assert_eq!(m.get(0, 0), Some(n(1)));
        assert!(m.set(5, 0, n(1)).is_err());
    }

    #[test]
    fn test_resize_preserves_and_pads() {
        let mut m = two_by_two();
        m.resize(3, 3).unwrap();
        assert_eq!((m.rows(), m.cols()), (3, 3));
        assert_eq!(m.get(1, 0), Some(n(3)));
        assert_eq!(m.get(2, 2), Some(n(0)));
        assert_eq!(m.get(0, 2), Some(n(0)));

        m.resize(1, 2).unwrap();
        assert_eq!(m.to_rows(), vec![vec![n(1), n(2)]]);
        assert!(m.resize(0, 2).is_err());
    }

    #[test]
    fn test_resize_float_mode() {
        let data = vec![vec![n(1), n(2)], vec![n(3), n(4)]];
        let mut m = Matrix::from_rows(data, MatrixMode::Fast).unwrap();
        m.resize(2, 3).unwrap();
        assert_eq!(m.get(1, 1).and_then(|v| v.to_f64()), Some(4.0));
        assert_eq!(m.get(1, 2).and_then(|v| v.to_f64()), Some(0.0));
    }

    #[test]
    fn test_zero_sides_rejected_everywhere() {
        for (rows, cols) in [(0, 2), (2, 0), (0, 0)] {
            assert_eq!(Matrix::zeros(rows, cols).unwrap_err().code, matvec_core::ErrorCode::ShapeMismatch);
        }
        assert_eq!(Matrix::identity(0).unwrap_err().code, matvec_core::ErrorCode::ShapeMismatch);

        let z = Matrix::zeros(2, 3).unwrap();
        assert_eq!((z.rows(), z.cols()), (2, 3));
        assert_eq!(z.get(1, 2), Some(n(0)));
        let id = Matrix::identity(3).unwrap();
        assert_eq!((id.get(0, 0), id.get(0, 1), id.get(2, 2)), (Some(n(1)), Some(n(0)), Some(n(1))));
    }

    #[test]
    fn test_with_column() {
        let m = two_by_two();
        let replaced = m.with_column(1, &[n(7), n(8)]).unwrap();
        assert_eq!(replaced.to_rows(), vec![vec![n(1), n(7)], vec![n(3), n(8)]]);
        assert!(m.with_column(2, &[n(1), n(1)]).is_err());
        assert!(m.with_column(0, &[n(1)]).is_err());
    }

    #[test]
    fn test_serializes_as_display_strings() {
        let json = serde_json::to_value(two_by_two()).unwrap();
        assert_eq!(json, serde_json::json!([["1.000000", "2.000000"], ["3.000000", "4.000000"]]));
        assert_eq!(two_by_two().to_string(), "[[1.000000, 2.000000], [3.000000, 4.000000]]");
    }
}
