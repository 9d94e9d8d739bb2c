//! Helper functions for matrix operations

use matvec_core::{parse_cell, MatvecError, Number};

use crate::types::{Matrix, MatrixMode};

/// Parse a grid of cell text into a Matrix; `name` labels failing cells
/// (`A[1][0]`).
pub fn parse_grid<S: AsRef<str>>(name: &str, cells: &[Vec<S>], mode: MatrixMode) -> Result<Matrix, MatvecError> {
    if cells.is_empty() {
        return Err(MatvecError::shape_mismatch(format!("matrix {} cannot be empty", name)));
    }
    let cols = cells[0].len();
    if cols == 0 {
        return Err(MatvecError::shape_mismatch(format!("matrix {} has no columns", name)));
    }

    let mut data = Vec::with_capacity(cells.len());
    for (i, row) in cells.iter().enumerate() {
        if row.len() != cols {
            return Err(MatvecError::shape_mismatch(format!(
                "matrix {}: row {} has {} columns, expected {}",
                name,
                i,
                row.len(),
                cols
            )));
        }
        let parsed = row
            .iter()
            .enumerate()
            .map(|(j, text)| parse_cell(text.as_ref(), format!("{}[{}][{}]", name, i, j)))
            .collect::<Result<Vec<_>, _>>()?;
        data.push(parsed);
    }

    Matrix::from_rows(data, mode)
}

/// Parse the right-hand side vector of a linear system
pub fn parse_column<S: AsRef<str>>(name: &str, cells: &[S]) -> Result<Vec<Number>, MatvecError> {
    if cells.is_empty() {
        return Err(MatvecError::shape_mismatch(format!("vector {} cannot be empty", name)));
    }
    cells
        .iter()
        .enumerate()
        .map(|(i, text)| parse_cell(text.as_ref(), format!("{}[{}]", name, i)))
        .collect()
}

/// Check that two matrices have compatible dimensions for multiplication
pub fn check_matmul_dims(a: &Matrix, b: &Matrix, op: &str) -> Result<(), MatvecError> {
    if a.cols() != b.rows() {
        return Err(MatvecError::shape_mismatch(format!(
            "{}: columns of A must equal rows of B, got {}×{} and {}×{}",
            op,
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Ok(())
}

/// Check that two matrices have the same dimensions
pub fn check_same_dims(a: &Matrix, b: &Matrix, op: &str) -> Result<(), MatvecError> {
    if a.rows() != b.rows() || a.cols() != b.cols() {
        return Err(MatvecError::shape_mismatch(format!(
            "{}: matrices must have the same size, got {}×{} and {}×{}",
            op,
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        )));
    }
    Ok(())
}

/// Check that a matrix is square
pub fn check_square(m: &Matrix, op: &str) -> Result<(), MatvecError> {
    if !m.is_square() {
        return Err(MatvecError::shape_mismatch(format!(
            "{}: requires a square matrix, got {}×{}",
            op,
            m.rows(),
            m.cols()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use matvec_core::ErrorCode;

    #[test]
    fn test_parse_grid_with_fractions() {
        let cells = vec![vec!["1/2", "2"], vec!["", "-0.25"]];
        let m = parse_grid("A", &cells, MatrixMode::Auto).unwrap();
        assert_eq!(m.get(0, 0).and_then(|n| n.to_f64()), Some(0.5));
        assert_eq!(m.get(1, 0).and_then(|n| n.to_f64()), Some(0.0));
        assert_eq!(m.get(1, 1).and_then(|n| n.to_f64()), Some(-0.25));
    }

    #[test]
    fn test_parse_grid_reports_cell() {
        let cells = vec![vec!["1", "2"], vec!["3", "four"]];
        let err = parse_grid("B", &cells, MatrixMode::Auto).unwrap_err();
        assert_eq!(err.code, ErrorCode::ParseError);
        assert_eq!(err.cell.as_deref(), Some("B[1][1]"));
    }

    #[test]
    fn test_parse_grid_rejects_ragged() {
        let cells = vec![vec!["1", "2"], vec!["3"]];
        let err = parse_grid("A", &cells, MatrixMode::Auto).unwrap_err();
        assert_eq!(err.code, ErrorCode::ShapeMismatch);
        let empty: Vec<Vec<&str>> = vec![];
        assert!(parse_grid("A", &empty, MatrixMode::Auto).is_err());
    }

    #[test]
    fn test_parse_column() {
        let b = parse_column("b", &["4", "6/3"]).unwrap();
        assert_eq!(b[1].to_f64(), Some(2.0));
        let err = parse_column("b", &["1", "x"]).unwrap_err();
        assert_eq!(err.cell.as_deref(), Some("b[1]"));
        let none: [&str; 0] = [];
        assert!(parse_column("b", &none).is_err());
    }

    #[test]
    fn test_dimension_checks() {
        let a = Matrix::zeros(2, 3).unwrap();
        let b = Matrix::zeros(3, 2).unwrap();
        assert!(check_matmul_dims(&a, &b, "multiply").is_ok());
        assert!(check_same_dims(&a, &b, "add").is_err());
        assert!(check_square(&a, "determinant").is_err());
        assert!(check_square(&Matrix::identity(2).unwrap(), "determinant").is_ok());
    }
}
