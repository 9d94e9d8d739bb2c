//! Matrix operations: arithmetic, transformations, inverse

use matvec_core::{MatvecError, Number};
use nalgebra::DVector;

use crate::helpers::{check_matmul_dims, check_same_dims, check_square};
use crate::props::{determinant, EXACT_PIVOT_EPS};
use crate::types::{ExactMatrix, Matrix};

fn exact(data: Vec<Vec<Number>>) -> Matrix {
    let rows = data.len();
    let cols = data.first().map_or(0, |r| r.len());
    Matrix::Exact(ExactMatrix { data, rows, cols })
}

fn elementwise(a: &Matrix, b: &Matrix, f: impl Fn(&Number, &Number) -> Number, g: impl Fn(f64, f64) -> f64) -> Matrix {
    match (a, b) {
        (Matrix::Exact(ea), Matrix::Exact(eb)) => exact(
            ea.data
                .iter()
                .zip(&eb.data)
                .map(|(ra, rb)| ra.iter().zip(rb).map(|(x, y)| f(x, y)).collect())
                .collect(),
        ),
        _ => Matrix::from_dmatrix(a.to_dmatrix().zip_map(&b.to_dmatrix(), g)),
    }
}

// ============ add / subtract ============

pub fn add(a: &Matrix, b: &Matrix) -> Result<Matrix, MatvecError> {
    check_same_dims(a, b, "add")?;
    Ok(elementwise(a, b, |x, y| x.add(y), |x, y| x + y))
}

pub fn subtract(a: &Matrix, b: &Matrix) -> Result<Matrix, MatvecError> {
    check_same_dims(a, b, "subtract")?;
    Ok(elementwise(a, b, |x, y| x.sub(y), |x, y| x - y))
}

// ============ multiply ============

/// Row-by-column product; requires `cols(a) == rows(b)`
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, MatvecError> {
    check_matmul_dims(a, b, "multiply")?;

    match (a, b) {
        (Matrix::Exact(ea), Matrix::Exact(eb)) => {
            let data = (0..ea.rows)
                .map(|i| {
                    (0..eb.cols)
                        .map(|j| {
                            (0..ea.cols).fold(Number::zero(), |acc, k| acc.add(&ea.data[i][k].mul(&eb.data[k][j])))
                        })
                        .collect()
                })
                .collect();
            Ok(exact(data))
        }
        _ => Ok(Matrix::from_dmatrix(a.to_dmatrix() * b.to_dmatrix())),
    }
}

/// Matrix-vector product `m · x`
pub fn matrix_vector(m: &Matrix, x: &[Number]) -> Result<Vec<Number>, MatvecError> {
    if m.cols() != x.len() {
        return Err(MatvecError::shape_mismatch(format!(
            "matrix-vector product: {}×{} matrix with vector of length {}",
            m.rows(),
            m.cols(),
            x.len()
        )));
    }

    match m {
        Matrix::Exact(em) => Ok(em
            .data
            .iter()
            .map(|row| row.iter().zip(x).fold(Number::zero(), |acc, (a, b)| acc.add(&a.mul(b))))
            .collect()),
        Matrix::Float(fm) => {
            let xf = DVector::from_iterator(x.len(), x.iter().map(|n| n.to_f64().unwrap_or(f64::NAN)));
            let y = &fm.data * xf;
            Ok(y.iter().map(|&v| Number::from_f64(v)).collect())
        }
    }
}

// ============ transpose / scale ============

pub fn transpose(m: &Matrix) -> Matrix {
    match m {
        Matrix::Exact(em) => exact(
            (0..em.cols)
                .map(|j| (0..em.rows).map(|i| em.data[i][j].clone()).collect())
                .collect(),
        ),
        Matrix::Float(fm) => Matrix::from_dmatrix(fm.data.transpose()),
    }
}

pub fn scalar_multiply(m: &Matrix, k: &Number) -> Matrix {
    match m {
        Matrix::Exact(em) => exact(
            em.data
                .iter()
                .map(|row| row.iter().map(|x| x.mul(k)).collect())
                .collect(),
        ),
        Matrix::Float(fm) => {
            let kf = k.to_f64().unwrap_or(f64::NAN);
            Matrix::from_dmatrix(fm.data.map(|x| x * kf))
        }
    }
}

// ============ inverse ============

/// Inverse of a square, non-singular matrix
pub fn inverse(m: &Matrix) -> Result<Matrix, MatvecError> {
    check_square(m, "inverse")?;
    if determinant(m)?.is_zero() {
        return Err(MatvecError::singular("inverse: matrix is singular, |A| = 0"));
    }
    invert_nonsingular(m)
}

/// Inverse of a square matrix whose determinant the caller already checked.
/// Elimination still reports `SINGULAR` on a vanishing pivot.
pub(crate) fn invert_nonsingular(m: &Matrix) -> Result<Matrix, MatvecError> {
    match m {
        Matrix::Exact(em) => exact_inverse(&em.data),
        Matrix::Float(fm) => fm
            .data
            .clone()
            .try_inverse()
            .map(Matrix::from_dmatrix)
            .ok_or_else(|| MatvecError::singular("inverse: matrix is singular")),
    }
}

/// Gauss-Jordan elimination on [A | I]
fn exact_inverse(data: &[Vec<Number>]) -> Result<Matrix, MatvecError> {
    let n = data.len();
    let mut aug: Vec<Vec<Number>> = data
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut r = row.clone();
            r.extend((0..n).map(|j| if i == j { Number::one() } else { Number::zero() }));
            r
        })
        .collect();

    for k in 0..n {
        let pivot = (k + 1..n).fold(k, |best, i| if aug[i][k].abs() > aug[best][k].abs() { i } else { best });
        if aug[pivot][k].is_negligible(EXACT_PIVOT_EPS) {
            return Err(MatvecError::singular("inverse: matrix is singular"));
        }
        aug.swap(pivot, k);

        let p = aug[k][k].clone();
        for j in 0..2 * n {
            let scaled = aug[k][j].checked_div(&p)?;
            aug[k][j] = scaled;
        }

        for i in 0..n {
            if i == k || aug[i][k].is_zero() {
                continue;
            }
            let factor = aug[i][k].clone();
            for j in 0..2 * n {
                let updated = aug[i][j].sub(&factor.mul(&aug[k][j]));
                aug[i][j] = updated;
            }
        }
    }

    Ok(exact(aug.into_iter().map(|row| row[n..].to_vec()).collect()))
}
