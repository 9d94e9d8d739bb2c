//! Matrix properties: determinant

use matvec_core::{MatvecError, Number};

use crate::helpers::check_square;
use crate::types::Matrix;

/// Determinants with magnitude below this are reported as exactly zero and
/// mark the matrix as singular.
pub const SINGULAR_EPS: f64 = 1e-10;

/// Pivots smaller than this are treated as zero during exact elimination;
/// it sits well above the rounding residue of 50-digit arithmetic.
pub(crate) const EXACT_PIVOT_EPS: f64 = 1e-30;

/// Determinant of a square matrix. Singular matrices give zero, not an error.
pub fn determinant(m: &Matrix) -> Result<Number, MatvecError> {
    let det = raw_determinant(m)?;
    if det.is_negligible(SINGULAR_EPS) {
        Ok(Number::zero())
    } else {
        Ok(det)
    }
}

/// Determinant as computed, without snapping small values to zero.
/// Only the singularity test on a coefficient matrix applies `SINGULAR_EPS`.
pub(crate) fn raw_determinant(m: &Matrix) -> Result<Number, MatvecError> {
    check_square(m, "determinant")?;

    match m {
        Matrix::Exact(em) => exact_determinant(&em.data),
        Matrix::Float(fm) => Ok(Number::from_f64(fm.data.determinant())),
    }
}

/// Gaussian elimination with partial pivoting over Number
fn exact_determinant(data: &[Vec<Number>]) -> Result<Number, MatvecError> {
    let n = data.len();
    match n {
        1 => return Ok(data[0][0].clone()),
        2 => return Ok(data[0][0].mul(&data[1][1]).sub(&data[0][1].mul(&data[1][0]))),
        _ => {}
    }

    let mut a = data.to_vec();
    let mut det = Number::one();

    for k in 0..n {
        let pivot = (k + 1..n).fold(k, |best, i| if a[i][k].abs() > a[best][k].abs() { i } else { best });
        if a[pivot][k].is_negligible(EXACT_PIVOT_EPS) {
            return Ok(Number::zero());
        }
        if pivot != k {
            a.swap(pivot, k);
            det = det.neg();
        }
        det = det.mul(&a[k][k]);

        for i in k + 1..n {
            let factor = a[i][k].checked_div(&a[k][k])?;
            if factor.is_zero() {
                continue;
            }
            for j in k..n {
                let updated = a[i][j].sub(&factor.mul(&a[k][j]));
                a[i][j] = updated;
            }
        }
    }

    Ok(det)
}
