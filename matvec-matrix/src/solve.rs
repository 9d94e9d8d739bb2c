//! Linear system solvers: Cramer's rule and the inverse method
//!
//! Both take an n×n coefficient matrix `A` and a length-n vector `b` and
//! report a singular `A` as a regular outcome carrying `det(A)`, so callers
//! can still show the determinant alongside the diagnostic. Dimension
//! problems are errors.

use matvec_core::{MatvecError, Number};
use tracing::debug;

use crate::ops::{invert_nonsingular, matrix_vector};
use crate::props::{determinant, raw_determinant};
use crate::types::Matrix;

/// Cramer's rule intermediates and result
#[derive(Debug, Clone)]
pub struct CramerSolution {
    pub det_a: Number,
    /// `A_i`: A with column i replaced by b
    pub matrices: Vec<Matrix>,
    /// `det(A_i)`, same order as `matrices`
    pub dets: Vec<Number>,
    pub solution: Vec<Number>,
}

#[derive(Debug, Clone)]
pub enum CramerOutcome {
    Unique(CramerSolution),
    /// `det(A) = 0`: either no solution or infinitely many
    NoUniqueSolution { det_a: Number },
}

impl CramerOutcome {
    pub fn det_a(&self) -> &Number {
        match self {
            CramerOutcome::Unique(s) => &s.det_a,
            CramerOutcome::NoUniqueSolution { det_a } => det_a,
        }
    }

    /// Unique solution or `NO_UNIQUE_SOLUTION`
    pub fn into_result(self) -> Result<CramerSolution, MatvecError> {
        match self {
            CramerOutcome::Unique(s) => Ok(s),
            CramerOutcome::NoUniqueSolution { .. } => Err(MatvecError::no_unique_solution()),
        }
    }
}

/// Inverse method result
#[derive(Debug, Clone)]
pub struct InverseSolution {
    pub det_a: Number,
    pub inverse: Matrix,
    pub solution: Vec<Number>,
}

#[derive(Debug, Clone)]
pub enum InverseOutcome {
    Unique(InverseSolution),
    /// `det(A) = 0`, so A has no inverse
    Singular { det_a: Number },
}

impl InverseOutcome {
    pub fn det_a(&self) -> &Number {
        match self {
            InverseOutcome::Unique(s) => &s.det_a,
            InverseOutcome::Singular { det_a } => det_a,
        }
    }

    /// Unique solution or `SINGULAR`
    pub fn into_result(self) -> Result<InverseSolution, MatvecError> {
        match self {
            InverseOutcome::Unique(s) => Ok(s),
            InverseOutcome::Singular { .. } => Err(singular_system()),
        }
    }
}

fn singular_system() -> MatvecError {
    MatvecError::singular("the system has no unique solution: |A| = 0 and A has no inverse")
}

fn check_system(a: &Matrix, b: &[Number]) -> Result<(), MatvecError> {
    if !a.is_square() {
        return Err(MatvecError::shape_mismatch(format!(
            "the coefficient matrix must be square, got {}×{}",
            a.rows(),
            a.cols()
        )));
    }
    if b.len() != a.rows() {
        return Err(MatvecError::shape_mismatch(format!(
            "b has {} entries but A has {} rows",
            b.len(),
            a.rows()
        )));
    }
    Ok(())
}

/// Solve `Ax = b` by Cramer's rule: `x_i = det(A_i) / det(A)`
///
/// Only `det(A)` is snapped to zero below `SINGULAR_EPS`. Each `det(A_i)`
/// is used as computed, otherwise a small but real numerator would zero
/// its component.
pub fn cramer(a: &Matrix, b: &[Number]) -> Result<CramerOutcome, MatvecError> {
    check_system(a, b)?;

    let det_a = determinant(a)?;
    if det_a.is_zero() {
        debug!(n = a.rows(), "cramer: singular coefficient matrix");
        return Ok(CramerOutcome::NoUniqueSolution { det_a });
    }

    let n = a.cols();
    let mut matrices = Vec::with_capacity(n);
    let mut dets = Vec::with_capacity(n);
    let mut solution = Vec::with_capacity(n);

    for i in 0..n {
        let a_i = a.with_column(i, b)?;
        let det_i = raw_determinant(&a_i)?;
        solution.push(det_i.checked_div(&det_a)?);
        dets.push(det_i);
        matrices.push(a_i);
    }

    debug!(n, det_a = %det_a, "cramer: solved");
    Ok(CramerOutcome::Unique(CramerSolution {
        det_a,
        matrices,
        dets,
        solution,
    }))
}

/// Solve `Ax = b` as `x = A⁻¹ · b`
pub fn inverse_solve(a: &Matrix, b: &[Number]) -> Result<InverseOutcome, MatvecError> {
    check_system(a, b)?;

    let det_a = determinant(a)?;
    if det_a.is_zero() {
        debug!(n = a.rows(), "inverse_solve: singular coefficient matrix");
        return Ok(InverseOutcome::Singular { det_a });
    }

    let a_inv = invert_nonsingular(a)?;
    let solution = matrix_vector(&a_inv, b)?;

    Ok(InverseOutcome::Unique(InverseSolution {
        det_a,
        inverse: a_inv,
        solution,
    }))
}
