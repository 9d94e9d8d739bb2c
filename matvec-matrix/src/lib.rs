//! matvec Matrix - Linear Algebra and Linear Systems
//!
//! Provides the matrix side of the engine:
//! - Grid parsing (cell text to Matrix, with per-cell diagnostics)
//! - Basic operations (add, subtract, multiply, transpose, scalar multiply)
//! - Determinant and inverse
//! - Linear systems by Cramer's rule and by the inverse method
//!
//! Uses dual precision: exact Number arithmetic for small matrices (≤10×10),
//! f64 floating point for larger matrices.

mod helpers;
mod ops;
mod props;
mod solve;
mod types;

pub use helpers::{check_matmul_dims, check_same_dims, check_square, parse_column, parse_grid};
pub use ops::{add, inverse, matrix_vector, multiply, scalar_multiply, subtract, transpose};
pub use props::{determinant, SINGULAR_EPS};
pub use solve::{cramer, inverse_solve, CramerOutcome, CramerSolution, InverseOutcome, InverseSolution};
pub use types::{ExactMatrix, FloatMatrix, Matrix, MatrixMode, DEFAULT_EXACT_LIMIT};
