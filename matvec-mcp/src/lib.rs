//! matvec MCP Server
//!
//! JSON-RPC 2.0 over stdio, one request per line. Tools:
//! - matrix_operate: add, subtract, multiply, determinant, inverse, transpose, scalar-multiply
//! - linear_cramer: solve Ax = b by Cramer's rule
//! - linear_inverse: solve Ax = b as A⁻¹b
//! - vectors_calc: 2-D vector sum, difference, dot, cross and plot spec

pub mod config;
pub mod protocol;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use server::{handle_request, process_line};
