//! matvec Core - Fundamental types
//!
//! This crate provides the core types used throughout matvec:
//! - `Number`: arbitrary precision decimal numbers
//! - `parse_scalar`: fraction-aware parsing of cell text
//! - `MatvecError`: structured errors with machine-readable codes
//! - fixed-place display formatting for everything leaving the engine

mod error;
mod format;
mod number;
mod parse;

pub use error::{ErrorCode, MatvecError};
pub use format::{display, fixed, DISPLAY_PLACES};
pub use number::{Number, NumberError};
pub use parse::{parse_cell, parse_scalar};
