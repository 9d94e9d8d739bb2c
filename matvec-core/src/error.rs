//! Structured errors
//!
//! Errors never crash the server. Each one carries a machine-readable code
//! and a single human-readable message that replaces whatever the client
//! was showing before.

use crate::NumberError;
use serde::{Deserialize, Serialize};

/// Machine-readable error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Cell text is not a number or fraction
    ParseError,
    /// Fraction with a zero denominator
    DivZero,
    /// Operand dimensions are incompatible with the operation
    ShapeMismatch,
    /// Zero determinant blocks an inverse
    Singular,
    /// Zero determinant blocks Cramer's rule
    NoUniqueSolution,
    /// A required input field is missing
    IncompleteInput,
    /// The request itself is malformed
    ServiceError,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::DivZero => "DIV_ZERO",
            ErrorCode::ShapeMismatch => "SHAPE_MISMATCH",
            ErrorCode::Singular => "SINGULAR",
            ErrorCode::NoUniqueSolution => "NO_UNIQUE_SOLUTION",
            ErrorCode::IncompleteInput => "INCOMPLETE_INPUT",
            ErrorCode::ServiceError => "SERVICE_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error returned by every engine operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatvecError {
    pub code: ErrorCode,

    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Cell the error refers to, e.g. `A[1][0]` or `b[2]`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<String>,
}

impl MatvecError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggestion: None,
            cell: None,
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set cell location and prefix it to the message
    pub fn in_cell(mut self, cell: impl Into<String>) -> Self {
        let cell = cell.into();
        self.message = format!("{}: {}", cell, self.message);
        self.cell = Some(cell);
        self
    }

    // ========== Common Error Constructors ==========

    pub fn parse_error(text: &str) -> Self {
        Self::new(ErrorCode::ParseError, format!("not a number or fraction: '{}'", text))
            .with_suggestion("Use an integer, a decimal such as -2.5, or a fraction such as 3/4")
    }

    pub fn div_zero(text: &str) -> Self {
        Self::new(ErrorCode::DivZero, format!("fraction has a zero denominator: '{}'", text))
    }

    pub fn shape_mismatch(details: impl Into<String>) -> Self {
        Self::new(ErrorCode::ShapeMismatch, details)
    }

    pub fn singular(details: impl Into<String>) -> Self {
        Self::new(ErrorCode::Singular, details)
            .with_suggestion("A matrix with |A| = 0 has no inverse")
    }

    pub fn no_unique_solution() -> Self {
        Self::new(ErrorCode::NoUniqueSolution, "the system has no unique solution: |A| = 0")
    }

    pub fn incomplete_input(field: &str) -> Self {
        Self::new(ErrorCode::IncompleteInput, format!("missing required field '{}'", field))
    }

    pub fn service_error(details: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceError, details)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, format!("internal error: {}", details.into()))
    }
}

impl std::fmt::Display for MatvecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for MatvecError {}

impl From<NumberError> for MatvecError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::ParseError(s) => Self::parse_error(&s),
            NumberError::DivisionByZero => Self::new(ErrorCode::DivZero, "division by zero"),
            NumberError::Overflow => Self::new(ErrorCode::ParseError, "value is outside the finite range"),
        }
    }
}
