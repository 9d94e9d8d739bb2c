//! Arbitrary precision numbers using dashu
//!
//! Cell values are held as dashu-float `DBig` decimals at a fixed working
//! precision, so fractions such as `1/3` survive determinant chains with
//! far less rounding than `f64` would give.

use dashu_float::DBig;
use dashu_float::ops::Abs;
use dashu_int::IBig;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::format::{fixed, DISPLAY_PLACES};

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Overflow: value does not fit in a finite f64")]
    Overflow,
}

/// Working precision for calculations (decimal digits)
const WORK_PRECISION: usize = 50;

/// Arbitrary precision decimal number
///
/// All operations return Results or new Numbers - never panic.
#[derive(Debug, Clone)]
pub struct Number {
    inner: DBig,
}

impl Number {
    // ========== Construction ==========

    fn with_work_precision(val: DBig) -> DBig {
        val.with_precision(WORK_PRECISION).value()
    }

    /// Parse a canonical decimal literal: `-12`, `3.25`, `1.5e3`, `7e-2`.
    ///
    /// Callers are expected to have validated the literal; see
    /// [`crate::parse_scalar`] for the user-facing parser.
    pub fn from_decimal_str(s: &str) -> Result<Self, NumberError> {
        // Scientific notation goes through from_parts so no digit is lost
        if s.contains('e') || s.contains('E') {
            let lower = s.to_lowercase();
            let parts: Vec<&str> = lower.split('e').collect();
            if parts.len() == 2 {
                let (digits, shift) = match parts[0].split_once('.') {
                    Some((int, frac)) => (format!("{}{}", int, frac), frac.len() as isize),
                    None => (parts[0].to_string(), 0),
                };
                let mantissa: IBig = digits
                    .parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;
                let exp: isize = parts[1]
                    .parse()
                    .map_err(|_| NumberError::ParseError(s.to_string()))?;
                let result = DBig::from_parts(mantissa, exp - shift);
                return Ok(Self { inner: Self::with_work_precision(result) });
            }
        }

        let inner: DBig = s
            .parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;
        Ok(Self { inner: Self::with_work_precision(inner) })
    }

    /// Create from i64 with working precision
    pub fn from_i64(n: i64) -> Self {
        Self { inner: Self::with_work_precision(DBig::from(n)) }
    }

    /// Zero at working precision
    pub fn zero() -> Self {
        Self::from_i64(0)
    }

    /// One at working precision
    pub fn one() -> Self {
        Self::from_i64(1)
    }

    /// Create from f64 (non-finite input becomes zero)
    pub fn from_f64(f: f64) -> Self {
        if !f.is_finite() || f == 0.0 {
            return Self::zero();
        }
        // Shortest round-trip digits, so tiny values keep their precision
        let s = format!("{:e}", f);
        Self::from_decimal_str(&s).unwrap_or_else(|_| Self::zero())
    }

    // ========== Predicates ==========

    pub fn is_zero(&self) -> bool {
        self.inner == DBig::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.inner < DBig::ZERO
    }

    /// True when |self| < eps
    pub fn is_negligible(&self, eps: f64) -> bool {
        match self.to_f64() {
            Some(f) => f.abs() < eps,
            None => self.is_zero(),
        }
    }

    // ========== Basic Arithmetic ==========

    pub fn add(&self, other: &Self) -> Self {
        Self { inner: &self.inner + &other.inner }
    }

    pub fn sub(&self, other: &Self) -> Self {
        Self { inner: &self.inner - &other.inner }
    }

    pub fn mul(&self, other: &Self) -> Self {
        Self { inner: &self.inner * &other.inner }
    }

    pub fn neg(&self) -> Self {
        Self { inner: -&self.inner }
    }

    /// Safe division (returns Result, never panics)
    pub fn checked_div(&self, other: &Self) -> Result<Self, NumberError> {
        if other.is_zero() {
            Err(NumberError::DivisionByZero)
        } else {
            Ok(Self { inner: &self.inner / &other.inner })
        }
    }

    pub fn abs(&self) -> Self {
        Self { inner: Abs::abs(self.inner.clone()) }
    }

    // ========== Conversion ==========

    /// Convert to f64 (None when outside the finite f64 range)
    pub fn to_f64(&self) -> Option<f64> {
        // Representation: significand * 10^exponent. Going through the
        // decimal text lets the std parser do correctly rounded conversion.
        let (significand, exponent) = self.inner.clone().into_repr().into_parts();
        let text = format!("{}e{}", significand, exponent);
        match text.parse::<f64>() {
            Ok(f) if f.is_finite() => Some(f),
            _ => None,
        }
    }

    // ========== Display ==========

    /// Render with a fixed number of decimal places
    pub fn as_decimal(&self, places: u32) -> String {
        match self.to_f64() {
            Some(f) => fixed(f, places),
            None => format!("{}", self.inner),
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_decimal(DISPLAY_PLACES))
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        crate::parse_scalar(&s).map_err(|e| serde::de::Error::custom(e.message))
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.inner.partial_cmp(&other.inner).unwrap_or(std::cmp::Ordering::Equal)
    }
}

impl Default for Number {
    fn default() -> Self {
        Self::zero()
    }
}
