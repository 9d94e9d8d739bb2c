//! Scalar parsing for user-entered cell text
//!
//! Accepted forms:
//! - empty or whitespace-only text, which is zero
//! - decimals: `3`, `-2.5`, `.5`, `+4.`, `1.5e3`
//! - fractions `p/q` where both sides are decimals and `q != 0`

use std::sync::OnceLock;

use regex::Regex;

use crate::{MatvecError, Number, NumberError};

fn decimal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?(?:[eE]([+-]?[0-9]+))?$").unwrap()
    })
}

/// Parse one cell. Empty text is zero; anything else must be a finite
/// decimal or a fraction.
pub fn parse_scalar(text: &str) -> Result<Number, MatvecError> {
    let s = text.trim();
    if s.is_empty() {
        return Ok(Number::zero());
    }

    let mut parts = s.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(num), None, _) => parse_decimal(num).ok_or_else(|| MatvecError::parse_error(s)),
        (Some(num), Some(den), None) => {
            let num = parse_decimal(num.trim()).ok_or_else(|| MatvecError::parse_error(s))?;
            let den = parse_decimal(den.trim()).ok_or_else(|| MatvecError::parse_error(s))?;
            match num.checked_div(&den) {
                Ok(q) => Ok(q),
                Err(NumberError::DivisionByZero) => Err(MatvecError::div_zero(s)),
                Err(e) => Err(e.into()),
            }
        }
        _ => Err(MatvecError::parse_error(s)),
    }
}

/// Parse one cell, tagging any failure with its location
pub fn parse_cell(text: &str, cell: impl Into<String>) -> Result<Number, MatvecError> {
    parse_scalar(text).map_err(|e| e.in_cell(cell))
}

/// Decimal literal to Number; None for anything not matching the grammar
/// or outside the finite f64 range.
fn parse_decimal(s: &str) -> Option<Number> {
    let caps = decimal_re().captures(s)?;
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let int = caps.get(2).map_or("", |m| m.as_str());
    let frac = caps.get(3).map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() {
        return None;
    }

    let mut canonical = String::with_capacity(s.len() + 2);
    if sign == "-" {
        canonical.push('-');
    }
    canonical.push_str(if int.is_empty() { "0" } else { int });
    if !frac.is_empty() {
        canonical.push('.');
        canonical.push_str(frac);
    }
    if let Some(exp) = caps.get(4) {
        canonical.push('e');
        canonical.push_str(exp.as_str());
    }

    let n = Number::from_decimal_str(&canonical).ok()?;
    // Totality: only values representable as finite reals are accepted
    n.to_f64().map(|_| n)
}
