//! Display formatting for numeric outputs

/// Decimal places used for every numeric value crossing the service boundary
pub const DISPLAY_PLACES: u32 = 6;

/// Format `value` with exactly `places` decimals.
///
/// Values that round to zero print without a sign, so `-1e-9` renders as
/// `0.000000` rather than `-0.000000`.
pub fn fixed(value: f64, places: u32) -> String {
    let s = format!("{:.prec$}", value, prec = places as usize);
    match s.strip_prefix('-') {
        Some(rest) if rest.bytes().all(|b| b == b'0' || b == b'.') => rest.to_string(),
        _ => s,
    }
}

/// Format with [`DISPLAY_PLACES`]
pub fn display(value: f64) -> String {
    fixed(value, DISPLAY_PLACES)
}
