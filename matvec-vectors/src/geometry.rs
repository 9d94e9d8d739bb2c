//! 2-D vector geometry

use matvec_core::{parse_cell, MatvecError};
use nalgebra::Vector2;

/// A vector in the plane, always held in cartesian form
pub type Vector2D = Vector2<f64>;

/// Magnitude and angle in degrees, counter-clockwise from +x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    pub magnitude: f64,
    pub degrees: f64,
}

pub fn to_cartesian(magnitude: f64, degrees: f64) -> Vector2D {
    let rad = degrees.to_radians();
    Vector2D::new(magnitude * rad.cos(), magnitude * rad.sin())
}

/// Polar form; the zero vector has angle 0
pub fn to_polar(v: &Vector2D) -> Polar {
    let magnitude = v.x.hypot(v.y);
    let degrees = if magnitude == 0.0 { 0.0 } else { v.y.atan2(v.x).to_degrees() };
    Polar { magnitude, degrees }
}

pub fn sum(u: &Vector2D, v: &Vector2D) -> Vector2D {
    u + v
}

pub fn diff(u: &Vector2D, v: &Vector2D) -> Vector2D {
    u - v
}

pub fn dot(u: &Vector2D, v: &Vector2D) -> f64 {
    u.dot(v)
}

/// z-component of the 3-D cross product: `ux·vy − uy·vx`
pub fn cross_z(u: &Vector2D, v: &Vector2D) -> f64 {
    u.perp(v)
}

/// Parse one vector component from cell text (fractions allowed)
pub fn parse_component(text: &str, field: &str) -> Result<f64, MatvecError> {
    let n = parse_cell(text, field)?;
    n.to_f64()
        .ok_or_else(|| MatvecError::parse_error(text).in_cell(field))
}
