//! matvec Vectors - 2-D vector geometry
//!
//! Polar/cartesian conversion, sum, difference, dot and cross products, and
//! the plot specification the presentation layer draws from.

mod geometry;
pub mod plot;

pub use geometry::{cross_z, diff, dot, parse_component, sum, to_cartesian, to_polar, Polar, Vector2D};
pub use plot::{build_plot, GridConfig, PlotOptions, PlotSpec};
