//! Plot specification for a pair of vectors
//!
//! Produces a Plotly-compatible figure description: every vector is an arrow
//! annotation anchored at the origin, the grid and the parallelogram are
//! layout shapes. Nothing here draws anything.

use serde::{Deserialize, Serialize};

use crate::geometry::{diff, sum, Vector2D};

/// Upper bound on grid lines per axis and kind
pub const MAX_GRID_LINES: usize = 200;

const AXIS_PAD: f64 = 0.1;
const MIN_SPAN: f64 = 1e-6;
const ZERO_LENGTH: f64 = 1e-9;

/// What to draw besides `u`, `v` and `u+v`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    pub parallelogram: bool,
    pub subtraction: bool,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub enabled: bool,
    pub main_step_x: Option<f64>,
    pub main_step_y: Option<f64>,
    pub minor_factor: f64,
    pub minor_step_x: Option<f64>,
    pub minor_step_y: Option<f64>,
    pub color: String,
    pub width: f64,
    pub dash: String,
    pub minor_color: String,
    pub minor_width: f64,
    pub minor_dash: String,
    pub show_minor: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            enabled: true,
            main_step_x: None,
            main_step_y: None,
            minor_factor: 5.0,
            minor_step_x: None,
            minor_step_y: None,
            color: "rgba(0,0,0,0.18)".to_string(),
            width: 1.0,
            dash: "solid".to_string(),
            minor_color: "rgba(0,0,0,0.10)".to_string(),
            minor_width: 1.0,
            minor_dash: "dot".to_string(),
            show_minor: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlotSpec {
    /// Always empty: arrows are annotations, not traces
    pub data: Vec<serde_json::Value>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
    pub margin: Margin,
    pub shapes: Vec<Shape>,
    pub annotations: Vec<Annotation>,
    pub plot_bgcolor: &'static str,
    pub paper_bgcolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub range: [f64; 2],
    pub zeroline: bool,
    pub zerolinecolor: &'static str,
    pub zerolinewidth: f64,
    pub showgrid: bool,
    pub gridcolor: String,
    pub gridwidth: f64,
    pub griddash: String,
    pub linecolor: &'static str,
    pub ticks: &'static str,
    pub ticklen: u32,
    pub tickfont: Font,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub t: u32,
    pub b: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Line {
        xref: &'static str,
        yref: &'static str,
        layer: &'static str,
        x0: f64,
        x1: f64,
        y0: f64,
        y1: f64,
        line: LineStyle,
    },
    Path {
        path: String,
        line: LineStyle,
        fillcolor: &'static str,
    },
}

/// Arrow from `(ax, ay)` to `(x, y)` in data coordinates
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub ax: f64,
    pub ay: f64,
    pub x: f64,
    pub y: f64,
    pub xref: &'static str,
    pub yref: &'static str,
    pub axref: &'static str,
    pub ayref: &'static str,
    pub showarrow: bool,
    pub arrowhead: u32,
    pub arrowsize: f64,
    pub arrowwidth: f64,
    pub arrowcolor: &'static str,
    pub text: &'static str,
    pub xanchor: &'static str,
    pub yanchor: &'static str,
    pub font: Font,
    pub bgcolor: &'static str,
    pub borderpad: u32,
}

/// Build the figure for `u`, `v`, `u+v` and, optionally, the parallelogram
/// and `u−v`.
pub fn build_plot(u: &Vector2D, v: &Vector2D, options: &PlotOptions) -> PlotSpec {
    let s = sum(u, v);
    let d = diff(u, v);
    let points = [*u, *v, s, d];
    let xr = axis_range(points.iter().map(|p| p.x));
    let yr = axis_range(points.iter().map(|p| p.y));

    let grid = &options.grid;
    let mut shapes = Vec::new();
    let steps = grid.enabled.then(|| grid_steps(grid, xr, yr));
    if let Some(steps) = &steps {
        grid_shapes(grid, steps, xr, yr, &mut shapes);
    }

    let mut annotations = Vec::new();
    let origin = Vector2D::zeros();
    annotations.extend(arrow(&origin, u, "u", "blue", 2.0));
    annotations.extend(arrow(&origin, v, "v", "red", 2.0));
    annotations.extend(arrow(&origin, &s, "u+v", "green", 3.0));

    if options.parallelogram {
        shapes.push(Shape::Path {
            path: format!("M 0 0 L {} {} L {} {} L {} {} Z", u.x, u.y, s.x, s.y, v.x, v.y),
            line: LineStyle {
                color: "gray".to_string(),
                width: 1.0,
                dash: None,
            },
            fillcolor: "rgba(128,128,128,0.1)",
        });
    }

    if options.subtraction {
        annotations.extend(arrow(&origin, &d, "u−v", "purple", 2.0));
    }

    let axis = |range: [f64; 2], dtick: Option<f64>| Axis {
        range,
        zeroline: true,
        zerolinecolor: "black",
        zerolinewidth: 1.5,
        showgrid: true,
        gridcolor: grid.color.clone(),
        gridwidth: grid.width,
        griddash: grid.dash.clone(),
        linecolor: "black",
        ticks: "outside",
        ticklen: 4,
        tickfont: Font { size: 11, color: "black" },
        dtick,
    };

    PlotSpec {
        data: Vec::new(),
        layout: Layout {
            xaxis: axis(xr, steps.as_ref().map(|s| s.main_x)),
            yaxis: axis(yr, steps.as_ref().map(|s| s.main_y)),
            showlegend: false,
            margin: Margin { l: 20, r: 20, t: 20, b: 20 },
            shapes,
            annotations,
            plot_bgcolor: "white",
            paper_bgcolor: "white",
        },
    }
}

/// Min/max over the values and the origin, padded on both sides
fn axis_range(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), x| (lo.min(x), hi.max(x)));
    let pad = (max - min).max(MIN_SPAN) * AXIS_PAD;
    [min - pad, max + pad]
}

fn arrow(from: &Vector2D, to: &Vector2D, text: &'static str, color: &'static str, width: f64) -> Option<Annotation> {
    let length = (to - from).norm();
    if length < ZERO_LENGTH {
        return None;
    }
    Some(Annotation {
        ax: from.x,
        ay: from.y,
        x: to.x,
        y: to.y,
        xref: "x",
        yref: "y",
        axref: "x",
        ayref: "y",
        showarrow: true,
        arrowhead: 2,
        arrowsize: (length * 0.15).clamp(0.8, 2.0),
        arrowwidth: width,
        arrowcolor: color,
        text,
        xanchor: "left",
        yanchor: "bottom",
        font: Font { size: 12, color },
        bgcolor: "rgba(255,255,255,0.7)",
        borderpad: 2,
    })
}

// ============ grid ============

struct GridSteps {
    main_x: f64,
    main_y: f64,
    minor_x: f64,
    minor_y: f64,
}

fn grid_steps(grid: &GridConfig, xr: [f64; 2], yr: [f64; 2]) -> GridSteps {
    let main_x = choose_step(xr[1] - xr[0], grid.main_step_x);
    let main_y = choose_step(yr[1] - yr[0], grid.main_step_y);
    let factor = if grid.minor_factor > 0.0 { grid.minor_factor } else { 5.0 };
    GridSteps {
        main_x,
        main_y,
        minor_x: positive(grid.minor_step_x).unwrap_or(main_x / factor),
        minor_y: positive(grid.minor_step_y).unwrap_or(main_y / factor),
    }
}

fn positive(step: Option<f64>) -> Option<f64> {
    step.filter(|s| s.is_finite() && *s > 0.0)
}

/// The requested step (default 1) unless it would give too many lines
fn choose_step(span: f64, desired: Option<f64>) -> f64 {
    let span = span.abs().max(1e-9);
    let desired = positive(desired).unwrap_or(1.0);
    if span / desired > MAX_GRID_LINES as f64 {
        nice_step(span)
    } else {
        desired
    }
}

/// 1, 2 or 5 × 10^k, aiming at about eight lines across `span`
fn nice_step(span: f64) -> f64 {
    let raw = span.max(1e-9) / 8.0;
    let pow10 = 10f64.powi(raw.log10().floor() as i32);
    [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * pow10)
        .find(|step| raw <= *step)
        .unwrap_or(pow10)
}

/// Multiples of `step` covering `[min, max]`, at most `MAX_GRID_LINES`
fn frange(min: f64, max: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0) {
        return Vec::new();
    }
    let mut values = Vec::new();
    let mut x = (min / step).floor() * step;
    while x <= max + 1e-12 && values.len() < MAX_GRID_LINES {
        values.push((x * 1e12).round() / 1e12);
        x += step;
    }
    values
}

fn grid_shapes(grid: &GridConfig, steps: &GridSteps, xr: [f64; 2], yr: [f64; 2], shapes: &mut Vec<Shape>) {
    let style = |color: &str, width: f64, dash: &str| LineStyle {
        color: color.to_string(),
        width,
        dash: Some(dash.to_string()),
    };
    let vertical = |x: f64, line: LineStyle| Shape::Line {
        xref: "x",
        yref: "y",
        layer: "below",
        x0: x,
        x1: x,
        y0: yr[0],
        y1: yr[1],
        line,
    };
    let horizontal = |y: f64, line: LineStyle| Shape::Line {
        xref: "x",
        yref: "y",
        layer: "below",
        x0: xr[0],
        x1: xr[1],
        y0: y,
        y1: y,
        line,
    };

    // Minor first so major lines paint over them; the 0 line is always major
    if grid.show_minor {
        let minor = style(&grid.minor_color, grid.minor_width, &grid.minor_dash);
        for x in frange(xr[0], xr[1], steps.minor_x).into_iter().filter(|x| x.abs() >= 1e-12) {
            shapes.push(vertical(x, minor.clone()));
        }
        for y in frange(yr[0], yr[1], steps.minor_y).into_iter().filter(|y| y.abs() >= 1e-12) {
            shapes.push(horizontal(y, minor.clone()));
        }
    }

    let main = style(&grid.color, grid.width, &grid.dash);
    for x in frange(xr[0], xr[1], steps.main_x) {
        shapes.push(vertical(x, main.clone()));
    }
    for y in frange(yr[0], yr[1], steps.main_y) {
        shapes.push(horizontal(y, main.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_pair() -> (Vector2D, Vector2D) {
        (Vector2D::new(1.0, 0.0), Vector2D::new(0.0, 1.0))
    }

    fn no_grid() -> PlotOptions {
        PlotOptions {
            grid: GridConfig {
                enabled: false,
                ..GridConfig::default()
            },
            ..PlotOptions::default()
        }
    }

    fn vertical_lines<'a>(spec: &'a PlotSpec, dash: &'a str) -> impl Iterator<Item = f64> + 'a {
        spec.layout.shapes.iter().filter_map(move |s| match s {
            Shape::Line { x0, x1, line, .. } if x0 == x1 && line.dash.as_deref() == Some(dash) => Some(*x0),
            _ => None,
        })
    }

    #[test]
    fn test_arrows_start_at_origin() {
        let (u, v) = unit_pair();
        let spec = build_plot(&u, &v, &PlotOptions::default());
        let labels: Vec<&str> = spec.layout.annotations.iter().map(|a| a.text).collect();
        assert_eq!(labels, vec!["u", "v", "u+v"]);
        for a in &spec.layout.annotations {
            assert_eq!((a.ax, a.ay), (0.0, 0.0));
        }
        let total = &spec.layout.annotations[2];
        assert_eq!((total.x, total.y), (1.0, 1.0));
        assert_eq!(total.arrowwidth, 3.0);
        assert!(spec.data.is_empty());
    }

    #[test]
    fn test_subtraction_arrow_is_origin_anchored() {
        let u = Vector2D::new(3.0, 1.0);
        let v = Vector2D::new(1.0, 2.0);
        let options = PlotOptions {
            subtraction: true,
            ..PlotOptions::default()
        };
        let spec = build_plot(&u, &v, &options);
        let sub = spec.layout.annotations.last().unwrap();
        assert_eq!(sub.text, "u−v");
        assert_eq!((sub.ax, sub.ay), (0.0, 0.0));
        assert_eq!((sub.x, sub.y), (2.0, -1.0));
        assert_eq!(sub.arrowcolor, "purple");
    }

    #[test]
    fn test_zero_length_arrows_are_skipped() {
        let spec = build_plot(&Vector2D::zeros(), &Vector2D::new(2.0, 0.0), &no_grid());
        let labels: Vec<&str> = spec.layout.annotations.iter().map(|a| a.text).collect();
        assert_eq!(labels, vec!["v", "u+v"]);

        let spec = build_plot(&Vector2D::zeros(), &Vector2D::zeros(), &no_grid());
        assert!(spec.layout.annotations.is_empty());
    }

    #[test]
    fn test_arrow_size_is_clamped() {
        let spec = build_plot(&Vector2D::new(0.5, 0.0), &Vector2D::new(100.0, 0.0), &no_grid());
        let sizes: Vec<f64> = spec.layout.annotations.iter().map(|a| a.arrowsize).collect();
        assert_eq!(sizes[0], 0.8);
        assert_eq!(sizes[1], 2.0);
    }

    #[test]
    fn test_parallelogram_path() {
        let (u, v) = unit_pair();
        let options = PlotOptions {
            parallelogram: true,
            ..no_grid()
        };
        let spec = build_plot(&u, &v, &options);
        assert_eq!(spec.layout.shapes.len(), 1);
        match &spec.layout.shapes[0] {
            Shape::Path { path, fillcolor, .. } => {
                assert_eq!(path, "M 0 0 L 1 0 L 1 1 L 0 1 Z");
                assert_eq!(*fillcolor, "rgba(128,128,128,0.1)");
            }
            other => panic!("expected a path, got {:?}", other),
        }
    }

    #[test]
    fn test_axis_ranges_include_origin_with_padding() {
        let (u, v) = unit_pair();
        let spec = build_plot(&u, &v, &no_grid());
        // Points: u, v, u+v = (1, 1), u-v = (1, -1)
        let [x0, x1] = spec.layout.xaxis.range;
        let [y0, y1] = spec.layout.yaxis.range;
        assert!((x0 + 0.1).abs() < 1e-12 && (x1 - 1.1).abs() < 1e-12);
        assert!((y0 + 1.2).abs() < 1e-12 && (y1 - 1.2).abs() < 1e-12);

        let spec = build_plot(&Vector2D::zeros(), &Vector2D::zeros(), &no_grid());
        let [x0, x1] = spec.layout.xaxis.range;
        assert!(x1 > x0);
    }

    #[test]
    fn test_default_grid() {
        let (u, v) = unit_pair();
        let spec = build_plot(&u, &v, &PlotOptions::default());
        assert_eq!(spec.layout.xaxis.dtick, Some(1.0));

        let main: Vec<f64> = vertical_lines(&spec, "solid").collect();
        assert!(main.contains(&0.0) && main.contains(&1.0));
        assert!(vertical_lines(&spec, "dot").all(|x| x.abs() >= 1e-12));
        assert!(vertical_lines(&spec, "dot").any(|x| (x - 0.2).abs() < 1e-9));
    }

    #[test]
    fn test_disabled_grid_has_no_lines() {
        let (u, v) = unit_pair();
        let spec = build_plot(&u, &v, &no_grid());
        assert!(spec.layout.shapes.is_empty());
        assert_eq!(spec.layout.xaxis.dtick, None);
    }

    #[test]
    fn test_dense_grid_switches_to_nice_step() {
        let u = Vector2D::new(1000.0, 0.0);
        let v = Vector2D::new(0.0, 1000.0);
        let spec = build_plot(&u, &v, &PlotOptions::default());
        // x range [-100, 1100]: 1200 unit lines is too many
        assert_eq!(spec.layout.xaxis.dtick, Some(200.0));
    }

    #[test]
    fn test_line_count_is_capped() {
        let (u, v) = unit_pair();
        let mut options = PlotOptions::default();
        options.grid.minor_step_x = Some(1e-4);
        let spec = build_plot(&u, &v, &options);
        assert!(vertical_lines(&spec, "dot").count() <= MAX_GRID_LINES);
    }

    #[test]
    fn test_options_from_camel_case_json() {
        let options: PlotOptions = serde_json::from_str(
            r#"{"parallelogram": true, "grid": {"mainStepX": 2, "showMinor": false, "minorColor": "red"}}"#,
        )
        .unwrap();
        assert!(options.parallelogram);
        assert!(!options.subtraction);
        assert_eq!(options.grid.main_step_x, Some(2.0));
        assert!(!options.grid.show_minor);
        assert_eq!(options.grid.minor_color, "red");
        assert!(options.grid.enabled);
        assert_eq!(options.grid.minor_factor, 5.0);
    }

    #[test]
    fn test_spec_serializes_plotly_shape_tags() {
        let (u, v) = unit_pair();
        let options = PlotOptions {
            parallelogram: true,
            ..PlotOptions::default()
        };
        let json = serde_json::to_value(build_plot(&u, &v, &options)).unwrap();
        let shapes = json["layout"]["shapes"].as_array().unwrap();
        assert!(shapes.iter().any(|s| s["type"] == "line" && s["layer"] == "below"));
        assert_eq!(shapes.last().unwrap()["type"], "path");
        assert_eq!(json["layout"]["showlegend"], false);
        assert_eq!(json["data"], serde_json::json!([]));
    }
}
