//! Tool handlers: matrix_operate, linear_cramer, linear_inverse, vectors_calc
//!
//! Each handler takes an explicit argument struct deserialized from the
//! `tools/call` arguments and returns a serializable payload or a
//! [`ToolFailure`]. Failures are tool results with `isError: true`, never
//! JSON-RPC errors.

use std::collections::BTreeMap;

use matvec_core::{display, parse_cell, ErrorCode, MatvecError, Number};
use matvec_matrix::{
    add, cramer, determinant, inverse, inverse_solve, multiply, parse_column, parse_grid, scalar_multiply, subtract,
    transpose, CramerOutcome, Matrix,
};
use matvec_vectors::{
    build_plot, cross_z, diff, dot, parse_component, sum, to_cartesian, to_polar, PlotOptions, PlotSpec, Vector2D,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::protocol::McpError;

// ============ inputs ============

/// One input cell: clients send text, but plain JSON numbers are accepted
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(serde_json::Number),
    Empty,
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }

    fn is_blank(&self) -> bool {
        match self {
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
            Cell::Empty => true,
        }
    }
}

pub type Grid = Vec<Vec<Cell>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOp {
    Add,
    Subtract,
    Multiply,
    Determinant,
    Inverse,
    Transpose,
    ScalarMultiply,
}

impl MatrixOp {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "add" => Some(MatrixOp::Add),
            "subtract" | "sub" => Some(MatrixOp::Subtract),
            "multiply" | "mul" => Some(MatrixOp::Multiply),
            "determinant" | "det" => Some(MatrixOp::Determinant),
            "inverse" | "inv" => Some(MatrixOp::Inverse),
            "transpose" | "trans" => Some(MatrixOp::Transpose),
            "scalar-multiply" | "scalar_multiply" | "scale" => Some(MatrixOp::ScalarMultiply),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatrixOperateArgs {
    #[serde(rename = "A")]
    pub a: Option<Grid>,
    #[serde(rename = "B")]
    pub b: Option<Grid>,
    pub op: Option<String>,
    /// `"A"` (default) or `"B"` for unary operations
    pub target: Option<String>,
    /// Factor for `scalar-multiply`
    pub k: Option<Cell>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LinearSystemArgs {
    #[serde(rename = "A")]
    pub a: Option<Grid>,
    pub b: Option<Vec<Cell>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VectorInput {
    pub mag: Option<Cell>,
    pub deg: Option<Cell>,
    pub x: Option<Cell>,
    pub y: Option<Cell>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorsArgs {
    pub input_mode: Option<String>,
    pub v1: Option<VectorInput>,
    pub v2: Option<VectorInput>,
    #[serde(default)]
    pub show: PlotOptions,
}

// ============ outputs ============

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum OperateResult {
    Matrix {
        #[serde(rename = "resultMatrix")]
        result_matrix: Matrix,
    },
    Scalar {
        scalar: Number,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CramerResponse {
    pub det_a: Number,
    /// `A1..An`: A with column i replaced by b
    pub matrices: BTreeMap<String, Matrix>,
    pub dets: Vec<Number>,
    pub solution: Vec<Number>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InverseResponse {
    #[serde(rename = "detA")]
    pub det_a: Number,
    #[serde(rename = "Ainv")]
    pub a_inv: Matrix,
    pub solution: Vec<Number>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VectorReport {
    pub xy: [String; 2],
    pub mag: String,
    pub deg: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VectorsResponse {
    pub v1: VectorReport,
    pub v2: VectorReport,
    pub sum: [String; 2],
    pub diff: [String; 2],
    pub dot: String,
    pub cross: String,
    pub plot_spec: PlotSpec,
}

/// A failed tool call; solvers still report `det(A)` when they got that far
#[derive(Debug, Clone, Serialize)]
pub struct ToolFailure {
    pub error: MatvecError,
    #[serde(rename = "detA", skip_serializing_if = "Option::is_none")]
    pub det_a: Option<Number>,
}

impl From<MatvecError> for ToolFailure {
    fn from(error: MatvecError) -> Self {
        ToolFailure { error, det_a: None }
    }
}

// ============ parsing helpers ============

fn texts(row: &[Cell]) -> Vec<String> {
    row.iter().map(Cell::text).collect()
}

fn check_dim(name: &str, rows: usize, cols: usize, config: &ServerConfig) -> Result<(), MatvecError> {
    if rows > config.max_dim || cols > config.max_dim {
        return Err(MatvecError::shape_mismatch(format!(
            "{} is {}×{}; the largest accepted side is {}",
            name, rows, cols, config.max_dim
        )));
    }
    Ok(())
}

fn parse_matrix(name: &str, grid: Option<&Grid>, config: &ServerConfig) -> Result<Matrix, MatvecError> {
    let grid = grid.ok_or_else(|| MatvecError::incomplete_input(name))?;
    check_dim(name, grid.len(), grid.first().map_or(0, Vec::len), config)?;
    let cells: Vec<Vec<String>> = grid.iter().map(|row| texts(row)).collect();
    parse_grid(name, &cells, config.matrix_mode)
}

fn parse_system(args: &LinearSystemArgs, config: &ServerConfig) -> Result<(Matrix, Vec<Number>), MatvecError> {
    let a = parse_matrix("A", args.a.as_ref(), config)?;
    let b = args.b.as_ref().ok_or_else(|| MatvecError::incomplete_input("b"))?;
    check_dim("b", b.len(), 1, config)?;
    Ok((a, parse_column("b", &texts(b))?))
}

// ============ handlers ============

pub fn matrix_operate(args: MatrixOperateArgs, config: &ServerConfig) -> Result<OperateResult, ToolFailure> {
    let op_name = args.op.as_deref().ok_or_else(|| MatvecError::incomplete_input("op"))?;
    let op = MatrixOp::from_str(op_name).ok_or_else(|| {
        MatvecError::service_error(format!("unknown operation '{}'", op_name))
            .with_suggestion("Use add, subtract, multiply, determinant, inverse, transpose or scalar-multiply")
    })?;

    let a = parse_matrix("A", args.a.as_ref(), config)?;
    let b = args.b.as_ref().map(|g| parse_matrix("B", Some(g), config)).transpose()?;
    let required_b = || b.as_ref().ok_or_else(|| MatvecError::incomplete_input("B"));
    let target = || {
        match args.target.as_deref().map(str::trim) {
            None | Some("") | Some("A") | Some("a") => Ok(&a),
            Some("B") | Some("b") => required_b(),
            Some(other) => Err(MatvecError::service_error(format!("target must be \"A\" or \"B\", got '{}'", other))),
        }
    };
    let matrix = |m: Matrix| OperateResult::Matrix { result_matrix: m };

    let result = match op {
        MatrixOp::Add => matrix(add(&a, required_b()?)?),
        MatrixOp::Subtract => matrix(subtract(&a, required_b()?)?),
        MatrixOp::Multiply => matrix(multiply(&a, required_b()?)?),
        MatrixOp::Determinant => OperateResult::Scalar {
            scalar: determinant(target()?)?,
        },
        MatrixOp::Inverse => matrix(inverse(target()?)?),
        MatrixOp::Transpose => matrix(transpose(target()?)),
        MatrixOp::ScalarMultiply => {
            let k = args.k.as_ref().ok_or_else(|| MatvecError::incomplete_input("k"))?;
            let k = parse_cell(&k.text(), "k")?;
            matrix(scalar_multiply(target()?, &k))
        }
    };

    debug!(op = ?op, "matrix_operate done");
    Ok(result)
}

pub fn linear_cramer(args: LinearSystemArgs, config: &ServerConfig) -> Result<CramerResponse, ToolFailure> {
    let (a, b) = parse_system(&args, config)?;
    match cramer(&a, &b)? {
        CramerOutcome::Unique(s) => Ok(CramerResponse {
            det_a: s.det_a,
            matrices: s
                .matrices
                .into_iter()
                .enumerate()
                .map(|(i, m)| (format!("A{}", i + 1), m))
                .collect(),
            dets: s.dets,
            solution: s.solution,
        }),
        CramerOutcome::NoUniqueSolution { det_a } => Err(ToolFailure {
            error: MatvecError::no_unique_solution(),
            det_a: Some(det_a),
        }),
    }
}

pub fn linear_inverse(args: LinearSystemArgs, config: &ServerConfig) -> Result<InverseResponse, ToolFailure> {
    let (a, b) = parse_system(&args, config)?;
    let outcome = inverse_solve(&a, &b)?;
    let det_a = outcome.det_a().clone();
    match outcome.into_result() {
        Ok(s) => Ok(InverseResponse {
            det_a: s.det_a,
            a_inv: s.inverse,
            solution: s.solution,
        }),
        Err(error) => Err(ToolFailure {
            error,
            det_a: Some(det_a),
        }),
    }
}

fn required_component(cell: &Option<Cell>, field: &str) -> Result<f64, MatvecError> {
    match cell {
        Some(c) if !c.is_blank() => parse_component(&c.text(), field),
        _ => Err(MatvecError::incomplete_input(field)),
    }
}

fn read_vector(name: &str, input: Option<&VectorInput>, polar: bool) -> Result<Vector2D, MatvecError> {
    let input = input.ok_or_else(|| MatvecError::incomplete_input(name))?;
    let field = |f: &str| format!("{}.{}", name, f);
    if polar {
        let mag = required_component(&input.mag, &field("mag"))?;
        let deg = required_component(&input.deg, &field("deg"))?;
        Ok(to_cartesian(mag, deg))
    } else {
        let x = required_component(&input.x, &field("x"))?;
        let y = required_component(&input.y, &field("y"))?;
        Ok(Vector2D::new(x, y))
    }
}

fn pair(v: &Vector2D) -> [String; 2] {
    [display(v.x), display(v.y)]
}

fn report(v: &Vector2D) -> VectorReport {
    let p = to_polar(v);
    VectorReport {
        xy: pair(v),
        mag: display(p.magnitude),
        deg: display(p.degrees),
    }
}

pub fn vectors_calc(args: VectorsArgs) -> Result<VectorsResponse, ToolFailure> {
    let mode = args.input_mode.as_deref().ok_or_else(|| MatvecError::incomplete_input("inputMode"))?;
    let polar = match mode.trim() {
        "polar" => true,
        "cart" | "cartesian" => false,
        other => {
            return Err(MatvecError::service_error(format!("inputMode must be \"polar\" or \"cart\", got '{}'", other)).into())
        }
    };

    let u = read_vector("v1", args.v1.as_ref(), polar)?;
    let v = read_vector("v2", args.v2.as_ref(), polar)?;

    Ok(VectorsResponse {
        v1: report(&u),
        v2: report(&v),
        sum: pair(&sum(&u, &v)),
        diff: pair(&diff(&u, &v)),
        dot: display(dot(&u, &v)),
        cross: display(cross_z(&u, &v)),
        plot_spec: build_plot(&u, &v, &args.show),
    })
}

// ============ dispatch ============

fn text_content(text: String) -> JsonValue {
    json!([{ "type": "text", "text": text }])
}

fn tool_success(payload: JsonValue) -> JsonValue {
    let text = serde_json::to_string_pretty(&payload).unwrap_or_default();
    json!({
        "content": text_content(text),
        "structuredContent": payload,
        "isError": false
    })
}

fn tool_failure(tool: &str, failure: &ToolFailure) -> JsonValue {
    warn!(tool, code = %failure.error.code, "{}", failure.error.message);
    let payload = serde_json::to_value(failure).unwrap_or_else(|_| json!({ "error": { "code": ErrorCode::Internal } }));
    json!({
        "content": text_content(failure.error.to_string()),
        "structuredContent": payload,
        "isError": true
    })
}

fn run<A, R>(tool: &str, args: JsonValue, handler: impl FnOnce(A) -> Result<R, ToolFailure>) -> JsonValue
where
    A: DeserializeOwned,
    R: Serialize,
{
    let outcome = serde_json::from_value::<A>(args)
        .map_err(|e| ToolFailure::from(MatvecError::service_error(format!("invalid arguments for {}: {}", tool, e))))
        .and_then(handler)
        .and_then(|r| {
            serde_json::to_value(r).map_err(|e| ToolFailure::from(MatvecError::internal(e.to_string())))
        });

    match outcome {
        Ok(payload) => tool_success(payload),
        Err(failure) => tool_failure(tool, &failure),
    }
}

pub fn handle_tool_call(config: &ServerConfig, params: &Option<JsonValue>) -> Result<JsonValue, McpError> {
    let params = params.as_ref().ok_or_else(|| McpError::invalid_params("Missing params"))?;
    let name = params
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
    let args = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

    debug!(tool = name, "tools/call");
    match name {
        "matrix_operate" => Ok(run(name, args, |a| matrix_operate(a, config))),
        "linear_cramer" => Ok(run(name, args, |a| linear_cramer(a, config))),
        "linear_inverse" => Ok(run(name, args, |a| linear_inverse(a, config))),
        "vectors_calc" => Ok(run(name, args, vectors_calc)),
        _ => Err(McpError::invalid_params(format!("Unknown tool: {}", name))),
    }
}

pub fn tools_list() -> JsonValue {
    let grid = json!({
        "type": "array",
        "items": { "type": "array", "items": { "type": ["string", "number"] } },
        "description": "Rows of cells: integers, decimals or fractions such as \"3/4\"; empty cells are 0"
    });
    let column = json!({
        "type": "array",
        "items": { "type": ["string", "number"] },
        "description": "Right-hand side vector b"
    });
    let vector = json!({
        "type": "object",
        "properties": {
            "mag": { "type": ["string", "number"] },
            "deg": { "type": ["string", "number"] },
            "x": { "type": ["string", "number"] },
            "y": { "type": ["string", "number"] }
        },
        "description": "{mag, deg} in polar mode, {x, y} in cart mode"
    });

    json!({
        "tools": [
            {
                "name": "matrix_operate",
                "description": "Matrix algebra on grids A and B. Results are decimal strings with 6 places.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "A": grid,
                        "B": grid,
                        "op": {
                            "type": "string",
                            "enum": ["add", "subtract", "multiply", "determinant", "inverse", "transpose", "scalar-multiply",
                                     "sub", "mul", "det", "inv", "trans", "scale"]
                        },
                        "target": {
                            "type": "string",
                            "enum": ["A", "B"],
                            "description": "Operand of a unary operation (default: A)"
                        },
                        "k": {
                            "type": ["string", "number"],
                            "description": "Factor for scalar-multiply"
                        }
                    },
                    "required": ["A", "op"]
                }
            },
            {
                "name": "linear_cramer",
                "description": "Solve Ax = b by Cramer's rule, returning |A|, each A_i with its determinant, and x.",
                "inputSchema": {
                    "type": "object",
                    "properties": { "A": grid, "b": column },
                    "required": ["A", "b"]
                }
            },
            {
                "name": "linear_inverse",
                "description": "Solve Ax = b as x = A⁻¹b, returning |A|, A⁻¹ and x.",
                "inputSchema": {
                    "type": "object",
                    "properties": { "A": grid, "b": column },
                    "required": ["A", "b"]
                }
            },
            {
                "name": "vectors_calc",
                "description": "Sum, difference, dot and cross product of two 2-D vectors, plus a Plotly figure spec.",
                "inputSchema": {
                    "type": "object",
                    "properties": {
                        "inputMode": { "type": "string", "enum": ["polar", "cart"] },
                        "v1": vector,
                        "v2": vector,
                        "show": {
                            "type": "object",
                            "properties": {
                                "parallelogram": { "type": "boolean" },
                                "subtraction": { "type": "boolean" },
                                "grid": { "type": "object" }
                            }
                        }
                    },
                    "required": ["inputMode", "v1", "v2"]
                }
            }
        ]
    })
}
