//! End-to-end tool calls through the JSON-RPC layer

use matvec_mcp::{process_line, ServerConfig};
use serde_json::{json, Value};

fn call_tool(name: &str, arguments: Value) -> Value {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": name, "arguments": arguments }
    });
    let response = process_line(&ServerConfig::default(), &request.to_string()).expect("a response");
    assert!(response.error.is_none(), "protocol error: {:?}", response.error);
    response.result.expect("a result")
}

fn payload(result: &Value) -> &Value {
    &result["structuredContent"]
}

#[test]
fn diagonal_system_solves_by_both_methods() {
    let args = json!({ "A": [["2", "0"], ["0", "2"]], "b": ["4", "6"] });

    let cramer = call_tool("linear_cramer", args.clone());
    assert_eq!(cramer["isError"], false);
    let p = payload(&cramer);
    assert_eq!(p["detA"], "4.000000");
    assert_eq!(p["dets"], json!(["8.000000", "12.000000"]));
    assert_eq!(p["solution"], json!(["2.000000", "3.000000"]));
    assert_eq!(p["matrices"]["A1"], json!([["4.000000", "0.000000"], ["6.000000", "2.000000"]]));
    assert_eq!(p["matrices"]["A2"], json!([["2.000000", "4.000000"], ["0.000000", "6.000000"]]));

    let inverse = call_tool("linear_inverse", args);
    assert_eq!(inverse["isError"], false);
    let p = payload(&inverse);
    assert_eq!(p["detA"], "4.000000");
    assert_eq!(p["Ainv"], json!([["0.500000", "0.000000"], ["0.000000", "0.500000"]]));
    assert_eq!(p["solution"], json!(["2.000000", "3.000000"]));
}

#[test]
fn singular_system_reports_determinant() {
    let args = json!({ "A": [["1", "2"], ["2", "4"]], "b": ["3", "6"] });

    let cramer = call_tool("linear_cramer", args.clone());
    assert_eq!(cramer["isError"], true);
    assert_eq!(payload(&cramer)["error"]["code"], "NO_UNIQUE_SOLUTION");
    assert_eq!(payload(&cramer)["detA"], "0.000000");

    let inverse = call_tool("linear_inverse", args);
    assert_eq!(inverse["isError"], true);
    assert_eq!(payload(&inverse)["error"]["code"], "SINGULAR");
    assert_eq!(payload(&inverse)["detA"], "0.000000");
}

#[test]
fn matrix_operations_with_fractions() {
    let a = json!([["1/2", "1"], ["0", "2"]]);
    let b = json!([[2, 0], [1, "3/4"]]);

    let r = call_tool("matrix_operate", json!({ "A": a, "B": b, "op": "add" }));
    assert_eq!(payload(&r)["resultMatrix"], json!([["2.500000", "1.000000"], ["1.000000", "2.750000"]]));

    let r = call_tool("matrix_operate", json!({ "A": a, "B": b, "op": "mul" }));
    assert_eq!(payload(&r)["resultMatrix"], json!([["2.000000", "0.750000"], ["2.000000", "1.500000"]]));

    let r = call_tool("matrix_operate", json!({ "A": a, "op": "det" }));
    assert_eq!(payload(&r)["scalar"], "1.000000");

    let r = call_tool("matrix_operate", json!({ "A": a, "op": "inverse" }));
    assert_eq!(payload(&r)["resultMatrix"], json!([["2.000000", "-1.000000"], ["0.000000", "0.500000"]]));

    let r = call_tool("matrix_operate", json!({ "A": a, "B": b, "op": "transpose", "target": "B" }));
    assert_eq!(payload(&r)["resultMatrix"], json!([["2.000000", "1.000000"], ["0.000000", "0.750000"]]));
}

#[test]
fn shape_mismatch_is_a_tool_error() {
    let r = call_tool(
        "matrix_operate",
        json!({ "A": [["1", "2"], ["3", "4"]], "B": [["1", "2", "3"]], "op": "subtract" }),
    );
    assert_eq!(r["isError"], true);
    assert_eq!(payload(&r)["error"]["code"], "SHAPE_MISMATCH");
    assert!(r["content"][0]["text"].as_str().unwrap().starts_with("[SHAPE_MISMATCH]"));
}

#[test]
fn parse_errors_name_the_cell() {
    let r = call_tool("linear_cramer", json!({ "A": [["1", "x"], ["0", "1"]], "b": ["1", "1"] }));
    assert_eq!(payload(&r)["error"]["code"], "PARSE_ERROR");
    assert_eq!(payload(&r)["error"]["cell"], "A[0][1]");

    let r = call_tool("matrix_operate", json!({ "A": [["1/0"]], "op": "det" }));
    assert_eq!(payload(&r)["error"]["code"], "DIV_ZERO");
}

#[test]
fn malformed_arguments_are_service_errors() {
    let r = call_tool("linear_inverse", json!({ "A": "not a grid", "b": [] }));
    assert_eq!(r["isError"], true);
    assert_eq!(payload(&r)["error"]["code"], "SERVICE_ERROR");

    let r = call_tool("linear_inverse", json!({ "b": ["1"] }));
    assert_eq!(payload(&r)["error"]["code"], "INCOMPLETE_INPUT");
}

#[test]
fn unknown_tool_is_a_protocol_error() {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 9,
        "method": "tools/call",
        "params": { "name": "matrix_divide", "arguments": {} }
    });
    let response = process_line(&ServerConfig::default(), &request.to_string()).unwrap();
    assert_eq!(response.error.unwrap().code, -32602);
}

#[test]
fn vectors_calc_cartesian() {
    let r = call_tool(
        "vectors_calc",
        json!({
            "inputMode": "cart",
            "v1": { "x": "1", "y": "2" },
            "v2": { "x": 3, "y": 4 },
            "show": { "parallelogram": true, "subtraction": true }
        }),
    );
    assert_eq!(r["isError"], false);
    let p = payload(&r);
    assert_eq!(p["v1"]["xy"], json!(["1.000000", "2.000000"]));
    assert_eq!(p["v2"]["mag"], "5.000000");
    assert_eq!(p["sum"], json!(["4.000000", "6.000000"]));
    assert_eq!(p["diff"], json!(["-2.000000", "-2.000000"]));
    assert_eq!(p["dot"], "11.000000");
    assert_eq!(p["cross"], "-2.000000");

    let annotations = p["plotSpec"]["layout"]["annotations"].as_array().unwrap();
    let texts: Vec<&str> = annotations.iter().filter_map(|a| a["text"].as_str()).collect();
    assert_eq!(texts, vec!["u", "v", "u+v", "u−v"]);
    let sub = &annotations[3];
    assert_eq!((sub["ax"].as_f64(), sub["ay"].as_f64()), (Some(0.0), Some(0.0)));

    let shapes = p["plotSpec"]["layout"]["shapes"].as_array().unwrap();
    assert!(shapes.iter().any(|s| s["type"] == "path"));
}

#[test]
fn vectors_calc_missing_field() {
    let r = call_tool(
        "vectors_calc",
        json!({ "inputMode": "polar", "v1": { "mag": "2" }, "v2": { "mag": "1", "deg": "0" } }),
    );
    assert_eq!(r["isError"], true);
    assert_eq!(payload(&r)["error"]["code"], "INCOMPLETE_INPUT");
}
