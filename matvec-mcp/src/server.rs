//! Request routing for the stdio transport

use serde_json::{json, Value as JsonValue};
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{McpError, McpRequest, McpResponse};
use crate::tools::{handle_tool_call, tools_list};

pub const PROTOCOL_VERSION: &str = "2025-11-25";
pub const SERVER_NAME: &str = "matvec";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Handle one line of input. Notifications produce no response.
pub fn process_line(config: &ServerConfig, line: &str) -> Option<McpResponse> {
    let request: McpRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            warn!(error = %e, "unparseable request");
            return Some(McpResponse::failure(None, McpError::parse_error(e)));
        }
    };

    debug!(method = %request.method, "processing");
    let response = handle_request(config, &request);

    if request.id.is_none() {
        debug!(method = %request.method, "notification processed (no response)");
        return None;
    }
    Some(response)
}

pub fn handle_request(config: &ServerConfig, request: &McpRequest) -> McpResponse {
    let result = match request.method.as_str() {
        "initialize" => Ok(initialize(&request.params)),
        "initialized" | "notifications/initialized" | "ping" => Ok(json!({})),
        "tools/list" => Ok(tools_list()),
        "tools/call" => handle_tool_call(config, &request.params),
        _ => Err(McpError::method_not_found(&request.method)),
    };

    match result {
        Ok(r) => McpResponse::success(request.id.clone(), r),
        Err(e) => McpResponse::failure(request.id.clone(), e),
    }
}

fn initialize(params: &Option<JsonValue>) -> JsonValue {
    let client = params
        .as_ref()
        .and_then(|p| p.get("clientInfo"))
        .and_then(|c| c.get("name"))
        .and_then(|n| n.as_str())
        .unwrap_or("unknown");

    // Echo the client's protocol version for compatibility
    let protocol = params
        .as_ref()
        .and_then(|p| p.get("protocolVersion"))
        .and_then(|v| v.as_str())
        .unwrap_or(PROTOCOL_VERSION);

    info!(client, protocol, "client connected");

    json!({
        "protocolVersion": protocol,
        "serverInfo": {
            "name": SERVER_NAME,
            "version": SERVER_VERSION,
            "description": "Matrix algebra, linear systems and 2-D vectors"
        },
        "capabilities": {
            "tools": { "listChanged": false }
        },
        "instructions": "Cells are text: integers, decimals or fractions such as 3/4. All numeric results are decimal strings with 6 places."
    })
}
