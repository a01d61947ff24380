//! Integration tests for MCP protocol handling.
//!
//! These tests verify the MCP server's JSON-RPC 2.0 protocol implementation,
//! including request/response parsing, error responses, and the tool-result
//! envelope shape.

use uber_ads_mcp::mcp::protocol::{
    parse_message, ErrorCode, IncomingMessage, JsonRpcError, JsonRpcResponse, RequestId,
};
use uber_ads_mcp::mcp::server::{ToolCallResult, ToolContent};

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "initialize");
        assert_eq!(req.id, RequestId::Number(1));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_tools_call_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": {
            "name": "get_campaigns",
            "arguments": {"ad_account_id": "acct-1"}
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "tools/call");
        let params = req.params.unwrap();
        assert_eq!(params["name"], "get_campaigns");
        assert_eq!(params["arguments"]["ad_account_id"], "acct-1");
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Notification(notif) = result.unwrap() {
        assert_eq!(notif.method, "notifications/initialized");
    } else {
        panic!("Expected Notification");
    }
}

#[test]
fn test_parse_invalid_json() {
    let result = parse_message("not valid json");
    assert!(result.is_err());
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    let json = r#"{
        "id": 1,
        "method": "tools/list"
    }"#;

    let result = parse_message(json);
    assert!(result.is_err());
}

#[test]
fn test_parse_non_object_message() {
    let result = parse_message("[1, 2, 3]");
    let err = result.unwrap_err();
    assert_eq!(err.error.code, ErrorCode::ParseError.code());
}

// =============================================================================
// Response Serialisation Tests
// =============================================================================

#[test]
fn test_success_response_shape() {
    let response = JsonRpcResponse::success(
        RequestId::String("req-7".to_string()),
        serde_json::json!({"tools": []}),
    );
    let value = serde_json::to_value(&response).unwrap();

    assert_eq!(value["jsonrpc"], "2.0");
    assert_eq!(value["id"], "req-7");
    assert!(value["result"]["tools"].is_array());
}

#[test]
fn test_method_not_found_response_shape() {
    let error = JsonRpcError::method_not_found(RequestId::Number(3), "resources/list");
    let value = serde_json::to_value(&error).unwrap();

    assert_eq!(value["error"]["code"], -32601);
    assert!(value["error"]["message"]
        .as_str()
        .unwrap()
        .contains("resources/list"));
}

// =============================================================================
// Tool Envelope Tests
// =============================================================================

#[test]
fn test_success_envelope_omits_error_flag() {
    let result = ToolCallResult::text(r#"[{"id": "c1"}]"#);
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["content"][0]["type"], "text");
    assert_eq!(value["content"][0]["text"], r#"[{"id": "c1"}]"#);
    assert!(value.get("isError").is_none());
}

#[test]
fn test_error_envelope_sets_error_flag() {
    let result = ToolCallResult::error("Unknown tool: get_refunds");
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["isError"], true);
    let ToolContent::Text { text } = &result.content[0];
    assert_eq!(text, "Unknown tool: get_refunds");
}
