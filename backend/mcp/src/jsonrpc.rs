//! JSON-RPC 2.0 wire types and response constructors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PARSE_ERROR: i64 = -32700;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;

/// An incoming request or notification.
#[derive(Debug, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent on notifications.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

pub fn success_response(id: Value, result: Value) -> Response {
    Response {
        jsonrpc: "2.0".to_string(),
        result: Some(result),
        error: None,
        id,
    }
}

pub fn error_response(id: Value, code: i64, message: impl Into<String>) -> Response {
    Response {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.into(),
            data: None,
        }),
        id,
    }
}

pub fn method_not_found(id: Value, method: &str) -> Response {
    error_response(id, METHOD_NOT_FOUND, format!("Method not found: {method}"))
}

pub fn invalid_params(id: Value, message: impl Into<String>) -> Response {
    error_response(id, INVALID_PARAMS, message)
}

pub fn parse_error() -> Response {
    error_response(Value::Null, PARSE_ERROR, "Parse error")
}
