//! JSON-RPC 2.0 envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{McpError, McpResult};

pub const JSONRPC_VERSION: &str = "2.0";

/// Request identifier. JSON-RPC allows a string, a number, or null.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(i64),
    Null,
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Null => f.write_str("null"),
        }
    }
}

impl From<&Value> for RequestId {
    fn from(value: &Value) -> Self {
        match value {
            Value::String(s) => RequestId::String(s.clone()),
            Value::Number(n) => n.as_i64().map_or(RequestId::Null, RequestId::Number),
            _ => RequestId::Null,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcErrorObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// A message without an id; the peer sends no reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Any JSON-RPC message. Decode inbound messages with [`JsonRpcMessage::decode`]
/// so a request is never mistaken for a notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Response(JsonRpcResponse),
    Error(JsonRpcError),
    Notification(JsonRpcNotification),
}

impl JsonRpcMessage {
    /// Decode a parsed JSON value, choosing the variant from the keys present.
    ///
    /// Anything carrying both `id` and `method` must decode as a request; if
    /// its id is not a string, an `i64`, or null, it is an invalid request
    /// rather than a notification.
    pub fn decode(value: Value) -> McpResult<Self> {
        let Some(object) = value.as_object() else {
            return Err(McpError::InvalidRequest(
                "message must be a JSON object".to_string(),
            ));
        };

        let has_id = object.contains_key("id");
        let has_method = object.contains_key("method");
        let has_error = object.contains_key("error");

        let decoded = match (has_id, has_method) {
            (true, true) => serde_json::from_value(value).map(JsonRpcMessage::Request),
            (false, true) => serde_json::from_value(value).map(JsonRpcMessage::Notification),
            (_, false) if has_error => serde_json::from_value(value).map(JsonRpcMessage::Error),
            (_, false) => serde_json::from_value(value).map(JsonRpcMessage::Response),
        };

        decoded.map_err(|e| McpError::InvalidRequest(e.to_string()))
    }
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
        }
    }
}
