//! Error types and JSON-RPC error codes for the prompt server.

use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// MCP-specific error codes.
pub mod mcp_error_codes {
    pub const REQUEST_CANCELLED: i32 = -32800;
    pub const PROMPT_NOT_FOUND: i32 = -32804;
    pub const HANDLER_FAILED: i32 = -32805;
}

/// Failure reported by a prompt handler.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("{0}")]
    Failed(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
}

/// All errors that can occur in the prompt server.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Request cancelled")]
    RequestCancelled,

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    #[error("Prompt handler '{name}' failed: {source}")]
    HandlerFailed {
        name: String,
        #[source]
        source: HandlerError,
    },

    #[error("Duplicate prompt name: {0}")]
    DuplicatePrompt(String),

    #[error("Invalid prompt entry: {0}")]
    InvalidPrompt(String),

    #[error("Invalid listen address {addr:?}: {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) | McpError::Json(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::RequestCancelled => REQUEST_CANCELLED,
            McpError::PromptNotFound(_) => PROMPT_NOT_FOUND,
            McpError::HandlerFailed {
                source: HandlerError::InvalidArguments(_),
                ..
            } => INVALID_PARAMS,
            McpError::HandlerFailed { .. } => HANDLER_FAILED,
            McpError::InternalError(_)
            | McpError::DuplicatePrompt(_)
            | McpError::InvalidPrompt(_)
            | McpError::InvalidAddress { .. }
            | McpError::Transport(_)
            | McpError::Io(_) => INTERNAL_ERROR,
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.to_string())
    }
}

impl From<devguide::GuideError> for McpError {
    fn from(e: devguide::GuideError) -> Self {
        match e {
            devguide::GuideError::NotFound(name) => McpError::PromptNotFound(name),
            devguide::GuideError::InvalidName(name) => {
                McpError::InvalidParams(format!("invalid prompt name {name:?}"))
            }
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;
