//! Request dispatcher: routes JSON-RPC messages to the prompt registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::prompts::{PromptRegistry, RequestContext};
use crate::session::SessionHandle;
use crate::types::*;

use super::negotiation::NegotiatedCapabilities;
use super::validator::validate_request;

/// Dispatches JSON-RPC messages for one session against the shared registry.
pub struct ProtocolHandler {
    registry: Arc<PromptRegistry>,
    session: SessionHandle,
    capabilities: Mutex<NegotiatedCapabilities>,
    /// Running requests by id. A client may reuse an id while an earlier
    /// request with it is still running, so each entry is tagged with a
    /// per-handler sequence number.
    in_flight: Mutex<HashMap<RequestId, Vec<(u64, CancellationToken)>>>,
    next_seq: AtomicU64,
}

impl ProtocolHandler {
    pub fn new(registry: Arc<PromptRegistry>, session: SessionHandle) -> Self {
        Self {
            registry,
            session,
            capabilities: Mutex::new(NegotiatedCapabilities::default()),
            in_flight: Mutex::new(HashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Whether the client has completed the `initialized` handshake.
    pub async fn is_initialized(&self) -> bool {
        self.capabilities.lock().await.initialized
    }

    /// Handle one inbound message. Returns the response for requests and
    /// `None` for notifications.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<Value> {
        match msg {
            JsonRpcMessage::Request(req) => Some(self.handle_request(req).await),
            JsonRpcMessage::Notification(notif) => {
                self.handle_notification(notif).await;
                None
            }
            JsonRpcMessage::Response(_) | JsonRpcMessage::Error(_) => {
                tracing::warn!("Ignoring response message from client");
                None
            }
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> Value {
        if let Err(e) = validate_request(&request) {
            return to_value_or_null(&e.to_json_rpc_error(request.id));
        }

        let id = request.id.clone();
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        self.in_flight
            .lock()
            .await
            .entry(id.clone())
            .or_default()
            .push((seq, token.clone()));

        let ctx = RequestContext::with_token(id.clone(), token);
        let result = self.dispatch_request(&request, &ctx).await;

        self.finish_request(&id, seq).await;

        match result {
            Ok(value) => to_value_or_null(&JsonRpcResponse::new(id, value)),
            Err(e) => {
                tracing::debug!("Request {id} ({}) failed: {e}", request.method);
                to_value_or_null(&e.to_json_rpc_error(id))
            }
        }
    }

    /// Drop this request's token, leaving any other request with the same id.
    async fn finish_request(&self, id: &RequestId, seq: u64) {
        let mut in_flight = self.in_flight.lock().await;
        if let Some(tokens) = in_flight.get_mut(id) {
            tokens.retain(|(s, _)| *s != seq);
            if tokens.is_empty() {
                in_flight.remove(id);
            }
        }
    }

    async fn dispatch_request(
        &self,
        request: &JsonRpcRequest,
        ctx: &RequestContext,
    ) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.params.clone()).await,
            "shutdown" => {
                tracing::info!("Shutdown requested");
                Ok(empty_object())
            }
            "ping" => Ok(empty_object()),

            "prompts/list" => self.handle_prompts_list(request.params.clone()),
            "prompts/get" => self.handle_prompts_get(request.params.clone(), ctx).await,

            _ => Err(McpError::MethodNotFound(request.method.clone())),
        }
    }

    async fn handle_notification(&self, notification: JsonRpcNotification) {
        match notification.method.as_str() {
            "initialized" | "notifications/initialized" => {
                self.capabilities.lock().await.mark_initialized();
            }
            "notifications/cancelled" | "$/cancelRequest" => {
                self.handle_cancelled(notification.params).await;
            }
            _ => {
                tracing::debug!("Unknown notification: {}", notification.method);
            }
        }
    }

    async fn handle_cancelled(&self, params: Option<Value>) {
        let params: CancelledParams = match parse_params(params, "cancel") {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("Malformed cancellation: {e}");
                return;
            }
        };

        let id = RequestId::from(&params.request_id);
        match self.in_flight.lock().await.get(&id) {
            Some(tokens) => {
                tracing::info!(
                    "Cancelling request {id}: {}",
                    params.reason.as_deref().unwrap_or("no reason given")
                );
                for (_, token) in tokens {
                    token.cancel();
                }
            }
            None => tracing::debug!("Cancellation for unknown or finished request {id}"),
        }
    }

    async fn handle_initialize(&self, params: Option<Value>) -> McpResult<Value> {
        let init_params: InitializeParams = parse_params(params, "initialize")?;
        let result = self.capabilities.lock().await.negotiate(init_params);
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    fn handle_prompts_list(&self, params: Option<Value>) -> McpResult<Value> {
        if let Some(params) = params {
            let list: PromptListParams = serde_json::from_value(params)
                .map_err(|e| McpError::InvalidParams(e.to_string()))?;
            if let Some(cursor) = list.cursor {
                tracing::debug!("Ignoring prompts/list cursor {cursor}; single page");
            }
        }

        let result = PromptListResult {
            prompts: self.registry.definitions(),
            next_cursor: None,
        };
        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }

    async fn handle_prompts_get(
        &self,
        params: Option<Value>,
        ctx: &RequestContext,
    ) -> McpResult<Value> {
        let get_params: PromptGetParams = parse_params(params, "prompts/get")?;

        let result = self.registry.get(ctx, &self.session, &get_params).await?;

        serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
    }
}

fn parse_params<T: DeserializeOwned>(params: Option<Value>, method: &str) -> McpResult<T> {
    params
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))?
        .ok_or_else(|| McpError::InvalidParams(format!("{method} params required")))
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

fn to_value_or_null(value: &impl Serialize) -> Value {
    serde_json::to_value(value).unwrap_or_default()
}
