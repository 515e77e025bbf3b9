//! HTTP transport: SSE streams per client, plus plain JSON-RPC over POST.
//!
//! Routes:
//! - `GET /sse` opens a stream. The first event (`endpoint`) names the URL
//!   the client must POST its messages to; replies arrive as `message` events.
//! - `POST /message?sessionId=<id>` submits a message for that stream.
//! - `POST /mcp` answers a single JSON-RPC message in the HTTP response.
//! - `GET /health` reports liveness and the number of open streams.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json as AxumJson, Response,
    },
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::normalize_listen_addr;
use crate::prompts::PromptRegistry;
use crate::protocol::ProtocolHandler;
use crate::session::table::SessionSlot;
use crate::session::{SessionHandle, SessionTable, TransportKind};
use crate::types::{
    JsonRpcMessage, McpError, McpResult, RequestId, SERVER_NAME, SERVER_VERSION,
};

/// State shared by every connection: the one registry and the live streams.
pub struct ServerState {
    pub registry: Arc<PromptRegistry>,
    pub sessions: SessionTable,
}

/// HTTP + SSE transport for web-based MCP clients.
pub struct SseTransport {
    state: Arc<ServerState>,
}

impl SseTransport {
    pub fn new(registry: Arc<PromptRegistry>) -> Self {
        Self {
            state: Arc::new(ServerState {
                registry,
                sessions: SessionTable::new(),
            }),
        }
    }

    pub fn sessions(&self) -> &SessionTable {
        &self.state.sessions
    }

    /// Build the axum router. Exposed so tests can drive it without a socket.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/sse", get(handle_sse_connect))
            .route("/message", post(handle_session_message))
            .route("/mcp", post(handle_request))
            .route("/health", get(handle_health))
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// Bind `addr` and serve until the listener fails.
    pub async fn run(&self, addr: &str) -> McpResult<()> {
        let addr = normalize_listen_addr(addr)?;

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(McpError::Io)?;

        tracing::info!("MCP server listening at {addr}");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| McpError::Transport(e.to_string()))?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Removes a session from the table when its stream is dropped.
struct SessionGuard {
    id: String,
    sessions: SessionTable,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let id = std::mem::take(&mut self.id);
        let sessions = self.sessions.clone();
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                sessions.remove(&id).await;
            });
        }
    }
}

async fn handle_sse_connect(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl futures::Stream<Item = Result<Event, Infallible>>> {
    let session = SessionHandle::new(TransportKind::Sse);
    let id = session.id().to_string();
    let handler = Arc::new(ProtocolHandler::new(state.registry.clone(), session));
    let (outbound, mut inbox) = mpsc::unbounded_channel();

    state
        .sessions
        .insert(&id, SessionSlot { handler, outbound })
        .await;

    tracing::info!("SSE client connected: session {id}");

    let endpoint = format!("/message?sessionId={id}");
    let guard = SessionGuard {
        id,
        sessions: state.sessions.clone(),
    };

    let stream = async_stream::stream! {
        let _guard = guard;
        yield Ok(Event::default().event("endpoint").data(endpoint));

        while let Some(reply) = inbox.recv().await {
            match serde_json::to_string(&reply) {
                Ok(json) => yield Ok(Event::default().event("message").data(json)),
                Err(e) => tracing::warn!("Dropping unserializable reply: {e}"),
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

async fn handle_session_message(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(slot) = state.sessions.get(&query.session_id).await else {
        return (StatusCode::NOT_FOUND, "Unknown session").into_response();
    };

    let msg = match parse_body(&body) {
        Ok(msg) => msg,
        Err(response) => return response,
    };

    // The reply travels over the stream, not this response.
    tokio::spawn(async move {
        if let Some(reply) = slot.handler.handle_message(msg).await {
            if slot.outbound.send(reply).is_err() {
                tracing::debug!("Stream closed before reply was delivered");
            }
        }
    });

    StatusCode::ACCEPTED.into_response()
}

async fn handle_request(State(state): State<Arc<ServerState>>, body: Bytes) -> Response {
    let msg = match parse_body(&body) {
        Ok(msg) => msg,
        Err(response) => return response,
    };

    let handler = ProtocolHandler::new(
        state.registry.clone(),
        SessionHandle::new(TransportKind::Http),
    );

    match handler.handle_message(msg).await {
        Some(reply) => AxumJson(reply).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn handle_health(State(state): State<Arc<ServerState>>) -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": SERVER_VERSION,
        "sessions": state.sessions.count().await,
    }))
}

fn parse_body(body: &[u8]) -> Result<JsonRpcMessage, Response> {
    serde_json::from_slice::<Value>(body)
        .map_err(|e| McpError::ParseError(e.to_string()))
        .and_then(JsonRpcMessage::decode)
        .map_err(|err| {
            (
                StatusCode::BAD_REQUEST,
                AxumJson(err.to_json_rpc_error(RequestId::Null)),
            )
                .into_response()
        })
}
