//! Dispatch tests: JSON-RPC messages through the protocol handler.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use devguide_mcp::prompts::{PromptEntry, PromptHandler, PromptRegistry, RequestContext};
use devguide_mcp::protocol::ProtocolHandler;
use devguide_mcp::session::{SessionHandle, TransportKind};
use devguide_mcp::types::*;

// ─────────────────────── helpers ───────────────────────

const PROMPT_NAMES: [&str; 6] = [
    "git-best-practices",
    "github-workflow",
    "code-review-guidelines",
    "commit-message-format",
    "branch-naming-convention",
    "development-workflow",
];

fn builtin_handler() -> ProtocolHandler {
    let registry = Arc::new(PromptRegistry::builtin().unwrap());
    ProtocolHandler::new(registry, SessionHandle::new(TransportKind::Stdio))
}

fn mcp_request(id: i64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

fn init_request() -> Value {
    mcp_request(
        0,
        "initialize",
        json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        }),
    )
}

async fn send(handler: &ProtocolHandler, msg: Value) -> Option<Value> {
    let parsed: JsonRpcMessage = serde_json::from_value(msg).unwrap();
    handler.handle_message(parsed).await
}

async fn send_unwrap(handler: &ProtocolHandler, msg: Value) -> Value {
    send(handler, msg).await.expect("expected response")
}

async fn get_prompt(handler: &ProtocolHandler, id: i64, name: &str) -> Value {
    send_unwrap(handler, mcp_request(id, "prompts/get", json!({ "name": name }))).await
}

fn prompt_text(resp: &Value) -> &str {
    resp["result"]["messages"][0]["content"]["text"]
        .as_str()
        .expect("text content")
}

// ─────────────────────── handshake ───────────────────────

#[tokio::test]
async fn initialize_advertises_prompts_only() {
    let handler = builtin_handler();
    let resp = send_unwrap(&handler, init_request()).await;

    let result = &resp["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "github-issue-developer");
    assert_eq!(result["serverInfo"]["version"], "1.0.0");
    assert!(result["capabilities"]["prompts"].is_object());
    assert!(result["capabilities"].get("tools").is_none());

    assert!(!handler.is_initialized().await);
    let none = send(
        &handler,
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    )
    .await;
    assert!(none.is_none());
    assert!(handler.is_initialized().await);
}

#[tokio::test]
async fn initialize_without_params_is_invalid() {
    let handler = builtin_handler();
    let resp = send_unwrap(&handler, json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" })).await;
    assert_eq!(resp["error"]["code"], -32602);
}

#[tokio::test]
async fn ping_returns_empty_object() {
    let handler = builtin_handler();
    let resp = send_unwrap(&handler, json!({ "jsonrpc": "2.0", "id": "p", "method": "ping" })).await;
    assert_eq!(resp["id"], "p");
    assert_eq!(resp["result"], json!({}));
}

// ─────────────────────── prompts/list ───────────────────────

#[tokio::test]
async fn list_returns_six_names_in_order() {
    let handler = builtin_handler();
    let resp = send_unwrap(&handler, mcp_request(1, "prompts/list", json!({}))).await;

    let prompts = resp["result"]["prompts"].as_array().unwrap();
    let names: Vec<&str> = prompts.iter().map(|p| p["name"].as_str().unwrap()).collect();
    assert_eq!(names, PROMPT_NAMES);

    for prompt in prompts {
        let desc = prompt["description"].as_str().unwrap();
        assert!(!desc.is_empty());
    }
    assert_eq!(
        prompts[0]["description"],
        "Provides Git best practices for development workflow"
    );
}

#[tokio::test]
async fn list_is_stable_across_calls() {
    let handler = builtin_handler();
    let first = send_unwrap(&handler, mcp_request(1, "prompts/list", json!({}))).await;
    let second = send_unwrap(&handler, mcp_request(1, "prompts/list", json!({}))).await;
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ─────────────────────── prompts/get ───────────────────────

#[tokio::test]
async fn every_prompt_satisfies_the_envelope_contract() {
    let handler = builtin_handler();

    for (i, name) in PROMPT_NAMES.iter().enumerate() {
        let resp = get_prompt(&handler, i as i64, name).await;
        let result: PromptGetResult = serde_json::from_value(resp["result"].clone())
            .unwrap_or_else(|e| panic!("{name}: {e}; got {resp}"));

        assert!(!result.description.is_empty(), "{name}");
        assert!(!result.messages.is_empty(), "{name}");
        for message in &result.messages {
            assert_eq!(message.role, Role::User, "{name}");
            assert!(!message.content.text().is_empty(), "{name}");
        }
    }
}

#[tokio::test]
async fn git_best_practices_text() {
    let handler = builtin_handler();
    let resp = get_prompt(&handler, 1, "git-best-practices").await;
    let text = prompt_text(&resp);
    assert!(text.contains("Commit Guidelines"));
    assert!(text.contains("Branch Management"));
    assert_eq!(resp["result"]["messages"][0]["role"], "user");
    assert_eq!(resp["result"]["messages"][0]["content"]["type"], "text");
}

#[tokio::test]
async fn commit_message_format_text() {
    let handler = builtin_handler();
    let resp = get_prompt(&handler, 1, "commit-message-format").await;
    let text = prompt_text(&resp);
    for keyword in ["feat", "fix", "imperative mood"] {
        assert!(text.contains(keyword), "missing {keyword}");
    }
}

#[tokio::test]
async fn arguments_are_ignored() {
    let handler = builtin_handler();
    let plain = get_prompt(&handler, 1, "github-workflow").await;
    let with_args = send_unwrap(
        &handler,
        mcp_request(
            1,
            "prompts/get",
            json!({ "name": "github-workflow", "arguments": { "repo": "octo/cat" } }),
        ),
    )
    .await;
    assert_eq!(plain, with_args);
}

#[tokio::test]
async fn get_is_byte_identical_across_calls() {
    let handler = builtin_handler();
    for name in PROMPT_NAMES {
        let a = serde_json::to_string(&get_prompt(&handler, 7, name).await).unwrap();
        let b = serde_json::to_string(&get_prompt(&handler, 7, name).await).unwrap();
        assert_eq!(a, b, "{name}");
    }
}

// ─────────────────────── errors ───────────────────────

#[tokio::test]
async fn unknown_prompt_is_not_found() {
    let handler = builtin_handler();
    let resp = get_prompt(&handler, 5, "rebase-strategy").await;
    assert_eq!(resp["id"], 5);
    assert_eq!(resp["error"]["code"], -32804);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("rebase-strategy"));

    // The handler keeps serving after the error.
    let ok = get_prompt(&handler, 6, "git-best-practices").await;
    assert!(ok.get("result").is_some());
}

#[tokio::test]
async fn unknown_method_and_bad_params() {
    let handler = builtin_handler();

    let resp = send_unwrap(&handler, mcp_request(1, "tools/list", json!({}))).await;
    assert_eq!(resp["error"]["code"], -32601);

    let resp = send_unwrap(&handler, json!({ "jsonrpc": "2.0", "id": 2, "method": "prompts/get" })).await;
    assert_eq!(resp["error"]["code"], -32602);

    let resp = send_unwrap(&handler, mcp_request(3, "prompts/get", json!({ "title": "x" }))).await;
    assert_eq!(resp["error"]["code"], -32602);

    let resp = send_unwrap(&handler, json!({ "jsonrpc": "1.0", "id": 4, "method": "ping" })).await;
    assert_eq!(resp["error"]["code"], -32600);
}

struct Failing;

#[async_trait]
impl PromptHandler for Failing {
    async fn get(
        &self,
        _ctx: &RequestContext,
        _session: &SessionHandle,
        _params: &PromptGetParams,
    ) -> Result<PromptGetResult, HandlerError> {
        Err(HandlerError::Failed("upstream unavailable".to_string()))
    }
}

#[tokio::test]
async fn handler_failure_becomes_error_response() {
    let registry = PromptRegistry::new(vec![PromptEntry::new("broken", "always fails", Failing)]).unwrap();
    let handler = ProtocolHandler::new(Arc::new(registry), SessionHandle::new(TransportKind::Http));

    let resp = get_prompt(&handler, 1, "broken").await;
    assert_eq!(resp["error"]["code"], -32805);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("upstream unavailable"));
}

// ─────────────────────── cancellation ───────────────────────

struct Slow {
    started: Arc<Notify>,
}

#[async_trait]
impl PromptHandler for Slow {
    async fn get(
        &self,
        _ctx: &RequestContext,
        _session: &SessionHandle,
        _params: &PromptGetParams,
    ) -> Result<PromptGetResult, HandlerError> {
        self.started.notify_one();
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(HandlerError::Failed("should have been cancelled".to_string()))
    }
}

#[tokio::test]
async fn cancellation_notification_stops_in_flight_request() {
    let started = Arc::new(Notify::new());
    let registry = PromptRegistry::new(vec![PromptEntry::new(
        "slow",
        "waits for a long time",
        Slow {
            started: started.clone(),
        },
    )])
    .unwrap();
    let handler = Arc::new(ProtocolHandler::new(
        Arc::new(registry),
        SessionHandle::new(TransportKind::Sse),
    ));

    let in_flight = {
        let handler = handler.clone();
        tokio::spawn(async move { get_prompt(&handler, 42, "slow").await })
    };

    started.notified().await;
    let none = send(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": { "requestId": 42, "reason": "user aborted" }
        }),
    )
    .await;
    assert!(none.is_none());

    let resp = tokio::time::timeout(Duration::from_secs(5), in_flight)
        .await
        .expect("request should finish after cancellation")
        .unwrap();
    assert_eq!(resp["id"], 42);
    assert_eq!(resp["error"]["code"], -32800);
}

struct Quick;

#[async_trait]
impl PromptHandler for Quick {
    async fn get(
        &self,
        _ctx: &RequestContext,
        _session: &SessionHandle,
        _params: &PromptGetParams,
    ) -> Result<PromptGetResult, HandlerError> {
        Ok(PromptGetResult {
            description: "answers at once".to_string(),
            messages: vec![PromptMessage::user_text("done")],
        })
    }
}

#[tokio::test]
async fn reused_id_keeps_earlier_request_cancellable() {
    let started = Arc::new(Notify::new());
    let registry = PromptRegistry::new(vec![
        PromptEntry::new(
            "slow",
            "waits for a long time",
            Slow {
                started: started.clone(),
            },
        ),
        PromptEntry::new("quick", "answers at once", Quick),
    ])
    .unwrap();
    let handler = Arc::new(ProtocolHandler::new(
        Arc::new(registry),
        SessionHandle::new(TransportKind::Sse),
    ));

    let slow = {
        let handler = handler.clone();
        tokio::spawn(async move { get_prompt(&handler, 7, "slow").await })
    };
    started.notified().await;

    // A second request with the same id finishes while the first still runs.
    let quick = get_prompt(&handler, 7, "quick").await;
    assert_eq!(quick["id"], 7);
    assert_eq!(quick["result"]["description"], "answers at once");

    send(
        &handler,
        json!({
            "jsonrpc": "2.0",
            "method": "notifications/cancelled",
            "params": { "requestId": 7 }
        }),
    )
    .await;

    let resp = tokio::time::timeout(Duration::from_secs(5), slow)
        .await
        .expect("earlier request should still be cancellable")
        .unwrap();
    assert_eq!(resp["id"], 7);
    assert_eq!(resp["error"]["code"], -32800);
}
