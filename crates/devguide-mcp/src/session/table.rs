//! Session table for the SSE transport: maps session ids to the stream that
//! delivers their responses.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::{mpsc, Mutex};

use crate::protocol::ProtocolHandler;

/// One live SSE connection.
#[derive(Clone)]
pub struct SessionSlot {
    pub handler: Arc<ProtocolHandler>,
    pub outbound: mpsc::UnboundedSender<Value>,
}

/// Live SSE sessions keyed by session id.
#[derive(Clone, Default)]
pub struct SessionTable {
    sessions: Arc<Mutex<HashMap<String, SessionSlot>>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, id: &str, slot: SessionSlot) {
        tracing::debug!("Session opened: {id}");
        self.sessions.lock().await.insert(id.to_string(), slot);
    }

    pub async fn get(&self, id: &str) -> Option<SessionSlot> {
        self.sessions.lock().await.get(id).cloned()
    }

    pub async fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.lock().await.remove(id).is_some();
        if removed {
            tracing::debug!("Session closed: {id}");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
