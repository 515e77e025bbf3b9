//! Per-connection session handles.

pub mod table;

use serde::Serialize;

pub use table::SessionTable;

/// Transport a session arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Stdio,
    Sse,
    Http,
}

/// Opaque per-connection handle passed to prompt handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    id: String,
    transport: TransportKind,
}

impl SessionHandle {
    /// Create a handle with a fresh random id.
    pub fn new(transport: TransportKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            transport,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transport(&self) -> TransportKind {
        self.transport
    }
}
