//! Capability negotiation during `initialize`.

use crate::types::{InitializeParams, InitializeResult, MCP_VERSION};

/// Session state recorded by the handshake.
#[derive(Debug, Clone, Default)]
pub struct NegotiatedCapabilities {
    pub initialized: bool,
}

impl NegotiatedCapabilities {
    /// Log the client and answer with the server's fixed capabilities.
    /// A protocol version mismatch is logged, never rejected.
    pub fn negotiate(&mut self, params: InitializeParams) -> InitializeResult {
        if params.protocol_version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}",
                params.protocol_version,
                MCP_VERSION
            );
        }

        tracing::info!(
            "Initialized with client: {} v{}",
            params.client_info.name,
            params.client_info.version
        );

        InitializeResult::default_result()
    }

    pub fn mark_initialized(&mut self) {
        self.initialized = true;
        tracing::info!("MCP handshake complete");
    }
}
