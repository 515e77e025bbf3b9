//! Server assembly: registers the prompt registry and runs one transport.

use std::sync::Arc;

use crate::config::TransportMode;
use crate::prompts::PromptRegistry;
use crate::protocol::ProtocolHandler;
use crate::session::{SessionHandle, TransportKind};
use crate::transport::{SseTransport, StdioTransport};
use crate::types::{McpResult, SERVER_NAME, SERVER_VERSION};

/// The single server instance shared by every connection.
pub struct McpServer {
    registry: Arc<PromptRegistry>,
    mode: TransportMode,
}

impl McpServer {
    pub fn new(registry: PromptRegistry, mode: TransportMode) -> Self {
        for entry in registry.list_all() {
            tracing::info!("Registered prompt: {} - {}", entry.name, entry.description);
        }

        Self {
            registry: Arc::new(registry),
            mode,
        }
    }

    pub fn registry(&self) -> &Arc<PromptRegistry> {
        &self.registry
    }

    pub fn mode(&self) -> &TransportMode {
        &self.mode
    }

    /// Run the selected transport until it finishes. Bind and I/O failures
    /// are returned to the caller; there is no fallback transport.
    pub async fn run(self) -> McpResult<()> {
        tracing::info!("Starting GitHub Issue Developer MCP Server...");
        tracing::info!("Server Name: {SERVER_NAME}");
        tracing::info!("Version: {SERVER_VERSION}");

        match self.mode {
            TransportMode::Http { addr } => {
                let transport = SseTransport::new(self.registry);
                transport.run(&addr).await
            }
            TransportMode::Stdio => {
                let handler = ProtocolHandler::new(
                    self.registry,
                    SessionHandle::new(TransportKind::Stdio),
                );
                StdioTransport::new(handler).run().await
            }
        }
    }
}
