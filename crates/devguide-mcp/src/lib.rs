//! GitHub Issue Developer MCP server: Git and GitHub workflow guidance as MCP prompts.

pub mod config;
pub mod prompts;
pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;
pub mod types;

pub use config::TransportMode;
pub use prompts::{PromptHandler, PromptRegistry, RequestContext};
pub use protocol::ProtocolHandler;
pub use server::McpServer;
pub use transport::{SseTransport, StdioTransport};
