//! Transport layer for MCP communication.

pub mod framing;
pub mod sse;
pub mod stdio;

pub use sse::SseTransport;
pub use stdio::StdioTransport;
