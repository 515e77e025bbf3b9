//! Configuration loading and resolution.
//!
//! Precedence for every setting: CLI flag, then environment, then default.

use crate::types::{McpError, McpResult};

/// Environment variable holding the HTTP listen address.
pub const HTTP_ADDR_ENV: &str = "MCP_HTTP_ADDR";
/// Environment variable holding the default log filter.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Which transport the server runs. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportMode {
    Stdio,
    Http { addr: String },
}

impl TransportMode {
    /// Pick the transport from the configured HTTP address alone.
    /// Absent or empty selects stdio; any other value, whitespace included,
    /// selects HTTP/SSE and is validated when the listener binds.
    pub fn from_http_addr(addr: Option<&str>) -> Self {
        match addr {
            Some(addr) if !addr.is_empty() => TransportMode::Http {
                addr: addr.to_string(),
            },
            _ => TransportMode::Stdio,
        }
    }

    pub fn is_http(&self) -> bool {
        matches!(self, TransportMode::Http { .. })
    }
}

/// Resolve the HTTP address from an explicit flag or `MCP_HTTP_ADDR`.
pub fn resolve_http_addr(explicit: Option<&str>) -> Option<String> {
    if let Some(addr) = explicit {
        return Some(addr.to_string());
    }

    std::env::var(HTTP_ADDR_ENV).ok()
}

/// Resolve the log filter from an explicit flag or `LOG_LEVEL`.
pub fn resolve_log_level(explicit: Option<&str>) -> String {
    if let Some(level) = explicit {
        return level.to_string();
    }

    std::env::var(LOG_LEVEL_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

/// Turn a listen address into one the socket layer accepts.
///
/// `:8080` binds all interfaces, as Go's `net/http` does.
pub fn normalize_listen_addr(addr: &str) -> McpResult<String> {
    validate_listen_addr(addr)?;

    let addr = addr.trim();
    if addr.starts_with(':') {
        Ok(format!("0.0.0.0{addr}"))
    } else {
        Ok(addr.to_string())
    }
}

/// Check that an address has the `host:port` or `:port` form with a numeric port.
pub fn validate_listen_addr(addr: &str) -> McpResult<()> {
    let invalid = |reason: &str| McpError::InvalidAddress {
        addr: addr.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = addr.trim();
    if trimmed.is_empty() {
        return Err(invalid("address is empty"));
    }

    let (_, port) = trimmed
        .rsplit_once(':')
        .ok_or_else(|| invalid("expected host:port or :port"))?;

    port.parse::<u16>()
        .map_err(|_| invalid("port must be a number between 0 and 65535"))?;

    Ok(())
}
