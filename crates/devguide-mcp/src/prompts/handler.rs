//! The contract every prompt handler satisfies.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::session::SessionHandle;
use crate::types::{HandlerError, PromptGetParams, PromptGetResult, RequestId};

/// Per-request context handed to a handler.
///
/// Carries the request id and a cancellation token. The token fires when the
/// client sends `notifications/cancelled` for this request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: RequestId,
    cancel: CancellationToken,
}

impl RequestContext {
    pub fn new(request_id: RequestId) -> Self {
        Self::with_token(request_id, CancellationToken::new())
    }

    pub fn with_token(request_id: RequestId, cancel: CancellationToken) -> Self {
        Self { request_id, cancel }
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolves once the request is cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await
    }
}

/// A named prompt's implementation.
///
/// Handlers may ignore every input; the built-in ones do. A handler that
/// blocks on external I/O should watch `ctx.cancelled()`.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    async fn get(
        &self,
        ctx: &RequestContext,
        session: &SessionHandle,
        params: &PromptGetParams,
    ) -> Result<PromptGetResult, HandlerError>;
}
