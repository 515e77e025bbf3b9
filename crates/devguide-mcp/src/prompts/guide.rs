//! Handler serving one static guide.

use async_trait::async_trait;

use devguide::Guide;

use super::handler::{PromptHandler, RequestContext};
use crate::session::SessionHandle;
use crate::types::{HandlerError, PromptGetParams, PromptGetResult, PromptMessage};

/// Serves a [`Guide`] body as a single `user` message. Arguments are ignored.
#[derive(Debug, Clone, Copy)]
pub struct GuideHandler {
    guide: &'static Guide,
}

impl GuideHandler {
    pub fn new(guide: &'static Guide) -> Self {
        Self { guide }
    }

    fn render(&self) -> PromptGetResult {
        PromptGetResult {
            description: self.guide.title.to_string(),
            messages: vec![PromptMessage::user_text(self.guide.body)],
        }
    }
}

#[async_trait]
impl PromptHandler for GuideHandler {
    async fn get(
        &self,
        _ctx: &RequestContext,
        _session: &SessionHandle,
        _params: &PromptGetParams,
    ) -> Result<PromptGetResult, HandlerError> {
        Ok(self.render())
    }
}
