//! Prompt registration and dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use super::guide::GuideHandler;
use super::handler::{PromptHandler, RequestContext};
use crate::session::SessionHandle;
use crate::types::{
    HandlerError, McpError, McpResult, PromptDefinition, PromptGetParams, PromptGetResult,
};

/// One invocable prompt: a unique name, a description, and its handler.
#[derive(Clone)]
pub struct PromptEntry {
    pub name: String,
    pub description: String,
    pub handler: Arc<dyn PromptHandler>,
}

impl PromptEntry {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl PromptHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Arc::new(handler),
        }
    }

    pub fn definition(&self) -> PromptDefinition {
        PromptDefinition {
            name: self.name.clone(),
            description: Some(self.description.clone()),
        }
    }
}

impl std::fmt::Debug for PromptEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptEntry")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Immutable, ordered collection of prompt entries.
#[derive(Debug)]
pub struct PromptRegistry {
    entries: Vec<PromptEntry>,
    index: HashMap<String, usize>,
}

impl PromptRegistry {
    /// Build a registry from entries, keeping their order.
    ///
    /// Fails on an empty name or description and on a repeated name.
    pub fn new(entries: Vec<PromptEntry>) -> McpResult<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(McpError::InvalidPrompt(format!(
                    "entry {i} has an empty name"
                )));
            }
            if entry.description.trim().is_empty() {
                return Err(McpError::InvalidPrompt(format!(
                    "'{}' has an empty description",
                    entry.name
                )));
            }
            if index.insert(entry.name.clone(), i).is_some() {
                return Err(McpError::DuplicatePrompt(entry.name.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// The built-in guide prompts, in catalog order.
    pub fn builtin() -> McpResult<Self> {
        let entries = devguide::all_guides()
            .iter()
            .map(|guide| PromptEntry::new(guide.name, guide.summary, GuideHandler::new(guide)))
            .collect();
        Self::new(entries)
    }

    /// Every entry in registration order.
    pub fn list_all(&self) -> &[PromptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&PromptEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Definitions for `prompts/list`.
    pub fn definitions(&self) -> Vec<PromptDefinition> {
        self.entries.iter().map(PromptEntry::definition).collect()
    }

    /// Route a `prompts/get` request to the named handler.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        session: &SessionHandle,
        params: &PromptGetParams,
    ) -> McpResult<PromptGetResult> {
        let entry = self
            .find(&params.name)
            .ok_or_else(|| McpError::PromptNotFound(params.name.clone()))?;

        if ctx.is_cancelled() {
            return Err(McpError::RequestCancelled);
        }

        let outcome = tokio::select! {
            biased;
            _ = ctx.cancelled() => return Err(McpError::RequestCancelled),
            outcome = entry.handler.get(ctx, session, params) => outcome,
        };

        let result = outcome.map_err(|source| McpError::HandlerFailed {
            name: entry.name.clone(),
            source,
        })?;

        if let Err(reason) = result.check_contract() {
            tracing::error!("Prompt '{}' returned a malformed response: {reason}", entry.name);
            return Err(McpError::HandlerFailed {
                name: entry.name.clone(),
                source: HandlerError::Failed(reason),
            });
        }

        Ok(result)
    }
}
