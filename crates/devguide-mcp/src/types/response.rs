//! MCP prompt response types.

use serde::{Deserialize, Serialize};

/// Originator of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Content block of a prompt message. Only text is produced by this server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PromptContent {
    #[serde(rename = "text")]
    Text { text: String },
}

impl PromptContent {
    pub fn text(&self) -> &str {
        match self {
            PromptContent::Text { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: PromptContent,
}

impl PromptMessage {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: PromptContent::Text { text: text.into() },
        }
    }
}

/// Result of `prompts/get`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptGetResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

impl PromptGetResult {
    /// Check the envelope every handler must return: a non-empty description
    /// and at least one message, each with non-empty text.
    ///
    /// Returns a short reason on violation.
    pub fn check_contract(&self) -> Result<(), String> {
        if self.description.trim().is_empty() {
            return Err("response description is empty".to_string());
        }
        if self.messages.is_empty() {
            return Err("response has no messages".to_string());
        }
        for (i, message) in self.messages.iter().enumerate() {
            if message.content.text().trim().is_empty() {
                return Err(format!("message {i} has empty text"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptListResult {
    pub prompts: Vec<PromptDefinition>,
    #[serde(default, rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}
