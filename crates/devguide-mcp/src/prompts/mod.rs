//! Prompt registry and the handler contract.

pub mod guide;
pub mod handler;
pub mod registry;

pub use guide::GuideHandler;
pub use handler::{PromptHandler, RequestContext};
pub use registry::{PromptEntry, PromptRegistry};
