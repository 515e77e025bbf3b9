//! Core data types for guidance documents.

use serde::{Deserialize, Serialize};

/// A static guidance document.
///
/// `summary` is the one-line description shown when guides are listed;
/// `title` describes the document itself when it is served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Guide {
    pub name: &'static str,
    pub summary: &'static str,
    pub title: &'static str,
    pub body: &'static str,
}

/// Serializable listing row for a guide, without its body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuideSummary {
    pub name: String,
    pub summary: String,
}

impl From<&Guide> for GuideSummary {
    fn from(guide: &Guide) -> Self {
        Self {
            name: guide.name.to_string(),
            summary: guide.summary.to_string(),
        }
    }
}

/// Errors from the devguide library.
#[derive(thiserror::Error, Debug)]
pub enum GuideError {
    #[error("Guide not found: {0}")]
    NotFound(String),

    #[error("Invalid guide name: {0:?}")]
    InvalidName(String),
}

pub type GuideResult<T> = Result<T, GuideError>;
