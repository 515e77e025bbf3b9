//! Devguide: Git and GitHub workflow guidance documents served as prompts.

pub mod catalog;
pub mod types;

pub use catalog::{all_guides, find_guide, guide_names};
pub use types::*;
