//! The built-in guide catalog.

use crate::types::{Guide, GuideError, GuideResult};

static GUIDES: [Guide; 6] = [
    Guide {
        name: "git-best-practices",
        summary: "Provides Git best practices for development workflow",
        title: "Git best practices for development workflow",
        body: include_str!("../guides/git-best-practices.md"),
    },
    Guide {
        name: "github-workflow",
        summary: "Provides GitHub workflow best practices",
        title: "GitHub workflow best practices for collaborative development",
        body: include_str!("../guides/github-workflow.md"),
    },
    Guide {
        name: "code-review-guidelines",
        summary: "Provides code review guidelines and best practices",
        title: "Comprehensive code review guidelines and best practices",
        body: include_str!("../guides/code-review-guidelines.md"),
    },
    Guide {
        name: "commit-message-format",
        summary: "Provides commit message formatting guidelines",
        title: "Commit message formatting guidelines using conventional commits",
        body: include_str!("../guides/commit-message-format.md"),
    },
    Guide {
        name: "branch-naming-convention",
        summary: "Provides branch naming convention guidelines",
        title: "Branch naming convention guidelines for organized development",
        body: include_str!("../guides/branch-naming-convention.md"),
    },
    Guide {
        name: "development-workflow",
        summary: "Comprehensive development workflow with Git, GitHub, and CI/CD best practices",
        title: "Comprehensive development workflow for GitHub issue-driven development",
        body: include_str!("../guides/development-workflow.md"),
    },
];

/// All built-in guides, in catalog order.
pub fn all_guides() -> &'static [Guide] {
    &GUIDES
}

/// Names of all built-in guides, in catalog order.
pub fn guide_names() -> impl Iterator<Item = &'static str> {
    GUIDES.iter().map(|g| g.name)
}

/// Look up a guide by its exact name.
pub fn find_guide(name: &str) -> GuideResult<&'static Guide> {
    if name.trim().is_empty() {
        return Err(GuideError::InvalidName(name.to_string()));
    }

    GUIDES.iter().find(|g| g.name == name).ok_or_else(|| {
        tracing::debug!("No guide named {name}");
        GuideError::NotFound(name.to_string())
    })
}
