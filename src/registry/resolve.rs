//! Workspace id resolution
//!
//! Normalizes requested workspace ids to slugs, folds the legacy aliases
//! onto the canonical default workspace, and runs an ordered list of lookup
//! strategies against the registered catalog. Legacy data keyed rows by the
//! display name rather than the id, so the name-derived slug is a first-
//! class lookup target, not ad hoc fallback code.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical slug of the synthesized default workspace.
pub const DEFAULT_WORKSPACE: &str = "default";

/// Aliases older clients used for the default workspace.
const DEFAULT_ALIASES: [&str; 3] = ["system_main", "default", ""];

/// One registered workspace, catalog-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceDescriptor {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub config: Value,
}

impl WorkspaceDescriptor {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slugify(&slug.into()),
            title: title.into(),
            config: Value::Null,
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    /// The slug legacy storage derived from the display name.
    pub fn name_slug(&self) -> String {
        slugify(&self.title)
    }
}

/// Lower-case, alphanumeric-and-dash slug of an id or display name.
pub fn slugify(raw: &str) -> String {
    let mut slug = String::with_capacity(raw.len());
    let mut last_dash = true;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if ch == '_' {
            slug.push(ch);
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Map a requested id to its canonical slug, folding default aliases.
pub fn canonical_target(requested: &str) -> String {
    let slug = slugify(requested);
    if DEFAULT_ALIASES.contains(&slug.as_str()) {
        DEFAULT_WORKSPACE.to_string()
    } else {
        slug
    }
}

/// One way of matching a target slug against the catalog.
///
/// Strategies run in declaration order; the first match wins. Adding a
/// strategy means adding a variant, not touching resolution logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStrategy {
    /// Match the registered slug (canonical data).
    BySlug,
    /// Match the slug derived from the display name (legacy data keyed
    /// rows by name).
    ByNameSlug,
}

/// Strategy order used by the registry.
pub const LOOKUP_ORDER: [LookupStrategy; 2] = [LookupStrategy::BySlug, LookupStrategy::ByNameSlug];

impl LookupStrategy {
    fn matches(&self, descriptor: &WorkspaceDescriptor, target: &str) -> bool {
        match self {
            LookupStrategy::BySlug => descriptor.slug == target,
            LookupStrategy::ByNameSlug => descriptor.name_slug() == target,
        }
    }
}

/// Resolve a target slug against the catalog through the strategy order.
pub fn find_descriptor<'a>(
    catalog: &'a [WorkspaceDescriptor],
    target: &str,
) -> Option<&'a WorkspaceDescriptor> {
    LOOKUP_ORDER
        .iter()
        .find_map(|strategy| catalog.iter().find(|d| strategy.matches(d, target)))
}
