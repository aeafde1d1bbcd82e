//! Context addressing
//!
//! A `Context` identifies one slot of stored state: who (user), where
//! (workspace), and under what scope (global / template / specific instance,
//! plus viewport). Contexts are immutable value objects; their `signature()`
//! is the sole cache and lookup key, so two contexts with identical fields
//! are interchangeable for storage purposes.

use serde::{Deserialize, Serialize};

/// Scope level a piece of state is stored under, narrowest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    Global,
    Template,
    Instance,
}

impl ScopeType {
    /// Stable signature token for this scope level.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeType::Global => "global",
            ScopeType::Template => "template",
            ScopeType::Instance => "instance",
        }
    }
}

/// Viewport a piece of state applies to.
///
/// `All` is the fallback row; a viewport-specific row wins over it at the
/// same scope level during cascading resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Viewport {
    Desktop,
    Mobile,
    All,
}

impl Viewport {
    /// Stable signature token for this viewport.
    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Mobile => "mobile",
            Viewport::All => "all",
        }
    }
}

/// Separator between an instance scope id's template classification and the
/// instance part, e.g. `"article:42"`.
pub const SCOPE_ID_SEPARATOR: char = ':';

/// Immutable addressing tuple for one slot of state.
///
/// `workspace_id` is an opaque string; callers normalize it to a slug before
/// constructing a context (resolution lives in the registry, not here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    user_id: u64,
    workspace_id: String,
    scope: ScopeType,
    scope_id: String,
    viewport: Viewport,
}

impl Context {
    /// Create a context at global scope for all viewports.
    pub fn new(user_id: u64, workspace_id: impl Into<String>) -> Self {
        Self {
            user_id,
            workspace_id: workspace_id.into(),
            scope: ScopeType::Global,
            scope_id: "global".to_string(),
            viewport: Viewport::All,
        }
    }

    /// Refine the scope level and scope id, consuming self.
    pub fn with_scope(mut self, scope: ScopeType, scope_id: impl Into<String>) -> Self {
        self.scope = scope;
        self.scope_id = scope_id.into();
        self
    }

    /// Refine the viewport, consuming self.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn scope(&self) -> ScopeType {
        self.scope
    }

    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// A context is valid when its user id is a positive identifier.
    /// No other field is validated here.
    pub fn is_valid(&self) -> bool {
        self.user_id > 0
    }

    /// Deterministic concatenation of all five fields.
    ///
    /// Equal fields produce equal signatures; the signature is the only key
    /// the storage layer ever sees.
    pub fn signature(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}",
            self.user_id,
            self.workspace_id,
            self.scope.as_str(),
            self.scope_id,
            self.viewport.as_str()
        )
    }

    /// Template classification of an instance scope id.
    ///
    /// Instance scope ids follow the `"template:instance"` convention;
    /// the prefix before the first separator is the template. Ids without a
    /// separator carry no classification and return `None`, which skips the
    /// template level during cascading resolution.
    pub fn template_scope_id(&self) -> Option<&str> {
        match self.scope {
            ScopeType::Instance => self
                .scope_id
                .split_once(SCOPE_ID_SEPARATOR)
                .map(|(template, _)| template)
                .filter(|t| !t.is_empty()),
            ScopeType::Template => Some(&self.scope_id),
            ScopeType::Global => None,
        }
    }

    /// Same slot re-addressed at a different scope level.
    ///
    /// Used by the cascade to build fallback candidates; user, workspace,
    /// and viewport carry over unchanged.
    pub fn at_scope(&self, scope: ScopeType, scope_id: impl Into<String>) -> Self {
        Self {
            user_id: self.user_id,
            workspace_id: self.workspace_id.clone(),
            scope,
            scope_id: scope_id.into(),
            viewport: self.viewport,
        }
    }

    /// Same slot re-addressed at a different viewport.
    pub fn at_viewport(&self, viewport: Viewport) -> Self {
        Self {
            user_id: self.user_id,
            workspace_id: self.workspace_id.clone(),
            scope: self.scope,
            scope_id: self.scope_id.clone(),
            viewport,
        }
    }
}
