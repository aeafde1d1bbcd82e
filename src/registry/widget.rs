//! Widget definitions and the render capability
//!
//! A `WidgetDefinition` is registered once per process and immutable
//! afterwards. Rendering is a typed capability: widgets that produce
//! server-side output implement `Renderable`, and each render failure is
//! contained at the call site as a `RenderError` rather than escaping the
//! hydration loop.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Dock zone a widget occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    #[default]
    Normal,
    Side,
}

/// Where a widget definition came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    #[default]
    Builtin,
    Plugin,
    /// Replayed from a foreign dashboard through the iframe tunnel.
    Foreign,
}

/// Render failures, contained per widget.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Render failed: {0}")]
    Failed(String),

    #[error("Widget has no render capability")]
    NotRenderable,
}

/// Inputs available to a widget's render step.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub user_id: u64,
    pub workspace_id: String,
    /// Saved per-instance settings, `Null` when nothing is stored.
    pub settings: Value,
}

/// Server-side render capability.
///
/// Implementations must not panic on bad settings: report through the
/// error, the manifest shows it inline for that widget alone.
pub trait Renderable: Send + Sync {
    fn render(&self, req: &RenderRequest) -> Result<String, RenderError>;
}

/// Renderable implemented by plain functions, for simple widgets and tests.
impl<F> Renderable for F
where
    F: Fn(&RenderRequest) -> Result<String, RenderError> + Send + Sync,
{
    fn render(&self, req: &RenderRequest) -> Result<String, RenderError> {
        self(req)
    }
}

/// A registered widget: render capability plus metadata.
#[derive(Clone, Serialize, Deserialize)]
pub struct WidgetDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub zone: Zone,
    #[serde(default)]
    pub origin: Origin,
    /// Script/style handles the host must enqueue when the widget is active.
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(skip)]
    pub renderer: Option<Arc<dyn Renderable>>,
}

impl std::fmt::Debug for WidgetDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetDefinition")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("zone", &self.zone)
            .field("origin", &self.origin)
            .field("renderable", &self.renderer.is_some())
            .finish()
    }
}

impl WidgetDefinition {
    /// Definition without a render capability.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: String::new(),
            zone: Zone::default(),
            origin: Origin::default(),
            assets: Vec::new(),
            renderer: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_assets(mut self, assets: Vec<String>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_renderer(mut self, renderer: Arc<dyn Renderable>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Execute the render capability with the given request.
    pub fn render(&self, req: &RenderRequest) -> Result<String, RenderError> {
        match &self.renderer {
            Some(renderer) => renderer.render(req),
            None => Err(RenderError::NotRenderable),
        }
    }
}
