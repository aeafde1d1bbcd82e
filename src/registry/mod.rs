//! Widget and workspace registry
//!
//! Catalogs widget definitions and registered workspaces, resolves
//! requested workspace ids through the legacy-tolerant lookup chain, and
//! hydrates complete render-ready manifests. One widget's render failure
//! never aborts a manifest; it surfaces as that widget's inline error.

pub mod defaults;
pub mod manifest;
pub mod resolve;
pub mod widget;

pub use defaults::register_defaults;
pub use manifest::{
    default_rows, rows_to_entries, synthesize_layout, HydratedWidget, LayoutRow, WorkspaceManifest,
};
pub use resolve::{canonical_target, slugify, WorkspaceDescriptor, DEFAULT_WORKSPACE};
pub use widget::{Origin, RenderError, RenderRequest, Renderable, WidgetDefinition, Zone};

use crate::context::Context;
use crate::storage::records::{parse_layout, LayoutEntry};
use crate::storage::StorageEngine;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// A workspace resolved to its canonical identity and layout.
#[derive(Debug, Clone)]
pub struct ResolvedWorkspace {
    pub slug: String,
    pub title: String,
    pub config: Value,
    pub layout: Vec<LayoutEntry>,
    /// Whether the layout came from saved rows rather than the built-in
    /// default.
    pub saved: bool,
}

/// Process-lifetime catalog of widget definitions and workspaces.
///
/// Definitions are registered once at process start and immutable after;
/// the last registration for an id wins, without a duplicate warning.
#[derive(Default)]
pub struct Registry {
    widgets: HashMap<String, WidgetDefinition>,
    workspaces: Vec<WorkspaceDescriptor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget definition, keyed by id. Last write wins.
    pub fn register_widget(&mut self, definition: WidgetDefinition) {
        self.widgets.insert(definition.id.clone(), definition);
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetDefinition> {
        self.widgets.get(id)
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Add a workspace to the user-visible catalog, replacing any
    /// previously registered descriptor with the same slug.
    pub fn register_workspace(&mut self, descriptor: WorkspaceDescriptor) {
        match self
            .workspaces
            .iter_mut()
            .find(|existing| existing.slug == descriptor.slug)
        {
            Some(existing) => *existing = descriptor,
            None => self.workspaces.push(descriptor),
        }
    }

    pub fn workspaces(&self) -> &[WorkspaceDescriptor] {
        &self.workspaces
    }

    /// Resolve a requested workspace id or display name.
    ///
    /// Aliases fold onto the canonical `"default"` workspace, which is
    /// synthesized when nothing matching is registered; any other miss is
    /// `None`. The layout loads under the resolved slug, retrying under the
    /// name-derived slug for legacy rows, and falls back to the built-in
    /// default rows.
    pub fn get_workspace(
        &self,
        engine: &StorageEngine,
        user_id: u64,
        id: &str,
    ) -> Option<ResolvedWorkspace> {
        let target = canonical_target(id);

        let (slug, title, config, legacy_slug) =
            match resolve::find_descriptor(&self.workspaces, &target) {
                Some(descriptor) => (
                    descriptor.slug.clone(),
                    descriptor.title.clone(),
                    descriptor.config.clone(),
                    Some(descriptor.name_slug()),
                ),
                None if target == DEFAULT_WORKSPACE => (
                    DEFAULT_WORKSPACE.to_string(),
                    "Dashboard".to_string(),
                    Value::Null,
                    None,
                ),
                None => {
                    debug!(requested = id, target, "workspace not found");
                    return None;
                }
            };

        let mut saved = engine.get("layout", &Context::new(user_id, &slug));
        if saved.is_none() {
            if let Some(legacy) = legacy_slug.filter(|legacy| *legacy != slug) {
                saved = engine.get("layout", &Context::new(user_id, &legacy));
            }
        }

        let (layout, is_saved) = match saved {
            Some(payload) => (parse_layout(&payload), true),
            None => (rows_to_entries(&default_rows()), false),
        };

        Some(ResolvedWorkspace {
            slug,
            title,
            config,
            layout,
            saved: is_saved,
        })
    }

    /// Hydrate the complete manifest for a workspace.
    ///
    /// Always a fresh computation. An unresolvable workspace yields the
    /// empty manifest; a widget whose render fails yields an inline error
    /// for that widget while the rest of the manifest hydrates normally.
    pub fn hydrate_manifest(
        &self,
        engine: &StorageEngine,
        user_id: u64,
        id: &str,
    ) -> WorkspaceManifest {
        let Some(workspace) = self.get_workspace(engine, user_id, id) else {
            return WorkspaceManifest::empty(canonical_target(id));
        };

        let ctx = Context::new(user_id, &workspace.slug);
        let pins: Vec<LayoutEntry> = engine
            .get("pins", &ctx)
            .map(|payload| parse_layout(&payload))
            .unwrap_or_default();

        let layout = if workspace.saved {
            workspace.layout
        } else {
            synthesize_layout(&pins)
        };

        let mut registry = BTreeMap::new();
        for definition in self.widgets.values() {
            let entry = layout.iter().find(|entry| entry.id == definition.id);
            let settings = entry
                .map(|entry| entry.settings.clone())
                .unwrap_or(Value::Null);

            let (rendered, render_error) = match &definition.renderer {
                Some(_) => {
                    let request = RenderRequest {
                        user_id,
                        workspace_id: workspace.slug.clone(),
                        settings: settings.clone(),
                    };
                    match definition.render(&request) {
                        Ok(output) => (Some(output), None),
                        Err(err) => {
                            warn!(widget = %definition.id, %err, "widget render failed");
                            (None, Some(err.to_string()))
                        }
                    }
                }
                None => (None, None),
            };

            registry.insert(
                definition.id.clone(),
                HydratedWidget {
                    id: definition.id.clone(),
                    title: definition.title.clone(),
                    icon: definition.icon.clone(),
                    zone: definition.zone,
                    origin: definition.origin,
                    assets: definition.assets.clone(),
                    active: entry.is_some(),
                    is_pinned: pins.iter().any(|pin| pin.id == definition.id),
                    settings,
                    width: entry.map(|entry| entry.position.w),
                    rendered,
                    render_error,
                },
            );
        }

        let available_pins = registry
            .values()
            .filter(|widget| !widget.is_pinned)
            .map(|widget| widget.id.clone())
            .collect();

        WorkspaceManifest {
            title: workspace.title,
            slug: workspace.slug,
            config: workspace.config,
            layout,
            pins,
            registry,
            available_pins,
        }
    }
}
