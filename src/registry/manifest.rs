//! Workspace manifest
//!
//! The fully hydrated, render-ready snapshot of one workspace: resolved
//! title and config, the user's layout and pins, every registered widget
//! with its active flag and rendered output, and the pinnable remainder.
//! Manifests are derived aggregates, built fresh per request and never
//! persisted or cached as a whole.

use crate::registry::widget::{Origin, Zone};
use crate::storage::records::{EntryKind, LayoutEntry, Position};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Built-in widget ids backing the default layout, row by row.
pub const DEFAULT_FULL_WIDGET: &str = "system-health";
pub const DEFAULT_SPLIT_ROWS: [(&str, &str); 2] = [
    ("recent-activity", "quick-draft"),
    ("news-feed", "shortcuts"),
];

/// One row of the built-in default layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayoutRow {
    /// One widget spanning the full dock width.
    Full { widgets: Vec<String> },
    /// Two columns of widgets.
    Split {
        widgets_left: Vec<String>,
        widgets_right: Vec<String>,
    },
}

/// The three canonical default rows: one full-width diagnostics widget and
/// two two-column rows of secondary widgets.
pub fn default_rows() -> Vec<LayoutRow> {
    let mut rows = vec![LayoutRow::Full {
        widgets: vec![DEFAULT_FULL_WIDGET.to_string()],
    }];
    for (left, right) in DEFAULT_SPLIT_ROWS {
        rows.push(LayoutRow::Split {
            widgets_left: vec![left.to_string()],
            widgets_right: vec![right.to_string()],
        });
    }
    rows
}

/// Flatten layout rows into persistable layout entries.
///
/// Full-row widgets span both columns (`w = 2`); split-row widgets span one.
pub fn rows_to_entries(rows: &[LayoutRow]) -> Vec<LayoutEntry> {
    let mut entries = Vec::new();
    let mut order = 0u32;
    let mut push = |id: &str, w: u32, order: &mut u32| {
        entries.push(LayoutEntry {
            id: id.to_string(),
            kind: EntryKind::Widget,
            settings: Value::Null,
            position: Position { w, order: *order },
            is_pinned: false,
        });
        *order += 1;
    };

    for row in rows {
        match row {
            LayoutRow::Full { widgets } => {
                for id in widgets {
                    push(id, 2, &mut order);
                }
            }
            LayoutRow::Split {
                widgets_left,
                widgets_right,
            } => {
                for id in widgets_left.iter().chain(widgets_right) {
                    push(id, 1, &mut order);
                }
            }
        }
    }
    entries
}

/// Build a layout for a workspace with nothing saved: the default rows plus
/// the user's current pins appended after them.
pub fn synthesize_layout(pins: &[LayoutEntry]) -> Vec<LayoutEntry> {
    let mut entries = rows_to_entries(&default_rows());
    let mut order = entries.len() as u32;
    for pin in pins {
        if entries.iter().any(|entry| entry.id == pin.id) {
            continue;
        }
        let mut entry = pin.clone();
        entry.position.order = order;
        order += 1;
        entries.push(entry);
    }
    entries
}

/// One widget's hydrated view inside a manifest: definition metadata merged
/// with saved per-instance state and the captured render outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HydratedWidget {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub zone: Zone,
    pub origin: Origin,
    pub assets: Vec<String>,
    /// Whether the widget appears in the workspace's layout.
    pub active: bool,
    pub is_pinned: bool,
    /// Saved per-instance settings, `Null` when nothing is stored.
    pub settings: Value,
    /// Saved column span, when a layout entry carries one.
    pub width: Option<u32>,
    /// Captured render output; `None` when the widget has no render
    /// capability or rendering failed.
    pub rendered: Option<String>,
    /// Inline error placeholder for a failed render.
    pub render_error: Option<String>,
}

/// Fully hydrated snapshot of one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    pub title: String,
    pub slug: String,
    pub config: Value,
    pub layout: Vec<LayoutEntry>,
    pub pins: Vec<LayoutEntry>,
    pub registry: BTreeMap<String, HydratedWidget>,
    pub available_pins: Vec<String>,
}

impl WorkspaceManifest {
    /// The graceful-degradation manifest for an unresolvable workspace:
    /// an empty shell, not a failure.
    pub fn empty(slug: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            slug: slug.into(),
            config: Value::Null,
            layout: Vec::new(),
            pins: Vec::new(),
            registry: BTreeMap::new(),
            available_pins: Vec::new(),
        }
    }

    /// Ids of the widgets marked active, in layout order.
    pub fn active_ids(&self) -> Vec<&str> {
        self.layout.iter().map(|entry| entry.id.as_str()).collect()
    }
}
