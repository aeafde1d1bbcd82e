//! Durable record types
//!
//! Value types persisted by the storage layer: item rows (one widget
//! placement per workspace), state records (one per context signature), and
//! the tolerant wire-shape parsing for saved layouts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Placement geometry for one widget inside a workspace.
///
/// Tolerates extra fields from older clients; only `w` and `order` survive
/// a round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Column span (1 = half row, 2 = full row).
    #[serde(default = "default_span")]
    pub w: u32,
    /// Sort order within the workspace.
    #[serde(default)]
    pub order: u32,
}

fn default_span() -> u32 {
    1
}

impl Default for Position {
    fn default() -> Self {
        Self {
            w: default_span(),
            order: 0,
        }
    }
}

/// Kind tag carried by persisted layout entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    #[default]
    Widget,
    Pin,
}

/// Wire shape of one entry in a saved layout payload.
///
/// `[{id, type, settings, position, is_pinned}, ...]` — every field except
/// `id` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: EntryKind,
    #[serde(default)]
    pub settings: Value,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub is_pinned: bool,
}

/// Parse a saved layout payload.
///
/// A payload that is not an array parses to an empty set; entries that fail
/// to parse are dropped. Malformed input is never an error here.
pub fn parse_layout(data: &Value) -> Vec<LayoutEntry> {
    let Some(raw) = data.as_array() else {
        if !data.is_null() {
            warn!("layout payload is not an array, treating as empty");
        }
        return Vec::new();
    };

    raw.iter()
        .filter_map(|entry| match serde_json::from_value(entry.clone()) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                warn!(%err, "dropping malformed layout entry");
                None
            }
        })
        .collect()
}

/// One widget's placement and state inside a workspace.
///
/// At most one item exists per `(workspace_id, widget_id)` pair; the item
/// store's key layout enforces the invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub workspace_id: String,
    pub widget_id: String,
    pub settings: Value,
    pub position: Position,
    pub is_pinned: bool,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Build an item row from a parsed layout entry.
    pub fn from_entry(workspace_id: &str, entry: &LayoutEntry) -> Self {
        Self {
            workspace_id: workspace_id.to_string(),
            widget_id: entry.id.clone(),
            settings: entry.settings.clone(),
            position: entry.position,
            is_pinned: entry.is_pinned || entry.kind == EntryKind::Pin,
            updated_at: Utc::now(),
        }
    }

    /// Wire shape of this row, as served back to clients.
    pub fn to_entry(&self) -> LayoutEntry {
        LayoutEntry {
            id: self.widget_id.clone(),
            kind: if self.is_pinned {
                EntryKind::Pin
            } else {
                EntryKind::Widget
            },
            settings: self.settings.clone(),
            position: self.position,
            is_pinned: self.is_pinned,
        }
    }
}

/// All buffered-intent state stored against one context signature.
///
/// `values` is the shared JSON column holding every `State` key for the
/// signature; telemetry sits in its own column so telemetry writes never
/// contend with state merges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateRecord {
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    #[serde(default)]
    pub telemetry: Option<Value>,
    pub updated_at: DateTime<Utc>,
}

impl Default for StateRecord {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            telemetry: None,
            updated_at: Utc::now(),
        }
    }
}
