//! Integration tests for workspace resolution and manifest hydration

use crate::integration::test_utils::{default_registry, TestHarness};
use dockyard::context::Context;
use dockyard::registry::{RenderError, RenderRequest, WidgetDefinition, WorkspaceDescriptor};
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

const DEFAULT_IDS: [&str; 5] = [
    "system-health",
    "recent-activity",
    "quick-draft",
    "news-feed",
    "shortcuts",
];

/// A workspace with no saved layout hydrates to exactly the built-in
/// default rows' widget ids, all active.
#[test]
fn test_default_layout_fallback() {
    let harness = TestHarness::new();
    let registry = default_registry();

    let manifest = registry.hydrate_manifest(&harness.engine(), 7, "proj-with-nothing-saved");
    // Unregistered workspace: empty shell
    assert!(manifest.registry.is_empty());

    let manifest = registry.hydrate_manifest(&harness.engine(), 7, "default");
    let active: BTreeSet<&str> = manifest
        .registry
        .values()
        .filter(|w| w.active)
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(active, DEFAULT_IDS.iter().copied().collect());
    assert_eq!(manifest.layout.len(), 5);
}

/// One widget's render failure becomes its inline error; every other widget
/// still renders.
#[test]
fn test_per_widget_failure_isolation() {
    let harness = TestHarness::new();
    let mut registry = default_registry();
    registry.register_widget(
        WidgetDefinition::new("flaky-stats", "Flaky Stats").with_renderer(Arc::new(
            |_: &RenderRequest| -> Result<String, RenderError> {
                Err(RenderError::Failed("stats backend unreachable".to_string()))
            },
        )),
    );

    let ctx = Context::new(7, "default");
    let mut engine = harness.engine();
    engine.save(
        "layout",
        json!([
            {"id": "flaky-stats"},
            {"id": "system-health"},
            {"id": "quick-draft"},
        ]),
        &ctx,
    );

    let manifest = registry.hydrate_manifest(&harness.engine(), 7, "default");

    let flaky = &manifest.registry["flaky-stats"];
    assert!(flaky.rendered.is_none());
    assert!(flaky
        .render_error
        .as_deref()
        .unwrap()
        .contains("stats backend unreachable"));

    for id in DEFAULT_IDS {
        let widget = &manifest.registry[id];
        assert!(widget.rendered.is_some(), "widget {} should render", id);
        assert!(widget.render_error.is_none());
    }
}

/// A saved layout drives the active flags and merges per-instance settings
/// onto the definitions.
#[test]
fn test_saved_layout_drives_hydration() {
    let harness = TestHarness::new();
    let registry = default_registry();
    let ctx = Context::new(7, "default");

    let mut engine = harness.engine();
    engine.save(
        "layout",
        json!([
            {"id": "news-feed", "settings": {"limit": 3}, "position": {"w": 2, "order": 0}},
            {"id": "shortcuts", "position": {"w": 1, "order": 1}},
        ]),
        &ctx,
    );

    let manifest = registry.hydrate_manifest(&harness.engine(), 7, "default");

    let news = &manifest.registry["news-feed"];
    assert!(news.active);
    assert_eq!(news.settings, json!({"limit": 3}));
    assert_eq!(news.width, Some(2));

    assert!(manifest.registry["shortcuts"].active);
    assert!(!manifest.registry["system-health"].active);
    assert!(!manifest.registry["quick-draft"].active);
}

/// Registered workspaces resolve by slug or display name; layouts saved
/// under the legacy name-derived slug are still found.
#[test]
fn test_legacy_name_slug_layout_lookup() {
    let harness = TestHarness::new();
    let mut registry = default_registry();
    registry.register_workspace(WorkspaceDescriptor::new("ws-9", "Editorial Desk"));

    // Legacy data keyed the layout by the slugified display name
    let mut engine = harness.engine();
    engine.save(
        "layout",
        json!([{"id": "quick-draft"}]),
        &Context::new(7, "editorial-desk"),
    );

    let resolved = registry
        .get_workspace(&harness.engine(), 7, "ws-9")
        .unwrap();
    assert!(resolved.saved);
    assert_eq!(resolved.layout.len(), 1);
    assert_eq!(resolved.layout[0].id, "quick-draft");
}

/// Pins and layout share one item set: saving pins leaves a saved layout
/// behind, and available_pins lists only the unpinned remainder.
#[test]
fn test_pin_rows_count_as_saved_layout() {
    let harness = TestHarness::new();
    let mut registry = default_registry();
    registry.register_widget(WidgetDefinition::new("site-notes", "Site Notes"));

    let ctx = Context::new(7, "default");
    let mut engine = harness.engine();
    engine.save(
        "pins",
        json!([{"id": "site-notes", "type": "pin", "is_pinned": true}]),
        &ctx,
    );

    let manifest = registry.hydrate_manifest(&harness.engine(), 7, "default");

    assert!(manifest.registry["site-notes"].active);
    assert!(manifest.registry["site-notes"].is_pinned);
    assert!(!manifest.available_pins.contains(&"site-notes".to_string()));
    assert!(manifest
        .available_pins
        .contains(&"system-health".to_string()));
    // The pin row is now the whole saved layout
    assert_eq!(manifest.layout.len(), 1);
    assert!(!manifest.registry["system-health"].active);
}

/// Hydration is always a fresh computation: a layout change shows up on the
/// very next call.
#[test]
fn test_manifest_is_never_cached() {
    let harness = TestHarness::new();
    let registry = default_registry();
    let ctx = Context::new(7, "default");

    let before = registry.hydrate_manifest(&harness.engine(), 7, "default");
    assert!(before.registry["system-health"].active);

    let mut engine = harness.engine();
    engine.save("layout", json!([{"id": "news-feed"}]), &ctx);

    let after = registry.hydrate_manifest(&harness.engine(), 7, "default");
    assert!(!after.registry["system-health"].active);
    assert!(after.registry["news-feed"].active);
}
