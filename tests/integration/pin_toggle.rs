//! Integration tests for pin toggling against the shared item set

use crate::integration::test_utils::TestHarness;
use dockyard::context::Context;
use dockyard::storage::PinToggle;
use serde_json::json;
use std::collections::BTreeSet;

fn pin_ids(engine: &dockyard::storage::StorageEngine, ctx: &Context) -> BTreeSet<String> {
    engine
        .get("pins", ctx)
        .and_then(|payload| {
            payload.as_array().map(|entries| {
                entries
                    .iter()
                    .map(|entry| entry["id"].as_str().unwrap().to_string())
                    .collect()
            })
        })
        .unwrap_or_default()
}

/// Toggling the same id twice restores the pin set; the two actions report
/// added then removed.
#[test]
fn test_toggle_twice_is_idempotent() {
    let harness = TestHarness::new();
    let ctx = Context::new(7, "demo");

    let mut engine = harness.engine();
    engine.save(
        "items",
        json!([
            {"id": "site-notes", "type": "pin", "is_pinned": true},
            {"id": "quick-draft"},
        ]),
        &ctx,
    );
    let original = pin_ids(&engine, &ctx);
    assert_eq!(original, BTreeSet::from(["site-notes".to_string()]));

    assert_eq!(engine.toggle_pin("shortcuts", &ctx), Some(PinToggle::Added));
    assert_eq!(
        pin_ids(&engine, &ctx),
        BTreeSet::from(["site-notes".to_string(), "shortcuts".to_string()])
    );

    assert_eq!(engine.toggle_pin("shortcuts", &ctx), Some(PinToggle::Removed));
    assert_eq!(pin_ids(&engine, &ctx), original);
}

/// Toggling a widget that already sits in the layout flips its pinned flag
/// without disturbing its settings or position.
#[test]
fn test_toggle_existing_layout_item() {
    let harness = TestHarness::new();
    let ctx = Context::new(7, "demo");

    let mut engine = harness.engine();
    engine.save(
        "items",
        json!([{"id": "news-feed", "settings": {"limit": 3}, "position": {"w": 2, "order": 4}}]),
        &ctx,
    );

    assert_eq!(engine.toggle_pin("news-feed", &ctx), Some(PinToggle::Added));

    let items = engine.get("items", &ctx).unwrap();
    let row = &items.as_array().unwrap()[0];
    assert_eq!(row["is_pinned"], json!(true));
    assert_eq!(row["settings"], json!({"limit": 3}));
    assert_eq!(row["position"]["w"], json!(2));
    assert_eq!(row["position"]["order"], json!(4));
}

/// Toggling an id with no row inserts a pinned item at the end of the
/// ordering.
#[test]
fn test_toggle_unknown_widget_inserts_row() {
    let harness = TestHarness::new();
    let ctx = Context::new(7, "demo");

    let mut engine = harness.engine();
    engine.save(
        "items",
        json!([{"id": "quick-draft", "position": {"order": 0}}]),
        &ctx,
    );

    assert_eq!(engine.toggle_pin("shortcuts", &ctx), Some(PinToggle::Added));

    let items = engine.get("items", &ctx).unwrap();
    let rows = items.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["id"], json!("shortcuts"));
    assert_eq!(rows[1]["position"]["order"], json!(1));
}

/// Toggles on different ids are independent: each leaves the other's row
/// alone.
#[test]
fn test_toggles_on_distinct_ids_compose() {
    let harness = TestHarness::new();
    let ctx = Context::new(7, "demo");

    let mut engine = harness.engine();
    engine.toggle_pin("site-notes", &ctx);
    engine.toggle_pin("shortcuts", &ctx);

    assert_eq!(
        pin_ids(&engine, &ctx),
        BTreeSet::from(["site-notes".to_string(), "shortcuts".to_string()])
    );

    engine.toggle_pin("site-notes", &ctx);
    assert_eq!(
        pin_ids(&engine, &ctx),
        BTreeSet::from(["shortcuts".to_string()])
    );
}
