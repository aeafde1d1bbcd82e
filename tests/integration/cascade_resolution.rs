//! Integration tests for cascading scope and viewport resolution

use crate::integration::test_utils::TestHarness;
use dockyard::context::{Context, ScopeType, Viewport};
use serde_json::json;

/// Given values set only at template and global scope, an instance-scoped
/// read returns the template value, never the global one.
#[test]
fn test_template_scope_beats_global() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    writer.save(
        "state",
        json!("global-value"),
        &Context::new(7, "demo"),
    );
    writer.save(
        "state",
        json!("template-value"),
        &Context::new(7, "demo").with_scope(ScopeType::Template, "article"),
    );
    writer.flush();

    let instance_ctx = Context::new(7, "demo").with_scope(ScopeType::Instance, "article:42");
    assert_eq!(
        harness.engine().get("state", &instance_ctx),
        Some(json!("template-value"))
    );
}

/// An instance-level value shadows both broader levels.
#[test]
fn test_instance_scope_wins_when_present() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    for (scope, scope_id, value) in [
        (ScopeType::Global, "global", "global-value"),
        (ScopeType::Template, "article", "template-value"),
        (ScopeType::Instance, "article:42", "instance-value"),
    ] {
        writer.save(
            "state",
            json!(value),
            &Context::new(7, "demo").with_scope(scope, scope_id),
        );
    }
    writer.flush();

    let ctx = Context::new(7, "demo").with_scope(ScopeType::Instance, "article:42");
    assert_eq!(harness.engine().get("state", &ctx), Some(json!("instance-value")));

    // A sibling instance of the same template falls back to the template row
    let sibling = Context::new(7, "demo").with_scope(ScopeType::Instance, "article:43");
    assert_eq!(
        harness.engine().get("state", &sibling),
        Some(json!("template-value"))
    );
}

/// Given desktop and all-viewport values at the same scope level, a desktop
/// request returns the desktop-specific value; other viewports get the
/// fallback row.
#[test]
fn test_viewport_precedence_within_level() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    writer.save(
        "state",
        json!("desktop-value"),
        &Context::new(7, "demo").with_viewport(Viewport::Desktop),
    );
    writer.save("state", json!("all-value"), &Context::new(7, "demo"));
    writer.flush();

    let reader = harness.engine();
    assert_eq!(
        reader.get("state", &Context::new(7, "demo").with_viewport(Viewport::Desktop)),
        Some(json!("desktop-value"))
    );
    assert_eq!(
        reader.get("state", &Context::new(7, "demo").with_viewport(Viewport::Mobile)),
        Some(json!("all-value"))
    );
    assert_eq!(
        reader.get("state", &Context::new(7, "demo")),
        Some(json!("all-value"))
    );
}

/// A narrower scope level with only an all-viewport row still wins over a
/// broader level with a viewport-specific row: scope is the outer loop.
#[test]
fn test_scope_outranks_viewport() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    writer.save(
        "state",
        json!("template-all"),
        &Context::new(7, "demo").with_scope(ScopeType::Template, "article"),
    );
    writer.save(
        "state",
        json!("global-desktop"),
        &Context::new(7, "demo").with_viewport(Viewport::Desktop),
    );
    writer.flush();

    let ctx = Context::new(7, "demo")
        .with_scope(ScopeType::Instance, "article:42")
        .with_viewport(Viewport::Desktop);
    assert_eq!(harness.engine().get("state", &ctx), Some(json!("template-all")));
}

/// An instance scope id without a template classification skips the
/// template level and falls straight through to global.
#[test]
fn test_unclassified_instance_skips_template_level() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    writer.save("state", json!("global-value"), &Context::new(7, "demo"));
    writer.flush();

    let ctx = Context::new(7, "demo").with_scope(ScopeType::Instance, "42");
    assert_eq!(harness.engine().get("state", &ctx), Some(json!("global-value")));
}

/// Absence at every level resolves to nothing; no level invents a default.
#[test]
fn test_all_levels_absent_is_none() {
    let harness = TestHarness::new();
    let ctx = Context::new(7, "demo").with_scope(ScopeType::Instance, "article:42");
    assert_eq!(harness.engine().get("state", &ctx), None);
}

/// The cascade consults the write buffer at every candidate, so a buffered
/// broader-scope write is visible to narrower readers before its flush.
#[test]
fn test_cascade_reads_buffered_fallbacks() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    writer.save(
        "state",
        json!("buffered-template"),
        &Context::new(7, "demo").with_scope(ScopeType::Template, "article"),
    );
    // No flush

    let ctx = Context::new(7, "demo").with_scope(ScopeType::Instance, "article:42");
    assert_eq!(
        harness.engine().get("state", &ctx),
        Some(json!("buffered-template"))
    );
}

/// Telemetry cascades like state but never reads from the state column.
#[test]
fn test_telemetry_cascades_separately() {
    let harness = TestHarness::new();

    let mut writer = harness.engine();
    writer.save("telemetry", json!({"views": 9}), &Context::new(7, "demo"));
    writer.save("state", json!({"open": true}), &Context::new(7, "demo"));
    writer.flush();

    let ctx = Context::new(7, "demo").with_scope(ScopeType::Instance, "article:42");
    assert_eq!(
        harness.engine().get("telemetry", &ctx),
        Some(json!({"views": 9}))
    );
}
