//! CLI output: error mapping and presentation for manifests and values.

use crate::error::EngineError;
use crate::registry::WorkspaceManifest;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Map domain/service errors to a string for CLI output.
/// Keeps route handlers thin; extend with stable categories if needed.
pub fn map_error(e: &EngineError) -> String {
    e.to_string()
}

/// Render a hydrated manifest as a status table.
pub fn format_manifest_text(manifest: &WorkspaceManifest) -> String {
    if manifest.registry.is_empty() {
        return format!(
            "Workspace '{}' is empty (no registered widgets).",
            manifest.slug
        );
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Widget", "Zone", "Active", "Pinned", "Render"]);

    for widget in manifest.registry.values() {
        let render_state = match (&widget.rendered, &widget.render_error) {
            (Some(_), _) => "ok".to_string(),
            (None, Some(err)) => format!("error: {}", err),
            (None, None) => "-".to_string(),
        };
        table.add_row(vec![
            format!("{} ({})", widget.title, widget.id),
            format!("{:?}", widget.zone).to_lowercase(),
            if widget.active { "yes" } else { "no" }.to_string(),
            if widget.is_pinned { "yes" } else { "no" }.to_string(),
            render_state,
        ]);
    }

    let title = if manifest.title.is_empty() {
        manifest.slug.clone()
    } else {
        manifest.title.clone()
    };
    format!(
        "{}\n{}\nActive widgets: {}\nAvailable pins: {}",
        title.bold(),
        table,
        manifest.layout.len(),
        manifest.available_pins.join(", ")
    )
}

/// Render a resolved value, or a stable marker for absence.
pub fn format_value(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        None => "(not set)".to_string(),
    }
}
