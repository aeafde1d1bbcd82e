//! Built-in widget set
//!
//! The five widgets the default layout names, registered at process start
//! so a fresh install hydrates a working dock before any host plugin adds
//! its own definitions.

use crate::registry::widget::{RenderError, RenderRequest, Renderable, WidgetDefinition, Zone};
use crate::registry::Registry;
use chrono::Utc;
use std::sync::Arc;

struct SystemHealth;

impl Renderable for SystemHealth {
    fn render(&self, req: &RenderRequest) -> Result<String, RenderError> {
        Ok(format!(
            "<section class=\"system-health\"><h3>System health</h3>\
             <p>Workspace {} checked at {}</p></section>",
            req.workspace_id,
            Utc::now().to_rfc3339()
        ))
    }
}

struct RecentActivity;

impl Renderable for RecentActivity {
    fn render(&self, req: &RenderRequest) -> Result<String, RenderError> {
        let limit = req
            .settings
            .get("limit")
            .and_then(|v| v.as_u64())
            .unwrap_or(5);
        Ok(format!(
            "<ul class=\"recent-activity\" data-limit=\"{}\"></ul>",
            limit
        ))
    }
}

struct QuickDraft;

impl Renderable for QuickDraft {
    fn render(&self, _req: &RenderRequest) -> Result<String, RenderError> {
        Ok("<form class=\"quick-draft\"><textarea name=\"draft\"></textarea></form>".to_string())
    }
}

struct NewsFeed;

impl Renderable for NewsFeed {
    fn render(&self, req: &RenderRequest) -> Result<String, RenderError> {
        let source = req.settings.get("source").and_then(|v| v.as_str());
        match source {
            Some(url) if !url.starts_with("https://") => Err(RenderError::Failed(format!(
                "refusing non-https feed source: {}",
                url
            ))),
            _ => Ok("<div class=\"news-feed\" data-pending=\"true\"></div>".to_string()),
        }
    }
}

struct Shortcuts;

impl Renderable for Shortcuts {
    fn render(&self, req: &RenderRequest) -> Result<String, RenderError> {
        Ok(format!(
            "<nav class=\"shortcuts\" data-user=\"{}\"></nav>",
            req.user_id
        ))
    }
}

/// Register the built-in widgets onto a registry.
pub fn register_defaults(registry: &mut Registry) {
    registry.register_widget(
        WidgetDefinition::new("system-health", "System Health")
            .with_icon("pulse")
            .with_renderer(Arc::new(SystemHealth)),
    );
    registry.register_widget(
        WidgetDefinition::new("recent-activity", "Recent Activity")
            .with_icon("clock")
            .with_renderer(Arc::new(RecentActivity)),
    );
    registry.register_widget(
        WidgetDefinition::new("quick-draft", "Quick Draft")
            .with_icon("pencil")
            .with_renderer(Arc::new(QuickDraft)),
    );
    registry.register_widget(
        WidgetDefinition::new("news-feed", "News Feed")
            .with_icon("rss")
            .with_renderer(Arc::new(NewsFeed)),
    );
    registry.register_widget(
        WidgetDefinition::new("shortcuts", "Shortcuts")
            .with_icon("bolt")
            .with_zone(Zone::Side)
            .with_renderer(Arc::new(Shortcuts)),
    );
}
