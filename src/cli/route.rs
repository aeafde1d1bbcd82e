//! CLI route: single route table and run context. Dispatches to the engine
//! and registry and formats results through the output module.

use crate::cli::output::{format_manifest_text, format_value};
use crate::cli::parse::{Commands, ContextArgs};
use crate::config::{ConfigLoader, DockyardConfig};
use crate::context::{Context, ScopeType, Viewport};
use crate::error::EngineError;
use crate::intent::IntentMap;
use crate::registry::{canonical_target, register_defaults, Registry};
use crate::storage::{StorageEngine, Stores, TtlCache};
use serde_json::json;
use std::path::PathBuf;

/// Runtime context for CLI execution: opened stores, shared cache, and the
/// widget registry. Each command runs as one request lifecycle: build an
/// engine, do the work, flush.
pub struct RunContext {
    stores: Stores,
    cache: TtlCache,
    registry: Registry,
    user_id: u64,
}

impl RunContext {
    /// Create run context from workspace root and optional overrides.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        data_dir: Option<PathBuf>,
        user_id: u64,
    ) -> Result<Self, EngineError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&workspace_root)?,
        };
        Self::with_config(&config, &workspace_root, data_dir, user_id)
    }

    /// Create run context from an already-loaded configuration.
    pub fn with_config(
        config: &DockyardConfig,
        workspace_root: &std::path::Path,
        data_dir: Option<PathBuf>,
        user_id: u64,
    ) -> Result<Self, EngineError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            EngineError::ConfigError(messages.join("; "))
        })?;

        let data_root =
            data_dir.unwrap_or_else(|| config.storage.resolve_data_root(workspace_root));
        std::fs::create_dir_all(&data_root)
            .map_err(|e| EngineError::StorageError(crate::error::StorageError::IoError(e)))?;

        let stores = Stores::open_sled(&data_root)?;
        let cache = TtlCache::new(config.buffer.ttl());

        let mut registry = Registry::new();
        register_defaults(&mut registry);

        Ok(Self {
            stores,
            cache,
            registry,
            user_id,
        })
    }

    /// Fresh engine for one command's request lifecycle.
    fn engine(&self) -> StorageEngine {
        StorageEngine::new(
            self.stores.clone(),
            self.cache.clone(),
            IntentMap::default(),
        )
    }

    /// Execute command
    pub fn execute(&self, command: &Commands) -> Result<String, EngineError> {
        match command {
            Commands::Status { workspace, format } => self.handle_status(workspace, format),
            Commands::Get { key, context } => self.handle_get(key, context),
            Commands::Set {
                key,
                value,
                context,
            } => self.handle_set(key, value, context),
            Commands::TogglePin { widget, workspace } => self.handle_toggle_pin(widget, workspace),
            Commands::Reset { workspace, yes } => self.handle_reset(workspace, *yes),
        }
    }

    fn handle_status(&self, workspace: &str, format: &str) -> Result<String, EngineError> {
        let engine = self.engine();
        let manifest = self
            .registry
            .hydrate_manifest(&engine, self.user_id, workspace);

        match format {
            "json" => serde_json::to_string_pretty(&manifest)
                .map_err(|e| EngineError::StorageError(e.into())),
            _ => Ok(format_manifest_text(&manifest)),
        }
    }

    fn handle_get(&self, key: &str, args: &ContextArgs) -> Result<String, EngineError> {
        let ctx = build_context(self.user_id, args)?;
        let engine = self.engine();
        Ok(format_value(engine.get(key, &ctx).as_ref()))
    }

    fn handle_set(&self, key: &str, value: &str, args: &ContextArgs) -> Result<String, EngineError> {
        let ctx = build_context(self.user_id, args)?;
        let payload: serde_json::Value =
            serde_json::from_str(value).map_err(|e| EngineError::StorageError(e.into()))?;

        let mut engine = self.engine();
        if !engine.save(key, payload, &ctx) {
            return Ok("Save rejected (see logs)".to_string());
        }
        engine.flush();
        Ok(format!("Saved '{}' for {}", key, ctx.signature()))
    }

    fn handle_toggle_pin(&self, widget: &str, workspace: &str) -> Result<String, EngineError> {
        let ctx = Context::new(self.user_id, canonical_target(workspace));
        let mut engine = self.engine();
        match engine.toggle_pin(widget, &ctx) {
            Some(toggle) => Ok(format!("{}: {}", widget, toggle.as_str())),
            None => Ok(format!("Toggle failed for '{}' (see logs)", widget)),
        }
    }

    fn handle_reset(&self, workspace: &str, skip_confirm: bool) -> Result<String, EngineError> {
        let slug = canonical_target(workspace);
        if !skip_confirm {
            use dialoguer::Confirm;
            let confirmed = Confirm::new()
                .with_prompt(format!("Clear all saved items for workspace '{}'?", slug))
                .interact()
                .map_err(|e| EngineError::ConfigError(format!("Failed to get user input: {}", e)))?;

            if !confirmed {
                return Ok("Reset cancelled".to_string());
            }
        }

        let ctx = Context::new(self.user_id, &slug);
        let mut engine = self.engine();
        if !engine.save("items", json!([]), &ctx) {
            return Ok("Reset rejected (see logs)".to_string());
        }
        engine.flush();
        Ok(format!("Workspace '{}' items cleared", slug))
    }
}

fn build_context(user_id: u64, args: &ContextArgs) -> Result<Context, EngineError> {
    let scope = match args.scope.as_str() {
        "global" => ScopeType::Global,
        "template" => ScopeType::Template,
        "instance" => ScopeType::Instance,
        other => {
            return Err(EngineError::InvalidContext(format!(
                "unknown scope '{}'",
                other
            )))
        }
    };
    let viewport = match args.viewport.as_str() {
        "desktop" => Viewport::Desktop,
        "mobile" => Viewport::Mobile,
        "all" => Viewport::All,
        other => {
            return Err(EngineError::InvalidContext(format!(
                "unknown viewport '{}'",
                other
            )))
        }
    };

    Ok(Context::new(user_id, canonical_target(&args.workspace))
        .with_scope(scope, args.scope_id.clone())
        .with_viewport(viewport))
}
