//! Context-scoped storage engine
//!
//! Classifies every logical key into an intent, routes writes to the right
//! backing store (full-replace item rows, profile upserts, or the buffered
//! state path), resolves reads through the cascading scope/viewport
//! fallback, and commits buffered writes at end-of-request.
//!
//! The engine is constructed once per request and threaded through the call
//! chain; only the short-TTL read cache is shared across requests.

pub mod buffer;
pub mod persistence;
pub mod ports;
pub mod records;

pub use buffer::{PendingWrite, PendingWrites, TtlCache, DEFAULT_TTL};
pub use persistence::{SledItemStore, SledProfileStore, SledStateStore, SledStores};
pub use ports::{ItemStore, ProfileStore, StateStore};
pub use records::{parse_layout, EntryKind, Item, LayoutEntry, Position, StateRecord};

use crate::context::{Context, ScopeType, Viewport};
use crate::error::StorageError;
use crate::intent::{IntentMap, KeyIntent, PREFERENCE_PREFIX};
use chrono::Utc;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Bundle of the three storage ports the engine writes through.
///
/// Cheap to clone; each request's engine holds its own handle set.
#[derive(Clone)]
pub struct Stores {
    pub items: Arc<dyn ItemStore>,
    pub state: Arc<dyn StateStore>,
    pub profile: Arc<dyn ProfileStore>,
}

impl Stores {
    /// Open sled-backed stores at `path`.
    pub fn open_sled<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let (items, state, profile) = SledStores::open(path)?.into_parts();
        Ok(Self {
            items: Arc::new(items),
            state: Arc::new(state),
            profile: Arc::new(profile),
        })
    }
}

/// Outcome of a pin toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinToggle {
    Added,
    Removed,
}

impl PinToggle {
    pub fn as_str(&self) -> &'static str {
        match self {
            PinToggle::Added => "added",
            PinToggle::Removed => "removed",
        }
    }
}

/// Per-request storage engine.
///
/// `save` and `get` degrade failures to `false`/`None`: callers treat them
/// as "try again" or "use the default", never as a cause-specific signal.
/// The cause is logged where it is dropped.
pub struct StorageEngine {
    stores: Stores,
    cache: TtlCache,
    pending: PendingWrites,
    intents: IntentMap,
}

impl StorageEngine {
    /// Build an engine for one request lifecycle.
    ///
    /// The cache handle is shared with other requests; the pending queue is
    /// owned by this engine and drained by its `flush`.
    pub fn new(stores: Stores, cache: TtlCache, intents: IntentMap) -> Self {
        Self {
            stores,
            cache,
            pending: PendingWrites::new(),
            intents,
        }
    }

    /// Classify a logical key against this engine's registration table.
    pub fn classify(&self, key: &str) -> KeyIntent {
        self.intents.classify(key)
    }

    /// Number of writes awaiting durable commit.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    /// Persist `data` under `key` for the given context.
    ///
    /// Items-intent keys are a full replace of the workspace's item set;
    /// preference keys upsert into the user profile; everything else lands
    /// in the write buffer and becomes durable at `flush`.
    pub fn save(&mut self, key: &str, data: Value, ctx: &Context) -> bool {
        if !ctx.is_valid() {
            warn!(user_id = ctx.user_id(), "rejecting save for invalid context");
            return false;
        }

        let intent = self.intents.classify(key);
        let result = match intent {
            KeyIntent::Items => self.save_items(ctx, &data),
            KeyIntent::Preference => self.save_preference(ctx, key, &data),
            KeyIntent::State | KeyIntent::Telemetry => {
                self.buffer_write(ctx, key, intent, data);
                Ok(())
            }
        };

        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(key, signature = %ctx.signature(), %err, "save failed");
                false
            }
        }
    }

    /// Resolve `key` for the given context.
    ///
    /// The write buffer is consulted first under the exact signature, so a
    /// value saved moments ago reads back before its durable commit lands.
    pub fn get(&self, key: &str, ctx: &Context) -> Option<Value> {
        if let Some(buffered) = self.cache.get(&ctx.signature(), key) {
            return Some(buffered);
        }

        let intent = self.intents.classify(key);
        let result = match intent {
            KeyIntent::Items => self.get_items(ctx, key),
            KeyIntent::Preference => self.get_preference(ctx, key),
            KeyIntent::State | KeyIntent::Telemetry => self.resolve_cascading(ctx, key, intent),
        };

        match result {
            Ok(value) => value,
            Err(err) => {
                warn!(key, signature = %ctx.signature(), %err, "get failed");
                None
            }
        }
    }

    /// Toggle the pinned flag of one widget's item row.
    ///
    /// Read-modify-write on the shared item set: concurrent toggles on the
    /// same id, or a toggle racing a full layout replace, can lose an
    /// update. No versioning token guards this path.
    pub fn toggle_pin(&mut self, widget_id: &str, ctx: &Context) -> Option<PinToggle> {
        let workspace_id = ctx.workspace_id();
        let result = (|| -> Result<PinToggle, StorageError> {
            match self.stores.items.get(workspace_id, widget_id)? {
                Some(mut item) => {
                    item.is_pinned = !item.is_pinned;
                    item.updated_at = Utc::now();
                    let toggle = if item.is_pinned {
                        PinToggle::Added
                    } else {
                        PinToggle::Removed
                    };
                    self.stores.items.put(&item)?;
                    Ok(toggle)
                }
                None => {
                    let next_order = self
                        .stores
                        .items
                        .list(workspace_id)?
                        .iter()
                        .map(|item| item.position.order + 1)
                        .max()
                        .unwrap_or(0);
                    let item = Item {
                        workspace_id: workspace_id.to_string(),
                        widget_id: widget_id.to_string(),
                        settings: Value::Null,
                        position: Position {
                            order: next_order,
                            ..Position::default()
                        },
                        is_pinned: true,
                        updated_at: Utc::now(),
                    };
                    self.stores.items.put(&item)?;
                    Ok(PinToggle::Added)
                }
            }
        })();

        match result {
            Ok(toggle) => {
                debug!(widget_id, workspace_id, outcome = toggle.as_str(), "pin toggled");
                Some(toggle)
            }
            Err(err) => {
                warn!(widget_id, workspace_id, %err, "pin toggle failed");
                None
            }
        }
    }

    /// Commit every write buffered during this request, in arrival order.
    ///
    /// Each entry commits independently; a failing entry is logged and lost
    /// while later entries still commit. Committed entries leave the shared
    /// cache, since the durable view has caught up with them.
    pub fn flush(&mut self) {
        let writes = self.pending.drain();
        if writes.is_empty() {
            return;
        }
        debug!(count = writes.len(), "flushing buffered writes");

        for write in writes {
            match self.commit(&write) {
                Ok(()) => self.cache.remove(&write.signature, &write.key),
                Err(err) => {
                    warn!(key = %write.key, signature = %write.signature, %err,
                        "buffered write lost during flush");
                }
            }
        }
    }

    fn save_items(&self, ctx: &Context, data: &Value) -> Result<(), StorageError> {
        let entries = parse_layout(data);
        let items: Vec<Item> = entries
            .iter()
            .map(|entry| Item::from_entry(ctx.workspace_id(), entry))
            .collect();
        self.stores.items.replace_all(ctx.workspace_id(), &items)
    }

    fn save_preference(&self, ctx: &Context, key: &str, data: &Value) -> Result<(), StorageError> {
        let profile_key = key.strip_prefix(PREFERENCE_PREFIX).unwrap_or(key);
        self.stores.profile.put(ctx.user_id(), profile_key, data)
    }

    fn buffer_write(&mut self, ctx: &Context, key: &str, intent: KeyIntent, data: Value) {
        let signature = ctx.signature();
        self.cache.insert(&signature, key, data.clone());
        self.pending.push(PendingWrite {
            signature,
            key: key.to_string(),
            intent,
            value: data,
        });
    }

    fn get_items(&self, ctx: &Context, key: &str) -> Result<Option<Value>, StorageError> {
        let items = if key == "pins" {
            self.stores.items.list_pinned(ctx.workspace_id())?
        } else {
            self.stores.items.list(ctx.workspace_id())?
        };
        if items.is_empty() {
            return Ok(None);
        }
        let entries: Vec<LayoutEntry> = items.iter().map(Item::to_entry).collect();
        Ok(Some(serde_json::to_value(entries)?))
    }

    fn get_preference(&self, ctx: &Context, key: &str) -> Result<Option<Value>, StorageError> {
        let profile_key = key.strip_prefix(PREFERENCE_PREFIX).unwrap_or(key);
        self.stores.profile.get(ctx.user_id(), profile_key)
    }

    /// Cascading resolution: narrowest applicable scope first, viewport-
    /// specific rows before the `All` row at each level, first hit wins.
    /// No merging across levels.
    fn resolve_cascading(
        &self,
        ctx: &Context,
        key: &str,
        intent: KeyIntent,
    ) -> Result<Option<Value>, StorageError> {
        for level in self.scope_levels(ctx) {
            let mut candidates = Vec::with_capacity(2);
            if level.viewport() != Viewport::All {
                candidates.push(level.clone());
            }
            candidates.push(level.at_viewport(Viewport::All));

            for candidate in candidates {
                if let Some(value) = self.lookup(&candidate, key, intent)? {
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    /// Fallback chain for a context, narrowest first. A context without a
    /// template classification skips the template level.
    fn scope_levels(&self, ctx: &Context) -> Vec<Context> {
        let mut levels = vec![ctx.clone()];
        match ctx.scope() {
            ScopeType::Instance => {
                if let Some(template) = ctx.template_scope_id() {
                    levels.push(ctx.at_scope(ScopeType::Template, template));
                }
                levels.push(ctx.at_scope(ScopeType::Global, "global"));
            }
            ScopeType::Template => {
                levels.push(ctx.at_scope(ScopeType::Global, "global"));
            }
            ScopeType::Global => {}
        }
        levels
    }

    fn lookup(
        &self,
        candidate: &Context,
        key: &str,
        intent: KeyIntent,
    ) -> Result<Option<Value>, StorageError> {
        let signature = candidate.signature();
        if let Some(buffered) = self.cache.get(&signature, key) {
            return Ok(Some(buffered));
        }

        let Some(record) = self.stores.state.get(&signature)? else {
            return Ok(None);
        };
        let value = match intent {
            KeyIntent::Telemetry => record.telemetry,
            _ => record.values.get(key).cloned(),
        };
        Ok(value)
    }

    fn commit(&self, write: &PendingWrite) -> Result<(), StorageError> {
        let mut record = self
            .stores
            .state
            .get(&write.signature)?
            .unwrap_or_default();
        match write.intent {
            KeyIntent::Telemetry => record.telemetry = Some(write.value.clone()),
            _ => {
                record.values.insert(write.key.clone(), write.value.clone());
            }
        }
        record.updated_at = Utc::now();
        self.stores.state.put(&write.signature, &record)
    }
}
