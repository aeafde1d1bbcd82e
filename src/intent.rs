//! Key intent classification
//!
//! Every logical key the engine sees maps to an intent that decides which
//! backing store and read/write strategy applies. Intents are registered
//! per key at process start; classification consults the registration table
//! rather than branching on key strings at each call site.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Marker prefix for profile preference keys, stripped before the upsert.
pub const PREFERENCE_PREFIX: &str = "pref:";

/// Storage intent of a logical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyIntent {
    /// Relational item rows: direct lookup, full-replace on write.
    Items,
    /// Per-user profile key-value, unscoped by workspace or viewport.
    Preference,
    /// Buffered and cascading, stored in the dedicated telemetry column.
    Telemetry,
    /// Buffered and cascading, merged into the shared JSON column.
    State,
}

/// Registration table mapping logical keys to intents.
///
/// Last registration for a key wins. Keys carrying the preference marker
/// classify as `Preference` without registration; everything unregistered
/// falls through to `State`.
#[derive(Debug, Clone)]
pub struct IntentMap {
    entries: HashMap<String, KeyIntent>,
}

impl IntentMap {
    /// Empty table with no built-in keys.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Register a logical key with an explicit intent.
    pub fn register(&mut self, key: impl Into<String>, intent: KeyIntent) {
        self.entries.insert(key.into(), intent);
    }

    /// Classify a logical key.
    pub fn classify(&self, key: &str) -> KeyIntent {
        if let Some(intent) = self.entries.get(key) {
            return *intent;
        }
        if key.starts_with(PREFERENCE_PREFIX) {
            return KeyIntent::Preference;
        }
        KeyIntent::State
    }
}

impl Default for IntentMap {
    /// Table pre-loaded with the engine's built-in keys.
    fn default() -> Self {
        let mut map = Self::empty();
        map.register("layout", KeyIntent::Items);
        map.register("items", KeyIntent::Items);
        map.register("pins", KeyIntent::Items);
        map.register("telemetry", KeyIntent::Telemetry);
        map
    }
}
