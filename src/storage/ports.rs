//! Storage ports
//!
//! Trait seams the engine depends on. The sled implementations live in
//! `persistence`; tests substitute in-memory sled instances through the
//! same traits.

use crate::error::StorageError;
use crate::storage::records::{Item, StateRecord};
use serde_json::Value;

/// Relational-style item rows: one per `(workspace, widget)`.
pub trait ItemStore: Send + Sync {
    /// All items for a workspace, ordered by position.
    fn list(&self, workspace_id: &str) -> Result<Vec<Item>, StorageError>;

    /// Pinned subset of the workspace's items.
    fn list_pinned(&self, workspace_id: &str) -> Result<Vec<Item>, StorageError> {
        Ok(self
            .list(workspace_id)?
            .into_iter()
            .filter(|item| item.is_pinned)
            .collect())
    }

    fn get(&self, workspace_id: &str, widget_id: &str) -> Result<Option<Item>, StorageError>;

    fn put(&self, item: &Item) -> Result<(), StorageError>;

    /// Full replace: delete every row for the workspace, then bulk-insert
    /// the given set. Not a merge; callers submit the complete desired set.
    fn replace_all(&self, workspace_id: &str, items: &[Item]) -> Result<(), StorageError>;
}

/// One state record per context signature.
pub trait StateStore: Send + Sync {
    fn get(&self, signature: &str) -> Result<Option<StateRecord>, StorageError>;

    fn put(&self, signature: &str, record: &StateRecord) -> Result<(), StorageError>;
}

/// Per-user profile key-value store, unscoped by workspace or viewport.
pub trait ProfileStore: Send + Sync {
    fn get(&self, user_id: u64, key: &str) -> Result<Option<Value>, StorageError>;

    fn put(&self, user_id: u64, key: &str, value: &Value) -> Result<(), StorageError>;
}
