//! Persistence layer for the storage ports
//!
//! Sled-backed implementations using one database with a named tree per
//! store. Values are JSON-encoded: state payloads are arbitrary JSON maps,
//! so the same codec serves every tree.

use crate::error::StorageError;
use crate::storage::ports::{ItemStore, ProfileStore, StateStore};
use crate::storage::records::{Item, StateRecord};
use serde_json::Value;
use std::path::Path;

/// Separator between key segments; never appears in slugs or widget ids.
const KEY_SEP: u8 = 0x1f;

fn joined_key(left: &str, right: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(left.len() + right.len() + 1);
    key.extend_from_slice(left.as_bytes());
    key.push(KEY_SEP);
    key.extend_from_slice(right.as_bytes());
    key
}

fn scan_prefix(left: &str) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(left.len() + 1);
    prefix.extend_from_slice(left.as_bytes());
    prefix.push(KEY_SEP);
    prefix
}

/// Sled-backed databases for all three ports.
///
/// Opens (or creates) a single sled database at the given path and exposes
/// each store as its own named tree.
pub struct SledStores {
    items: SledItemStore,
    state: SledStateStore,
    profile: SledProfileStore,
}

impl SledStores {
    /// Open the database at `path`, creating it as needed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self {
            items: SledItemStore {
                tree: db.open_tree("items")?,
            },
            state: SledStateStore {
                tree: db.open_tree("state")?,
            },
            profile: SledProfileStore {
                tree: db.open_tree("profile")?,
            },
        })
    }

    /// Split into the three concrete stores, for trait-object wiring.
    pub fn into_parts(self) -> (SledItemStore, SledStateStore, SledProfileStore) {
        (self.items, self.state, self.profile)
    }

    pub fn items(&self) -> &SledItemStore {
        &self.items
    }

    pub fn state(&self) -> &SledStateStore {
        &self.state
    }

    pub fn profile(&self) -> &SledProfileStore {
        &self.profile
    }
}

/// Sled-based implementation of `ItemStore`.
///
/// Key layout: `{workspace}\x1f{widget}` — the key itself enforces the
/// one-item-per-workspace-and-widget invariant.
pub struct SledItemStore {
    tree: sled::Tree,
}

impl ItemStore for SledItemStore {
    fn list(&self, workspace_id: &str) -> Result<Vec<Item>, StorageError> {
        let mut items = Vec::new();
        for entry in self.tree.scan_prefix(scan_prefix(workspace_id)) {
            let (_, value) = entry?;
            let item: Item = serde_json::from_slice(&value)?;
            items.push(item);
        }
        items.sort_by_key(|item| item.position.order);
        Ok(items)
    }

    fn get(&self, workspace_id: &str, widget_id: &str) -> Result<Option<Item>, StorageError> {
        match self.tree.get(joined_key(workspace_id, widget_id))? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, item: &Item) -> Result<(), StorageError> {
        let key = joined_key(&item.workspace_id, &item.widget_id);
        let value = serde_json::to_vec(item)?;
        self.tree.insert(key, value)?;
        Ok(())
    }

    fn replace_all(&self, workspace_id: &str, items: &[Item]) -> Result<(), StorageError> {
        let mut batch = sled::Batch::default();

        // Delete-then-insert in a single batch. The batch is atomic within
        // this store but nothing serializes two racing replace_all calls;
        // the later delete can drop rows the earlier insert just wrote.
        for entry in self.tree.scan_prefix(scan_prefix(workspace_id)) {
            let (key, _) = entry?;
            batch.remove(key);
        }
        for item in items {
            let key = joined_key(workspace_id, &item.widget_id);
            batch.insert(key, serde_json::to_vec(item)?);
        }

        self.tree.apply_batch(batch)?;
        Ok(())
    }
}

/// Sled-based implementation of `StateStore`, keyed by context signature.
pub struct SledStateStore {
    tree: sled::Tree,
}

impl StateStore for SledStateStore {
    fn get(&self, signature: &str) -> Result<Option<StateRecord>, StorageError> {
        match self.tree.get(signature.as_bytes())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, signature: &str, record: &StateRecord) -> Result<(), StorageError> {
        let value = serde_json::to_vec(record)?;
        self.tree.insert(signature.as_bytes(), value)?;
        Ok(())
    }
}

/// Sled-based implementation of `ProfileStore`.
///
/// Key layout: `{user_id}\x1f{key}`.
pub struct SledProfileStore {
    tree: sled::Tree,
}

impl ProfileStore for SledProfileStore {
    fn get(&self, user_id: u64, key: &str) -> Result<Option<Value>, StorageError> {
        let store_key = joined_key(&user_id.to_string(), key);
        match self.tree.get(store_key)? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, user_id: u64, key: &str, value: &Value) -> Result<(), StorageError> {
        let store_key = joined_key(&user_id.to_string(), key);
        self.tree.insert(store_key, serde_json::to_vec(value)?)?;
        Ok(())
    }
}
