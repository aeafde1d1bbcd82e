//! Shared test utilities for integration tests
//!
//! Provides a harness owning one sled-backed store set plus the shared TTL
//! cache, so tests can build multiple engines against the same durable state
//! the way separate requests would.

use dockyard::intent::IntentMap;
use dockyard::registry::{register_defaults, Registry};
use dockyard::storage::{StorageEngine, Stores, TtlCache};
use std::time::Duration;
use tempfile::TempDir;

/// One durable store set with a shared cache.
///
/// Every `engine()` call models a new request arriving at the same process:
/// it shares the cache and the stores but owns its pending queue.
pub struct TestHarness {
    // Held so the sled directory outlives the harness
    _dir: TempDir,
    stores: Stores,
    cache: TtlCache,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(30))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let stores = Stores::open_sled(dir.path()).expect("open sled stores");
        Self {
            _dir: dir,
            stores,
            cache: TtlCache::new(ttl),
        }
    }

    /// A new request against this process.
    pub fn engine(&self) -> StorageEngine {
        StorageEngine::new(
            self.stores.clone(),
            self.cache.clone(),
            IntentMap::default(),
        )
    }

    /// A request whose cache no longer holds anything buffered here, as if
    /// it arrived after every TTL entry expired.
    pub fn engine_with_cold_cache(&self) -> StorageEngine {
        StorageEngine::new(
            self.stores.clone(),
            TtlCache::new(Duration::from_secs(30)),
            IntentMap::default(),
        )
    }
}

/// Registry pre-loaded with the built-in widget set.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    register_defaults(&mut registry);
    registry
}
