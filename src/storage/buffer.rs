//! Write buffer
//!
//! Two halves with different lifetimes. The `TtlCache` is a process-shared
//! read cache holding just-written values under short deadlines: it gives
//! read-your-writes to near-simultaneous requests whose durable view has not
//! caught up yet. `PendingWrites` is the request-local queue of durable
//! commits, built by each save and drained exactly once by the
//! end-of-request flush. Neither half is ever process-global mutable state;
//! both are constructed explicitly and threaded through the engine.

use crate::intent::KeyIntent;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default lifetime of a cache entry.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

fn cache_key(signature: &str, key: &str) -> String {
    format!("{}\u{1f}{}", signature, key)
}

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Shared short-TTL cache keyed by `signature + key`.
///
/// Cloning is cheap and shares the underlying map; each request's engine
/// gets its own handle. The cache is read-only coordination: it does not
/// serialize writers, it only shortens the stale-read window.
#[derive(Clone)]
pub struct TtlCache {
    entries: Arc<Mutex<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Store a just-written value, resetting its deadline.
    pub fn insert(&self, signature: &str, key: &str, value: Value) {
        let mut entries = self.entries.lock();
        entries.insert(
            cache_key(signature, key),
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Read a buffered value, pruning it if its deadline has passed.
    pub fn get(&self, signature: &str, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock();
        let composite = cache_key(signature, key);
        match entries.get(&composite) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(&composite);
                None
            }
            None => None,
        }
    }

    /// Drop one entry, typically right after its durable commit lands.
    pub fn remove(&self, signature: &str, key: &str) {
        self.entries.lock().remove(&cache_key(signature, key));
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// One buffered durable commit.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub signature: String,
    pub key: String,
    pub intent: KeyIntent,
    pub value: Value,
}

/// Request-local ordered queue of pending durable commits.
#[derive(Default)]
pub struct PendingWrites {
    queue: Vec<PendingWrite>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, write: PendingWrite) {
        self.queue.push(write);
    }

    /// Take the accumulated writes in arrival order, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<PendingWrite> {
        std::mem::take(&mut self.queue)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
