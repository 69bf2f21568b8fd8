//! Cache snapshot of the last known persisted state.
//!
//! The snapshot is an owned copy: callers get clones out and the store puts
//! clones in, so nothing handed out can alias the cached entities.

use crate::Timestamp;
use serde::{Deserialize, Serialize};

/// Counters and timestamps describing cache activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Reads served from the snapshot
    pub hits: u64,
    /// Reads that went to the persistence adapter
    pub misses: u64,
    /// Last time the snapshot was refreshed from the adapter
    pub last_sync_at: Option<Timestamp>,
    /// Last time a successful mutation refreshed the snapshot
    pub last_mutation_at: Option<Timestamp>,
}

/// Optional in-memory copy of the collection.
#[derive(Debug, Clone)]
pub struct Cache<E> {
    enabled: bool,
    snapshot: Option<Vec<E>>,
    stats: CacheStats,
}

impl<E: Clone> Cache<E> {
    /// Create an empty cache. A disabled cache never holds a snapshot but
    /// still counts misses.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            snapshot: None,
            stats: CacheStats::default(),
        }
    }

    /// Whether a snapshot is currently held.
    pub fn is_present(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Serve a copy of the snapshot, counting a hit.
    pub fn hit(&mut self) -> Option<Vec<E>> {
        let snapshot = self.snapshot.as_ref()?.clone();
        self.stats.hits += 1;
        Some(snapshot)
    }

    pub fn record_miss(&mut self) {
        self.stats.misses += 1;
    }

    /// Replace the snapshot with what was just read from the adapter.
    pub fn synced(&mut self, entities: &[E], at: Timestamp) {
        self.stats.last_sync_at = Some(at);
        self.store(entities);
    }

    /// Replace the snapshot with the state produced by a successful write.
    pub fn mutated(&mut self, entities: &[E], at: Timestamp) {
        self.stats.last_mutation_at = Some(at);
        self.store(entities);
    }

    /// Drop the snapshot; counters are kept.
    pub fn invalidate(&mut self) {
        self.snapshot = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    fn store(&mut self, entities: &[E]) {
        if self.enabled {
            self.snapshot = Some(entities.to_vec());
        }
    }
}
