//! Process-lifetime cache of compiled per-type dispatch functions.

use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use crate::pipeline::DispatchFn;

/// Cache counters for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatcherCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub builds: u64,
}

/// Per concrete message type, the lazily built, cached, reusable compiled
/// dispatch function.
///
/// Entries are inserted via an atomic get-or-insert and never evicted: in
/// real usage message types are a small, closed, compile-time-known set.
/// Dispatching pathological numbers of distinct runtime types is
/// unsupported; the cache grows without bound.
///
/// Two call chains racing to build the same never-seen-before type may both
/// run the builder; construction is side-effect-free, one insertion wins and
/// both callers observe a functionally equivalent dispatcher.
#[derive(Default)]
pub struct DispatcherCache {
    entries: DashMap<TypeId, DispatchFn>,
    hits: AtomicU64,
    builds: AtomicU64,
}

impl DispatcherCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            hits: AtomicU64::new(0),
            builds: AtomicU64::new(0),
        }
    }

    /// Cached dispatcher for `message_type`, building it on first access.
    pub fn get_or_build(
        &self,
        message_type: TypeId,
        message_name: &'static str,
        build: impl FnOnce() -> DispatchFn,
    ) -> DispatchFn {
        if let Some(entry) = self.entries.get(&message_type) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return entry.value().clone();
        }

        let built = build();
        self.builds.fetch_add(1, Ordering::Relaxed);
        debug!("Compiled dispatcher for message type '{}'", message_name);

        // Racing builders: the first insertion wins, later ones are
        // discarded in favor of the cached entry.
        self.entries
            .entry(message_type)
            .or_insert(built)
            .value()
            .clone()
    }

    /// Number of cached dispatchers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> DispatcherCacheStats {
        DispatcherCacheStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            builds: self.builds.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for DispatcherCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("DispatcherCache")
            .field("entries", &stats.entries)
            .field("hits", &stats.hits)
            .field("builds", &stats.builds)
            .finish()
    }
}
