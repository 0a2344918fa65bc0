//! Cache metrics system.
//!
//! Counters for the store's observable behavior: lookups and hits,
//! insertions and duplicate refreshes, evictions broken down by the reason
//! queue, and fresh→stale transitions. Reports use `BTreeMap` so metric
//! output is deterministic and stable across runs, which matters for
//! simulation comparisons and test assertions.
//!
//! Lookup counters use [`Cell`]: the store's `find` is immutable by
//! contract (it never touches the table or the queues), so hit/miss
//! accounting must not require `&mut`. The store is single-threaded — the
//! interior mutability is not shared across threads (the type is
//! deliberately not `Sync`; the `concurrent` wrapper serializes access).

use crate::entry::QueueKind;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use core::cell::Cell;
use core::fmt;

/// Trait implemented by metric-reporting cache types.
///
/// The returned map contains all metrics as key-value pairs with keys
/// sorted alphabetically, for consistent output.
pub trait CacheMetrics {
    /// Returns all metrics in deterministic order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification.
    fn algorithm_name(&self) -> &'static str;
}

/// Metrics tracked by a content store.
#[derive(Debug, Default)]
pub struct CsMetrics {
    /// Total lookups (`find` calls).
    lookups: Cell<u64>,
    /// Lookups that returned a packet.
    hits: Cell<u64>,
    /// New entries admitted.
    insertions: u64,
    /// Duplicate-name inserts merged into an existing entry.
    refreshes: u64,
    /// Evictions, indexed by the queue the victim came from.
    evictions: [u64; QueueKind::COUNT],
    /// Entries moved from the fresh queue to the stale queue.
    stale_transitions: u64,
}

impl CsMetrics {
    /// Creates a zeroed metrics instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one lookup and whether it hit.
    pub(crate) fn record_lookup(&self, hit: bool) {
        self.lookups.set(self.lookups.get() + 1);
        if hit {
            self.hits.set(self.hits.get() + 1);
        }
    }

    /// Records a newly admitted entry.
    pub(crate) fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records a duplicate insert merged into an existing entry.
    pub(crate) fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    /// Records an eviction from the given queue.
    pub(crate) fn record_eviction(&mut self, kind: QueueKind) {
        self.evictions[kind.index()] += 1;
    }

    /// Records a fresh→stale queue transition.
    pub(crate) fn record_stale_transition(&mut self) {
        self.stale_transitions += 1;
    }

    /// Total lookups.
    pub fn lookups(&self) -> u64 {
        self.lookups.get()
    }

    /// Lookups that returned a packet.
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Lookups that found nothing.
    pub fn misses(&self) -> u64 {
        self.lookups.get() - self.hits.get()
    }

    /// Hit rate in [0.0, 1.0]; 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.lookups.get();
        if lookups > 0 {
            self.hits.get() as f64 / lookups as f64
        } else {
            0.0
        }
    }

    /// New entries admitted.
    pub fn insertions(&self) -> u64 {
        self.insertions
    }

    /// Duplicate-name inserts merged into an existing entry.
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }

    /// Evictions whose victim came from the given queue.
    pub fn evictions(&self, kind: QueueKind) -> u64 {
        self.evictions[kind.index()]
    }

    /// Evictions across all queues.
    pub fn evictions_total(&self) -> u64 {
        self.evictions.iter().sum()
    }

    /// Entries moved from the fresh queue to the stale queue.
    pub fn stale_transitions(&self) -> u64 {
        self.stale_transitions
    }

    /// Converts the metrics to a `BTreeMap` for reporting.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("lookups".to_string(), self.lookups() as f64);
        metrics.insert("cache_hits".to_string(), self.hits() as f64);
        metrics.insert("cache_misses".to_string(), self.misses() as f64);
        metrics.insert("hit_rate".to_string(), self.hit_rate());

        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("refreshes".to_string(), self.refreshes as f64);

        metrics.insert("evictions".to_string(), self.evictions_total() as f64);
        for kind in QueueKind::PRIORITY_ORDER {
            let mut key = String::from("evictions_");
            key.push_str(kind.eviction_reason());
            metrics.insert(key, self.evictions[kind.index()] as f64);
        }

        metrics.insert(
            "stale_transitions".to_string(),
            self.stale_transitions as f64,
        );

        metrics
    }
}

impl CacheMetrics for CsMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "CS"
    }
}

impl fmt::Display for CsMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lookups={} hits={} hit_rate={:.3} insertions={} refreshes={} evictions={} stale_transitions={}",
            self.lookups(),
            self.hits(),
            self.hit_rate(),
            self.insertions,
            self.refreshes,
            self.evictions_total(),
            self.stale_transitions,
        )
    }
}
