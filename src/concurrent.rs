//! Concurrent content store wrapper.
//!
//! # Why a single lock instead of striping?
//!
//! Sharded caches split the key space across independently locked segments
//! so unrelated keys never contend. That design is unavailable here:
//!
//! - A lookup is a *range* scan over every name sharing the request prefix.
//!   Hash-sharding scatters a prefix's extensions across segments, and any
//!   partitioning by name would still let one lookup span shards.
//! - Lookup correctness depends on consistency invariants that span the
//!   table *and* all three cleanup queues; a concurrent insert or eviction
//!   in another shard's critical section could be observed mid-transition.
//!
//! So the whole store sits behind one mutual-exclusion region, and lookup,
//! insert and eviction all serialize through it.
//!
//! # Why Mutex instead of RwLock?
//!
//! Lookups are read-only, but they update hit/miss counters and — more
//! importantly — insert and eviction dominate a forwarder's cache traffic
//! roughly as much as lookups do, so a read-write split buys little. A
//! `parking_lot::Mutex` has lower overhead and makes the serialization
//! explicit.
//!
//! # Zero-copy access
//!
//! A matched packet cannot be returned by reference across the lock
//! boundary, and cloning payloads on every hit would be wasteful. Use
//! [`ConcurrentCs::find_with`] to process the match while the lock is held:
//!
//! ```rust,ignore
//! let payload_len = cs.find_with(&interest, now, |data| data.map(|d| d.payload().len()));
//! ```

use crate::clock::Timestamp;
use crate::config::CsConfig;
use crate::metrics::CacheMetrics;
use crate::name::Name;
use crate::packet::{Data, Interest, Link};
use crate::Cs;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;
use parking_lot::Mutex;

/// A thread-safe content store: one coarse lock around a [`Cs`].
pub struct ConcurrentCs {
    inner: Mutex<Cs>,
}

impl ConcurrentCs {
    /// Creates a store holding at most `capacity` packets.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(Cs::new(capacity)),
        }
    }

    /// Creates a store from a full configuration.
    pub fn init(config: CsConfig) -> Self {
        Self {
            inner: Mutex::new(Cs::init(config)),
        }
    }

    /// Inserts a data packet. See [`Cs::insert`].
    pub fn insert(&self, data: Data, unsolicited: bool, now: Timestamp) -> bool {
        self.inner.lock().insert(data, unsolicited, now)
    }

    /// Inserts a data packet with a link attached. See
    /// [`Cs::insert_with_link`].
    pub fn insert_with_link(
        &self,
        data: Data,
        link: Link,
        unsolicited: bool,
        now: Timestamp,
    ) -> bool {
        self.inner.lock().insert_with_link(data, link, unsolicited, now)
    }

    /// Looks up the best match and hands it to `f` while the lock is held.
    ///
    /// `f` receives `Some(&Data)` on a hit and `None` on a miss, and its
    /// return value is passed through.
    pub fn find_with<R>(
        &self,
        interest: &Interest,
        now: Timestamp,
        f: impl FnOnce(Option<&Data>) -> R,
    ) -> R {
        let guard = self.inner.lock();
        f(guard.find(interest, now))
    }

    /// Looks up the best match and clones the payload out of the lock.
    ///
    /// Convenience for callers that need owned bytes anyway; prefer
    /// [`ConcurrentCs::find_with`] on hot paths.
    pub fn find_cloned(&self, interest: &Interest, now: Timestamp) -> Option<Vec<u8>> {
        self.find_with(interest, now, |data| data.map(|d| d.payload().to_vec()))
    }

    /// Not implemented; hard fault. See [`Cs::erase`].
    pub fn erase(&self, exact_name: &Name) {
        self.inner.lock().erase(exact_name);
    }

    /// Changes the capacity; shrinking evicts immediately.
    pub fn set_limit(&self, limit: NonZeroUsize) {
        self.inner.lock().set_limit(limit);
    }

    /// The capacity, in number of packets.
    pub fn limit(&self) -> NonZeroUsize {
        self.inner.lock().limit()
    }

    /// Number of stored packets.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Sweeps elapsed fresh entries to the stale queue. See
    /// [`Cs::mark_stale_entries`].
    pub fn mark_stale_entries(&self, now: Timestamp) -> usize {
        self.inner.lock().mark_stale_entries(now)
    }

    /// Diagnostic enumeration; see [`Cs::dump`].
    pub fn dump(&self) -> Vec<String> {
        self.inner.lock().dump()
    }
}

impl CacheMetrics for ConcurrentCs {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics().to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "CS"
    }
}

impl fmt::Debug for ConcurrentCs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.lock().fmt(f)
    }
}
