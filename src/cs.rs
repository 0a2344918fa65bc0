//! The content store.
//!
//! The store consists of two data structures: a table and a set of cleanup
//! queues. The table is an ordered container sorted by the full names of
//! the stored data packets, each wrapped in a [`CsEntry`] carrying staleness
//! and solicitation metadata. The cleanup queues are three linked FIFO
//! queues tracking unsolicited, stale, and fresh packets respectively; an
//! entry's queue node is placed into, removed from, and moved between the
//! queues as the entry is added, removed, or reclassified. Every entry is in
//! exactly one queue at any moment, in first-in-first-out order within the
//! queue. Eviction exhausts the first non-empty queue before moving on, in
//! the order unsolicited, stale, fresh.
//!
//! All mutation goes through [`Cs`]; lookups never modify either structure
//! and are safe to run back-to-back against the same borrow.

use crate::clock::Timestamp;
use crate::config::CsConfig;
use crate::entry::{CsEntry, QueueKind};
use crate::metrics::{CacheMetrics, CsMetrics};
use crate::name::Name;
use crate::packet::{ChildSelector, Data, Interest, Link};
use crate::queue::Queue;
use crate::table::Table;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroUsize;

/// A bounded, name-indexed store of data packets.
///
/// # Examples
///
/// ```
/// use content_store::clock::Timestamp;
/// use content_store::packet::{Data, Interest};
/// use content_store::Cs;
///
/// let mut cs = Cs::default();
/// let now = Timestamp { ms_since_1970: 0 };
/// cs.insert(Data::new("/a/b".parse().unwrap(), b"payload".to_vec()), false, now);
///
/// let interest = Interest::new("/a/b".parse().unwrap());
/// assert_eq!(cs.find(&interest, now).map(|d| d.payload()), Some(&b"payload"[..]));
/// ```
pub struct Cs {
    config: CsConfig,
    table: Table,
    queues: [Queue<Name>; QueueKind::COUNT],
    metrics: CsMetrics,
}

// SAFETY: Cs owns all of its data; the raw pointers stored in entries point
// only into queue nodes owned by `queues`, so moving the whole store to
// another thread moves every aliased allocation with it.
unsafe impl Send for Cs {}

impl Default for Cs {
    /// A store with the default configuration (capacity 10).
    fn default() -> Self {
        Self::init(CsConfig::default())
    }
}

impl Cs {
    /// Creates a store holding at most `capacity` packets.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::init(CsConfig {
            capacity,
            ..CsConfig::default()
        })
    }

    /// Creates a store from a full configuration.
    pub fn init(config: CsConfig) -> Self {
        Self {
            config,
            table: Table::new(),
            queues: [Queue::new(), Queue::new(), Queue::new()],
            metrics: CsMetrics::new(),
        }
    }

    /// Inserts a data packet.
    ///
    /// Always returns `true`: capacity is enforced after the fact by
    /// eviction, never by rejecting the insert. Inserting under an already
    /// cached full name refreshes that entry instead of duplicating it —
    /// the staleness deadline is recomputed, an unsolicited entry becomes
    /// solicited when the refresh is solicited, and the entry moves to the
    /// tail of the queue implied by its new classification.
    pub fn insert(&mut self, data: Data, unsolicited: bool, now: Timestamp) -> bool {
        let name = data.name().clone();
        match self.table.get_mut(&name) {
            Some(entry) => {
                entry.refresh(&data, now, self.config.undeclared_freshness);
                if entry.is_unsolicited() && !unsolicited {
                    entry.unset_unsolicited();
                }
                self.metrics.record_refresh();
            }
            None => {
                let entry = CsEntry::new(data, unsolicited, now, self.config.undeclared_freshness);
                self.table.insert(entry);
                self.metrics.record_insertion();
            }
        }
        self.attach_queue(&name, now);
        self.evict();
        true
    }

    /// Inserts a data packet with a forwarding-hint link object attached.
    pub fn insert_with_link(
        &mut self,
        mut data: Data,
        link: Link,
        unsolicited: bool,
        now: Timestamp,
    ) -> bool {
        data.set_link(link);
        self.insert(data, unsolicited, now)
    }

    /// Finds the best matching data packet, or `None` when nothing matches.
    ///
    /// A no-match is an expected outcome, not an error. The lookup never
    /// mutates the table or the queues.
    pub fn find(&self, interest: &Interest, now: Timestamp) -> Option<&Data> {
        let found = self.find_entry(interest, now);
        self.metrics.record_lookup(found.is_some());
        found.map(CsEntry::data)
    }

    fn find_entry(&self, interest: &Interest, now: Timestamp) -> Option<&CsEntry> {
        // Entries with the exact request name are preferred over any
        // prefix extension.
        if let Some(entry) = self.find_rightmost_among_exact(interest, now) {
            return Some(entry);
        }
        if !interest.can_be_prefix {
            return None;
        }
        match interest.child_selector {
            ChildSelector::Leftmost => self.find_leftmost(interest, now),
            ChildSelector::Rightmost => self.find_rightmost(interest, now),
        }
    }

    /// Rightmost match among entries whose name equals the request name.
    ///
    /// Full names are unique in the table, so the exact slot holds at most
    /// one entry and the rightmost tie-break degenerates to that slot.
    fn find_rightmost_among_exact(&self, interest: &Interest, now: Timestamp) -> Option<&CsEntry> {
        self.table
            .get(&interest.name)
            .filter(|entry| Self::can_satisfy(entry, interest, now))
    }

    /// Leftmost match among proper extensions of the request name.
    fn find_leftmost(&self, interest: &Interest, now: Timestamp) -> Option<&CsEntry> {
        self.table
            .extensions(&interest.name)
            .find(|entry| Self::can_satisfy(entry, interest, now))
    }

    /// Rightmost match among proper extensions of the request name.
    fn find_rightmost(&self, interest: &Interest, now: Timestamp) -> Option<&CsEntry> {
        self.table
            .extensions(&interest.name)
            .filter(|entry| Self::can_satisfy(entry, interest, now))
            .last()
    }

    /// Selector checks shared by every candidate: freshness and the
    /// exclusion filter over the component following the request name.
    fn can_satisfy(entry: &CsEntry, interest: &Interest, now: Timestamp) -> bool {
        if interest.must_be_fresh && entry.is_stale(now) {
            return false;
        }
        if let Some(exclude) = &interest.exclude {
            if let Some(next) = entry.name().get(interest.name.len()) {
                if exclude.contains(next) {
                    return false;
                }
            }
        }
        true
    }

    /// Not implemented.
    ///
    /// Erasure by exact name is a deliberate capability gap: calling this
    /// is a hard fault, never a silent no-op.
    pub fn erase(&mut self, exact_name: &Name) {
        unimplemented!("Cs::erase({exact_name}) is not implemented");
    }

    /// Changes the capacity, in number of packets. Shrinking below the
    /// current size evicts immediately.
    pub fn set_limit(&mut self, limit: NonZeroUsize) {
        self.config.capacity = limit;
        self.evict();
    }

    /// The capacity, in number of packets.
    pub fn limit(&self) -> NonZeroUsize {
        self.config.capacity
    }

    /// Number of stored packets.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// The active configuration.
    pub fn config(&self) -> &CsConfig {
        &self.config
    }

    /// The store's metric counters.
    pub fn metrics(&self) -> &CsMetrics {
        &self.metrics
    }

    /// Number of entries currently tracked by the given cleanup queue.
    pub fn queue_len(&self, kind: QueueKind) -> usize {
        self.queues[kind.index()].len()
    }

    /// Iterates all entries in name order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Diagnostic enumeration for tests and introspection; not part of the
    /// steady-state contract.
    pub fn dump(&self) -> Vec<String> {
        self.table
            .iter()
            .map(|entry| {
                format!(
                    "{} queue={} unsolicited={}",
                    entry.name(),
                    entry
                        .queue()
                        .map(QueueKind::eviction_reason)
                        .unwrap_or("unattached"),
                    entry.is_unsolicited(),
                )
            })
            .collect()
    }

    /// Sweeps the fresh queue at `now`, moving entries whose freshness
    /// period has elapsed to the stale queue. Returns how many were moved.
    ///
    /// Lookup correctness never depends on this sweep — `must_be_fresh`
    /// re-derives staleness from the deadline on every lookup. The sweep
    /// keeps the eviction order aligned with the entries' actual value, and
    /// is meant to be driven periodically by the forwarder's timing
    /// collaborator.
    pub fn mark_stale_entries(&mut self, now: Timestamp) -> usize {
        let expired: Vec<Name> = {
            let table = &self.table;
            self.queues[QueueKind::Fresh.index()]
                .iter()
                .filter(|name| table.get(name).is_some_and(|entry| entry.is_stale(now)))
                .cloned()
                .collect()
        };
        for name in &expired {
            self.move_to_stale_queue(name);
        }
        expired.len()
    }

    /// Attaches an entry to the cleanup queue implied by its
    /// classification at `now`.
    ///
    /// If the entry is already attached to a queue, it is automatically
    /// detached first, so reattachment always lands at the tail.
    fn attach_queue(&mut self, name: &Name, now: Timestamp) {
        let Some(entry) = self.table.get_mut(name) else {
            debug_assert!(false, "attach_queue: {name} is not in the table");
            return;
        };
        let kind = if entry.is_unsolicited() {
            QueueKind::Unsolicited
        } else if entry.is_stale(now) {
            QueueKind::Stale
        } else {
            QueueKind::Fresh
        };
        if let Some((previous, node)) = entry.take_queue() {
            // SAFETY: the node was issued by queues[previous] when the
            // entry was attached and has not been unlinked since
            let _ = unsafe { self.queues[previous.index()].unlink(node) };
        }
        let node = self.queues[kind.index()].push_back(name.clone());
        entry.set_queue(kind, node);
    }

    /// Detaches an entry from its current cleanup queue.
    ///
    /// Detaching an unattached entry is a controller bug; it is caught by a
    /// debug assertion rather than surfaced as a recoverable error.
    fn detach_queue(&mut self, name: &Name) {
        let Some(entry) = self.table.get_mut(name) else {
            debug_assert!(false, "detach_queue: {name} is not in the table");
            return;
        };
        match entry.take_queue() {
            Some((kind, node)) => {
                // SAFETY: the node was issued by queues[kind] when the
                // entry was attached and has not been unlinked since
                let _ = unsafe { self.queues[kind.index()].unlink(node) };
            }
            None => debug_assert!(false, "detach_queue: {name} is unattached"),
        }
    }

    /// Moves an entry from the fresh queue to the stale queue.
    ///
    /// This transition is one-directional; nothing promotes a stale entry
    /// back to fresh except a fresh re-insertion of the same name.
    fn move_to_stale_queue(&mut self, name: &Name) {
        let Some(entry) = self.table.get_mut(name) else {
            debug_assert!(false, "move_to_stale_queue: {name} is not in the table");
            return;
        };
        debug_assert_eq!(entry.queue(), Some(QueueKind::Fresh));
        let Some((kind, node)) = entry.take_queue() else {
            return;
        };
        // SAFETY: the node was issued by queues[kind] when the entry was
        // attached and has not been unlinked since
        let node = unsafe { self.queues[kind.index()].unlink_node(node) };
        let node = self.queues[QueueKind::Stale.index()].adopt(node);
        entry.set_queue(QueueKind::Stale, node);
        self.metrics.record_stale_transition();
    }

    /// Picks the eviction victim: the head of the first non-empty queue in
    /// the fixed priority order unsolicited → stale → fresh. The queue kind
    /// doubles as the diagnostic reason tag.
    fn evict_pick(&self) -> Option<(Name, QueueKind)> {
        for kind in QueueKind::PRIORITY_ORDER {
            if let Some(name) = self.queues[kind.index()].peek_front() {
                return Some((name.clone(), kind));
            }
        }
        None
    }

    /// Evicts entries until the number stored is within the capacity.
    fn evict(&mut self) {
        while self.table.len() > self.config.capacity.get() {
            let Some((name, kind)) = self.evict_pick() else {
                debug_assert!(false, "table is non-empty but every queue is empty");
                break;
            };
            self.detach_queue(&name);
            let erased = self.table.erase(&name);
            debug_assert!(erased.is_some());
            self.metrics.record_eviction(kind);
        }
    }
}

impl CacheMetrics for Cs {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "CS"
    }
}

impl fmt::Debug for Cs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cs")
            .field("limit", &self.config.capacity)
            .field("len", &self.table.len())
            .field("unsolicited", &self.queue_len(QueueKind::Unsolicited))
            .field("stale", &self.queue_len(QueueKind::Stale))
            .field("fresh", &self.queue_len(QueueKind::Fresh))
            .finish()
    }
}

/// Immutable in-name-order iterator over the store's entries.
pub struct Iter<'a> {
    inner: alloc::collections::btree_map::Values<'a, Name, CsEntry>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CsEntry;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a Cs {
    type Item = &'a CsEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Iter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(t: u64) -> Timestamp {
        Timestamp { ms_since_1970: t }
    }

    fn fresh_data(name: &str) -> Data {
        Data::new(name.parse().unwrap(), b"x".to_vec()).with_freshness_period(10_000)
    }

    fn cs(limit: usize) -> Cs {
        Cs::new(NonZeroUsize::new(limit).unwrap())
    }

    #[test]
    fn test_insert_classifies_into_queues() {
        let mut cs = cs(10);
        cs.insert(fresh_data("/fresh"), false, ms(0));
        cs.insert(fresh_data("/unsolicited"), true, ms(0));
        cs.insert(Data::new("/stale".parse().unwrap(), b"x".to_vec()), false, ms(0));
        // Undeclared freshness with the default policy: the entry is only
        // stale once time has passed, so at insert time it lands in FRESH.
        assert_eq!(cs.queue_len(QueueKind::Fresh), 2);
        assert_eq!(cs.queue_len(QueueKind::Unsolicited), 1);
        assert_eq!(cs.queue_len(QueueKind::Stale), 0);
        assert_eq!(cs.len(), 3);
    }

    #[test]
    fn test_refresh_reattaches_at_tail() {
        let mut cs = cs(2);
        cs.insert(fresh_data("/a"), false, ms(0));
        cs.insert(fresh_data("/b"), false, ms(1));
        // Refreshing /a moves it behind /b in the fresh queue.
        cs.insert(fresh_data("/a"), false, ms(2));
        assert_eq!(cs.len(), 2);

        // The next eviction must take /b, the queue head.
        cs.insert(fresh_data("/c"), false, ms(3));
        assert!(cs.find(&Interest::new("/b".parse().unwrap()), ms(3)).is_none());
        assert!(cs.find(&Interest::new("/a".parse().unwrap()), ms(3)).is_some());
    }

    #[test]
    fn test_evict_pick_priority() {
        let mut cs = cs(10);
        cs.insert(fresh_data("/f"), false, ms(0));
        cs.insert(fresh_data("/u"), true, ms(0));
        let (name, kind) = cs.evict_pick().unwrap();
        assert_eq!(name, "/u".parse().unwrap());
        assert_eq!(kind, QueueKind::Unsolicited);
    }

    #[test]
    fn test_mark_stale_entries_moves_queue() {
        let mut cs = cs(10);
        cs.insert(
            Data::new("/short".parse().unwrap(), b"x".to_vec()).with_freshness_period(100),
            false,
            ms(0),
        );
        cs.insert(fresh_data("/long"), false, ms(0));
        assert_eq!(cs.queue_len(QueueKind::Fresh), 2);

        assert_eq!(cs.mark_stale_entries(ms(50)), 0);
        assert_eq!(cs.mark_stale_entries(ms(200)), 1);
        assert_eq!(cs.queue_len(QueueKind::Fresh), 1);
        assert_eq!(cs.queue_len(QueueKind::Stale), 1);
        // Idempotent: the entry is already stale-queued.
        assert_eq!(cs.mark_stale_entries(ms(300)), 0);
    }

    #[test]
    fn test_dump_lists_entries_in_name_order() {
        let mut cs = cs(10);
        cs.insert(fresh_data("/b"), false, ms(0));
        cs.insert(fresh_data("/a"), true, ms(0));
        let lines = cs.dump();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("/a "));
        assert!(lines[0].contains("queue=unsolicited"));
        assert!(lines[1].starts_with("/b "));
        assert!(lines[1].contains("queue=fresh"));
    }

    #[test]
    fn test_into_iterator() {
        let mut store = cs(10);
        store.insert(fresh_data("/b"), false, ms(0));
        store.insert(fresh_data("/a"), false, ms(0));
        let names: Vec<_> = (&store).into_iter().map(|e| e.name().clone()).collect();
        assert_eq!(names, ["/a".parse().unwrap(), "/b".parse().unwrap()]);
    }
}
