//! The cached entry type.
//!
//! A [`CsEntry`] wraps one data packet together with the metadata the store
//! manages: whether the packet was unsolicited, when it goes stale, and
//! which cleanup queue currently tracks it. Entries are created on insert,
//! mutated only by the store (staleness refresh, queue reattachment) and
//! destroyed on eviction.

use crate::clock::Timestamp;
use crate::config::UndeclaredFreshness;
use crate::name::Name;
use crate::packet::Data;
use crate::queue::Node;
use core::fmt;
use core::ptr;

/// Which cleanup queue an entry belongs to.
///
/// The variant order is the eviction priority order: unsolicited content is
/// evicted first, then stale, then fresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// Cached without a matching outstanding request.
    Unsolicited,
    /// Solicited, freshness period elapsed.
    Stale,
    /// Solicited and still fresh.
    Fresh,
}

impl QueueKind {
    /// Number of queues.
    pub(crate) const COUNT: usize = 3;

    /// All kinds in eviction priority order.
    pub(crate) const PRIORITY_ORDER: [QueueKind; Self::COUNT] =
        [QueueKind::Unsolicited, QueueKind::Stale, QueueKind::Fresh];

    /// Index into the store's queue array.
    pub(crate) fn index(self) -> usize {
        match self {
            QueueKind::Unsolicited => 0,
            QueueKind::Stale => 1,
            QueueKind::Fresh => 2,
        }
    }

    /// Diagnostic tag reported when an entry is evicted from this queue.
    pub fn eviction_reason(self) -> &'static str {
        match self {
            QueueKind::Unsolicited => "unsolicited",
            QueueKind::Stale => "stale",
            QueueKind::Fresh => "fresh",
        }
    }
}

/// One cached packet plus its cache-management metadata.
///
/// The entry exclusively owns its packet; dropping the entry releases the
/// payload. Queue membership is tracked as a tag plus the raw pointer to
/// the entry's node in that queue, so detaching is O(1).
pub struct CsEntry {
    data: Data,
    /// Set at insertion time; cleared only when a solicited insert refreshes
    /// an unsolicited entry.
    unsolicited: bool,
    /// Absolute staleness deadline; `None` means the entry never goes stale.
    stale_at: Option<Timestamp>,
    /// Queue currently tracking this entry; `None` only transiently during
    /// construction and destruction.
    queue: Option<QueueKind>,
    /// This entry's node in the owning queue; null while unattached.
    node: *mut Node<Name>,
}

impl CsEntry {
    /// Creates an entry for `data`, computing the staleness deadline from
    /// the packet's declared freshness period against `now`.
    pub(crate) fn new(
        data: Data,
        unsolicited: bool,
        now: Timestamp,
        policy: UndeclaredFreshness,
    ) -> Self {
        let stale_at = Self::compute_stale_at(data.freshness_period_ms(), now, policy);
        Self {
            data,
            unsolicited,
            stale_at,
            queue: None,
            node: ptr::null_mut(),
        }
    }

    fn compute_stale_at(
        freshness_period_ms: Option<u64>,
        now: Timestamp,
        policy: UndeclaredFreshness,
    ) -> Option<Timestamp> {
        match (freshness_period_ms, policy) {
            (Some(ms), _) => Some(now.adding(ms)),
            (None, UndeclaredFreshness::ImmediatelyStale) => Some(now),
            (None, UndeclaredFreshness::NeverStale) => None,
        }
    }

    /// The cached packet.
    pub fn data(&self) -> &Data {
        &self.data
    }

    /// The full packet name.
    pub fn name(&self) -> &Name {
        self.data.name()
    }

    /// True when the packet was cached without a matching outstanding
    /// request.
    pub fn is_unsolicited(&self) -> bool {
        self.unsolicited
    }

    /// The absolute staleness deadline, if one applies.
    pub fn stale_at(&self) -> Option<Timestamp> {
        self.stale_at
    }

    /// True once the freshness window has elapsed at `now`.
    pub fn is_stale(&self, now: Timestamp) -> bool {
        match self.stale_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }

    /// The queue currently tracking this entry, or `None` while unattached.
    pub fn queue(&self) -> Option<QueueKind> {
        self.queue
    }

    /// Recomputes the staleness deadline from a duplicate insert of the
    /// same name. The stored payload and link are kept: under
    /// content-addressing the same full name carries the same content.
    pub(crate) fn refresh(
        &mut self,
        incoming: &Data,
        now: Timestamp,
        policy: UndeclaredFreshness,
    ) {
        debug_assert_eq!(
            self.data.payload(),
            incoming.payload(),
            "duplicate insert under {} with a different payload",
            self.data.name()
        );
        self.stale_at = Self::compute_stale_at(incoming.freshness_period_ms(), now, policy);
    }

    /// Reclassifies an unsolicited entry as solicited.
    pub(crate) fn unset_unsolicited(&mut self) {
        self.unsolicited = false;
    }

    /// Records queue membership after an attach.
    pub(crate) fn set_queue(&mut self, kind: QueueKind, node: *mut Node<Name>) {
        self.queue = Some(kind);
        self.node = node;
    }

    /// Clears and returns the queue membership, if any.
    pub(crate) fn take_queue(&mut self) -> Option<(QueueKind, *mut Node<Name>)> {
        let kind = self.queue.take()?;
        let node = self.node;
        self.node = ptr::null_mut();
        Some((kind, node))
    }
}

impl fmt::Debug for CsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsEntry")
            .field("name", self.name())
            .field("unsolicited", &self.unsolicited)
            .field("stale_at", &self.stale_at)
            .field("queue", &self.queue)
            .finish()
    }
}
