//! The ordered name index.
//!
//! The table is the authoritative owner of all cached entries, sorted by
//! full packet name under the canonical component order. Because every
//! extension of a prefix sorts contiguously right after the prefix itself,
//! the candidate range for a prefix lookup is a start bound plus a
//! `starts_with` cutoff — no upper-bound successor computation is needed.

use crate::entry::CsEntry;
use crate::name::Name;
use alloc::collections::BTreeMap;
use core::fmt;
use core::ops::Bound;

/// Ordered set of entries, unique by full packet name.
pub(crate) struct Table {
    entries: BTreeMap<Name, CsEntry>,
}

impl Table {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of stored entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The entry stored under exactly `name`.
    pub(crate) fn get(&self, name: &Name) -> Option<&CsEntry> {
        self.entries.get(name)
    }

    /// Mutable access to the entry stored under exactly `name`.
    pub(crate) fn get_mut(&mut self, name: &Name) -> Option<&mut CsEntry> {
        self.entries.get_mut(name)
    }

    /// Inserts a new entry. Full names are unique; inserting over an
    /// existing name is a controller bug (duplicates must be merged by the
    /// caller, never stored).
    pub(crate) fn insert(&mut self, entry: CsEntry) {
        let name = entry.name().clone();
        let previous = self.entries.insert(name, entry);
        debug_assert!(
            previous.is_none(),
            "duplicate-name insert must be merged by the controller"
        );
    }

    /// Removes and returns the entry stored under `name`.
    ///
    /// The caller must already have detached the entry from its cleanup
    /// queue; erasing an attached entry would leave a dangling queue node.
    pub(crate) fn erase(&mut self, name: &Name) -> Option<CsEntry> {
        let entry = self.entries.remove(name)?;
        debug_assert!(
            entry.queue().is_none(),
            "entry must be detached from its queue before erase"
        );
        Some(entry)
    }

    /// All entries in name order.
    pub(crate) fn iter(&self) -> alloc::collections::btree_map::Values<'_, Name, CsEntry> {
        self.entries.values()
    }

    /// Entries whose name properly extends `prefix`, in name order.
    ///
    /// The exact-name slot is not part of the range; callers consult it
    /// separately via [`Table::get`].
    pub(crate) fn extensions<'a>(
        &'a self,
        prefix: &'a Name,
    ) -> impl Iterator<Item = &'a CsEntry> + 'a {
        self.entries
            .range((Bound::Excluded(prefix), Bound::Unbounded))
            .map(|(_, entry)| entry)
            .take_while(move |entry| entry.name().starts_with(prefix))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("len", &self.entries.len())
            .finish()
    }
}
