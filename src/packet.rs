//! Data and request packet types.
//!
//! These are the collaborators the store consumes: a [`Data`] packet with a
//! name, an optional freshness period and an opaque payload, and an
//! [`Interest`] carrying the request name plus the matching selectors. Wire
//! encoding, signing and verification happen elsewhere in a forwarder; the
//! store only needs the decoded fields.

use crate::name::{Name, NameComponent};
use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt;

/// A forwarding-hint link object: delegations pointing toward where the
/// content can be fetched, ordered by preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// `(preference, delegation name)` pairs; lower preference is tried first.
    pub delegations: Vec<(u32, Name)>,
}

impl Link {
    /// A link with a single delegation.
    pub fn new(preference: u32, name: Name) -> Self {
        Self {
            delegations: alloc::vec![(preference, name)],
        }
    }
}

/// A data packet: the immutable content cached by the store.
#[derive(Clone, PartialEq, Eq)]
pub struct Data {
    name: Name,
    freshness_period_ms: Option<u64>,
    payload: Box<[u8]>,
    link: Option<Link>,
}

impl Data {
    /// Creates a data packet with no declared freshness period and no link.
    pub fn new(name: Name, payload: Vec<u8>) -> Self {
        Self {
            name,
            freshness_period_ms: None,
            payload: payload.into_boxed_slice(),
            link: None,
        }
    }

    /// Declares a freshness period, in milliseconds.
    pub fn with_freshness_period(mut self, ms: u64) -> Self {
        self.freshness_period_ms = Some(ms);
        self
    }

    /// Attaches a forwarding-hint link object.
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    /// The full packet name.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The declared freshness period, if any.
    pub fn freshness_period_ms(&self) -> Option<u64> {
        self.freshness_period_ms
    }

    /// The opaque payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The attached link object, if any.
    pub fn link(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub(crate) fn set_link(&mut self, link: Link) {
        self.link = Some(link);
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("name", &self.name)
            .field("freshness_period_ms", &self.freshness_period_ms)
            .field("payload_len", &self.payload.len())
            .field("has_link", &self.link.is_some())
            .finish()
    }
}

/// Tie-break policy among multiple prefix-extension matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildSelector {
    /// Prefer the first surviving candidate in name order.
    #[default]
    Leftmost,
    /// Prefer the last surviving candidate in name order.
    Rightmost,
}

/// Exclusion filter over the name component immediately following the
/// request name.
///
/// Holds a sorted set of excluded component values; candidates whose next
/// component is in the set are skipped. Entries whose name equals the
/// request name have no next component and are never excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclude {
    components: Vec<NameComponent>,
}

impl Exclude {
    /// Builds an exclusion set from the given components.
    pub fn from_components(mut components: Vec<NameComponent>) -> Self {
        components.sort();
        components.dedup();
        Self { components }
    }

    /// True when `component` is excluded.
    pub fn contains(&self, component: &NameComponent) -> bool {
        self.components.binary_search(component).is_ok()
    }

    /// True when nothing is excluded.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

/// A request: the name to match plus the selectors constraining the match.
#[derive(Debug, Clone)]
pub struct Interest {
    /// The request name; candidates must carry it as a prefix (or equal it).
    pub name: Name,
    /// Allow names that properly extend the request name, not just the
    /// exact name.
    pub can_be_prefix: bool,
    /// Reject entries whose freshness period has elapsed.
    pub must_be_fresh: bool,
    /// Tie-break among multiple surviving prefix-extension matches.
    pub child_selector: ChildSelector,
    /// Exclusion filter over the next name component, if any.
    pub exclude: Option<Exclude>,
}

impl Interest {
    /// An exact-match request: no prefix matching, no freshness
    /// requirement, leftmost selection, nothing excluded.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            can_be_prefix: false,
            must_be_fresh: false,
            child_selector: ChildSelector::default(),
            exclude: None,
        }
    }
}
