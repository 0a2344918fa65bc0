#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Cs`] | The content store: insert, find, capacity control, enumeration |
//! | [`packet::Data`] | A cached data packet (name, freshness period, payload, optional link) |
//! | [`packet::Interest`] | A request (name plus matching selectors) |
//! | [`name::Name`] | Hierarchical, component-wise ordered packet name |
//! | [`clock::Timestamp`] | Caller-supplied current time, milliseconds since epoch |
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost |
//! |-----------|------|
//! | insert    | O(log n) table + O(1) queue, plus eviction O(k·log n) |
//! | find      | O(log n + w) where w is the candidate range width |
//! | evict (per entry) | O(1) queue pop + O(log n) table erase |
//! | set_limit | O(k·log n) in the number of entries shed |
//!
//! ## Example
//!
//! ```rust
//! use content_store::clock::Timestamp;
//! use content_store::name::Name;
//! use content_store::packet::{Data, Interest};
//! use content_store::Cs;
//! use core::num::NonZeroUsize;
//!
//! let mut cs = Cs::new(NonZeroUsize::new(2).unwrap());
//! let t0 = Timestamp { ms_since_1970: 0 };
//!
//! let name: Name = "/a/b/c".parse().unwrap();
//! cs.insert(Data::new(name, b"hello".to_vec()).with_freshness_period(1_000), false, t0);
//!
//! let mut interest = Interest::new("/a/b".parse().unwrap());
//! interest.can_be_prefix = true;
//! assert!(cs.find(&interest, t0).is_some());
//!
//! // Exact-only lookup misses: /a/b itself is not cached.
//! let exact = Interest::new("/a/b".parse().unwrap());
//! assert!(cs.find(&exact, t0).is_none());
//! ```

#![no_std]

#[cfg(any(feature = "std", test))]
extern crate std;

extern crate alloc;

/// Hierarchical packet names.
///
/// Provides [`name::Name`] and [`name::NameComponent`], the ordering
/// primitive underneath the table: a total, component-wise order in which
/// all extensions of a prefix sort contiguously.
pub mod name;

/// Data and request packet types.
///
/// [`packet::Data`] is the cached content; [`packet::Interest`] carries the
/// request name and the matching selectors (`can_be_prefix`,
/// `must_be_fresh`, child selector, exclusion filter).
pub mod packet;

/// Caller-supplied time.
///
/// The store owns no clock: every operation that depends on freshness takes
/// a [`clock::Timestamp`] argument.
pub mod clock;

/// The cached entry type.
///
/// Wraps one data packet together with cache-management metadata: the
/// unsolicited flag, the staleness deadline, and the eviction-queue
/// membership.
pub mod entry;

/// Intrusive FIFO queue underlying the eviction machinery.
///
/// **Note**: This module is internal infrastructure and should not be used
/// directly by library consumers. It exposes unsafe raw pointer operations
/// that require careful invariant maintenance.
pub(crate) mod queue;

/// The ordered name index.
pub(crate) mod table;

/// The content store itself.
pub mod cs;

/// Store configuration.
pub mod config;

/// Cache metrics system.
///
/// Provides metrics collection and reporting through the
/// [`metrics::CacheMetrics`] trait, with deterministic `BTreeMap` output.
pub mod metrics;

/// Concurrent content store wrapper.
///
/// A single coarse mutual-exclusion region around the whole store; see the
/// module documentation for why lock striping is not an option here.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

// Re-export the store and the types most call sites touch
pub use cs::Cs;
pub use entry::{CsEntry, QueueKind};

pub use config::{CsConfig, UndeclaredFreshness};
pub use metrics::{CacheMetrics, CsMetrics};

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentCs;
