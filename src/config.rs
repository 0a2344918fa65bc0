//! Store configuration.
//!
//! # Sizing
//!
//! `capacity` is a packet count, not a byte budget: the store bounds the
//! number of cached packets and evicts by class priority once the bound is
//! exceeded. Pick it from your memory budget and the expected packet size:
//!
//! ```text
//! capacity ≈ memory_budget / (average_packet_size + per_entry_overhead)
//! per_entry_overhead ≈ name bytes × 2 + ~100 bytes (tree node, queue node)
//! ```
//!
//! # Undeclared freshness
//!
//! A data packet may omit its freshness period. Whether such a packet
//! behaves as immediately stale or as permanently fresh is a policy
//! decision, so it is an explicit option here rather than a hidden default:
//!
//! - [`UndeclaredFreshness::ImmediatelyStale`] (default): the packet still
//!   answers plain lookups but never satisfies `must_be_fresh`, and it is
//!   preferred for eviction over fresh content.
//! - [`UndeclaredFreshness::NeverStale`]: for deployments where undeclared
//!   freshness means immutable content.
//!
//! # Examples
//!
//! ```
//! use content_store::config::{CsConfig, UndeclaredFreshness};
//! use content_store::Cs;
//! use core::num::NonZeroUsize;
//!
//! let config = CsConfig {
//!     capacity: NonZeroUsize::new(4096).unwrap(),
//!     undeclared_freshness: UndeclaredFreshness::ImmediatelyStale,
//! };
//! let cs = Cs::init(config);
//! assert_eq!(cs.limit().get(), 4096);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Default packet capacity when none is configured.
pub const DEFAULT_CAPACITY: usize = 10;

/// How a packet without a declared freshness period is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UndeclaredFreshness {
    /// The packet is stale as soon as any time passes after insertion.
    #[default]
    ImmediatelyStale,
    /// The packet never goes stale.
    NeverStale,
}

/// Configuration for a content store.
#[derive(Clone, Copy)]
pub struct CsConfig {
    /// Maximum number of cached packets.
    pub capacity: NonZeroUsize,
    /// Classification of packets without a declared freshness period.
    pub undeclared_freshness: UndeclaredFreshness,
}

impl Default for CsConfig {
    fn default() -> Self {
        Self {
            // DEFAULT_CAPACITY is non-zero
            capacity: NonZeroUsize::new(DEFAULT_CAPACITY).unwrap(),
            undeclared_freshness: UndeclaredFreshness::default(),
        }
    }
}

impl fmt::Debug for CsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsConfig")
            .field("capacity", &self.capacity)
            .field("undeclared_freshness", &self.undeclared_freshness)
            .finish()
    }
}
