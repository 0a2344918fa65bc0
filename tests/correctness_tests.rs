//! Correctness Tests for the Content Store
//!
//! Validates the store's matching and eviction behavior with small,
//! deterministic setups. Each eviction test explicitly checks which packet
//! was evicted after an insert pushed the store over its limit.
//!
//! ## Test Strategy
//! - Small capacities (1-4 entries) for predictable behavior
//! - Caller-controlled timestamps; no wall clock anywhere
//! - Queue sizes cross-checked against the table after every step

use content_store::clock::Timestamp;
use content_store::config::{CsConfig, UndeclaredFreshness};
use content_store::metrics::CacheMetrics;
use content_store::name::{Name, NameComponent};
use content_store::packet::{ChildSelector, Data, Exclude, Interest, Link};
use content_store::{Cs, QueueKind};
use std::num::NonZeroUsize;

// ============================================================================
// HELPERS
// ============================================================================

fn ms(t: u64) -> Timestamp {
    Timestamp { ms_since_1970: t }
}

fn name(uri: &str) -> Name {
    uri.parse().unwrap()
}

fn make_cs(cap: usize) -> Cs {
    Cs::new(NonZeroUsize::new(cap).unwrap())
}

/// Data with a 10-second freshness period.
fn fresh_data(uri: &str) -> Data {
    Data::new(name(uri), uri.as_bytes().to_vec()).with_freshness_period(10_000)
}

/// Data without a declared freshness period.
fn bare_data(uri: &str) -> Data {
    Data::new(name(uri), uri.as_bytes().to_vec())
}

fn prefix_interest(uri: &str) -> Interest {
    let mut interest = Interest::new(name(uri));
    interest.can_be_prefix = true;
    interest
}

/// The queue-sum side of the size invariant.
fn queue_sum(cs: &Cs) -> usize {
    cs.queue_len(QueueKind::Unsolicited)
        + cs.queue_len(QueueKind::Stale)
        + cs.queue_len(QueueKind::Fresh)
}

fn assert_invariants(cs: &Cs) {
    assert!(cs.len() <= cs.limit().get(), "size exceeds limit");
    assert_eq!(cs.len(), queue_sum(cs), "table and queue sizes disagree");
    for entry in cs {
        let expected = if entry.is_unsolicited() {
            QueueKind::Unsolicited
        } else {
            // Solicited entries are in STALE or FRESH; which one depends on
            // when the last sweep ran, so only rule out UNSOLICITED here.
            match entry.queue() {
                Some(QueueKind::Stale) => QueueKind::Stale,
                _ => QueueKind::Fresh,
            }
        };
        assert_eq!(entry.queue(), Some(expected));
    }
}

// ============================================================================
// PREFIX AND EXACT MATCHING
// ============================================================================

#[test]
fn test_prefix_match_honors_can_be_prefix() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a/b/c"), false, ms(0));

    let hit = cs.find(&prefix_interest("/a/b"), ms(0));
    assert_eq!(hit.unwrap().name(), &name("/a/b/c"));

    // Without can_be_prefix only the exact slot is consulted.
    assert!(cs.find(&Interest::new(name("/a/b")), ms(0)).is_none());
    assert!(cs.find(&Interest::new(name("/a/b/c")), ms(0)).is_some());
}

#[test]
fn test_exact_match_preferred_over_extension() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a/b"), false, ms(0));
    cs.insert(fresh_data("/a/b/c"), false, ms(0));

    let hit = cs.find(&prefix_interest("/a/b"), ms(0));
    assert_eq!(hit.unwrap().name(), &name("/a/b"));
}

#[test]
fn test_child_selector() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a/b/2"), false, ms(0));
    cs.insert(fresh_data("/a/b/1"), false, ms(1));

    let mut interest = prefix_interest("/a/b");
    interest.child_selector = ChildSelector::Leftmost;
    assert_eq!(cs.find(&interest, ms(1)).unwrap().name(), &name("/a/b/1"));

    interest.child_selector = ChildSelector::Rightmost;
    assert_eq!(cs.find(&interest, ms(1)).unwrap().name(), &name("/a/b/2"));
}

#[test]
fn test_no_match_is_none_not_error() {
    let cs = make_cs(4);
    assert!(cs.find(&prefix_interest("/nothing"), ms(0)).is_none());
}

#[test]
fn test_sibling_prefixes_do_not_leak_into_range() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a/b"), false, ms(0));
    cs.insert(fresh_data("/a/bb"), false, ms(0));
    cs.insert(fresh_data("/a/c"), false, ms(0));

    // /a/bb shares a byte prefix with /a/b but is a different component.
    let hit = cs.find(&prefix_interest("/a/b"), ms(0));
    assert_eq!(hit.unwrap().name(), &name("/a/b"));

    let mut interest = prefix_interest("/a/b");
    interest.child_selector = ChildSelector::Rightmost;
    assert_eq!(cs.find(&interest, ms(0)).unwrap().name(), &name("/a/b"));
}

#[test]
fn test_exclude_filters_next_component() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a/b/1"), false, ms(0));
    cs.insert(fresh_data("/a/b/2"), false, ms(0));

    let mut interest = prefix_interest("/a/b");
    interest.exclude = Some(Exclude::from_components(vec![NameComponent::generic(
        b"1",
    )]));
    assert_eq!(cs.find(&interest, ms(0)).unwrap().name(), &name("/a/b/2"));

    // Excluding both candidates leaves nothing.
    interest.exclude = Some(Exclude::from_components(vec![
        NameComponent::generic(b"1"),
        NameComponent::generic(b"2"),
    ]));
    assert!(cs.find(&interest, ms(0)).is_none());
}

#[test]
fn test_exclude_never_applies_to_exact_match() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a/b"), false, ms(0));

    let mut interest = prefix_interest("/a/b");
    interest.exclude = Some(Exclude::from_components(vec![NameComponent::generic(
        b"b",
    )]));
    // The exact match has no component after the request name.
    assert!(cs.find(&interest, ms(0)).is_some());
}

// ============================================================================
// FRESHNESS
// ============================================================================

#[test]
fn test_freshness_window() {
    let mut cs = make_cs(4);
    cs.insert(
        Data::new(name("/a"), b"x".to_vec()).with_freshness_period(1_000),
        false,
        ms(0),
    );

    let mut interest = Interest::new(name("/a"));
    interest.must_be_fresh = true;
    assert!(cs.find(&interest, ms(500)).is_some());
    assert!(cs.find(&interest, ms(1_000)).is_some());
    assert!(cs.find(&interest, ms(1_001)).is_none());

    // Plain lookups still return the stale packet.
    interest.must_be_fresh = false;
    assert!(cs.find(&interest, ms(5_000)).is_some());
}

#[test]
fn test_undeclared_freshness_default_policy() {
    let mut cs = make_cs(4);
    cs.insert(bare_data("/a"), false, ms(100));

    let mut interest = Interest::new(name("/a"));
    interest.must_be_fresh = true;
    assert!(cs.find(&interest, ms(100)).is_some());
    assert!(cs.find(&interest, ms(101)).is_none());
}

#[test]
fn test_undeclared_freshness_never_stale_policy() {
    let config = CsConfig {
        capacity: NonZeroUsize::new(4).unwrap(),
        undeclared_freshness: UndeclaredFreshness::NeverStale,
    };
    let mut cs = Cs::init(config);
    cs.insert(bare_data("/a"), false, ms(100));

    let mut interest = Interest::new(name("/a"));
    interest.must_be_fresh = true;
    assert!(cs.find(&interest, ms(u64::MAX)).is_some());
}

#[test]
fn test_stale_entry_skipped_in_favor_of_fresh_sibling() {
    let mut cs = make_cs(4);
    cs.insert(
        Data::new(name("/a/1"), b"x".to_vec()).with_freshness_period(100),
        false,
        ms(0),
    );
    cs.insert(fresh_data("/a/2"), false, ms(0));

    let mut interest = prefix_interest("/a");
    interest.must_be_fresh = true;
    // /a/1 went stale at 100; the leftmost surviving match is /a/2.
    assert_eq!(cs.find(&interest, ms(500)).unwrap().name(), &name("/a/2"));
}

// ============================================================================
// EVICTION
// ============================================================================

#[test]
fn test_unsolicited_evicted_before_solicited() {
    let mut cs = make_cs(1);
    cs.insert(fresh_data("/unsolicited"), true, ms(0));
    cs.insert(fresh_data("/solicited"), false, ms(1));

    assert_eq!(cs.len(), 1);
    assert!(cs.find(&Interest::new(name("/solicited")), ms(1)).is_some());
    assert!(cs
        .find(&Interest::new(name("/unsolicited")), ms(1))
        .is_none());
    assert_eq!(cs.metrics().evictions(QueueKind::Unsolicited), 1);
    assert_invariants(&cs);
}

#[test]
fn test_fresh_eviction_is_fifo_not_name_order() {
    let mut cs = make_cs(1);
    // /z first, /a second: insertion order decides, not name order.
    cs.insert(fresh_data("/z"), false, ms(0));
    cs.insert(fresh_data("/a"), false, ms(1));

    assert_eq!(cs.len(), 1);
    assert!(cs.find(&Interest::new(name("/z")), ms(1)).is_none());
    assert!(cs.find(&Interest::new(name("/a")), ms(1)).is_some());
    assert_eq!(cs.metrics().evictions(QueueKind::Fresh), 1);
}

#[test]
fn test_stale_evicted_before_fresh_after_sweep() {
    let mut cs = make_cs(2);
    cs.insert(
        Data::new(name("/short"), b"x".to_vec()).with_freshness_period(100),
        false,
        ms(0),
    );
    cs.insert(fresh_data("/long"), false, ms(0));

    // Sweep demotes /short; the next eviction must take it from STALE
    // before touching anything in FRESH.
    assert_eq!(cs.mark_stale_entries(ms(200)), 1);
    cs.insert(fresh_data("/new"), false, ms(200));

    assert_eq!(cs.len(), 2);
    assert!(cs.find(&Interest::new(name("/short")), ms(200)).is_none());
    assert!(cs.find(&Interest::new(name("/long")), ms(200)).is_some());
    assert!(cs.find(&Interest::new(name("/new")), ms(200)).is_some());
    assert_eq!(cs.metrics().evictions(QueueKind::Stale), 1);
    assert_invariants(&cs);
}

#[test]
fn test_unsolicited_insert_into_full_solicited_store_evicts_itself() {
    let mut cs = make_cs(1);
    cs.insert(fresh_data("/solicited"), false, ms(0));
    cs.insert(fresh_data("/unsolicited"), true, ms(1));

    // Unsolicited content never displaces solicited content: the newcomer
    // is the head of the highest-priority queue and is evicted at once.
    assert_eq!(cs.len(), 1);
    assert!(cs.find(&Interest::new(name("/solicited")), ms(1)).is_some());
    assert_invariants(&cs);
}

#[test]
fn test_set_limit_shrink_evicts_immediately() {
    let mut cs = make_cs(4);
    for i in 0..4 {
        cs.insert(fresh_data(&format!("/n/{i}")), false, ms(i));
    }
    assert_eq!(cs.len(), 4);

    cs.set_limit(NonZeroUsize::new(2).unwrap());
    assert_eq!(cs.len(), 2);
    assert_eq!(cs.limit().get(), 2);
    // The two oldest went first.
    assert!(cs.find(&Interest::new(name("/n/0")), ms(10)).is_none());
    assert!(cs.find(&Interest::new(name("/n/1")), ms(10)).is_none());
    assert!(cs.find(&Interest::new(name("/n/2")), ms(10)).is_some());
    assert!(cs.find(&Interest::new(name("/n/3")), ms(10)).is_some());
    assert_invariants(&cs);
}

#[test]
fn test_invariants_under_mixed_workload() {
    let mut cs = make_cs(3);
    for i in 0..20u64 {
        let uri = format!("/obj/{}", i % 7);
        let unsolicited = i % 3 == 0;
        let data = if i % 2 == 0 {
            fresh_data(&uri)
        } else {
            bare_data(&uri)
        };
        cs.insert(data, unsolicited, ms(i * 10));
        cs.mark_stale_entries(ms(i * 10));
        assert_invariants(&cs);
    }
}

// ============================================================================
// DUPLICATE INSERT (REFRESH)
// ============================================================================

#[test]
fn test_duplicate_insert_refreshes_instead_of_duplicating() {
    let mut cs = make_cs(4);
    cs.insert(
        Data::new(name("/a"), b"x".to_vec()).with_freshness_period(100),
        false,
        ms(0),
    );
    assert!(cs
        .find(
            &{
                let mut i = Interest::new(name("/a"));
                i.must_be_fresh = true;
                i
            },
            ms(500)
        )
        .is_none());

    // Re-insert at t=500: still one entry, fresh again until t=600.
    cs.insert(
        Data::new(name("/a"), b"x".to_vec()).with_freshness_period(100),
        false,
        ms(500),
    );
    assert_eq!(cs.len(), 1);
    assert_eq!(cs.metrics().refreshes(), 1);

    let mut interest = Interest::new(name("/a"));
    interest.must_be_fresh = true;
    assert!(cs.find(&interest, ms(600)).is_some());
    assert!(cs.find(&interest, ms(601)).is_none());
}

#[test]
fn test_solicited_refresh_upgrades_unsolicited_entry() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a"), true, ms(0));
    assert_eq!(cs.queue_len(QueueKind::Unsolicited), 1);

    cs.insert(fresh_data("/a"), false, ms(1));
    assert_eq!(cs.queue_len(QueueKind::Unsolicited), 0);
    assert_eq!(cs.queue_len(QueueKind::Fresh), 1);

    let entry = cs.iter().next().unwrap();
    assert!(!entry.is_unsolicited());
    assert_invariants(&cs);
}

#[test]
fn test_unsolicited_refresh_does_not_downgrade_solicited_entry() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a"), false, ms(0));
    cs.insert(fresh_data("/a"), true, ms(1));

    let entry = cs.iter().next().unwrap();
    assert!(!entry.is_unsolicited());
    assert_eq!(cs.queue_len(QueueKind::Fresh), 1);
}

#[test]
fn test_reinsertion_promotes_stale_back_to_fresh_queue() {
    let mut cs = make_cs(4);
    cs.insert(
        Data::new(name("/a"), b"x".to_vec()).with_freshness_period(100),
        false,
        ms(0),
    );
    cs.mark_stale_entries(ms(200));
    assert_eq!(cs.queue_len(QueueKind::Stale), 1);

    cs.insert(
        Data::new(name("/a"), b"x".to_vec()).with_freshness_period(100),
        false,
        ms(200),
    );
    assert_eq!(cs.queue_len(QueueKind::Stale), 0);
    assert_eq!(cs.queue_len(QueueKind::Fresh), 1);
}

// ============================================================================
// LINKS
// ============================================================================

#[test]
fn test_insert_with_link_attaches_link() {
    let mut cs = make_cs(4);
    cs.insert_with_link(
        fresh_data("/a"),
        Link::new(10, name("/hub")),
        false,
        ms(0),
    );
    let hit = cs.find(&Interest::new(name("/a")), ms(0)).unwrap();
    let link = hit.link().unwrap();
    assert_eq!(link.delegations, vec![(10, name("/hub"))]);
}

// ============================================================================
// CAPABILITY GAP
// ============================================================================

#[test]
#[should_panic(expected = "not implemented")]
fn test_erase_is_a_hard_fault() {
    let mut cs = make_cs(4);
    cs.insert(fresh_data("/a"), false, ms(0));
    cs.erase(&name("/a"));
}

// ============================================================================
// ENUMERATION AND DIAGNOSTICS
// ============================================================================

#[test]
fn test_iteration_is_name_ordered() {
    let mut cs = make_cs(8);
    for uri in ["/c", "/a/b", "/a", "/b"] {
        cs.insert(fresh_data(uri), false, ms(0));
    }
    let names: Vec<String> = cs.iter().map(|e| e.name().to_string()).collect();
    assert_eq!(names, ["/a", "/a/b", "/b", "/c"]);
}

#[test]
fn test_dump_reflects_queue_membership() {
    let mut cs = make_cs(8);
    cs.insert(fresh_data("/f"), false, ms(0));
    cs.insert(fresh_data("/u"), true, ms(0));
    let lines = cs.dump();
    assert!(lines.iter().any(|l| l.contains("/f") && l.contains("queue=fresh")));
    assert!(lines
        .iter()
        .any(|l| l.contains("/u") && l.contains("queue=unsolicited")));
}

#[test]
fn test_metrics_accounting() {
    let mut cs = make_cs(1);
    cs.insert(fresh_data("/a"), false, ms(0));
    cs.insert(fresh_data("/a"), false, ms(1));
    cs.insert(fresh_data("/b"), false, ms(2));

    cs.find(&Interest::new(name("/b")), ms(2));
    cs.find(&Interest::new(name("/missing")), ms(2));

    let metrics = cs.metrics();
    assert_eq!(metrics.insertions(), 2);
    assert_eq!(metrics.refreshes(), 1);
    assert_eq!(metrics.evictions_total(), 1);
    assert_eq!(metrics.lookups(), 2);
    assert_eq!(metrics.hits(), 1);
    assert_eq!(metrics.misses(), 1);

    let report = CacheMetrics::metrics(&cs);
    assert_eq!(report.get("cache_hits"), Some(&1.0));
    assert_eq!(report.get("evictions_fresh"), Some(&1.0));
    assert_eq!(cs.algorithm_name(), "CS");
}

#[test]
fn test_insert_always_returns_true() {
    let mut cs = make_cs(1);
    for i in 0..10 {
        assert!(cs.insert(fresh_data(&format!("/n/{i}")), i % 2 == 0, ms(i)));
    }
    assert_eq!(cs.len(), 1);
}

#[test]
fn test_default_capacity_is_ten() {
    let mut cs = Cs::default();
    assert_eq!(cs.limit().get(), 10);
    for i in 0..20 {
        cs.insert(fresh_data(&format!("/n/{i}")), false, ms(i));
    }
    assert_eq!(cs.len(), 10);
}
