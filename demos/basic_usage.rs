//! Walks through the store's matching and eviction behavior.
//!
//! Run with: cargo run --example basic_usage

use content_store::clock::Timestamp;
use content_store::metrics::CacheMetrics;
use content_store::packet::{ChildSelector, Data, Interest};
use content_store::Cs;
use std::num::NonZeroUsize;

fn ms(t: u64) -> Timestamp {
    Timestamp { ms_since_1970: t }
}

fn main() {
    let mut cs = Cs::new(NonZeroUsize::new(3).unwrap());

    // Cache three segments of a video, each fresh for 5 seconds.
    for i in 0..3 {
        let name = format!("/video/title/seg{i}").parse().unwrap();
        let data = Data::new(name, vec![0u8; 1024]).with_freshness_period(5_000);
        cs.insert(data, false, ms(0));
    }
    println!("cached {} packets (limit {})", cs.len(), cs.limit());

    // Prefix lookup: leftmost child wins by default.
    let mut interest = Interest::new("/video/title".parse().unwrap());
    interest.can_be_prefix = true;
    let hit = cs.find(&interest, ms(100)).expect("prefix match");
    println!("leftmost match: {}", hit.name());

    // Rightmost selection picks the last segment.
    interest.child_selector = ChildSelector::Rightmost;
    let hit = cs.find(&interest, ms(100)).expect("prefix match");
    println!("rightmost match: {}", hit.name());

    // After the freshness window, must_be_fresh lookups miss.
    interest.child_selector = ChildSelector::Leftmost;
    interest.must_be_fresh = true;
    assert!(cs.find(&interest, ms(6_000)).is_none());
    println!("after 6s every segment is stale for must_be_fresh lookups");

    // Inserting a fourth packet evicts the oldest cached segment.
    let data = Data::new("/video/title/seg3".parse().unwrap(), vec![0u8; 1024])
        .with_freshness_period(5_000);
    cs.insert(data, false, ms(6_000));
    println!("after inserting seg3:");
    for line in cs.dump() {
        println!("  {line}");
    }

    println!("metrics:");
    for (key, value) in CacheMetrics::metrics(&cs) {
        println!("  {key}: {value}");
    }
}
