//! Shares one store across producer and consumer threads.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

use content_store::clock::Timestamp;
use content_store::packet::{Data, Interest};
use content_store::ConcurrentCs;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

fn main() {
    let cs = Arc::new(ConcurrentCs::new(NonZeroUsize::new(1024).unwrap()));

    let producers: Vec<_> = (0..4)
        .map(|p| {
            let cs = Arc::clone(&cs);
            thread::spawn(move || {
                for i in 0..256 {
                    let name = format!("/producer{p}/obj{i}").parse().unwrap();
                    let data = Data::new(name, vec![0u8; 256]).with_freshness_period(10_000);
                    cs.insert(data, false, Timestamp { ms_since_1970: i });
                }
            })
        })
        .collect();

    for producer in producers {
        producer.join().unwrap();
    }

    let consumers: Vec<_> = (0..4)
        .map(|p| {
            let cs = Arc::clone(&cs);
            thread::spawn(move || {
                let mut hits = 0usize;
                for i in 0..256 {
                    let name = format!("/producer{p}/obj{i}").parse().unwrap();
                    let interest = Interest::new(name);
                    let now = Timestamp { ms_since_1970: 500 };
                    if cs.find_with(&interest, now, |d| d.is_some()) {
                        hits += 1;
                    }
                }
                hits
            })
        })
        .collect();

    let total_hits: usize = consumers.into_iter().map(|h| h.join().unwrap()).sum();
    println!("stored {} packets, {} consumer hits", cs.len(), total_hits);
}
