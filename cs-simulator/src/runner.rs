//! Replays a generated workload against a content store.
//!
//! The simulated forwarder loop per request: advance the clock, look the
//! interest up, and on a miss "fetch upstream" and admit the data packet as
//! solicited. A configurable share of arrivals is injected unsolicited, the
//! way opportunistically cached data reaches a real forwarder, and the
//! fresh→stale sweep runs on a fixed request interval.

use crate::generator::WorkloadGenerator;
use crate::models::{RunConfig, RunResult, WorkloadConfig};
use ahash::AHashMap;
use content_store::clock::Timestamp;
use content_store::{Cs, QueueKind};
use std::num::NonZeroUsize;
use std::time::Instant;

/// Drives one simulation run.
pub struct SimulationRunner {
    run: RunConfig,
    workload: WorkloadConfig,
}

impl SimulationRunner {
    pub fn new(run: RunConfig, workload: WorkloadConfig) -> Self {
        Self { run, workload }
    }

    pub fn run(&self) -> RunResult {
        let capacity = NonZeroUsize::new(self.run.capacity).expect("capacity must be non-zero");
        let mut cs = Cs::new(capacity);
        let mut generator = WorkloadGenerator::new(self.workload.clone());

        // Per-object request counts; ahash keeps this map cheap at the
        // request rate the simulator runs at.
        let mut requests_per_object: AHashMap<usize, u64> = AHashMap::new();

        let mut hits = 0u64;
        let mut misses = 0u64;
        let mut unsolicited_arrivals = 0u64;

        let started = Instant::now();
        let mut now = Timestamp { ms_since_1970: 0 };

        for step in 0..self.run.requests {
            now = now.adding(self.run.interarrival_ms);

            let request = generator.next_request();
            *requests_per_object.entry(request.object).or_insert(0) += 1;

            if cs.find(&request.interest, now).is_some() {
                hits += 1;
            } else {
                misses += 1;
                // Miss: the forwarder fetches upstream and caches the reply.
                let data = generator.make_data(request.object);
                cs.insert(data, false, now);
            }

            if generator.next_arrival_is_unsolicited() {
                unsolicited_arrivals += 1;
                let object = generator.random_object();
                let data = generator.make_data(object);
                cs.insert(data, true, now);
            }

            if self.run.sweep_interval > 0 && (step + 1) % self.run.sweep_interval == 0 {
                cs.mark_stale_entries(now);
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let metrics = cs.metrics();

        RunResult {
            capacity: self.run.capacity,
            requests: self.run.requests as u64,
            hits,
            misses,
            hit_rate: if hits + misses > 0 {
                hits as f64 / (hits + misses) as f64
            } else {
                0.0
            },
            distinct_objects: requests_per_object.len(),
            insertions: metrics.insertions(),
            refreshes: metrics.refreshes(),
            unsolicited_arrivals,
            evictions_unsolicited: metrics.evictions(QueueKind::Unsolicited),
            evictions_stale: metrics.evictions(QueueKind::Stale),
            evictions_fresh: metrics.evictions(QueueKind::Fresh),
            stale_transitions: metrics.stale_transitions(),
            final_size: cs.len(),
            elapsed_ms,
        }
    }
}
