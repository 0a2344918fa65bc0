//! Synthetic workload generation.
//!
//! Requests follow the classic skewed-popularity shape: a configurable
//! share of traffic (default 80%) targets a small popular group of objects
//! (default 20%), the rest is uniform over the remainder. Each object is a
//! single-segment piece of content: requests either name the segment
//! exactly or issue a prefix interest for the object base name.

use crate::models::WorkloadConfig;
use content_store::name::Name;
use content_store::packet::{ChildSelector, Data, Interest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One generated request.
#[derive(Debug, Clone)]
pub struct Request {
    /// Index of the object this request targets.
    pub object: usize,
    /// The interest to look up.
    pub interest: Interest,
}

/// Deterministic (seeded) workload generator.
pub struct WorkloadGenerator {
    config: WorkloadConfig,
    rng: StdRng,
    popular_count: usize,
}

impl WorkloadGenerator {
    pub fn new(config: WorkloadConfig) -> Self {
        let popular_count =
            ((config.objects as u64 * config.popular_objects as u64) / 100).max(1) as usize;
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            popular_count,
        }
    }

    /// Base name of an object: `/sim/obj<i>`.
    pub fn object_base(object: usize) -> Name {
        format!("/sim/obj{object}").parse().expect("valid object name")
    }

    /// Full name of the object's single segment: `/sim/obj<i>/s0`.
    pub fn segment_name(object: usize) -> Name {
        format!("/sim/obj{object}/s0")
            .parse()
            .expect("valid segment name")
    }

    fn pick_object(&mut self) -> usize {
        let popular = self.rng.gen_range(0..100u8) < self.config.popular_traffic;
        if popular || self.popular_count == self.config.objects {
            self.rng.gen_range(0..self.popular_count)
        } else {
            self.rng.gen_range(self.popular_count..self.config.objects)
        }
    }

    fn pct(&mut self, threshold: u8) -> bool {
        self.rng.gen_range(0..100u8) < threshold
    }

    /// The next request in the workload.
    pub fn next_request(&mut self) -> Request {
        let object = self.pick_object();
        let use_prefix = self.pct(self.config.prefix_pct);
        let mut interest = if use_prefix {
            let mut interest = Interest::new(Self::object_base(object));
            interest.can_be_prefix = true;
            interest.child_selector = ChildSelector::Leftmost;
            interest
        } else {
            Interest::new(Self::segment_name(object))
        };
        interest.must_be_fresh = self.pct(self.config.fresh_pct);
        Request { object, interest }
    }

    /// Builds the data packet that satisfies a request for `object`.
    pub fn make_data(&mut self, object: usize) -> Data {
        let freshness = self
            .rng
            .gen_range(self.config.freshness_min_ms..=self.config.freshness_max_ms);
        Data::new(
            Self::segment_name(object),
            vec![0u8; self.config.payload_size],
        )
        .with_freshness_period(freshness)
    }

    /// Whether the next data arrival should be unsolicited.
    pub fn next_arrival_is_unsolicited(&mut self) -> bool {
        self.pct(self.config.unsolicited_pct)
    }

    /// A random object for an unsolicited arrival.
    pub fn random_object(&mut self) -> usize {
        self.rng.gen_range(0..self.config.objects)
    }
}
