//! Data models shared by the generator, runner and stats modules.

use serde::Serialize;

/// Parameters describing one synthetic workload.
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Number of distinct objects in the universe.
    pub objects: usize,
    /// Percentage of traffic that targets the popular group (0-100).
    pub popular_traffic: u8,
    /// Percentage of objects that form the popular group (0-100).
    pub popular_objects: u8,
    /// Percentage of requests issued as prefix interests (0-100).
    pub prefix_pct: u8,
    /// Percentage of requests demanding fresh content (0-100).
    pub fresh_pct: u8,
    /// Percentage of data arrivals that are unsolicited (0-100).
    pub unsolicited_pct: u8,
    /// Minimum declared freshness period, in milliseconds.
    pub freshness_min_ms: u64,
    /// Maximum declared freshness period, in milliseconds.
    pub freshness_max_ms: u64,
    /// Payload size of generated data packets, in bytes.
    pub payload_size: usize,
    /// RNG seed for reproducible runs.
    pub seed: u64,
}

/// Parameters describing how a workload is replayed against a store.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Store capacity in packets.
    pub capacity: usize,
    /// Number of requests to replay.
    pub requests: usize,
    /// Simulated milliseconds between consecutive requests.
    pub interarrival_ms: u64,
    /// Run the fresh→stale sweep every this many requests (0 disables it).
    pub sweep_interval: usize,
}

/// One finished simulation run, flattened for reporting and CSV export.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub capacity: usize,
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub distinct_objects: usize,
    pub insertions: u64,
    pub refreshes: u64,
    pub unsolicited_arrivals: u64,
    pub evictions_unsolicited: u64,
    pub evictions_stale: u64,
    pub evictions_fresh: u64,
    pub stale_transitions: u64,
    pub final_size: usize,
    pub elapsed_ms: u64,
}
