use clap::Parser;
use cs_simulator::models::{RunConfig, WorkloadConfig};
use cs_simulator::runner::SimulationRunner;
use cs_simulator::stats;
use std::path::PathBuf;
use std::process::ExitCode;

/// Content-store workload simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Store capacities to simulate, in packets (compare several at once)
    #[arg(short, long, value_name = "N", num_args = 1.., value_delimiter = ',', default_value = "1000")]
    capacity: Vec<usize>,

    /// Number of requests to replay per run
    #[arg(short, long, default_value = "100000")]
    requests: usize,

    /// Number of distinct objects in the universe
    #[arg(short, long, default_value = "10000")]
    objects: usize,

    /// Percentage of traffic from popular objects (default: 80%)
    #[arg(long, default_value = "80")]
    popular_traffic: u8,

    /// Percentage of objects that are popular (default: 20%)
    #[arg(long, default_value = "20")]
    popular_objects: u8,

    /// Percentage of requests issued as prefix interests
    #[arg(long, default_value = "50")]
    prefix_pct: u8,

    /// Percentage of requests demanding fresh content
    #[arg(long, default_value = "25")]
    fresh_pct: u8,

    /// Percentage of data arrivals injected unsolicited
    #[arg(long, default_value = "10")]
    unsolicited_pct: u8,

    /// Minimum declared freshness period in milliseconds
    #[arg(long, default_value = "500")]
    freshness_min: u64,

    /// Maximum declared freshness period in milliseconds
    #[arg(long, default_value = "10000")]
    freshness_max: u64,

    /// Payload size of generated packets in bytes
    #[arg(long, default_value = "1024")]
    payload_size: usize,

    /// Simulated milliseconds between requests
    #[arg(long, default_value = "1")]
    interarrival_ms: u64,

    /// Run the fresh→stale sweep every N requests (0 disables)
    #[arg(long, default_value = "256")]
    sweep_interval: usize,

    /// RNG seed for reproducible workloads
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Export results to CSV file
    #[arg(long, value_name = "PATH")]
    output_csv: Option<PathBuf>,

    /// Print the per-queue eviction breakdown for each run
    #[arg(long)]
    breakdown: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.freshness_min > args.freshness_max {
        eprintln!("--freshness-min must not exceed --freshness-max");
        return ExitCode::FAILURE;
    }
    if args.capacity.iter().any(|&c| c == 0) {
        eprintln!("--capacity values must be non-zero");
        return ExitCode::FAILURE;
    }

    let workload = WorkloadConfig {
        objects: args.objects,
        popular_traffic: args.popular_traffic.min(100),
        popular_objects: args.popular_objects.clamp(1, 100),
        prefix_pct: args.prefix_pct.min(100),
        fresh_pct: args.fresh_pct.min(100),
        unsolicited_pct: args.unsolicited_pct.min(100),
        freshness_min_ms: args.freshness_min,
        freshness_max_ms: args.freshness_max,
        payload_size: args.payload_size,
        seed: args.seed,
    };

    println!(
        "simulating {} requests over {} objects ({}% traffic to {}% of objects)",
        args.requests, args.objects, workload.popular_traffic, workload.popular_objects
    );

    let mut results = Vec::new();
    for &capacity in &args.capacity {
        let run = RunConfig {
            capacity,
            requests: args.requests,
            interarrival_ms: args.interarrival_ms,
            sweep_interval: args.sweep_interval,
        };
        let result = SimulationRunner::new(run, workload.clone()).run();
        if args.breakdown {
            stats::print_eviction_breakdown(&result);
        }
        results.push(result);
    }

    stats::print_summary(&results);

    if let Some(path) = &args.output_csv {
        if let Err(err) = stats::write_csv(path, &results) {
            eprintln!("failed to write {}: {err}", path.display());
            return ExitCode::FAILURE;
        }
        println!("results written to {}", path.display());
    }

    ExitCode::SUCCESS
}
