//! Reporting: summary tables on stdout and optional CSV export.

use crate::models::RunResult;
use std::fs::File;
use std::io;
use std::path::Path;

/// Prints a comparison table for a batch of runs.
pub fn print_summary(results: &[RunResult]) {
    println!();
    println!(
        "{:>10} {:>10} {:>10} {:>9} {:>10} {:>10} {:>12} {:>10}",
        "capacity", "requests", "hits", "hit_rate", "evictions", "refreshes", "stale_moves", "time_ms"
    );
    for result in results {
        let evictions = result.evictions_unsolicited + result.evictions_stale + result.evictions_fresh;
        println!(
            "{:>10} {:>10} {:>10} {:>8.1}% {:>10} {:>10} {:>12} {:>10}",
            result.capacity,
            result.requests,
            result.hits,
            result.hit_rate * 100.0,
            evictions,
            result.refreshes,
            result.stale_transitions,
            result.elapsed_ms,
        );
    }
    println!();
}

/// Prints the eviction breakdown for one run.
pub fn print_eviction_breakdown(result: &RunResult) {
    println!("eviction breakdown for capacity {}:", result.capacity);
    println!("  unsolicited: {}", result.evictions_unsolicited);
    println!("  stale:       {}", result.evictions_stale);
    println!("  fresh:       {}", result.evictions_fresh);
}

/// Writes all runs to a CSV file, one row per run.
pub fn write_csv(path: &Path, results: &[RunResult]) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    Ok(())
}
