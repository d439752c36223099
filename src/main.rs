//! perfprobe — a minimal host performance sampler.
//!
//! Times a demonstration workload, approximates CPU utilization over the
//! run from cumulative `/proc/stat` tick deltas, probes disk write+fsync
//! latency, and appends a timestamped record to a log file.
//!
//! Exit status: 0 on success, 2 when the result log cannot be written.

#![allow(dead_code)]

mod error;
mod logger;
mod logging;
mod monitor;
mod report;
mod system;
mod workload;

use std::path::Path;
use std::process::ExitCode;

use tracing::error;

use monitor::PerformanceMonitor;

/// Destination for run records; append-only, never rotated here.
const LOG_PATH: &str = "monitor_results.log";

/// Distinct exit status when the result log cannot be written.
const EXIT_LOG_FAILED: u8 = 2;

fn main() -> ExitCode {
    logging::init();

    println!("Starting performance monitoring...");

    let monitor = PerformanceMonitor::host();
    let record = monitor.run(workload::demo_workload);

    report::print_report(&record);

    let log_path = Path::new(LOG_PATH);
    if let Err(e) = logger::append(log_path, &record) {
        error!("failed to append results to {}: {e}", log_path.display());
        return ExitCode::from(EXIT_LOG_FAILED);
    }

    println!("Results appended to {}", log_path.display());
    ExitCode::SUCCESS
}
