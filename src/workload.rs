//! Demonstration workload: a CPU burn plus one durable file write.

use std::fs::File;
use std::io::Write;

use rand::Rng;
use tracing::warn;

/// Iterations of the burn loop — enough to register on the CPU sample
/// without dominating the run.
const BURN_ITERATIONS: u32 = 1_000_000;

/// Spin the CPU and write a small file with a durable flush.
///
/// Side effects stay local: I/O failures inside the workload are logged
/// and swallowed, never surfaced to the monitor.
pub fn demo_workload() {
    let mut rng = rand::thread_rng();
    let mut acc = 0.0f64;
    for _ in 0..BURN_ITERATIONS {
        acc += rng.gen::<f64>();
    }
    // Keep the accumulator observable so the loop survives optimization.
    std::hint::black_box(acc);

    if let Err(e) = write_test_file() {
        warn!("workload file write failed: {e}");
    }
}

fn write_test_file() -> std::io::Result<()> {
    let path = std::env::temp_dir().join("perfprobe_workload.txt");
    let mut file = File::create(&path)?;
    file.write_all(b"test data\n")?;
    file.sync_all()?;
    drop(file);
    std::fs::remove_file(&path)
}
