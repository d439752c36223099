//! Human-readable run report on stdout.

use sysinfo::System;

use crate::monitor::MonitoringRecord;

/// One-shot host summary so a record can be read next to the hardware it
/// ran on.
fn host_summary() -> String {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.refresh_memory();

    let cpus = sys.cpus();
    let brand = cpus
        .first()
        .map(|c| c.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "unknown CPU".to_string());
    let physical = sys.physical_core_count().unwrap_or(cpus.len());

    format!(
        "{brand} — {physical} physical / {} logical cores, {} memory",
        cpus.len(),
        format_bytes(sys.total_memory()),
    )
}

/// Print the report for one monitoring run.
pub fn print_report(record: &MonitoringRecord) {
    println!();
    println!("Performance Monitoring Results:");
    println!("--------------------------------");
    println!("Host: {}", host_summary());
    println!(
        "Execution Time: {:.6} seconds",
        record.execution_time.as_secs_f64()
    );
    match record.cpu_usage {
        Some(pct) => println!("CPU Usage: {pct:.2}%"),
        None => println!("CPU Usage: (unavailable)"),
    }
    match record.disk_latency {
        Some(ms) => println!("Disk Latency: {ms:.3} ms"),
        None => println!("Disk Latency: (unavailable)"),
    }
}

/// Format bytes to a human-readable string (KiB, MiB, GiB)
fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;

    if bytes >= GIB {
        format!("{:.1}G", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.0}M", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.0}K", bytes as f64 / KIB as f64)
    } else {
        format!("{}B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_byte_magnitudes() {
        assert_eq!(format_bytes(512), "512B");
        assert_eq!(format_bytes(2048), "2K");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3M");
        assert_eq!(format_bytes(16 * 1024 * 1024 * 1024), "16.0G");
    }
}
