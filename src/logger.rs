//! Durable append-only result log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::monitor::MonitoringRecord;

/// Marker written in place of a metric that could not be taken.
const UNAVAILABLE: &str = "unavailable";

/// Append one timestamped record line to the log at `path`.
///
/// The file is created if absent and never truncated; one line per run,
/// forced to storage before the handle is released. A run whose record is
/// silently lost defeats the log's purpose, so every failure here is a
/// hard error rather than a degraded result.
pub fn append(path: &Path, record: &MonitoringRecord) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::io(e, format!("failed to open {} for append", path.display())))?;

    let line = format_line(record, Local::now());
    file.write_all(line.as_bytes())
        .map_err(|e| Error::io(e, format!("failed to write {}", path.display())))?;
    file.sync_all()
        .map_err(|e| Error::io(e, format!("failed to flush {}", path.display())))?;
    Ok(())
}

fn format_line(record: &MonitoringRecord, timestamp: DateTime<Local>) -> String {
    let cpu = match record.cpu_usage {
        Some(pct) => format!("{pct:.2}%"),
        None => UNAVAILABLE.to_string(),
    };
    let disk = match record.disk_latency {
        Some(ms) => format!("{ms:.3} ms"),
        None => UNAVAILABLE.to_string(),
    };
    format!(
        "[{}] Execution Time: {:.6} s, CPU: {}, Disk Latency: {}\n",
        timestamp.format("%Y-%m-%d %H:%M:%S"),
        record.execution_time.as_secs_f64(),
        cpu,
        disk,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration;

    fn record(seconds: f64) -> MonitoringRecord {
        MonitoringRecord {
            execution_time: Duration::from_secs_f64(seconds),
            cpu_usage: Some(37.5),
            disk_latency: Some(1.25),
        }
    }

    #[test]
    fn formats_all_metrics_with_fixed_precision() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 9).unwrap();
        let line = format_line(&record(1.5), timestamp);
        assert_eq!(
            line,
            "[2024-03-09 14:05:09] Execution Time: 1.500000 s, CPU: 37.50%, Disk Latency: 1.250 ms\n"
        );
    }

    #[test]
    fn formats_missing_metrics_as_unavailable() {
        let timestamp = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 9).unwrap();
        let rec = MonitoringRecord {
            execution_time: Duration::from_millis(250),
            cpu_usage: None,
            disk_latency: None,
        };
        let line = format_line(&rec, timestamp);
        assert!(line.contains("CPU: unavailable,"));
        assert!(line.ends_with("Disk Latency: unavailable\n"));
    }

    #[test]
    fn sequential_appends_add_one_line_each_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.log");

        append(&path, &record(1.0)).unwrap();
        let first_pass = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first_pass.lines().count(), 1);

        append(&path, &record(2.0)).unwrap();
        append(&path, &record(3.0)).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        // Earlier content is preserved untouched.
        assert_eq!(lines[0], first_pass.trim_end());
        assert!(lines[1].contains("Execution Time: 2.000000 s"));
        assert!(lines[2].contains("Execution Time: 3.000000 s"));
    }

    #[test]
    fn append_fails_cleanly_when_directory_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("results.log");

        let err = append(&path, &record(1.0)).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
        // No partial line may appear.
        assert!(!path.exists());
    }
}
