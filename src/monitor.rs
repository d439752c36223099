//! Monitoring-run orchestration and result aggregation.

use std::time::{Duration, Instant};

use tracing::warn;

use crate::system::cpu::{CpuSampler, ProcStatSource, TickSource};
use crate::system::disk::DiskLatencyProbe;

/// Metrics of one monitoring run.
///
/// Missing metrics are `None` rather than a sentinel value, so an absent
/// reading can never be mistaken for a real one. Records are built once
/// per run and not retained; each run is independent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitoringRecord {
    /// Wall-clock duration of the workload invocation only. The CPU
    /// sampling windows before and after sit outside this interval.
    pub execution_time: Duration,
    /// Mean utilization percentage over the sampling windows, in [0, 100].
    pub cpu_usage: Option<f64>,
    /// Single write+flush latency in milliseconds.
    pub disk_latency: Option<f64>,
}

/// Times a caller-supplied workload and gathers CPU and disk metrics
/// around it. Everything runs sequentially on the calling thread.
pub struct PerformanceMonitor<S> {
    sampler: CpuSampler<S>,
    probe: DiskLatencyProbe,
}

impl PerformanceMonitor<ProcStatSource> {
    /// Monitor against the live host: `/proc/stat` ticks and the system
    /// scratch location.
    pub fn host() -> Self {
        Self::new(ProcStatSource::new(), DiskLatencyProbe::new())
    }
}

impl<S: TickSource> PerformanceMonitor<S> {
    pub fn new(source: S, probe: DiskLatencyProbe) -> Self {
        Self {
            sampler: CpuSampler::new(source),
            probe,
        }
    }

    /// Run `workload` and assemble a record.
    ///
    /// CPU and disk sampling failures degrade to `None` and are reported;
    /// a failure inside the workload itself is the caller's concern and
    /// propagates, ending the run before any metrics are finalized.
    pub fn run(&self, workload: impl FnOnce()) -> MonitoringRecord {
        let before = self.cpu_sample("before");

        let start = Instant::now();
        workload();
        let execution_time = start.elapsed();

        let after = self.cpu_sample("after");

        let disk_latency = match self.probe.measure() {
            Ok(ms) => Some(ms),
            Err(e) => {
                warn!("disk latency probe failed: {e}");
                None
            }
        };

        MonitoringRecord {
            execution_time,
            cpu_usage: combine_cpu_samples(before, after),
            disk_latency,
        }
    }

    fn cpu_sample(&self, which: &str) -> Option<f64> {
        match self.sampler.usage_between_samples() {
            Ok(pct) => Some(pct),
            Err(e) => {
                warn!("{which} cpu sample failed: {e}");
                None
            }
        }
    }
}

/// Prefer any real sample over none; average when both windows produced
/// one.
fn combine_cpu_samples(before: Option<f64>, after: Option<f64>) -> Option<f64> {
    match (before, after) {
        (Some(a), Some(b)) => Some((a + b) / 2.0),
        (sample, None) | (None, sample) => sample,
    }
}
