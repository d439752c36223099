//! Aggregate CPU utilization sampling.
//!
//! Reads the host's cumulative tick counters (the `cpu` line of
//! `/proc/stat`) and computes a utilization percentage from the delta
//! between two snapshots taken a short fixed interval apart.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::error::{Error, Result};

/// Delay between the two snapshots of a usage sample — long enough to
/// guarantee a measurable tick delta at common kernel tick rates.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(20);

/// Cumulative tick counters at one point in time.
///
/// Both counters are non-decreasing and `total >= active` by construction.
/// A snapshot carries no meaning on its own; only the delta between two
/// snapshots does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub active: u64,
    pub total: u64,
}

/// Source of cumulative system-wide CPU tick counters.
pub trait TickSource {
    fn read_snapshot(&self) -> Result<CpuSnapshot>;
}

/// Tick source backed by a `/proc/stat`-style file.
pub struct ProcStatSource {
    path: PathBuf,
}

impl ProcStatSource {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from("/proc/stat"),
        }
    }

    /// Read counters from an alternate stat file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for ProcStatSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for ProcStatSource {
    fn read_snapshot(&self) -> Result<CpuSnapshot> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::source_unavailable(format!("failed to read {}: {e}", self.path.display()))
        })?;
        parse_stat(&content)
    }
}

/// Parse the aggregate `cpu` line of a `/proc/stat`-style document.
///
/// Fields: user nice system idle iowait irq softirq steal. At least the
/// first four must parse; missing trailing fields count as zero (older
/// kernels report fewer columns).
fn parse_stat(content: &str) -> Result<CpuSnapshot> {
    let line = content
        .lines()
        .find(|l| l.starts_with("cpu ") || l.starts_with("cpu\t"))
        .ok_or_else(|| Error::source_unavailable("no aggregate cpu line"))?;

    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(8)
        .map_while(|f| f.parse().ok())
        .collect();
    if fields.len() < 4 {
        return Err(Error::source_unavailable(format!(
            "expected at least 4 numeric fields, found {}",
            fields.len()
        )));
    }

    let field = |i: usize| fields.get(i).copied().unwrap_or(0);
    let active = field(0) + field(1) + field(2) + field(5) + field(6) + field(7);
    let total = active + field(3) + field(4);
    Ok(CpuSnapshot { active, total })
}

/// Computes utilization between two tick snapshots taken `SAMPLE_INTERVAL`
/// apart.
pub struct CpuSampler<S> {
    source: S,
}

impl<S: TickSource> CpuSampler<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Percentage of non-idle ticks over one sampling window, in [0, 100].
    ///
    /// Blocks the calling thread for `SAMPLE_INTERVAL` between the two
    /// reads. Either failed read fails the whole call; there is no
    /// partial result.
    pub fn usage_between_samples(&self) -> Result<f64> {
        let first = self.source.read_snapshot()?;
        thread::sleep(SAMPLE_INTERVAL);
        let second = self.source.read_snapshot()?;
        Ok(usage_from_deltas(first, second))
    }
}

/// A counter regression (wrap, reset, read race) clamps that delta to
/// zero. A zero total delta reads as "no measurable activity" and yields
/// exactly 0.0 rather than an error.
fn usage_from_deltas(first: CpuSnapshot, second: CpuSnapshot) -> f64 {
    let active_delta = second.active.saturating_sub(first.active);
    let total_delta = second.total.saturating_sub(first.total);
    if total_delta == 0 {
        return 0.0;
    }
    active_delta as f64 / total_delta as f64 * 100.0
}

/// Tick source replaying a scripted snapshot sequence; an exhausted
/// script reads as an unavailable source.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    snapshots: std::cell::RefCell<std::collections::VecDeque<CpuSnapshot>>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(snapshots: impl IntoIterator<Item = CpuSnapshot>) -> Self {
        Self {
            snapshots: std::cell::RefCell::new(snapshots.into_iter().collect()),
        }
    }

    pub(crate) fn empty() -> Self {
        Self::new([])
    }
}

#[cfg(test)]
impl TickSource for ScriptedSource {
    fn read_snapshot(&self) -> Result<CpuSnapshot> {
        self.snapshots
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| Error::source_unavailable("script exhausted"))
    }
}
