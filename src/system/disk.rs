//! Single-operation disk write latency probe.
//!
//! Writes a small payload to a uniquely named scratch file and forces it
//! to the storage device. The forced flush is the dominant cost, so the
//! elapsed wall time approximates storage commit latency rather than
//! page-cache write speed.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use tracing::warn;

use crate::error::{Error, Result};

/// Fixed probe payload; the probe measures commit latency, not throughput.
const PAYLOAD: &[u8] = b"ping";

/// One-shot write+flush latency probe against a scratch directory.
pub struct DiskLatencyProbe {
    scratch_dir: PathBuf,
}

impl DiskLatencyProbe {
    /// Probe the system scratch location.
    pub fn new() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
        }
    }

    /// Probe an alternate scratch directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: dir.into(),
        }
    }

    /// Time one write + durable flush, in milliseconds.
    ///
    /// Scratch file creation failure is the only fatal case. A failed
    /// write or flush is reported and the elapsed time is still returned;
    /// removal of the scratch file is best-effort and never invalidates a
    /// measurement already taken.
    pub fn measure(&self) -> Result<f64> {
        let mut file = tempfile::Builder::new()
            .prefix("latency_probe_")
            .tempfile_in(&self.scratch_dir)
            .map_err(|e| {
                Error::io(
                    e,
                    format!("failed to create scratch file in {}", self.scratch_dir.display()),
                )
            })?;

        let start = Instant::now();
        if let Err(e) = file.write_all(PAYLOAD) {
            warn!("scratch write failed: {e}");
        }
        if let Err(e) = file.as_file().sync_all() {
            warn!("scratch flush failed: {e}");
        }
        let elapsed = start.elapsed();

        if let Err(e) = file.close() {
            warn!("failed to remove scratch file: {e}");
        }

        Ok(elapsed.as_secs_f64() * 1000.0)
    }
}

impl Default for DiskLatencyProbe {
    fn default() -> Self {
        Self::new()
    }
}
