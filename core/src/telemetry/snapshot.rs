//! telemetry/snapshot.rs
//!
//! Immutable end-of-run summary.
//!
//! Design notes:
//! - Built once from counters and the timer when the pipeline reaches `Done`.
//! - Serializable so front ends can print it as JSON.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{StageTimes, TelemetryTimer};

/// Core telemetry snapshot.
/// Captures counters, ratios, throughput, stage timings, and elapsed duration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub frames: u64,
    pub frames_raw: u64,
    pub frames_zlib: u64,
    pub bytes_in: u64,
    pub bytes_raw: u64,
    pub bytes_out: u64,
    /// `bytes_out / bytes_in`; below 1.0 means the output shrank.
    pub compression_ratio: f64,
    pub throughput_raw_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
}

impl TelemetrySnapshot {
    pub fn from(counters: &TelemetryCounters, timer: &TelemetryTimer) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_in > 0 {
            counters.bytes_out as f64 / counters.bytes_in as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_raw as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            frames: counters.frames,
            frames_raw: counters.frames_raw,
            frames_zlib: counters.frames_zlib,
            bytes_in: counters.bytes_in,
            bytes_raw: counters.bytes_raw,
            bytes_out: counters.bytes_out,
            compression_ratio,
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
        }
    }

    pub fn total_stage_time(&self) -> Duration {
        self.stage_times.total()
    }

    /// Stage times never exceed wall time, and frame variants add up.
    pub fn sanity_check(&self) -> bool {
        self.total_stage_time() <= self.elapsed && self.frames_raw + self.frames_zlib <= self.frames
    }
}
