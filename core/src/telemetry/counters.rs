//! telemetry/counters.rs
//! Mutable counters used during the transcoding pipeline.
//!
//! Summary: Collects frame counts and byte counts per processed frame.
//! Converted into an immutable TelemetrySnapshot at pipeline end.
use serde::{Deserialize, Serialize};

use crate::blob::BlobKind;

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetryCounters {
    pub frames: u64,
    pub frames_raw: u64,
    pub frames_zlib: u64,
    /// Input bytes: length prefixes, headers and blobs.
    pub bytes_in: u64,
    /// Uncompressed payload bytes.
    pub bytes_raw: u64,
    /// Output bytes: length prefixes, headers and blobs.
    pub bytes_out: u64,
}

impl TelemetryCounters {
    /// Record one transcoded frame.
    ///
    /// - `source`: payload variant the frame arrived with
    /// - `in_len`: full input frame length (prefix + header + blob)
    /// - `raw_len`: uncompressed payload length
    /// - `out_len`: full output frame length (prefix + header + blob)
    pub fn add_frame(&mut self, source: BlobKind, in_len: usize, raw_len: usize, out_len: usize) {
        self.frames += 1;
        match source {
            BlobKind::Raw => self.frames_raw += 1,
            BlobKind::Zlib => self.frames_zlib += 1,
            _ => {}
        }
        self.bytes_in += in_len as u64;
        self.bytes_raw += raw_len as u64;
        self.bytes_out += out_len as u64;
    }
}
