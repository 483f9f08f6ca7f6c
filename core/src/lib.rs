//! pbf-core
//!
//! Streaming OSM PBF blob transcoder: zlib/raw payloads in, zstd payloads out.
//! Frame order, headers and indexdata are preserved.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod utils;

// Container layers
pub mod blob;
pub mod compression;
pub mod headers;
pub mod telemetry;

// Stream layer
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::CompressionLevel;
    pub use crate::stream::{run_transcode_pipeline, transcode_file, TranscodeConfig};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{ErrorKind, StreamError};
}
