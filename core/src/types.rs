use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{
    blob::BlobError,
    compression::CompressionError,
    headers::HeaderError,
    telemetry::Stage,
};

/// Error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Open/read/write failure, or a refused output path.
    Io,
    /// Input violates the container's structural contract.
    Format,
    /// Recognised blob variant that is not accepted as a source.
    Unsupported,
    /// Compressor/decompressor failure.
    Codec,
}

/// Unified stream error covering I/O, framing, blob and codec failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - `kind()` maps every variant onto the error taxonomy.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// I/O error tied to a file path.
    #[error("{op} '{}': {source}", .path.display())]
    File {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the file '{}' already exists", .0.display())]
    OutputExists(PathBuf),

    #[error("header error: {0}")]
    Header(#[from] HeaderError),

    #[error("blob error: {0}")]
    Blob(#[from] BlobError),

    #[error("compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Failure while processing a specific frame.
    #[error("frame {index}: {stage} failed: {source}")]
    Frame {
        index: u64,
        stage: Stage,
        #[source]
        source: Box<StreamError>,
    },
}

impl StreamError {
    pub fn file(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StreamError::File { op, path: path.into(), source }
    }

    pub fn at_frame(self, index: u64, stage: Stage) -> Self {
        StreamError::Frame { index, stage, source: Box::new(self) }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StreamError::Io(_) | StreamError::File { .. } | StreamError::OutputExists(_) => ErrorKind::Io,
            StreamError::Header(_) => ErrorKind::Format,
            StreamError::Blob(BlobError::Unsupported(_)) => ErrorKind::Unsupported,
            StreamError::Blob(_) => ErrorKind::Format,
            StreamError::Compression(_) => ErrorKind::Codec,
            StreamError::Frame { source, .. } => source.kind(),
        }
    }

    /// Innermost error, skipping frame context.
    pub fn root(&self) -> &StreamError {
        match self {
            StreamError::Frame { source, .. } => source.root(),
            other => other,
        }
    }

    /// Stage that failed, if the error carries frame context.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            StreamError::Frame { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
