//! stream/pipeline.rs
//!
//! Sequential frame transcoding state machine.
//!
//! Design notes:
//! - One frame is read, transcoded and written before the next is read.
//! - The first error ends the run; nothing after it is written.
//! - The pipeline works on any `Read`/`Write`; file handling lives in `stream::io`.

use std::io::{Read, Write};

use prost::Message;
use tracing::{debug, error, info};

use crate::blob::{decode_blob, encode_blob, read_blob_bytes, to_raw_bytes, BlobKind, Recompressor};
use crate::compression::CompressionLevel;
use crate::constants::LENGTH_PREFIX_LEN;
use crate::headers::{read_frame, write_frame};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Run-wide settings, built once and shared read-only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranscodeConfig {
    pub level: CompressionLevel,
    /// Decode each new payload and compare it with the raw input.
    pub verify: bool,
}

impl TranscodeConfig {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level, verify: false }
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn recompressor(&self) -> Recompressor {
        Recompressor::new(self.level).with_verify(self.verify)
    }
}

/// Pipeline lifecycle.
///
/// `Running` → `Draining` → `Done` on a clean end of input;
/// any error moves to `Failed`. `Done` and `Failed` are terminal.
#[derive(Debug)]
pub enum PipelineState {
    Running,
    /// Clean end of input reached; pending output is being flushed.
    Draining,
    Failed(StreamError),
    Done,
}

impl PipelineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed(_))
    }
}

/// Attach frame context to a stage result.
trait InFrame<T> {
    fn in_frame(self, index: u64, stage: Stage) -> Result<T, StreamError>;
}

impl<T, E: Into<StreamError>> InFrame<T> for Result<T, E> {
    fn in_frame(self, index: u64, stage: Stage) -> Result<T, StreamError> {
        self.map_err(|e| e.into().at_frame(index, stage))
    }
}

pub struct TranscodePipeline<R, W> {
    reader: R,
    writer: W,
    recompressor: Recompressor,
    state: PipelineState,
    next_index: u64,
    counters: TelemetryCounters,
    timer: TelemetryTimer,
}

impl<R: Read, W: Write> TranscodePipeline<R, W> {
    pub fn new(reader: R, writer: W, config: &TranscodeConfig) -> Self {
        Self {
            reader,
            writer,
            recompressor: config.recompressor(),
            state: PipelineState::Running,
            next_index: 0,
            counters: TelemetryCounters::default(),
            timer: TelemetryTimer::new(),
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Frames fully written so far.
    pub fn frames_written(&self) -> u64 {
        self.counters.frames
    }

    /// Perform one state transition. No-op once terminal.
    pub fn step(&mut self) -> &PipelineState {
        let next = match std::mem::replace(&mut self.state, PipelineState::Done) {
            PipelineState::Running => match self.transcode_frame() {
                Ok(true) => PipelineState::Running,
                Ok(false) => PipelineState::Draining,
                Err(e) => PipelineState::Failed(e),
            },
            PipelineState::Draining => {
                let index = self.next_index;
                match self.timer.time(Stage::Write, || self.writer.flush()) {
                    Ok(()) => PipelineState::Done,
                    Err(e) => PipelineState::Failed(StreamError::from(e).at_frame(index, Stage::Write)),
                }
            }
            terminal => terminal,
        };
        self.state = next;
        &self.state
    }

    /// Drive the state machine to a terminal state.
    pub fn run(mut self) -> Result<TelemetrySnapshot, StreamError> {
        info!(level = %self.recompressor.level(), "transcode pipeline started");

        while !self.step().is_terminal() {}

        match std::mem::replace(&mut self.state, PipelineState::Done) {
            PipelineState::Failed(e) => {
                error!(
                    frame = self.next_index,
                    stage = ?e.stage(),
                    kind = ?e.kind(),
                    error = %e,
                    "transcode pipeline failed"
                );
                Err(e)
            }
            _ => {
                self.timer.finish();
                let snapshot = TelemetrySnapshot::from(&self.counters, &self.timer);
                info!(
                    frames = snapshot.frames,
                    bytes_in = snapshot.bytes_in,
                    bytes_out = snapshot.bytes_out,
                    ratio = snapshot.compression_ratio,
                    "transcode pipeline finished"
                );
                Ok(snapshot)
            }
        }
    }

    /// Transcode the next frame.
    ///
    /// # Returns
    /// - `Ok(true)` after a frame was written.
    /// - `Ok(false)` at a clean end of input.
    fn transcode_frame(&mut self) -> Result<bool, StreamError> {
        let index = self.next_index;

        // ---- Read ----
        let Some(mut header) = self
            .timer
            .time(Stage::Read, || read_frame(&mut self.reader))
            .in_frame(index, Stage::Read)?
        else {
            return Ok(false);
        };
        let in_len = LENGTH_PREFIX_LEN + header.encoded_len() + header.blob_len().in_frame(index, Stage::Read)?;
        let wire = self
            .timer
            .time(Stage::Read, || read_blob_bytes(&header, &mut self.reader))
            .in_frame(index, Stage::Read)?;

        // ---- Decode ----
        let mut blob = self.timer.time(Stage::Decode, || decode_blob(wire)).in_frame(index, Stage::Decode)?;
        let source = blob.kind();

        // ---- Decompress ----
        let raw = self
            .timer
            .time(Stage::Decompress, || to_raw_bytes(Some(&blob)))
            .in_frame(index, Stage::Decompress)?;

        // ---- Compress ----
        let recompressor = self.recompressor;
        let compressed_len = self
            .timer
            .time(Stage::Compress, || recompressor.recompress_into(&mut blob, &raw))
            .in_frame(index, Stage::Compress)?;

        // ---- Encode ----
        let blob_wire = self.timer.time(Stage::Encode, || encode_blob(&blob));
        header.set_blob_len(blob_wire.len()).in_frame(index, Stage::Encode)?;
        let out_len = LENGTH_PREFIX_LEN + header.encoded_len() + blob_wire.len();

        // ---- Write ----
        self.timer
            .time(Stage::Write, || -> Result<(), StreamError> {
                write_frame(&mut self.writer, &header)?;
                self.writer.write_all(&blob_wire)?;
                Ok(())
            })
            .in_frame(index, Stage::Write)?;

        debug!(
            frame = index,
            kind = %header.r#type,
            source = ?source,
            raw_len = raw.len(),
            compressed_len,
            datasize = header.datasize,
            "frame transcoded"
        );

        // `to_raw_bytes` only succeeds for raw or zlib sources.
        self.counters.add_frame(source.unwrap_or(BlobKind::Raw), in_len, raw.len(), out_len);
        self.next_index += 1;
        Ok(true)
    }
}

/// Transcode every frame from `reader` into `writer`.
///
/// # Errors
/// - The first error from any frame, wrapped as `StreamError::Frame`.
pub fn run_transcode_pipeline<R, W>(reader: R, writer: W, config: &TranscodeConfig) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    TranscodePipeline::new(reader, writer, config).run()
}
