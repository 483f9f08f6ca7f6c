//! stream/io.rs
//!
//! File endpoints for the pipeline: input opening, staged output, and the
//! file-to-file entry point.
//!
//! Design notes:
//! - The target path must not exist; this is checked before any stream I/O.
//! - Output is written to a temporary file next to the target and only
//!   persisted (without clobbering) after the pipeline reached `Done`.
//! - Every failure path deletes the staged file explicitly before returning.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::constants::IO_BUFFER_SIZE;
use crate::stream::pipeline::{run_transcode_pipeline, TranscodeConfig};
use crate::telemetry::TelemetrySnapshot;
use crate::types::StreamError;

/// Open `path` for buffered reading.
pub fn open_input(path: &Path) -> Result<BufReader<File>, StreamError> {
    let file = File::open(path).map_err(|e| StreamError::file("could not open", path, e))?;
    Ok(BufReader::with_capacity(IO_BUFFER_SIZE, file))
}

/// Fail with `StreamError::OutputExists` if anything is present at `path`.
pub fn ensure_absent(path: &Path) -> Result<(), StreamError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Err(StreamError::OutputExists(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StreamError::file("could not check", path, e)),
    }
}

/// Output staged in a temporary file beside its final path.
pub struct StagedOutput {
    target: PathBuf,
    writer: BufWriter<NamedTempFile>,
}

impl StagedOutput {
    /// Create the staging file in the target's directory.
    ///
    /// # Errors
    /// - `StreamError::OutputExists` if `target` already exists.
    /// - `StreamError::File` if the staging file cannot be created.
    pub fn create(target: impl Into<PathBuf>) -> Result<Self, StreamError> {
        let target = target.into();
        ensure_absent(&target)?;

        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = format!(
            ".{}.",
            target.file_name().map(|n| n.to_string_lossy()).unwrap_or_default()
        );
        let temp = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".tmp")
            .tempfile_in(&dir)
            .map_err(|e| StreamError::file("could not create", &target, e))?;
        debug!(staged = %temp.path().display(), target = %target.display(), "staged output created");

        Ok(Self {
            target,
            writer: BufWriter::with_capacity(IO_BUFFER_SIZE, temp),
        })
    }

    /// Path of the staging file.
    pub fn staged_path(&self) -> &Path {
        self.writer.get_ref().path()
    }

    pub fn writer(&mut self) -> &mut BufWriter<NamedTempFile> {
        &mut self.writer
    }

    /// Flush, sync and move the staged file to the target path.
    ///
    /// # Errors
    /// - `StreamError::File` on flush/sync/rename failure.
    /// - `StreamError::OutputExists` if the target appeared during the run.
    ///
    /// The staging file is deleted on every error path.
    pub fn commit(self) -> Result<PathBuf, StreamError> {
        let Self { target, writer } = self;

        let temp = match writer.into_inner() {
            Ok(temp) => temp,
            Err(e) => {
                let source = io::Error::new(e.error().kind(), e.error().to_string());
                let (temp, _) = e.into_inner().into_parts();
                discard_temp(temp, &target);
                return Err(StreamError::file("could not write", &target, source));
            }
        };

        if let Err(e) = temp.as_file().sync_all() {
            discard_temp(temp, &target);
            return Err(StreamError::file("could not write", &target, e));
        }

        match temp.persist_noclobber(&target) {
            Ok(_) => Ok(target),
            Err(e) => {
                let exists = e.error.kind() == io::ErrorKind::AlreadyExists;
                discard_temp(e.file, &target);
                if exists {
                    Err(StreamError::OutputExists(target))
                } else {
                    Err(StreamError::file("could not create", &target, e.error))
                }
            }
        }
    }

    /// Drop buffered output and delete the staging file.
    pub fn discard(self) -> Result<(), StreamError> {
        let Self { target, writer } = self;
        let (temp, _) = writer.into_parts();
        temp.close().map_err(|e| StreamError::file("could not remove staged output for", &target, e))
    }
}

fn discard_temp(temp: NamedTempFile, target: &Path) {
    if let Err(e) = temp.close() {
        warn!(target = %target.display(), error = %e, "could not remove staged output");
    }
}

/// Transcode `input` into a new file at `output`.
///
/// Either the whole run succeeds and `output` holds every transcoded frame,
/// or `output` does not exist afterwards.
///
/// # Errors
/// - `StreamError::OutputExists` before any I/O if `output` exists.
/// - `StreamError::File` for open/create failures.
/// - Any pipeline error, after the staged output was deleted.
pub fn transcode_file(input: &Path, output: &Path, config: &TranscodeConfig) -> Result<TelemetrySnapshot, StreamError> {
    ensure_absent(output)?;

    let reader = open_input(input)?;
    let mut staged = StagedOutput::create(output)?;
    info!(input = %input.display(), output = %output.display(), level = %config.level, "transcoding file");

    match run_transcode_pipeline(reader, staged.writer(), config) {
        Ok(snapshot) => {
            staged.commit()?;
            Ok(snapshot)
        }
        Err(e) => {
            if let Err(cleanup) = staged.discard() {
                warn!(error = %cleanup, "staged output cleanup failed");
            }
            Err(e)
        }
    }
}
