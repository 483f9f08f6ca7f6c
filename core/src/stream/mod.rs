//! stream: frame-by-frame transcoding over readers, writers and files.
//!
//! `pipeline` owns the state machine and is I/O agnostic.
//! `io` adds input opening, staged output and the file entry point.

pub mod io;
pub mod pipeline;

pub use io::{ensure_absent, open_input, transcode_file, StagedOutput};

pub use pipeline::{
    run_transcode_pipeline,
    PipelineState,
    TranscodeConfig,
    TranscodePipeline,
};
