//! compression/types.rs
//! Codec identifiers, speed presets, errors and the codec traits.
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::constants::zstd_levels;

/// Codecs reachable through the registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Codec {
    Zlib,
    Zstd,
}

impl Codec {
    pub const fn name(self) -> &'static str {
        match self {
            Codec::Zlib => "zlib",
            Codec::Zstd => "zstd",
        }
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Named speed/ratio preset for the target encoder.
/// Chosen once per run and never mutated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompressionLevel {
    Fastest,
    #[default]
    Default,
    Better,
    Best,
}

impl CompressionLevel {
    pub const ALL: [CompressionLevel; 4] = [
        CompressionLevel::Fastest,
        CompressionLevel::Default,
        CompressionLevel::Better,
        CompressionLevel::Best,
    ];

    /// Native zstd level for this preset.
    pub const fn zstd_level(self) -> i32 {
        match self {
            CompressionLevel::Fastest => zstd_levels::FASTEST,
            CompressionLevel::Default => zstd_levels::DEFAULT,
            CompressionLevel::Better  => zstd_levels::BETTER,
            CompressionLevel::Best    => zstd_levels::BEST,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CompressionLevel::Fastest => "fastest",
            CompressionLevel::Default => "default",
            CompressionLevel::Better  => "better",
            CompressionLevel::Best    => "best",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionLevel {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompressionLevel::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CompressionError::UnknownLevel(s.to_owned()))
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("unknown compression level: {0}")]
    UnknownLevel(String),

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: Codec, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: Codec, msg: String },

    /// Decoded output length differs from the declared size.
    #[error("codec {codec} size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { codec: Codec, expected: usize, actual: usize },

    /// Round-trip check of a freshly encoded payload did not match its input.
    #[error("codec {codec} verification failed: decoded payload differs from input")]
    VerifyFailed { codec: Codec },

    /// Compressor used after `finish()`.
    #[error("codec {codec} already finished")]
    Finished { codec: Codec },
}

impl CompressionError {
    pub(crate) fn process(codec: Codec, e: impl fmt::Display) -> Self {
        CompressionError::CodecProcessFailed { codec, msg: e.to_string() }
    }
}

pub trait Compressor {
    /// Feed one chunk of raw input; output may be buffered until `finish`.
    fn compress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
    /// Flush and finalize the encoder.
    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError>;
}

pub trait Decompressor {
    /// Decompress one complete compressed payload into out buffer.
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError>;
}
