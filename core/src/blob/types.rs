//! blob/types.rs
//! `Blob` wire message, its payload variants and resolver errors.
//!
//! Notes:
//! - The `data` oneof is a Rust enum behind `Option`, so a blob can never
//!   carry two payload variants at once.
//! - Payload fields use `bytes::Bytes`; decoding from a `Bytes` buffer slices
//!   instead of copying.

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

use crate::compression::CompressionError;

/// `Blob` from OSM `fileformat.proto`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Blob {
    /// Uncompressed size; required by readers for every compressed variant.
    #[prost(int32, optional, tag = "2")]
    pub raw_size: Option<i32>,
    #[prost(oneof = "BlobData", tags = "1, 3, 4, 5, 6, 7")]
    pub data: Option<BlobData>,
}

#[derive(Clone, PartialEq, prost::Oneof)]
pub enum BlobData {
    #[prost(bytes = "bytes", tag = "1")]
    Raw(Bytes),
    #[prost(bytes = "bytes", tag = "3")]
    ZlibData(Bytes),
    #[prost(bytes = "bytes", tag = "4")]
    LzmaData(Bytes),
    #[prost(bytes = "bytes", tag = "5")]
    ObsoleteBzip2Data(Bytes),
    #[prost(bytes = "bytes", tag = "6")]
    Lz4Data(Bytes),
    #[prost(bytes = "bytes", tag = "7")]
    ZstdData(Bytes),
}

/// Payload variant tag, detached from the payload bytes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlobKind {
    Raw,
    Zlib,
    Lzma,
    Bzip2,
    Lz4,
    Zstd,
}

impl BlobKind {
    pub const fn name(self) -> &'static str {
        match self {
            BlobKind::Raw   => "raw",
            BlobKind::Zlib  => "zlib_data",
            BlobKind::Lzma  => "lzma_data",
            BlobKind::Bzip2 => "OBSOLETE_bzip2_data",
            BlobKind::Lz4   => "lz4_data",
            BlobKind::Zstd  => "zstd_data",
        }
    }
}

impl fmt::Display for BlobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl BlobData {
    pub fn kind(&self) -> BlobKind {
        match self {
            BlobData::Raw(_)               => BlobKind::Raw,
            BlobData::ZlibData(_)          => BlobKind::Zlib,
            BlobData::LzmaData(_)          => BlobKind::Lzma,
            BlobData::ObsoleteBzip2Data(_) => BlobKind::Bzip2,
            BlobData::Lz4Data(_)           => BlobKind::Lz4,
            BlobData::ZstdData(_)          => BlobKind::Zstd,
        }
    }
}

impl Blob {
    pub fn raw(data: impl Into<Bytes>) -> Self {
        Self { raw_size: None, data: Some(BlobData::Raw(data.into())) }
    }

    /// Active variant, if any.
    pub fn kind(&self) -> Option<BlobKind> {
        self.data.as_ref().map(BlobData::kind)
    }

    /// Declared uncompressed size as a buffer length.
    ///
    /// # Errors
    /// - `BlobError::MissingRawSize` when a compressed variant has no `raw_size`.
    /// - `BlobError::NegativeRawSize` for a value below zero.
    pub fn declared_raw_size(&self, kind: BlobKind) -> Result<usize, BlobError> {
        let raw_size = self.raw_size.ok_or(BlobError::MissingRawSize { kind })?;
        usize::try_from(raw_size).map_err(|_| BlobError::NegativeRawSize { have: raw_size })
    }
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("truncated blob: expected {need} bytes, got {have}")]
    Truncated { have: usize, need: usize },

    #[error("invalid blob encoding: {0}")]
    InvalidEncoding(#[from] prost::DecodeError),

    #[error("missing blob")]
    Missing,

    #[error("{kind} blob without raw_size")]
    MissingRawSize { kind: BlobKind },

    #[error("negative raw_size in blob: {have}")]
    NegativeRawSize { have: i32 },

    #[error("raw payload of {have} bytes does not fit the raw_size field")]
    RawSizeOverflow { have: usize },

    #[error("corrupt zlib blob: {0}")]
    CorruptZlib(#[source] CompressionError),

    /// Recognised variant this transcoder does not accept as a source.
    #[error("unsupported blob format: {0}")]
    Unsupported(BlobKind),
}
