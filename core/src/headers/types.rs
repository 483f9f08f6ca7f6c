//! headers/types.rs
//! `BlobHeader` wire message and framing errors.
//!
//! Design notes:
//! - The message is declared with prost derives; no build script or protoc.
//! - `type` and `indexdata` are opaque to the transcoder and pass through untouched.
//! - `datasize` describes the Blob that follows, never the header itself.

use thiserror::Error;

use crate::constants::MAX_BLOB_HEADER_SIZE;

/// `BlobHeader` from OSM `fileformat.proto`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct BlobHeader {
    #[prost(string, required, tag = "1")]
    pub r#type: String,
    #[prost(bytes = "bytes", optional, tag = "2")]
    pub indexdata: Option<bytes::Bytes>,
    #[prost(int32, required, tag = "3")]
    pub datasize: i32,
}

impl BlobHeader {
    pub fn new(kind: impl Into<String>, datasize: i32) -> Self {
        Self { r#type: kind.into(), indexdata: None, datasize }
    }

    /// Declared blob length as a buffer size.
    ///
    /// # Errors
    /// - `HeaderError::NegativeDatasize` when the wire value is below zero.
    pub fn blob_len(&self) -> Result<usize, HeaderError> {
        usize::try_from(self.datasize).map_err(|_| HeaderError::NegativeDatasize { have: self.datasize })
    }

    /// Overwrite `datasize` with the exact length of the blob that will follow.
    ///
    /// # Errors
    /// - `HeaderError::DatasizeOverflow` when the blob does not fit an int32.
    pub fn set_blob_len(&mut self, len: usize) -> Result<(), HeaderError> {
        self.datasize = i32::try_from(len).map_err(|_| HeaderError::DatasizeOverflow { have: len })?;
        Ok(())
    }
}

/// Decode-side view of `BlobHeader` that keeps field presence, so missing
/// required fields are rejected instead of defaulted.
#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct WireBlobHeader {
    #[prost(string, optional, tag = "1")]
    pub r#type: Option<String>,
    #[prost(bytes = "bytes", optional, tag = "2")]
    pub indexdata: Option<bytes::Bytes>,
    #[prost(int32, optional, tag = "3")]
    pub datasize: Option<i32>,
}

impl WireBlobHeader {
    pub(crate) fn into_header(self) -> Result<BlobHeader, HeaderError> {
        Ok(BlobHeader {
            r#type: self.r#type.ok_or(HeaderError::MissingField { field: "type" })?,
            indexdata: self.indexdata,
            datasize: self.datasize.ok_or(HeaderError::MissingField { field: "datasize" })?,
        })
    }
}

#[derive(Debug, Error)]
pub enum HeaderError {
    /// Stream ended inside the length prefix or the header body.
    #[error("truncated blob header: expected {need} bytes, got {have}")]
    Truncated { have: usize, need: usize },

    /// Length prefix at or above the hard ceiling.
    #[error("blob header too large: {have} >= {}", MAX_BLOB_HEADER_SIZE)]
    TooLarge { have: u32 },

    #[error("invalid blob header encoding: {0}")]
    InvalidEncoding(#[from] prost::DecodeError),

    /// A proto2 `required` field is absent from the encoded header.
    #[error("blob header is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("negative datasize in blob header: {have}")]
    NegativeDatasize { have: i32 },

    #[error("blob of {have} bytes does not fit the datasize field")]
    DatasizeOverflow { have: usize },
}
