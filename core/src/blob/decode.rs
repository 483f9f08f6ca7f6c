//! blob/decode.rs
//!
//! Blob codec resolver: read a blob off the wire and recover its raw bytes.
//!
//! Design notes:
//! - Only `raw` and `zlib_data` are accepted as sources; every other variant,
//!   including `zstd_data`, is rejected rather than passed through.
//! - Decompressed output must match `raw_size` exactly.

use std::io::Read;

use bytes::Bytes;
use prost::Message;

use crate::blob::types::{Blob, BlobData, BlobError, BlobKind};
use crate::compression::{self, Codec};
use crate::headers::BlobHeader;
use crate::types::StreamError;
use crate::utils::read_exact_or_eof;

/// Decode a serialized `Blob`. Payload fields borrow from `buf`.
pub fn decode_blob(buf: Bytes) -> Result<Blob, BlobError> {
    Ok(Blob::decode(buf)?)
}

/// Read exactly `header.datasize` bytes of serialized blob.
///
/// # Errors
/// - `HeaderError::NegativeDatasize` if the header was never validated.
/// - `BlobError::Truncated` when the stream ends early.
pub fn read_blob_bytes<R: Read + ?Sized>(header: &BlobHeader, r: &mut R) -> Result<Bytes, StreamError> {
    let need = header.blob_len()?;
    let buf = read_exact_or_eof(r, need)?;
    if buf.len() != need {
        return Err(BlobError::Truncated { have: buf.len(), need }.into());
    }
    Ok(buf)
}

/// Read exactly `header.datasize` bytes and decode them as a `Blob`.
///
/// # Errors
/// - Everything `read_blob_bytes` returns.
/// - `BlobError::InvalidEncoding` for malformed protobuf.
pub fn read_blob<R: Read + ?Sized>(header: &BlobHeader, r: &mut R) -> Result<Blob, StreamError> {
    let buf = read_blob_bytes(header, r)?;
    Ok(decode_blob(buf)?)
}

/// Extract the uncompressed payload.
///
/// # Returns
/// - `raw` payloads unchanged.
/// - `zlib_data` inflated to exactly `raw_size` bytes.
///
/// # Errors
/// - `BlobError::Missing` for an absent blob or an unset `data` field.
/// - `BlobError::CorruptZlib` when inflation fails or yields the wrong size.
/// - `BlobError::Unsupported` for any other variant.
pub fn to_raw_bytes(blob: Option<&Blob>) -> Result<Bytes, BlobError> {
    let blob = blob.ok_or(BlobError::Missing)?;
    match blob.data.as_ref().ok_or(BlobError::Missing)? {
        BlobData::Raw(raw) => Ok(raw.clone()),
        BlobData::ZlibData(zlib) => {
            let expected = blob.declared_raw_size(BlobKind::Zlib)?;
            let raw = compression::decompress(Codec::Zlib, zlib, expected)
                .map_err(BlobError::CorruptZlib)?;
            Ok(Bytes::from(raw))
        }
        other => Err(BlobError::Unsupported(other.kind())),
    }
}
