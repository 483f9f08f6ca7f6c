//! headers/decode.rs
//!
//! Reading side of the header framer.
//!
//! Design notes:
//! - A clean end of stream is only recognised before the first prefix byte.
//! - The prefix is bounded before any allocation for the header body.

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use prost::Message;

use crate::constants::{LENGTH_PREFIX_LEN, MAX_BLOB_HEADER_SIZE};
use crate::headers::types::{BlobHeader, HeaderError, WireBlobHeader};
use crate::types::StreamError;
use crate::utils::read_exact_or_eof;

/// Read the 4-byte big-endian header length.
///
/// # Returns
/// - `Ok(None)` when the stream is exhausted before the first byte.
/// - `Ok(Some(len))` for a prefix below `MAX_BLOB_HEADER_SIZE`.
pub fn read_header_len<R: Read + ?Sized>(r: &mut R) -> Result<Option<u32>, StreamError> {
    let prefix = read_exact_or_eof(r, LENGTH_PREFIX_LEN)?;
    match prefix.len() {
        0 => Ok(None),
        LENGTH_PREFIX_LEN => {
            let len = BigEndian::read_u32(&prefix);
            if len >= MAX_BLOB_HEADER_SIZE {
                return Err(HeaderError::TooLarge { have: len }.into());
            }
            Ok(Some(len))
        }
        have => Err(HeaderError::Truncated { have, need: LENGTH_PREFIX_LEN }.into()),
    }
}

/// Decode a serialized `BlobHeader` and check its required fields.
///
/// # Errors
/// - `HeaderError::InvalidEncoding` for malformed protobuf.
/// - `HeaderError::MissingField` when `type` or `datasize` is absent.
/// - `HeaderError::NegativeDatasize` for a size below zero.
pub fn decode_blob_header(buf: &[u8]) -> Result<BlobHeader, HeaderError> {
    let header = WireBlobHeader::decode(buf)?.into_header()?;
    header.blob_len()?;
    Ok(header)
}

/// Read one length-prefixed `BlobHeader`.
///
/// # Returns
/// - `Ok(None)` at a clean end of stream.
/// - `Ok(Some(header))` otherwise.
///
/// # Errors
/// - `HeaderError::Truncated` for a partial prefix or short header body.
/// - `HeaderError::TooLarge` for a prefix at or above 64 MiB.
/// - `HeaderError::InvalidEncoding` / `MissingField` / `NegativeDatasize` for malformed bodies.
pub fn read_frame<R: Read + ?Sized>(r: &mut R) -> Result<Option<BlobHeader>, StreamError> {
    let Some(len) = read_header_len(r)? else {
        return Ok(None);
    };

    let need = len as usize;
    let buf = read_exact_or_eof(r, need)?;
    if buf.len() != need {
        return Err(HeaderError::Truncated { have: buf.len(), need }.into());
    }

    Ok(Some(decode_blob_header(&buf)?))
}
