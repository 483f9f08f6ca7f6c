//! headers/encode.rs
//!
//! Writing side of the header framer.

use std::io::Write;

use bytes::BufMut;
use prost::Message;

use crate::constants::{LENGTH_PREFIX_LEN, MAX_BLOB_HEADER_SIZE};
use crate::headers::types::{BlobHeader, HeaderError};
use crate::types::StreamError;

/// Serialize a header into `[len:u32 BE][BlobHeader]` wire form.
pub fn encode_frame_header(header: &BlobHeader) -> Result<Vec<u8>, HeaderError> {
    let body_len = header.encoded_len();
    let prefix = u32::try_from(body_len).unwrap_or(u32::MAX);
    if prefix >= MAX_BLOB_HEADER_SIZE {
        return Err(HeaderError::TooLarge { have: prefix });
    }

    let mut out = Vec::with_capacity(LENGTH_PREFIX_LEN + body_len);
    out.put_u32(prefix);
    header.encode_raw(&mut out);

    debug_assert_eq!(out.len(), LENGTH_PREFIX_LEN + body_len);
    Ok(out)
}

/// Write one length-prefixed `BlobHeader`.
///
/// The prefix is the serialized header's own length, independent of
/// `header.datasize`.
pub fn write_frame<W: Write + ?Sized>(w: &mut W, header: &BlobHeader) -> Result<(), StreamError> {
    let wire = encode_frame_header(header)?;
    w.write_all(&wire)?;
    Ok(())
}
