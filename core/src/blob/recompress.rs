//! blob/recompress.rs
//!
//! Recompressor: encode raw bytes with the target codec and re-wrap the blob.

use bytes::Bytes;
use prost::Message;

use crate::blob::types::{Blob, BlobData, BlobError};
use crate::compression::{self, CompressionError, CompressionLevel, TARGET_CODEC};

/// Encode `raw` with the target codec at `level`.
///
/// # Errors
/// - `CompressionError::CodecInitFailed` if the encoder cannot be built.
/// - `CompressionError::CodecProcessFailed` if writing or finishing fails.
pub fn recompress(raw: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CompressionError> {
    compression::compress(TARGET_CODEC, raw, level)
}

/// Replace the blob payload with `compressed` target-codec data.
///
/// Whatever variant the blob held before is dropped. `raw_size` is set from
/// `raw_len`, including for blobs that arrived as `raw` without one.
pub fn wrap(blob: &mut Blob, compressed: impl Into<Bytes>, raw_len: usize) -> Result<(), BlobError> {
    let raw_size = i32::try_from(raw_len).map_err(|_| BlobError::RawSizeOverflow { have: raw_len })?;
    blob.raw_size = Some(raw_size);
    blob.data = Some(BlobData::ZstdData(compressed.into()));
    Ok(())
}

/// Serialize a blob for the wire.
pub fn encode_blob(blob: &Blob) -> Vec<u8> {
    blob.encode_to_vec()
}

/// Per-run recompressor bound to one immutable preset.
#[derive(Debug, Clone, Copy)]
pub struct Recompressor {
    level: CompressionLevel,
    verify: bool,
}

impl Recompressor {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level, verify: false }
    }

    /// Decode every freshly encoded payload and compare it with the input.
    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn level(&self) -> CompressionLevel {
        self.level
    }

    pub fn recompress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let compressed = recompress(raw, self.level)?;
        if self.verify {
            let decoded = compression::decompress(TARGET_CODEC, &compressed, raw.len())?;
            if decoded != raw {
                return Err(CompressionError::VerifyFailed { codec: TARGET_CODEC });
            }
        }
        Ok(compressed)
    }

    /// Recompress `raw` and install it as the blob payload.
    /// Returns the compressed payload length.
    pub fn recompress_into(&self, blob: &mut Blob, raw: &[u8]) -> Result<usize, crate::types::StreamError> {
        let compressed = self.recompress(raw)?;
        let len = compressed.len();
        wrap(blob, compressed, raw.len())?;
        Ok(len)
    }
}
