//! compression/registry.rs
//! Codec factory functions.

use crate::compression::codecs::{ZlibDecompressor, ZstdCompressor, ZstdDecompressor};
use crate::compression::types::{Codec, CompressionError, CompressionLevel, Compressor, Decompressor};

/// Codec used for every re-encoded blob.
pub const TARGET_CODEC: Codec = Codec::Zstd;

pub fn create_compressor(codec: Codec, level: CompressionLevel)
    -> Result<Box<dyn Compressor>, CompressionError>
{
    match codec {
        Codec::Zstd => ZstdCompressor::new(level),
        Codec::Zlib => Err(CompressionError::CodecInitFailed {
            codec,
            msg: "encoding is not supported".into(),
        }),
    }
}

/// Build a decompressor that must produce exactly `expected_len` bytes.
pub fn create_decompressor(codec: Codec, expected_len: usize)
    -> Result<Box<dyn Decompressor>, CompressionError>
{
    match codec {
        Codec::Zlib => ZlibDecompressor::new(expected_len),
        Codec::Zstd => ZstdDecompressor::new(expected_len),
    }
}

/// One-shot decode through the registry.
pub fn decompress(codec: Codec, input: &[u8], expected_len: usize) -> Result<Vec<u8>, CompressionError> {
    let mut decompressor = create_decompressor(codec, expected_len)?;
    let mut out = Vec::with_capacity(expected_len);
    decompressor.decompress_chunk(input, &mut out)?;
    Ok(out)
}

/// One-shot encode through the registry: stream `input` through the encoder,
/// then finalize it.
pub fn compress(codec: Codec, input: &[u8], level: CompressionLevel) -> Result<Vec<u8>, CompressionError> {
    let mut compressor = create_compressor(codec, level)?;
    let mut out = Vec::new();
    compressor.compress_chunk(input, &mut out)?;
    compressor.finish(&mut out)?;
    Ok(out)
}
