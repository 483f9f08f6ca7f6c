//! src/compression/codecs/zstd.rs
//!
//! Zstd streaming compressor/decompressor.
//!
//! Design notes:
//! - Compressor streams every chunk through one encoder; `finish` closes the frame.
//! - Decompressor decodes a whole frame and enforces the expected output size.
//! - Errors are mapped into `CompressionError` variants with codec context.

use std::io::Write;

use super::read_bounded;
use crate::compression::types::{Codec, CompressionError, CompressionLevel, Compressor, Decompressor};

/// Zstd streaming compressor.
/// - Holds an encoder writing into an internal Vec.
/// - `Option` lets `finish()` consume the encoder exactly once.
pub struct ZstdCompressor {
    encoder: Option<zstd::stream::Encoder<'static, Vec<u8>>>,
}

impl ZstdCompressor {
    /// Create a new Zstd compressor for the given preset.
    ///
    /// # Errors
    /// - Returns `CompressionError::CodecInitFailed` if encoder initialization fails.
    pub fn new(level: CompressionLevel) -> Result<Box<dyn Compressor>, CompressionError> {
        let encoder = zstd::stream::Encoder::new(Vec::new(), level.zstd_level())
            .map_err(|e| CompressionError::CodecInitFailed { codec: Codec::Zstd, msg: e.to_string() })?;
        Ok(Box::new(Self { encoder: Some(encoder) }))
    }
}

impl Compressor for ZstdCompressor {
    fn compress_chunk(&mut self, input: &[u8], _out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let encoder = self.encoder.as_mut().ok_or(CompressionError::Finished { codec: Codec::Zstd })?;
        encoder.write_all(input).map_err(|e| CompressionError::process(Codec::Zstd, e))
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let encoder = self.encoder.take().ok_or(CompressionError::Finished { codec: Codec::Zstd })?;
        let compressed = encoder.finish().map_err(|e| CompressionError::process(Codec::Zstd, e))?;
        out.extend_from_slice(&compressed);
        Ok(())
    }
}

/// Zstd frame decompressor with a known output size.
pub struct ZstdDecompressor {
    expected_len: usize,
}

impl ZstdDecompressor {
    pub fn new(expected_len: usize) -> Result<Box<dyn Decompressor>, CompressionError> {
        Ok(Box::new(Self { expected_len }))
    }
}

impl Decompressor for ZstdDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        let decoder = zstd::stream::Decoder::new(input)
            .map_err(|e| CompressionError::CodecInitFailed { codec: Codec::Zstd, msg: e.to_string() })?;
        read_bounded(Codec::Zstd, decoder, self.expected_len, out)
    }
}
