//! Zlib decoding via flate2.

use flate2::read::ZlibDecoder;

use super::read_bounded;
use crate::compression::types::{Codec, CompressionError, Decompressor};

/// Decodes one complete zlib stream whose inflated size is known up front.
pub struct ZlibDecompressor {
    expected_len: usize,
}

impl ZlibDecompressor {
    pub fn new(expected_len: usize) -> Result<Box<dyn Decompressor>, CompressionError> {
        Ok(Box::new(Self { expected_len }))
    }
}

impl Decompressor for ZlibDecompressor {
    fn decompress_chunk(&mut self, input: &[u8], out: &mut Vec<u8>) -> Result<(), CompressionError> {
        read_bounded(Codec::Zlib, ZlibDecoder::new(input), self.expected_len, out)
    }
}
