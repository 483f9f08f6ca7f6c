//! compression/codecs/mod.rs
//! Concrete codec adapters behind the `Compressor` / `Decompressor` traits.

use std::io::Read;

use crate::compression::types::{Codec, CompressionError};

pub mod zlib;
pub mod zstd;

pub use self::zlib::ZlibDecompressor;
pub use self::zstd::{ZstdCompressor, ZstdDecompressor};

/// Drain `reader` into `out`, requiring exactly `expected` bytes.
/// Reads at most one byte past `expected` so oversized streams are caught
/// without inflating them completely.
pub(crate) fn read_bounded<R: Read>(
    codec: Codec,
    reader: R,
    expected: usize,
    out: &mut Vec<u8>,
) -> Result<(), CompressionError> {
    let start = out.len();
    out.reserve(expected);
    reader
        .take(expected as u64 + 1)
        .read_to_end(out)
        .map_err(|e| CompressionError::process(codec, e))?;

    let actual = out.len() - start;
    if actual != expected {
        out.truncate(start);
        return Err(CompressionError::SizeMismatch { codec, expected, actual });
    }
    Ok(())
}
