//! Blob layer: payload message, codec resolver and recompressor.

pub mod types;
pub mod decode;
pub mod recompress;

pub use types::{Blob, BlobData, BlobError, BlobKind};
pub use decode::{decode_blob, read_blob, read_blob_bytes, to_raw_bytes};
pub use recompress::{encode_blob, recompress, wrap, Recompressor};
