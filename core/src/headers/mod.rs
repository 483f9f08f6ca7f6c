//! Header framer.
//!
//! Responsibilities:
//! - Read/write the 4-byte big-endian length prefix
//! - Encode/decode the `BlobHeader` record
//! - Enforce the 64 MiB header ceiling
//!
//! Non-responsibilities:
//! - Blob payloads
//! - Compression

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{BlobHeader, HeaderError};
pub use encode::{encode_frame_header, write_frame};
pub use decode::{decode_blob_header, read_frame, read_header_len};
