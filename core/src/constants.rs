//! constants.rs
//! Wire limits and codec defaults shared across the transcoder.

/// Width of the big-endian length prefix that precedes every `BlobHeader`.
pub const LENGTH_PREFIX_LEN: usize = 4;

/// Hard ceiling for a serialized `BlobHeader` (64 MiB).
/// See https://wiki.openstreetmap.org/wiki/PBF_Format#File_format
pub const MAX_BLOB_HEADER_SIZE: u32 = 64 * 1024 * 1024;

/// Buffer size for the reader/writer wrapping on-disk files (1 MiB).
pub const IO_BUFFER_SIZE: usize = 1024 * 1024;

/// zstd levels backing each named speed preset.
pub mod zstd_levels {
    pub const FASTEST: i32 = 1;
    pub const DEFAULT: i32 = 3;
    pub const BETTER: i32 = 7;
    pub const BEST: i32 = 11;
}
