//! compression/mod.rs
//! Codec layer for the transcoder.
//!
//! Notes:
//! - zlib is decode-only, zstd is the target encoder (and decodes for verification).
//! - Decoders always know the inflated size and reject any other output length.
//! - Registry resolves `Codec` values to implementations.

pub mod types;
pub mod registry;
pub mod codecs;

pub use types::*;
pub use registry::*;
