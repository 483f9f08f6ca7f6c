use std::io::Read;

use bytes::Bytes;

use crate::types::StreamError;

/// Read up to `len` bytes, stopping early only at end of stream.
/// The returned buffer is shorter than `len` exactly when the stream ran dry.
///
/// The buffer grows with the data actually read, so a bogus length field
/// does not allocate up front.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, len: usize) -> Result<Bytes, StreamError> {
    let mut buf = Vec::with_capacity(len.min(crate::constants::IO_BUFFER_SIZE));
    (&mut *r).take(len as u64).read_to_end(&mut buf)?;
    Ok(Bytes::from(buf))
}
