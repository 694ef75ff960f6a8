//! Buffered primitive reads for index payloads.
//!
//! Wraps any `Read` in a large `BufReader` and layers on the primitives the
//! decoders share: fixed-width integers, LEB128 varints, and length-prefixed
//! UTF-8 strings.

use crate::error::{Error, Result};
use std::io::{BufReader, Read};

/// Index payloads are scanned once, front to back; a large buffer keeps
/// syscalls rare.
const READ_BUFFER_SIZE: usize = 256 * 1024;

/// Longest accepted length-prefixed string. Class-file identifiers are
/// capped at 65535 bytes, so anything larger is corruption, not data.
const MAX_STRING_LEN: u64 = u16::MAX as u64;

/// Cap on speculative pre-allocation for count-prefixed sequences. Larger
/// declared counts still decode; the vector grows as entries actually
/// arrive, and an overstated count fails with truncation once the stream
/// runs dry.
pub(crate) const MAX_PREALLOC: u64 = 64 * 1024;

pub(crate) struct PackedInput<R: Read> {
    inner: BufReader<R>,
}

impl<R: Read> PackedInput<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            inner: BufReader::with_capacity(READ_BUFFER_SIZE, reader),
        }
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn read_u32_be(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    /// Decode a LEB128 unsigned 64-bit integer.
    pub(crate) fn read_varint(&mut self) -> Result<u64> {
        let mut result: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = self.read_u8()?;
            let payload = (byte & 0x7F) as u64;
            // Prevent overflow: shift must be < 64, and the value must fit
            if shift >= 64 || (shift >= 63 && payload > 1) {
                return Err(Error::VarintOverflow);
            }
            result |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(result);
            }
            shift += 7;
        }
    }

    /// Read a varint length followed by that many UTF-8 bytes.
    pub(crate) fn read_str(&mut self) -> Result<String> {
        let len = self.read_varint()?;
        if len > MAX_STRING_LEN {
            return Err(Error::InvalidString(format!(
                "length {} exceeds maximum {}",
                len, MAX_STRING_LEN
            )));
        }
        let mut buf = vec![0u8; len as usize];
        self.inner.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::InvalidString(format!("invalid UTF-8: {}", e)))
    }
}
