//! Versioned index stream reader.
//!
//! `IndexReader` owns the entry point into a persisted index stream: it
//! validates the five-byte header exactly once, selects the decoder
//! generation announced by the version byte, and delegates every payload
//! read to that decoder for the rest of the stream's life.

use crate::decode::Decoder;
use crate::error::{Error, Result};
use crate::format::{INDEX_MAGIC, SUPPORTED_RANGES};
use crate::index::Index;
use crate::packed::PackedInput;
use std::io::Read;

enum ReaderState<R: Read> {
    /// Header not yet examined.
    Pending(PackedInput<R>),
    /// Header accepted; all payloads go through this decoder.
    Ready {
        input: PackedInput<R>,
        decoder: Decoder,
        version: u8,
    },
    /// Header failed; the stream has been dropped.
    Closed,
}

/// Reader for a persisted index stream.
///
/// Construction wraps the stream in buffering and performs no reads. The
/// first call to [`read`](Self::read) or
/// [`format_version`](Self::format_version) validates the header; a header
/// failure is terminal and every later call answers [`Error::Closed`].
pub struct IndexReader<R: Read> {
    state: ReaderState<R>,
}

impl<R: Read> IndexReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            state: ReaderState::Pending(PackedInput::new(reader)),
        }
    }

    /// Decode the next index payload.
    ///
    /// The version detected by the first call governs the whole stream, so
    /// one stream can carry several concatenated payloads of one version.
    pub fn read(&mut self) -> Result<Index> {
        self.ensure_header()?;
        let ReaderState::Ready {
            input,
            decoder,
            version,
        } = &mut self.state
        else {
            return Err(Error::Closed);
        };
        let _span = tracing::debug_span!("index_read", version = *version).entered();
        decoder.read_index(input)
    }

    /// Index format version announced by the stream header.
    ///
    /// Parses the header if it has not been examined yet.
    pub fn format_version(&mut self) -> Result<u8> {
        self.ensure_header()?;
        match &self.state {
            ReaderState::Ready { version, .. } => Ok(*version),
            ReaderState::Pending(_) | ReaderState::Closed => Err(Error::Closed),
        }
    }

    fn ensure_header(&mut self) -> Result<()> {
        // Swap to Closed while working so a failed header leaves the
        // stream dropped and the reader terminal.
        match std::mem::replace(&mut self.state, ReaderState::Closed) {
            ReaderState::Pending(mut input) => {
                let (version, decoder) = read_header(&mut input)?;
                tracing::debug!(version, "index stream header accepted");
                self.state = ReaderState::Ready {
                    input,
                    decoder,
                    version,
                };
                Ok(())
            }
            ready @ ReaderState::Ready { .. } => {
                self.state = ready;
                Ok(())
            }
            ReaderState::Closed => Err(Error::Closed),
        }
    }
}

fn read_header<R: Read>(input: &mut PackedInput<R>) -> Result<(u8, Decoder)> {
    // 1. Magic sentinel
    if input.read_u32_be()? != INDEX_MAGIC {
        return Err(Error::InvalidMagic);
    }

    // 2. Version byte against the supported ranges
    let version = input.read_u8()?;
    let decoder = Decoder::for_version(version).ok_or(Error::UnsupportedVersion {
        version,
        supported: SUPPORTED_RANGES,
    })?;
    Ok((version, decoder))
}
