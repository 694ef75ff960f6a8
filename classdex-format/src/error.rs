//! Error types for index format reading.

use crate::format::VersionRange;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Stream does not begin with the index magic bytes.
    #[error("not a classdex index (bad magic)")]
    InvalidMagic,

    /// Header version byte falls outside every supported range.
    #[error("unsupported index version {version}, supported {}", supported_list(.supported))]
    UnsupportedVersion {
        version: u8,
        supported: &'static [VersionRange],
    },

    /// The reader dropped its stream after an earlier header failure.
    #[error("index reader is closed after a header failure")]
    Closed,

    /// LEB128 value does not fit in 64 bits.
    #[error("varint overflow")]
    VarintOverflow,

    /// Length-prefixed string is oversized or not UTF-8.
    #[error("invalid string: {0}")]
    InvalidString(String),

    /// Name table entry is malformed or a name reference does not resolve.
    #[error("invalid name table: {0}")]
    InvalidNameTable(String),

    /// Underlying stream failure, including truncation.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn supported_list(ranges: &[VersionRange]) -> String {
    ranges
        .iter()
        .map(|range| range.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
