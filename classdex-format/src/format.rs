//! Index stream header and version table.
//!
//! ## Stream Layout
//!
//! ```text
//! [magic: u32 BE = 0xBABE1F15] [version: u8] [index payload]*
//! ```
//!
//! One header governs the whole stream. The version byte selects a decoder
//! generation from [`SUPPORTED_RANGES`]; every payload after the header is
//! decoded by that generation.
//!
//! ## Version history
//!
//! | version | change                                              |
//! |---------|-----------------------------------------------------|
//! | 1       | flat name table; class records carry the name only  |
//! | 2       | superclass references                               |
//! | 3       | per-class annotation lists                          |
//! | 4, 5    | reserved; format experiments that never shipped     |
//! | 6       | componentized name table with shared parent refs    |
//! | 7       | inner-class link flags in the name table (current)  |

use std::fmt;

/// Magic sentinel opening every index stream, written big-endian.
pub const INDEX_MAGIC: u32 = 0xBABE_1F15;

/// Newest version this crate reads and the one current writers emit.
pub const CURRENT_VERSION: u8 = 7;

/// Name table entry flag: the segment joins its parent with `$`.
pub const FLAG_INNER_CLASS: u8 = 0x01;

/// A major decoder family. Versions inside one generation differ only in
/// optional record fields; across generations the payload layout changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    /// Flat name tables, versions 1 through 3.
    V1,
    /// Componentized name tables, versions 6 and 7.
    V2,
}

/// Inclusive version span handled by one generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    pub min: u8,
    pub max: u8,
    pub generation: Generation,
}

impl VersionRange {
    pub fn contains(&self, version: u8) -> bool {
        (self.min..=self.max).contains(&version)
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Every version span this crate can decode.
pub const SUPPORTED_RANGES: &[VersionRange] = &[
    VersionRange {
        min: 1,
        max: 3,
        generation: Generation::V1,
    },
    VersionRange {
        min: 6,
        max: 7,
        generation: Generation::V2,
    },
];

/// Look up the decoder generation for a header version byte.
pub fn generation_for(version: u8) -> Option<Generation> {
    SUPPORTED_RANGES
        .iter()
        .find(|range| range.contains(version))
        .map(|range| range.generation)
}
