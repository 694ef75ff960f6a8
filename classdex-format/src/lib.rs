//! # Classdex Format
//!
//! Versioned binary reading for persisted classdex indexes.
//!
//! A persisted stream opens with a fixed five-byte header: the magic
//! sentinel `0xBABE1F15` (big-endian) and one version byte. [`IndexReader`]
//! validates the header once, selects the decoder generation covering that
//! version, and decodes each following payload into an [`Index`] keyed by
//! `DotName`.
//!
//! ## Example
//!
//! ```ignore
//! use classdex_format::IndexReader;
//!
//! let mut reader = IndexReader::new(File::open(path)?);
//! let index = reader.read()?;
//! for class in index.classes() {
//!     println!("{}", class.name);
//! }
//! ```

mod decode;
pub mod error;
pub mod format;
pub mod index;
mod name_table;
mod packed;
pub mod reader;

pub use error::{Error, Result};
pub use format::{CURRENT_VERSION, Generation, INDEX_MAGIC, SUPPORTED_RANGES, VersionRange};
pub use index::{ClassEntry, Index};
pub use reader::IndexReader;
