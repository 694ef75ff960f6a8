//! # Classdex Core
//!
//! Core identity types for the classdex bytecode metadata index.
//!
//! This crate provides:
//! - `DotName`: the dotted/nested name every index entry is keyed by,
//!   with two physical encodings and one semantics
//! - Well-known `java.lang` name constants built over a shared parent chain
//!
//! ## Design Principles
//!
//! 1. **Representation-free identity**: equality, hashing, and ordering
//!    never depend on how a name was encoded
//! 2. **Structural sharing**: componentized parents are `Arc`-shared, so a
//!    million classes in one package hold one copy of the package chain
//! 3. **No comparison-time allocation**: equality and ordering walk the
//!    component chains directly instead of rendering strings

pub mod dot_name;
pub mod well_known;

pub use dot_name::{DotName, DotNameError};
