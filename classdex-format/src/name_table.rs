//! Name pools decoded from index payloads.
//!
//! Both generations store every distinct name once and have class records
//! refer to it by table id. Ids are 1-based; id 0 is reserved to mean
//! "absent" in the places that allow absence (a missing superclass, a root
//! parent reference).

use crate::error::{Error, Result};
use crate::format::FLAG_INNER_CLASS;
use crate::packed::{MAX_PREALLOC, PackedInput};
use classdex_core::DotName;
use std::io::Read;

/// Deepest accepted parent chain in a componentized table. Hashing,
/// rendering, and drop all walk once per link, so depth is bounded here at
/// decode time; real class names sit at package depth, far below this.
const MAX_NAME_DEPTH: u32 = 1024;

#[derive(Debug)]
pub(crate) struct NameTable {
    /// Entries indexed by (id - 1).
    entries: Vec<DotName>,
}

impl NameTable {
    /// Decode a flat table: each entry is a complete dotted string, kept as
    /// a simple name.
    ///
    /// Layout: `[count: varint] [len: varint, utf8_bytes...]*`
    pub(crate) fn read_flat<R: Read>(input: &mut PackedInput<R>) -> Result<Self> {
        let count = input.read_varint()?;
        let mut entries = Vec::with_capacity(count.min(MAX_PREALLOC) as usize);
        for _ in 0..count {
            entries.push(DotName::simple(input.read_str()?));
        }
        Ok(Self { entries })
    }

    /// Decode a componentized table: each entry is one segment referring
    /// back to an earlier entry as its parent.
    ///
    /// Layout per entry: `[parent_id: varint] [flags: u8, when enabled]
    /// [len: varint, utf8_bytes...]`. A parent id of 0 marks a root
    /// segment; any other id must point at an already-decoded entry, so
    /// chains share parent nodes exactly as the writer laid them out.
    /// Chains deeper than `MAX_NAME_DEPTH` links are rejected.
    pub(crate) fn read_componentized<R: Read>(
        input: &mut PackedInput<R>,
        with_flags: bool,
    ) -> Result<Self> {
        let count = input.read_varint()?;
        let mut entries: Vec<DotName> = Vec::with_capacity(count.min(MAX_PREALLOC) as usize);
        let mut depths: Vec<u32> = Vec::with_capacity(count.min(MAX_PREALLOC) as usize);
        for idx in 0..count {
            let parent_id = input.read_varint()?;
            let inner_class = if with_flags {
                input.read_u8()? & FLAG_INNER_CLASS != 0
            } else {
                false
            };
            let local = input.read_str()?;

            let (parent, depth) = match parent_id {
                0 => (None, 1),
                id if id <= idx => {
                    let slot = (id - 1) as usize;
                    (Some(&entries[slot]), depths[slot] + 1)
                }
                id => {
                    return Err(Error::InvalidNameTable(format!(
                        "entry {} references undecoded parent {}",
                        idx + 1,
                        id
                    )));
                }
            };
            if depth > MAX_NAME_DEPTH {
                return Err(Error::InvalidNameTable(format!(
                    "entry {} exceeds chain depth limit {}",
                    idx + 1,
                    MAX_NAME_DEPTH
                )));
            }
            let name = DotName::componentized_with(parent, &local, inner_class)
                .map_err(|e| Error::InvalidNameTable(e.to_string()))?;
            entries.push(name);
            depths.push(depth);
        }
        Ok(Self { entries })
    }

    /// Resolve a 1-based table id. Id 0 is reserved and always an error
    /// here; callers that allow absence check for 0 before resolving.
    pub(crate) fn get(&self, id: u64) -> Result<&DotName> {
        if id == 0 {
            return Err(Error::InvalidNameTable("name id 0 is reserved".into()));
        }
        self.entries.get((id - 1) as usize).ok_or_else(|| {
            Error::InvalidNameTable(format!(
                "name id {} out of range (table has {} entries)",
                id,
                self.entries.len()
            ))
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
