//! Versioned payload decoders.
//!
//! The header's version byte selects a generation once per stream; every
//! payload that follows is decoded by it. Payload layouts:
//!
//! ```text
//! versions 1-3 (flat):
//!   [name_count: varint] [len: varint, utf8_bytes...]*
//!   [class_count: varint]
//!   per class: [name_id: varint]
//!              [super_id: varint, 0 = none]          (version >= 2)
//!              [ann_count: varint] [ann_id: varint]*  (version >= 3)
//!
//! versions 6-7 (componentized):
//!   [name_count: varint] [parent_id: varint, flags: u8 (v7), len: varint, utf8_bytes...]*
//!   [class_count: varint]
//!   per class: [name_id: varint] [super_id: varint, 0 = none]
//!              [ann_count: varint] [ann_id: varint]*
//! ```

use crate::error::Result;
use crate::format::{self, Generation};
use crate::index::{ClassEntry, Index};
use crate::name_table::NameTable;
use crate::packed::{MAX_PREALLOC, PackedInput};
use classdex_core::DotName;
use std::io::Read;

/// Decoder selected by the stream header, one per reader lifetime.
pub(crate) enum Decoder {
    /// Flat name tables, versions 1 through 3.
    V1 { version: u8 },
    /// Componentized name tables, versions 6 and 7.
    V2 { version: u8 },
}

impl Decoder {
    pub(crate) fn for_version(version: u8) -> Option<Self> {
        match format::generation_for(version)? {
            Generation::V1 => Some(Decoder::V1 { version }),
            Generation::V2 => Some(Decoder::V2 { version }),
        }
    }

    /// Decode one complete index payload from the stream.
    pub(crate) fn read_index<R: Read>(&self, input: &mut PackedInput<R>) -> Result<Index> {
        match self {
            Decoder::V1 { version } => read_v1(input, *version),
            Decoder::V2 { version } => read_v2(input, *version),
        }
    }
}

fn read_v1<R: Read>(input: &mut PackedInput<R>, version: u8) -> Result<Index> {
    // 1. Name table of complete dotted strings
    let names = NameTable::read_flat(input)?;

    // 2. Class records, with per-version optional fields
    let class_count = input.read_varint()?;
    let mut entries = Vec::with_capacity(class_count.min(MAX_PREALLOC) as usize);
    for _ in 0..class_count {
        let name = names.get(input.read_varint()?)?.clone();
        let super_name = if version >= 2 {
            read_optional_name(input, &names)?
        } else {
            None
        };
        let annotations = if version >= 3 {
            read_annotations(input, &names)?
        } else {
            Vec::new()
        };
        entries.push(ClassEntry {
            name,
            super_name,
            annotations,
        });
    }

    tracing::debug!(
        version,
        names = names.len(),
        classes = entries.len(),
        "flat index payload decoded"
    );
    Ok(Index::new(version, entries))
}

fn read_v2<R: Read>(input: &mut PackedInput<R>, version: u8) -> Result<Index> {
    // 1. Componentized name table; version 7 adds inner-class link flags
    let names = NameTable::read_componentized(input, version >= 7)?;

    // 2. Class records
    let class_count = input.read_varint()?;
    let mut entries = Vec::with_capacity(class_count.min(MAX_PREALLOC) as usize);
    for _ in 0..class_count {
        let name = names.get(input.read_varint()?)?.clone();
        let super_name = read_optional_name(input, &names)?;
        let annotations = read_annotations(input, &names)?;
        entries.push(ClassEntry {
            name,
            super_name,
            annotations,
        });
    }

    tracing::debug!(
        version,
        names = names.len(),
        classes = entries.len(),
        "componentized index payload decoded"
    );
    Ok(Index::new(version, entries))
}

fn read_optional_name<R: Read>(
    input: &mut PackedInput<R>,
    names: &NameTable,
) -> Result<Option<DotName>> {
    let id = input.read_varint()?;
    if id == 0 {
        Ok(None)
    } else {
        Ok(Some(names.get(id)?.clone()))
    }
}

fn read_annotations<R: Read>(input: &mut PackedInput<R>, names: &NameTable) -> Result<Vec<DotName>> {
    let count = input.read_varint()?;
    let mut annotations = Vec::with_capacity(count.min(MAX_PREALLOC) as usize);
    for _ in 0..count {
        annotations.push(names.get(input.read_varint()?)?.clone());
    }
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn push_varint(mut value: u64, buf: &mut Vec<u8>) {
        loop {
            let mut byte = (value & 0x7F) as u8;
            value >>= 7;
            if value != 0 {
                byte |= 0x80;
            }
            buf.push(byte);
            if value == 0 {
                break;
            }
        }
    }

    fn push_str(s: &str, buf: &mut Vec<u8>) {
        push_varint(s.len() as u64, buf);
        buf.extend_from_slice(s.as_bytes());
    }

    fn input(bytes: Vec<u8>) -> PackedInput<Cursor<Vec<u8>>> {
        PackedInput::new(Cursor::new(bytes))
    }

    /// Flat payload with one class: `app.Main extends app.Base`,
    /// annotated `@api.Marker` where the version allows.
    fn flat_payload() -> Vec<u8> {
        let mut buf = Vec::new();
        push_varint(3, &mut buf);
        push_str("app.Main", &mut buf);
        push_str("app.Base", &mut buf);
        push_str("api.Marker", &mut buf);
        buf
    }

    #[test]
    fn test_v1_records_carry_name_only() {
        let mut buf = flat_payload();
        push_varint(1, &mut buf); // class count
        push_varint(1, &mut buf); // name_id -> app.Main

        let index = Decoder::V1 { version: 1 }.read_index(&mut input(buf)).unwrap();
        let main = index.get_class(&DotName::simple("app.Main")).unwrap();
        assert!(main.super_name.is_none());
        assert!(main.annotations.is_empty());
    }

    #[test]
    fn test_v2_records_add_superclass() {
        let mut buf = flat_payload();
        push_varint(1, &mut buf);
        push_varint(1, &mut buf); // name_id
        push_varint(2, &mut buf); // super_id -> app.Base

        let index = Decoder::V1 { version: 2 }.read_index(&mut input(buf)).unwrap();
        let main = index.get_class(&DotName::simple("app.Main")).unwrap();
        assert_eq!(main.super_name.as_ref().unwrap().to_string(), "app.Base");
        assert!(main.annotations.is_empty());
    }

    #[test]
    fn test_v3_records_add_annotations() {
        let mut buf = flat_payload();
        push_varint(1, &mut buf);
        push_varint(1, &mut buf); // name_id
        push_varint(0, &mut buf); // no superclass
        push_varint(1, &mut buf); // one annotation
        push_varint(3, &mut buf); // ann_id -> api.Marker

        let index = Decoder::V1 { version: 3 }.read_index(&mut input(buf)).unwrap();
        let main = index.get_class(&DotName::simple("app.Main")).unwrap();
        assert!(main.super_name.is_none());
        assert_eq!(main.annotations.len(), 1);
        assert_eq!(
            index.classes_annotated_with(&DotName::simple("api.Marker")),
            [DotName::simple("app.Main")]
        );
    }

    #[test]
    fn test_v7_componentized_payload() {
        let mut buf = Vec::new();
        // Name table: app -> Main, api -> Marker
        push_varint(4, &mut buf);
        push_varint(0, &mut buf);
        buf.push(0);
        push_str("app", &mut buf);
        push_varint(1, &mut buf);
        buf.push(0);
        push_str("Main", &mut buf);
        push_varint(0, &mut buf);
        buf.push(0);
        push_str("api", &mut buf);
        push_varint(3, &mut buf);
        buf.push(0);
        push_str("Marker", &mut buf);
        // One class: app.Main, no super, annotated api.Marker
        push_varint(1, &mut buf);
        push_varint(2, &mut buf);
        push_varint(0, &mut buf);
        push_varint(1, &mut buf);
        push_varint(4, &mut buf);

        let index = Decoder::V2 { version: 7 }.read_index(&mut input(buf)).unwrap();
        assert_eq!(index.class_count(), 1);

        // Componentized keys answer simple-name lookups.
        let main = index.get_class(&DotName::simple("app.Main")).unwrap();
        assert!(main.name.is_componentized());
        assert_eq!(
            index.classes_annotated_with(&DotName::simple("api.Marker")),
            [DotName::simple("app.Main")]
        );
    }

    #[test]
    fn test_bad_name_reference_fails() {
        let mut buf = flat_payload();
        push_varint(1, &mut buf);
        push_varint(9, &mut buf); // out-of-range name_id

        let err = Decoder::V1 { version: 1 }
            .read_index(&mut input(buf))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::InvalidNameTable(_)));
    }

    #[test]
    fn test_truncated_payload_fails() {
        let mut buf = flat_payload();
        push_varint(2, &mut buf); // two classes announced
        push_varint(1, &mut buf); // only one record present

        let err = Decoder::V1 { version: 1 }
            .read_index(&mut input(buf))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_overstated_class_count_fails() {
        let mut buf = flat_payload();
        push_varint(u64::MAX, &mut buf); // declared class count
        push_varint(1, &mut buf); // a single real record

        let err = Decoder::V1 { version: 1 }
            .read_index(&mut input(buf))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_overstated_annotation_count_fails() {
        let mut buf = flat_payload();
        push_varint(1, &mut buf); // class count
        push_varint(1, &mut buf); // name_id
        push_varint(0, &mut buf); // no superclass
        push_varint(1u64 << 40, &mut buf); // declared annotation count
        push_varint(3, &mut buf); // a single real id

        let err = Decoder::V1 { version: 3 }
            .read_index(&mut input(buf))
            .unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }
}
