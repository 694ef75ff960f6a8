//! Decoded index artifact.

use classdex_core::DotName;
use rustc_hash::FxHashMap;

/// One class's decoded metadata.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub name: DotName,
    /// Direct superclass; absent for `java.lang.Object` and module entries.
    pub super_name: Option<DotName>,
    /// Annotation types present on the class, in payload order.
    pub annotations: Vec<DotName>,
}

/// Queryable result of decoding one index payload.
///
/// Both maps are keyed by `DotName`, so lookups accept either encoding:
/// a transient `DotName::simple` key finds entries stored under shared
/// componentized names.
#[derive(Debug)]
pub struct Index {
    version: u8,
    classes: FxHashMap<DotName, ClassEntry>,
    /// Annotation name -> classes carrying it, sorted by name.
    annotated: FxHashMap<DotName, Vec<DotName>>,
}

impl Index {
    pub(crate) fn new(version: u8, entries: Vec<ClassEntry>) -> Self {
        let mut classes = FxHashMap::default();
        let mut annotated: FxHashMap<DotName, Vec<DotName>> = FxHashMap::default();
        for entry in entries {
            for annotation in &entry.annotations {
                annotated
                    .entry(annotation.clone())
                    .or_default()
                    .push(entry.name.clone());
            }
            classes.insert(entry.name.clone(), entry);
        }
        for names in annotated.values_mut() {
            names.sort();
            names.dedup();
        }
        Self {
            version,
            classes,
            annotated,
        }
    }

    /// Format version of the payload this index was decoded from.
    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Look up a class by name, under either encoding.
    pub fn get_class(&self, name: &DotName) -> Option<&ClassEntry> {
        self.classes.get(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
        self.classes.values()
    }

    /// Classes carrying the given annotation, sorted by name. Unknown
    /// annotations yield an empty slice.
    pub fn classes_annotated_with(&self, name: &DotName) -> &[DotName] {
        self.annotated.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct annotation types seen across all classes.
    pub fn annotation_count(&self) -> usize {
        self.annotated.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, super_name: Option<&str>, annotations: &[&str]) -> ClassEntry {
        ClassEntry {
            name: DotName::simple(name),
            super_name: super_name.map(DotName::simple),
            annotations: annotations.iter().map(DotName::simple).collect(),
        }
    }

    #[test]
    fn test_annotation_map_sorted() {
        let index = Index::new(
            7,
            vec![
                entry("b.Second", Some("a.Base"), &["x.Marker"]),
                entry("a.First", Some("a.Base"), &["x.Marker", "y.Other"]),
                entry("c.Third", None, &[]),
            ],
        );

        assert_eq!(index.class_count(), 3);
        assert_eq!(index.annotation_count(), 2);

        let marked = index.classes_annotated_with(&DotName::simple("x.Marker"));
        let rendered: Vec<String> = marked.iter().map(|n| n.to_string()).collect();
        assert_eq!(rendered, ["a.First", "b.Second"]);

        assert!(index
            .classes_annotated_with(&DotName::simple("x.Unknown"))
            .is_empty());
    }

    #[test]
    fn test_lookup_across_encodings() {
        let pkg = DotName::componentized(None, "app").unwrap();
        let name = DotName::componentized(Some(&pkg), "Main").unwrap();
        let index = Index::new(
            7,
            vec![ClassEntry {
                name,
                super_name: None,
                annotations: Vec::new(),
            }],
        );

        let found = index.get_class(&DotName::simple("app.Main")).unwrap();
        assert_eq!(found.name.to_string(), "app.Main");
        assert!(found.super_name.is_none());
    }
}
