//! Well-known `java.lang` names.
//!
//! Every consumer of class metadata ends up asking about a handful of
//! platform types (the implicit superclass, enum and record bases). These
//! constants share one `java` -> `java.lang` parent chain, so resolving
//! against them costs two pointer hops, not string work.

use crate::dot_name::DotName;
use std::sync::LazyLock;

static JAVA: LazyLock<DotName> =
    LazyLock::new(|| DotName::componentized(None, "java").expect("literal contains no dot"));

static JAVA_LANG: LazyLock<DotName> = LazyLock::new(|| {
    DotName::componentized(Some(&*JAVA), "lang").expect("literal contains no dot")
});

/// `java.lang.Object`, the implicit superclass.
pub static OBJECT: LazyLock<DotName> = LazyLock::new(|| {
    DotName::componentized(Some(&*JAVA_LANG), "Object").expect("literal contains no dot")
});

/// `java.lang.String`.
pub static STRING: LazyLock<DotName> = LazyLock::new(|| {
    DotName::componentized(Some(&*JAVA_LANG), "String").expect("literal contains no dot")
});

/// `java.lang.Enum`, the base of every enum type.
pub static ENUM: LazyLock<DotName> = LazyLock::new(|| {
    DotName::componentized(Some(&*JAVA_LANG), "Enum").expect("literal contains no dot")
});

/// `java.lang.Record`, the base of every record type.
pub static RECORD: LazyLock<DotName> = LazyLock::new(|| {
    DotName::componentized(Some(&*JAVA_LANG), "Record").expect("literal contains no dot")
});
