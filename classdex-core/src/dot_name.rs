//! Dotted name identity (`DotName`).
//!
//! A `DotName` is the key type for everything the index stores: class names,
//! superclass names, annotation names. It has two physical encodings with
//! one identity:
//!
//! - **Simple**: the whole dotted string held verbatim. Cheap to build, ideal
//!   for transient lookup keys.
//! - **Componentized**: a local segment plus an optional parent chain. Each
//!   link is flagged as a package/class join (`.`) or an inner-class join
//!   (`$`). Parents are `Arc`-shared across every name that mentions them,
//!   which is what keeps a large index's key set compact: a thousand classes
//!   in `com.example.app` hold one copy of that package chain.
//!
//! Equality, hashing, and ordering are representation-free: `simple("a.b.C")`
//! and the componentized chain `a` / `b` / `C` are the same key in any
//! collection, and neither comparison nor hashing ever renders a name to a
//! string.
//!
//! ## Ordering
//!
//! Names order lexicographically over their expanded UTF-8 bytes, prefixed
//! by a virtual root separator (`.` unless the root segment carries the
//! inner-class flag). The prefix byte ties for every ordinary name; it only
//! separates a parentless inner-flagged segment from its dot-rooted twin,
//! which keeps `cmp` returning `Equal` exactly when `eq` holds.
//!
//! ## Hash memoization
//!
//! The canonical hash is memoized in a relaxed `AtomicU32`. Zero doubles as
//! the "not yet computed" sentinel, so a name whose genuine hash is zero
//! (the empty name) recomputes on every call. Recomputation is pure and
//! racing writers store the same value, so the memo needs no stronger
//! ordering.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::AtomicU32;

/// Package separator byte.
const PACKAGE_SEP: u8 = b'.';

/// Inner-class separator byte.
const INNER_SEP: u8 = b'$';

#[inline]
const fn separator(inner_class: bool) -> u8 {
    if inner_class { INNER_SEP } else { PACKAGE_SEP }
}

// ============================================================================
// Error type
// ============================================================================

/// Errors from componentized name construction.
#[derive(Debug, thiserror::Error)]
pub enum DotNameError {
    /// Componentized segments hold exactly one name component; the package
    /// separator may only appear between segments.
    #[error("componentized local segment contains '.': {0:?}")]
    DottedLocal(String),

    /// Parents of componentized names must themselves be componentized.
    /// Mixing encodings inside one chain would break separator bookkeeping.
    #[error("parent of a componentized name must be componentized: {0:?}")]
    SimpleParent(String),
}

// ============================================================================
// DotName
// ============================================================================

/// Dotted name with two physical encodings and one identity.
///
/// Cloning is a refcount bump. See the module docs for the encoding and
/// comparison rules.
#[derive(Clone)]
pub struct DotName {
    inner: Arc<NameRepr>,
}

struct NameRepr {
    /// Memoized canonical hash; 0 means "not yet computed".
    hash: AtomicU32,
    kind: NameKind,
}

enum NameKind {
    /// The whole dotted string, held verbatim.
    Simple(Box<str>),
    /// One segment plus an optional shared parent chain.
    Componentized {
        parent: Option<DotName>,
        local: Box<str>,
        inner_class: bool,
    },
}

impl DotName {
    /// Wrap a complete dotted string without splitting it.
    ///
    /// Ideal for transient keys: building one allocates a single string and
    /// never walks the name.
    pub fn simple(name: impl AsRef<str>) -> Self {
        Self::from_kind(NameKind::Simple(Box::from(name.as_ref())))
    }

    /// Append a package or class segment to an optional componentized parent.
    ///
    /// Fails if `local` contains `.` or if `parent` is a simple name.
    pub fn componentized(
        parent: Option<&DotName>,
        local: impl AsRef<str>,
    ) -> Result<Self, DotNameError> {
        Self::componentized_with(parent, local, false)
    }

    /// Append a segment whose link to its parent is the inner-class
    /// separator (`$`) instead of `.`.
    ///
    /// The flag records how the name renders and compares, not whether the
    /// class is truly nested. Class names may legitimately contain dollar
    /// signs, so nesting questions belong to the index, not the name.
    pub fn componentized_with(
        parent: Option<&DotName>,
        local: impl AsRef<str>,
        inner_class: bool,
    ) -> Result<Self, DotNameError> {
        let local = local.as_ref();
        if local.contains('.') {
            return Err(DotNameError::DottedLocal(local.to_owned()));
        }
        if let Some(parent) = parent {
            if !parent.is_componentized() {
                return Err(DotNameError::SimpleParent(parent.to_string()));
            }
        }
        Ok(Self::from_kind(NameKind::Componentized {
            parent: parent.cloned(),
            local: Box::from(local),
            inner_class,
        }))
    }

    fn from_kind(kind: NameKind) -> Self {
        Self {
            inner: Arc::new(NameRepr {
                hash: AtomicU32::new(0),
                kind,
            }),
        }
    }

    /// Parent name, or `None` for simple names and root segments.
    pub fn prefix(&self) -> Option<&DotName> {
        match &self.inner.kind {
            NameKind::Simple(_) => None,
            NameKind::Componentized { parent, .. } => parent.as_ref(),
        }
    }

    /// The raw stored string: the entire name for simple encodings, the
    /// rightmost segment (no separator) for componentized ones.
    ///
    /// Use [`without_package_prefix`](Self::without_package_prefix) when the
    /// desired value is the class portion after the last `.`, inner-class
    /// dollars included.
    pub fn local(&self) -> &str {
        match &self.inner.kind {
            NameKind::Simple(name) => name,
            NameKind::Componentized { local, .. } => local,
        }
    }

    /// Whether this name is the componentized encoding.
    pub fn is_componentized(&self) -> bool {
        matches!(self.inner.kind, NameKind::Componentized { .. })
    }

    /// Whether the link to the parent is the inner-class separator.
    ///
    /// Simple names always answer `false`.
    pub fn is_inner(&self) -> bool {
        match &self.inner.kind {
            NameKind::Simple(_) => false,
            NameKind::Componentized { inner_class, .. } => *inner_class,
        }
    }

    /// The portion of the name with no package prefix. Inner-class segments
    /// stay attached: `p.Outer$Inner` yields `Outer$Inner`.
    ///
    /// Simple names split at the last `.`: the whole string when there is
    /// none, the empty string when the name ends with one.
    pub fn without_package_prefix(&self) -> String {
        match &self.inner.kind {
            NameKind::Simple(name) => match name.rfind('.') {
                None => name.to_string(),
                Some(idx) => name[idx + 1..].to_string(),
            },
            NameKind::Componentized { .. } => {
                let mut out = String::new();
                self.strip_package(&mut out);
                out
            }
        }
    }

    fn strip_package(&self, out: &mut String) {
        if let NameKind::Componentized {
            parent,
            local,
            inner_class,
        } = &self.inner.kind
        {
            if *inner_class {
                if let Some(parent) = parent {
                    parent.strip_package(out);
                    out.push('$');
                }
            }
            out.push_str(local);
        }
    }

    /// The package portion of the name, or `None` when there is no package.
    ///
    /// Inner-class links are skipped: the package of `p.Outer$Inner` is `p`.
    pub fn package_prefix(&self) -> Option<String> {
        match &self.inner.kind {
            NameKind::Simple(name) => name.rfind('.').map(|idx| name[..idx].to_string()),
            NameKind::Componentized {
                parent,
                inner_class,
                ..
            } => {
                let parent = parent.as_ref()?;
                if *inner_class {
                    parent.package_prefix()
                } else {
                    Some(parent.to_string())
                }
            }
        }
    }

    /// Name-returning variant of [`package_prefix`](Self::package_prefix).
    ///
    /// Componentized names hand back the shared parent; simple names wrap
    /// the split-off package as a new simple name.
    pub fn package_prefix_name(&self) -> Option<DotName> {
        match &self.inner.kind {
            NameKind::Simple(name) => name.rfind('.').map(|idx| DotName::simple(&name[..idx])),
            NameKind::Componentized {
                parent,
                inner_class,
                ..
            } => {
                let parent = parent.as_ref()?;
                if *inner_class {
                    parent.package_prefix_name()
                } else {
                    Some(parent.clone())
                }
            }
        }
    }

    /// Render with `delim` in place of the package separator.
    ///
    /// Inner-class links always render as `$`. Simple names render verbatim;
    /// their embedded dots are not re-delimited.
    pub fn to_string_with(&self, delim: char) -> String {
        let mut out = String::new();
        self.build_string(delim, &mut out);
        out
    }

    fn build_string(&self, delim: char, out: &mut String) {
        match &self.inner.kind {
            NameKind::Simple(name) => out.push_str(name),
            NameKind::Componentized {
                parent,
                local,
                inner_class,
            } => {
                if let Some(parent) = parent {
                    parent.build_string(delim, out);
                    out.push(if *inner_class { '$' } else { delim });
                }
                out.push_str(local);
            }
        }
    }

    /// Canonical hash of the expanded name.
    ///
    /// Folds `acc * 31 + byte` over the rendered UTF-8 bytes without
    /// rendering them, seeding each segment with its parent's hash and the
    /// link separator. Simple and componentized encodings of one name hash
    /// identically. Memoized; see the module docs for the zero caveat.
    pub fn canonical_hash(&self) -> u32 {
        use std::sync::atomic::Ordering::Relaxed;

        let memo = self.inner.hash.load(Relaxed);
        if memo != 0 {
            return memo;
        }
        let hash = match &self.inner.kind {
            NameKind::Simple(name) => fold_bytes(0, name.as_bytes()),
            NameKind::Componentized {
                parent,
                local,
                inner_class,
            } => {
                let seed = match parent {
                    Some(parent) => parent
                        .canonical_hash()
                        .wrapping_mul(31)
                        .wrapping_add(u32::from(separator(*inner_class))),
                    None => 0,
                };
                fold_bytes(seed, local.as_bytes())
            }
        };
        self.inner.hash.store(hash, Relaxed);
        hash
    }

    /// Whether two handles share the same underlying node.
    ///
    /// Sharing is an allocation property, not identity: distinct nodes can
    /// still compare equal.
    pub fn ptr_eq(a: &DotName, b: &DotName) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    fn memo(&self) -> u32 {
        use std::sync::atomic::Ordering::Relaxed;
        self.inner.hash.load(Relaxed)
    }

    fn local_bytes(&self) -> &[u8] {
        self.local().as_bytes()
    }
}

fn fold_bytes(seed: u32, bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .fold(seed, |acc, &b| acc.wrapping_mul(31).wrapping_add(u32::from(b)))
}

// ============================================================================
// Identity: Eq / Hash / Ord over the expanded byte sequence
// ============================================================================

impl PartialEq for DotName {
    fn eq(&self, other: &Self) -> bool {
        if DotName::ptr_eq(self, other) {
            return true;
        }

        // Both parentless: identity reduces to the stored string plus the
        // root flag, no walk needed.
        if self.prefix().is_none() && other.prefix().is_none() {
            return self.local() == other.local() && self.is_inner() == other.is_inner();
        }

        // Computed memos that disagree settle it without a walk.
        let (h1, h2) = (self.memo(), other.memo());
        if h1 != 0 && h2 != 0 && h1 != h2 {
            return false;
        }

        expanded_eq(Some(self), Some(other))
    }
}

impl Eq for DotName {}

/// Compare two chains over their expanded byte sequences, tail to head.
///
/// Structurally aligned tail segments (same local, same flag) are stripped
/// by recursing on the parents. Once alignment breaks, the remainders are
/// walked byte by byte from the end: positions within a segment run from its
/// last byte down to a virtual position holding the segment's separator (the
/// root's separator closes the walk), after which the cursor hops to the
/// parent. Equal iff every position matches and both sides exhaust together.
fn expanded_eq(a: Option<&DotName>, b: Option<&DotName>) -> bool {
    let (a, b) = match (a, b) {
        (None, None) => return true,
        (Some(a), Some(b)) => (a, b),
        _ => return false,
    };
    if a.is_inner() == b.is_inner() && a.local() == b.local() {
        return expanded_eq(a.prefix(), b.prefix());
    }

    let mut a_cur = Some(a);
    let mut b_cur = Some(b);
    let mut a_pos = a.local_bytes().len() as isize - 1;
    let mut b_pos = b.local_bytes().len() as isize - 1;

    while let (Some(an), Some(bn)) = (a_cur, b_cur) {
        let a_byte = if a_pos >= 0 {
            an.local_bytes()[a_pos as usize]
        } else {
            separator(an.is_inner())
        };
        let b_byte = if b_pos >= 0 {
            bn.local_bytes()[b_pos as usize]
        } else {
            separator(bn.is_inner())
        };
        if a_byte != b_byte {
            return false;
        }

        a_pos -= 1;
        if a_pos < -1 {
            a_cur = an.prefix();
            if let Some(next) = a_cur {
                a_pos = next.local_bytes().len() as isize - 1;
            }
        }
        b_pos -= 1;
        if b_pos < -1 {
            b_cur = bn.prefix();
            if let Some(next) = b_cur {
                b_pos = next.local_bytes().len() as isize - 1;
            }
        }
    }
    a_cur.is_none() && b_cur.is_none()
}

impl Hash for DotName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.canonical_hash());
    }
}

impl Ord for DotName {
    fn cmp(&self, other: &Self) -> Ordering {
        if DotName::ptr_eq(self, other) {
            return Ordering::Equal;
        }
        let mut a = ByteCursor::new(self);
        let mut b = ByteCursor::new(other);
        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(_)) => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(x), Some(y)) => match x.cmp(&y) {
                    Ordering::Equal => continue,
                    diff => return diff,
                },
            }
        }
    }
}

impl PartialOrd for DotName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Forward cursor over the expanded bytes of one name, without rendering.
///
/// Segments are numbered from the root (0) to the leaf. Every segment
/// contributes its link separator followed by its local bytes; the root's
/// separator is the virtual leading one that keeps ordering aligned with
/// equality. The cursor re-walks the parent chain to locate the current
/// segment rather than holding a stack, since chains are package-depth
/// short and shared.
struct ByteCursor<'a> {
    leaf: &'a DotName,
    depth: usize,
    /// Segment currently being emitted, 0 = outermost.
    seg: usize,
    /// Position within that segment: 0 is its separator, 1..=len its bytes.
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    fn new(leaf: &'a DotName) -> Self {
        let mut depth = 1;
        let mut node = leaf;
        while let Some(parent) = node.prefix() {
            depth += 1;
            node = parent;
        }
        Self {
            leaf,
            depth,
            seg: 0,
            pos: 0,
        }
    }

    fn next(&mut self) -> Option<u8> {
        while self.seg < self.depth {
            let node = ancestor(self.leaf, self.depth - 1 - self.seg);
            if self.pos == 0 {
                self.pos = 1;
                return Some(separator(node.is_inner()));
            }
            let bytes = node.local_bytes();
            if self.pos <= bytes.len() {
                let byte = bytes[self.pos - 1];
                self.pos += 1;
                return Some(byte);
            }
            self.seg += 1;
            self.pos = 0;
        }
        None
    }
}

/// Walk up at most `steps` parent links.
fn ancestor(mut node: &DotName, mut steps: usize) -> &DotName {
    while steps > 0 {
        match node.prefix() {
            Some(parent) => node = parent,
            None => break,
        }
        steps -= 1;
    }
    node
}

// ============================================================================
// Rendering and serde
// ============================================================================

impl fmt::Display for DotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            NameKind::Simple(name) => f.write_str(name),
            NameKind::Componentized {
                parent,
                local,
                inner_class,
            } => {
                if let Some(parent) = parent {
                    fmt::Display::fmt(parent, f)?;
                    f.write_str(if *inner_class { "$" } else { "." })?;
                }
                f.write_str(local)
            }
        }
    }
}

impl fmt::Debug for DotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DotName({})", self)
    }
}

impl Serialize for DotName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DotName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // The simple encoding is lossless here: cross-representation
        // identity makes the deserialized key interchangeable with the
        // componentized original.
        let name = String::deserialize(deserializer)?;
        Ok(DotName::simple(name))
    }
}
