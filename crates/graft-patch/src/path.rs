//! Concrete paths into JSON documents.
//!
//! A [`Path`] is a sequence of segments, each an object key or an array
//! index. Match expressions resolve to paths; the deep accessors consume
//! them. Paths serialize as heterogeneous JSON arrays (`["users", 0]`) and
//! render as `$.users[0]`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seg {
    /// Object member access.
    Key(String),
    /// Array element access. Always non-negative; relative positions exist
    /// only in the expression grammar and are resolved before a `Path` is
    /// produced.
    Index(usize),
}

impl Seg {
    /// Key segment from anything string-like.
    #[inline]
    pub fn key(k: impl Into<String>) -> Self {
        Seg::Key(k.into())
    }

    /// Index segment.
    #[inline]
    pub fn index(i: usize) -> Self {
        Seg::Index(i)
    }

    /// True for key segments.
    #[inline]
    pub fn is_key(&self) -> bool {
        matches!(self, Seg::Key(_))
    }

    /// True for index segments.
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Seg::Index(_))
    }

    /// The key, if this is a key segment.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Seg::Key(k) => Some(k),
            Seg::Index(_) => None,
        }
    }

    /// The index, if this is an index segment.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Key(_) => None,
            Seg::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, ".{}", k),
            Seg::Index(i) => write!(f, "[{}]", i),
        }
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A concrete location in a JSON document.
///
/// The empty path is the document root.
///
/// # Examples
///
/// ```
/// use graft_patch::Path;
///
/// let p = Path::root().key("users").index(0).key("name");
/// assert_eq!(p.to_string(), "$.users[0].name");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Seg>);

impl Path {
    /// The empty path.
    #[inline]
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// The empty path, named for what it addresses.
    #[inline]
    pub fn root() -> Self {
        Self::new()
    }

    /// Wrap a segment vector.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Append a key segment, builder style.
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment, builder style.
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment in place.
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Push a key segment in place.
    #[inline]
    pub fn push_key(&mut self, k: impl Into<String>) {
        self.0.push(Seg::Key(k.into()));
    }

    /// Push an index segment in place.
    #[inline]
    pub fn push_index(&mut self, i: usize) {
        self.0.push(Seg::Index(i));
    }

    /// Remove and return the last segment.
    #[inline]
    pub fn pop(&mut self) -> Option<Seg> {
        self.0.pop()
    }

    /// The segments as a slice.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// True for the root path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The first segment, if any.
    #[inline]
    pub fn first(&self) -> Option<&Seg> {
        self.0.first()
    }

    /// The last segment, if any.
    #[inline]
    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    /// Concatenation of `self` and `other`.
    #[inline]
    pub fn join(&self, other: &Path) -> Path {
        let mut result = self.clone();
        result.0.extend(other.0.iter().cloned());
        result
    }

    /// A copy of `self` with `seg` appended.
    #[inline]
    pub fn with_segment(&self, seg: Seg) -> Path {
        let mut result = self.clone();
        result.0.push(seg);
        result
    }

    /// The path without its last segment; `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            let mut p = self.clone();
            p.pop();
            Some(p)
        }
    }

    /// True if every segment of `self` matches the start of `other`.
    /// Every path is a prefix of itself.
    #[inline]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.starts_with(&self.0)
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "$")?;
        for seg in &self.0 {
            write!(f, "{}", seg)?;
        }
        Ok(())
    }
}

/// Failure to parse a [`Path`] from its string rendering.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid path at byte {pos}")]
pub struct ParsePathError {
    pos: usize,
}

impl FromStr for Path {
    type Err = ParsePathError;

    /// Parses the `Display` rendering back, tolerating a missing leading
    /// `$` and quoted keys in brackets (`$['first name']`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.strip_prefix('$').unwrap_or(s);
        let mut rest = input;
        let mut segments = Vec::new();

        let err = |rest: &str| ParsePathError {
            pos: s.len() - rest.len(),
        };

        // A bare leading key: `users[0]` without `$.`.
        if !rest.is_empty() && !rest.starts_with(['.', '[']) {
            let end = rest.find(['.', '[']).unwrap_or(rest.len());
            segments.push(Seg::Key(rest[..end].to_string()));
            rest = &rest[end..];
        }

        while !rest.is_empty() {
            if let Some(r) = rest.strip_prefix('.') {
                let end = r.find(['.', '[']).unwrap_or(r.len());
                if end == 0 {
                    return Err(err(r));
                }
                segments.push(Seg::Key(r[..end].to_string()));
                rest = &r[end..];
            } else if let Some(r) = rest.strip_prefix('[') {
                let close = r.find(']').ok_or_else(|| err(r))?;
                let inner = r[..close].trim();
                let seg = if let Some(q) = quoted(inner) {
                    Seg::Key(q.to_string())
                } else {
                    Seg::Index(inner.parse().map_err(|_| err(r))?)
                };
                segments.push(seg);
                rest = &r[close + 1..];
            } else {
                return Err(err(rest));
            }
        }

        Ok(Path(segments))
    }
}

fn quoted(s: &str) -> Option<&str> {
    s.strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| s.strip_prefix('"').and_then(|t| t.strip_suffix('"')))
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl IntoIterator for Path {
    type Item = Seg;
    type IntoIter = std::vec::IntoIter<Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Seg;
    type IntoIter = std::slice::Iter<'a, Seg>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Build a [`Path`] from segment literals.
///
/// String literals become key segments, integers become index segments.
///
/// # Examples
///
/// ```
/// use graft_patch::path;
///
/// let p = path!("users", 0, "name");
/// assert_eq!(p.to_string(), "$.users[0].name");
/// assert_eq!(path!(), graft_patch::Path::root());
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}
