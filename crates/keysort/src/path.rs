//! Key paths and traversal through nested records.
//!
//! A [`KeyPath`] is walked one segment at a time. At every step the current
//! value must be a mapping that contains the segment, otherwise resolution
//! stops with an [`Unresolved`] describing where and why.
//!
//! ```text
//! {"address": {"city": "Oslo"}}      "address.city"  -> Ok("Oslo")
//! {"address": {}}                    "address.city"  -> Absent "city" (segment 1)
//! {"address": "n/a"}                 "address.city"  -> NotMapping "city" (segment 1)
//! ```

use std::fmt;

use serde_json::Value;

use crate::error::SortError;
use crate::value::SortValue;

/// Outcome of indexing a single segment into a value.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a, T: ?Sized> {
    /// The value is a mapping and holds the segment.
    Found(&'a T),
    /// The value is a mapping without the segment.
    Absent,
    /// The value is terminal and cannot be indexed.
    NotMapping,
}

/// A record-like value: either a terminal scalar or a mapping from string
/// keys to further values of the same type.
pub trait Traversable {
    /// Looks up `segment` in this value.
    fn lookup(&self, segment: &str) -> Lookup<'_, Self>;

    /// The natural ordering key of this value, or `None` if it has none.
    fn to_sort_value(&self) -> Option<SortValue>;
}

impl Traversable for Value {
    fn lookup(&self, segment: &str) -> Lookup<'_, Self> {
        match self {
            Value::Object(map) => map.get(segment).map_or(Lookup::Absent, Lookup::Found),
            _ => Lookup::NotMapping,
        }
    }

    fn to_sort_value(&self) -> Option<SortValue> {
        SortValue::from_json(self)
    }
}

/// Why a key path could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedReason {
    Absent,
    NotMapping,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("not found"),
            Self::NotMapping => f.write_str("looked up in a non-mapping value"),
        }
    }
}

/// The point at which resolving a [`KeyPath`] failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub segment: String,
    pub depth: usize,
    pub reason: UnresolvedReason,
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key {:?} {} (segment {})",
            self.segment, self.reason, self.depth
        )
    }
}

/// An ordered, non-empty route of field names into nested records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Splits a dot-delimited key on every `.`.
    ///
    /// A key without dots becomes a single-segment path. Splitting never
    /// yields zero segments, so this cannot fail.
    pub fn parse(key: &str) -> Self {
        Self {
            segments: key.split('.').map(str::to_owned).collect(),
        }
    }

    /// Builds a path from explicit segments. Segments are taken verbatim, so
    /// they may contain dots.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, SortError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(SortError::EmptyKeyPath);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Follows the path from `record`, returning the value at its end.
    pub fn resolve<'a, T>(&self, record: &'a T) -> Result<&'a T, Unresolved>
    where
        T: Traversable + ?Sized,
    {
        let mut current = record;
        for (depth, segment) in self.segments.iter().enumerate() {
            let reason = match current.lookup(segment) {
                Lookup::Found(next) => {
                    current = next;
                    continue;
                }
                Lookup::Absent => UnresolvedReason::Absent,
                Lookup::NotMapping => UnresolvedReason::NotMapping,
            };
            return Err(Unresolved {
                segment: segment.clone(),
                depth,
                reason,
            });
        }
        Ok(current)
    }
}

impl From<&str> for KeyPath {
    fn from(key: &str) -> Self {
        Self::parse(key)
    }
}

impl From<String> for KeyPath {
    fn from(key: String) -> Self {
        Self::parse(&key)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}
