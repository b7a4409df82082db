use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::SortError;
use crate::path::KeyPath;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

impl Direction {
    /// Orients a value comparison. Presence ranks are never passed through
    /// this, so missing-key placement is independent of direction.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl FromStr for Direction {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => Err(SortError::InvalidDirection(s.to_owned())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Ascending => f.write_str("asc"),
            Direction::Descending => f.write_str("desc"),
        }
    }
}

/// Placement of records whose key path cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPolicy {
    /// After every resolved record, in either direction.
    #[default]
    Last,
    /// Before every resolved record, in either direction.
    First,
    /// Abort the whole sort with [`SortError::Lookup`].
    Raise,
}

impl MissingPolicy {
    /// `(present, missing)` presence ranks. Ranks always sort ascending.
    pub(crate) fn ranks(self) -> (u8, u8) {
        match self {
            MissingPolicy::Last | MissingPolicy::Raise => (0, 1),
            MissingPolicy::First => (1, 0),
        }
    }
}

impl FromStr for MissingPolicy {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "last" => Ok(MissingPolicy::Last),
            "first" => Ok(MissingPolicy::First),
            "raise" => Ok(MissingPolicy::Raise),
            _ => Err(SortError::InvalidPolicy(s.to_owned())),
        }
    }
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Last => f.write_str("last"),
            MissingPolicy::First => f.write_str("first"),
            MissingPolicy::Raise => f.write_str("raise"),
        }
    }
}

/// Parameters of one sort invocation, minus the value transform.
///
/// ```rust
/// use keysort::{Direction, MissingPolicy, SortSpec};
///
/// let spec = SortSpec::new("address.city")
///     .with_direction(Direction::Descending)
///     .with_missing(MissingPolicy::First);
/// assert_eq!(spec.path().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    path: KeyPath,
    direction: Direction,
    missing: MissingPolicy,
}

impl SortSpec {
    /// Ascending, missing-last sort on `path`.
    pub fn new(path: impl Into<KeyPath>) -> Self {
        Self {
            path: path.into(),
            direction: Direction::default(),
            missing: MissingPolicy::default(),
        }
    }

    /// Builds a spec from string options, validating all of them before
    /// any record is processed.
    pub fn parse(key: &str, direction: &str, missing: &str) -> Result<Self, SortError> {
        let direction = direction.parse()?;
        let missing = missing.parse()?;
        Ok(Self::new(key)
            .with_direction(direction)
            .with_missing(missing))
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn descending(self) -> Self {
        self.with_direction(Direction::Descending)
    }

    pub fn with_missing(mut self, missing: MissingPolicy) -> Self {
        self.missing = missing;
        self
    }

    pub fn path(&self) -> &KeyPath {
        &self.path
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn missing(&self) -> MissingPolicy {
        self.missing
    }
}
