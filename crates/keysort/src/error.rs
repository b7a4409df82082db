use std::error::Error as StdError;

use thiserror::Error;

use crate::path::{Unresolved, UnresolvedReason};
use crate::value::Kind;

/// Boxed error produced by a caller-supplied transform.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that can occur while configuring or running a keyed sort.
///
/// The first four variants are configuration errors and are raised before any
/// record is looked at. The rest abort a sort in progress; no partial output
/// is ever returned.
#[derive(Debug, Error)]
pub enum SortError {
    /// The missing-key policy was not one of `last`, `first` or `raise`.
    #[error("invalid missing policy {0:?}: expected \"last\", \"first\" or \"raise\"")]
    InvalidPolicy(String),

    /// The direction was not ascending or descending.
    #[error("invalid direction {0:?}: expected \"asc\" or \"desc\"")]
    InvalidDirection(String),

    /// An explicit key path with zero segments.
    #[error("key path must have at least one segment")]
    EmptyKeyPath,

    /// A named transform that does not exist.
    #[error("unknown transform {0:?}")]
    UnknownTransform(String),

    /// Under the `raise` policy, a record's key path could not be resolved.
    #[error("record {index}: key {segment:?} {reason} (segment {depth})")]
    Lookup {
        /// Position of the offending record in the input.
        index: usize,
        /// The segment that could not be followed.
        segment: String,
        /// Zero-based position of `segment` within the key path.
        depth: usize,
        /// Why the segment could not be followed.
        reason: UnresolvedReason,
    },

    /// The caller's transform failed on a resolved value.
    #[error("record {index}: transform failed")]
    Transform {
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The resolved value has no natural ordering (e.g. a mapping).
    #[error("record {index}: value has no natural ordering")]
    Unorderable { index: usize },

    /// Resolved values of incomparable kinds were found across records.
    #[error("record {index}: cannot compare {found} with {expected}")]
    MixedKinds {
        index: usize,
        expected: Kind,
        found: Kind,
    },
}

impl SortError {
    pub(crate) fn lookup(index: usize, unresolved: Unresolved) -> Self {
        Self::Lookup {
            index,
            segment: unresolved.segment,
            depth: unresolved.depth,
            reason: unresolved.reason,
        }
    }

    /// Returns `true` for errors raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::InvalidPolicy(_)
                | Self::InvalidDirection(_)
                | Self::EmptyKeyPath
                | Self::UnknownTransform(_)
        )
    }

    /// The unresolved key path segment, for [`SortError::Lookup`].
    pub fn segment(&self) -> Option<&str> {
        match self {
            Self::Lookup { segment, .. } => Some(segment),
            _ => None,
        }
    }

    /// Position of the record that caused the error, if any.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::Lookup { index, .. }
            | Self::Transform { index, .. }
            | Self::Unorderable { index }
            | Self::MixedKinds { index, .. } => Some(*index),
            _ => None,
        }
    }
}
