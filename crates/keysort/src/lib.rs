//! # Keysort - Keyed Record Sorter
//!
//! Sorts a slice of dictionary-like records by the value found at a
//! (possibly nested, possibly missing) key path, returning a new `Vec` of
//! references to the same records. The input is never mutated.
//!
//! ## Composite key
//!
//! Each record is mapped to `(presence_rank, key)`:
//!
//! ```text
//! policy   present  missing
//! last        0        1       missing records after everything
//! first       1        0       missing records before everything
//! raise       -        -       first unresolved record aborts the sort
//! ```
//!
//! Ranks always compare ascending; only `key` is compared in the requested
//! direction. The sort is stable, so records with equal keys keep their input
//! order in both directions.
//!
//! ## Module Responsibilities
//!
//! | Module        | Purpose                                              |
//! |---------------|------------------------------------------------------|
//! | [`path`]      | `KeyPath`, `Traversable`, segment-by-segment lookup  |
//! | [`value`]     | `SortValue`, the natural ordering of JSON values     |
//! | [`spec`]      | `SortSpec`, `Direction`, `MissingPolicy`             |
//! | [`transform`] | `NamedTransform`, transforms selectable by name      |
//! | [`error`]     | `SortError`                                          |
//!
//! ## Example
//!
//! ```rust
//! use keysort::{sort_by_key, MissingPolicy, SortSpec};
//! use serde_json::json;
//!
//! let people = vec![
//!     json!({"name": "Alice", "age": 30}),
//!     json!({"name": "bob", "age": 25}),
//!     json!({"name": "Charlie"}),
//!     json!({"name": "dan", "age": 35}),
//! ];
//!
//! let sorted = sort_by_key(&people, &SortSpec::new("age")).unwrap();
//! let names: Vec<_> = sorted.iter().map(|p| p["name"].as_str().unwrap()).collect();
//! assert_eq!(names, ["bob", "Alice", "dan", "Charlie"]);
//!
//! let spec = SortSpec::new("age").with_missing(MissingPolicy::First);
//! let sorted = sort_by_key(&people, &spec).unwrap();
//! assert_eq!(sorted[0]["name"], "Charlie");
//! ```
pub mod error;
pub mod path;
pub mod spec;
pub mod transform;
pub mod value;

use std::cmp::Ordering;

use tracing::{debug, trace};

pub use error::{BoxError, SortError};
pub use path::{KeyPath, Lookup, Traversable, Unresolved, UnresolvedReason};
pub use spec::{Direction, MissingPolicy, SortSpec};
pub use transform::{NamedTransform, TransformError};
pub use value::{Kind, SortValue};

/// Sorts `records` by the natural ordering of the value at the spec's path.
///
/// All resolved values must share one [`Kind`]; a number in one record and a
/// string in another is reported as [`SortError::MixedKinds`].
pub fn sort_by_key<'a, R>(records: &'a [R], spec: &SortSpec) -> Result<Vec<&'a R>, SortError>
where
    R: Traversable,
{
    let mut expected: Option<Kind> = None;
    sort_keyed(records, spec, |index, value: &R| {
        let key = value
            .to_sort_value()
            .ok_or(SortError::Unorderable { index })?;
        match expected {
            None => expected = Some(key.kind()),
            Some(kind) if kind != key.kind() => {
                return Err(SortError::MixedKinds {
                    index,
                    expected: kind,
                    found: key.kind(),
                })
            }
            Some(_) => {}
        }
        Ok(key)
    })
}

/// Sorts `records` by `transform` applied to the value at the spec's path.
///
/// `transform` is called once per resolved record, in input order, and never
/// for records whose path is unresolved.
pub fn sort_by_key_with<'a, R, K, F>(
    records: &'a [R],
    spec: &SortSpec,
    mut transform: F,
) -> Result<Vec<&'a R>, SortError>
where
    R: Traversable,
    K: Ord,
    F: FnMut(&R) -> K,
{
    sort_keyed(records, spec, |_, value: &R| Ok(transform(value)))
}

/// Like [`sort_by_key_with`], but `transform` may fail. The first failure
/// aborts the sort as [`SortError::Transform`].
pub fn try_sort_by_key_with<'a, R, K, E, F>(
    records: &'a [R],
    spec: &SortSpec,
    mut transform: F,
) -> Result<Vec<&'a R>, SortError>
where
    R: Traversable,
    K: Ord,
    E: Into<BoxError>,
    F: FnMut(&R) -> Result<K, E>,
{
    sort_keyed(records, spec, |index, value: &R| {
        transform(value).map_err(|e| SortError::Transform {
            index,
            source: e.into(),
        })
    })
}

fn sort_keyed<'a, R, K, F>(
    records: &'a [R],
    spec: &SortSpec,
    mut key_of: F,
) -> Result<Vec<&'a R>, SortError>
where
    R: Traversable,
    K: Ord,
    F: FnMut(usize, &'a R) -> Result<K, SortError>,
{
    let path = spec.path();
    let direction = spec.direction();
    let missing = spec.missing();
    let (present_rank, missing_rank) = missing.ranks();

    debug!(
        records = records.len(),
        path = %path,
        direction = %direction,
        missing = %missing,
        "sorting records"
    );

    let mut keyed: Vec<(u8, Option<K>, &'a R)> = Vec::with_capacity(records.len());
    let mut unresolved = 0usize;

    for (index, record) in records.iter().enumerate() {
        match path.resolve(record) {
            Ok(value) => keyed.push((present_rank, Some(key_of(index, value)?), record)),
            Err(miss) if missing == MissingPolicy::Raise => {
                debug!(index, %miss, "unresolved key path, aborting");
                return Err(SortError::lookup(index, miss));
            }
            Err(miss) => {
                trace!(index, %miss, "unresolved key path");
                unresolved += 1;
                keyed.push((missing_rank, None, record));
            }
        }
    }

    // Vec::sort_by is stable.
    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0).then_with(|| match (&a.1, &b.1) {
            (Some(x), Some(y)) => direction.apply(x.cmp(y)),
            _ => Ordering::Equal,
        })
    });

    debug!(unresolved, "sort complete");
    Ok(keyed.into_iter().map(|(_, _, record)| record).collect())
}
