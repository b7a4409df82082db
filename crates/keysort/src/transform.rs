//! Named value transforms for JSON records.
//!
//! These cover the common cases (case-insensitive names, numeric strings,
//! lengths) for callers that pick a transform by name, such as the demo shell.
//! Arbitrary closures go through [`crate::try_sort_by_key_with`] instead.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::error::SortError;
use crate::spec::SortSpec;
use crate::value::SortValue;

/// Errors raised when a named transform cannot handle a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("{transform} expects a string, got {found}")]
    ExpectedString {
        transform: NamedTransform,
        found: &'static str,
    },

    #[error("length is undefined for {found}")]
    NoLength { found: &'static str },

    #[error("cannot interpret {0} as a number")]
    NotNumeric(String),

    #[error("value has no natural ordering")]
    Unorderable,
}

/// A transform selectable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamedTransform {
    #[default]
    Identity,
    Lowercase,
    Uppercase,
    Length,
    Number,
}

impl NamedTransform {
    pub const ALL: [NamedTransform; 5] = [
        NamedTransform::Identity,
        NamedTransform::Lowercase,
        NamedTransform::Uppercase,
        NamedTransform::Length,
        NamedTransform::Number,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NamedTransform::Identity => "identity",
            NamedTransform::Lowercase => "lowercase",
            NamedTransform::Uppercase => "uppercase",
            NamedTransform::Length => "length",
            NamedTransform::Number => "number",
        }
    }

    /// Maps a resolved value to its comparison key.
    pub fn apply(self, value: &Value) -> Result<SortValue, TransformError> {
        match self {
            NamedTransform::Identity => {
                SortValue::from_json(value).ok_or(TransformError::Unorderable)
            }
            NamedTransform::Lowercase => match value {
                Value::String(s) => Ok(SortValue::Str(s.to_lowercase())),
                other => Err(TransformError::ExpectedString {
                    transform: self,
                    found: json_type(other),
                }),
            },
            NamedTransform::Uppercase => match value {
                Value::String(s) => Ok(SortValue::Str(s.to_uppercase())),
                other => Err(TransformError::ExpectedString {
                    transform: self,
                    found: json_type(other),
                }),
            },
            NamedTransform::Length => {
                let len = match value {
                    Value::String(s) => s.chars().count(),
                    Value::Array(items) => items.len(),
                    Value::Object(map) => map.len(),
                    other => {
                        return Err(TransformError::NoLength {
                            found: json_type(other),
                        })
                    }
                };
                Ok(SortValue::Int(len as i128))
            }
            NamedTransform::Number => match value {
                Value::Number(_) => SortValue::from_json(value).ok_or(TransformError::Unorderable),
                Value::String(s) => parse_number(s),
                other => Err(TransformError::NotNumeric(other.to_string())),
            },
        }
    }

    /// Sorts JSON records with this transform.
    ///
    /// The identity transform goes through [`crate::sort_by_key`] so mixed
    /// value kinds are reported; every other transform yields a single kind.
    pub fn sort<'a>(self, records: &'a [Value], spec: &SortSpec) -> Result<Vec<&'a Value>, SortError> {
        match self {
            NamedTransform::Identity => crate::sort_by_key(records, spec),
            _ => crate::try_sort_by_key_with(records, spec, |value| self.apply(value)),
        }
    }
}

fn parse_number(s: &str) -> Result<SortValue, TransformError> {
    let trimmed = s.trim();
    if let Ok(i) = trimmed.parse::<i128>() {
        return Ok(SortValue::Int(i));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(SortValue::Float(f)),
        _ => Err(TransformError::NotNumeric(format!("{s:?}"))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl FromStr for NamedTransform {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "none" | "id" => return Ok(NamedTransform::Identity),
            "lower" => return Ok(NamedTransform::Lowercase),
            "upper" => return Ok(NamedTransform::Uppercase),
            "len" => return Ok(NamedTransform::Length),
            "num" => return Ok(NamedTransform::Number),
            _ => {}
        }
        NamedTransform::ALL
            .into_iter()
            .find(|t| t.name() == lower)
            .ok_or_else(|| SortError::UnknownTransform(s.to_owned()))
    }
}

impl fmt::Display for NamedTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
