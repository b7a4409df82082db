//! Natural ordering of JSON values.

use std::cmp::Ordering;
use std::fmt;

use serde_json::Value;

/// Coarse classification of a [`SortValue`]. Two values are directly
/// comparable only when they share a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Null,
    Bool,
    Number,
    Str,
    List,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Number => "number",
            Kind::Str => "string",
            Kind::List => "list",
        };
        f.write_str(name)
    }
}

/// A comparable key extracted from a record.
///
/// Integers and floats compare numerically with each other. NaN sorts above
/// every other number. Lists compare element by element; inside a list,
/// elements of different kinds fall back to ordering by [`Kind`].
#[derive(Debug, Clone)]
pub enum SortValue {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Str(String),
    List(Vec<SortValue>),
}

impl SortValue {
    /// Converts a JSON value. Objects (and lists containing them) have no
    /// natural ordering and yield `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => SortValue::Null,
            Value::Bool(b) => SortValue::Bool(*b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    SortValue::Int(i128::from(i))
                } else if let Some(u) = n.as_u64() {
                    SortValue::Int(i128::from(u))
                } else {
                    SortValue::Float(n.as_f64()?)
                }
            }
            Value::String(s) => SortValue::Str(s.clone()),
            Value::Array(items) => SortValue::List(
                items
                    .iter()
                    .map(SortValue::from_json)
                    .collect::<Option<Vec<_>>>()?,
            ),
            Value::Object(_) => return None,
        })
    }

    pub fn kind(&self) -> Kind {
        match self {
            SortValue::Null => Kind::Null,
            SortValue::Bool(_) => Kind::Bool,
            SortValue::Int(_) | SortValue::Float(_) => Kind::Number,
            SortValue::Str(_) => Kind::Str,
            SortValue::List(_) => Kind::List,
        }
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares an integer with a float without rounding the integer.
fn cmp_int_f64(i: i128, f: f64) -> Ordering {
    if f.is_nan() {
        return Ordering::Less;
    }
    if f.is_infinite() {
        return if f > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }
    // i128 covers [-2^127, 2^127).
    let bound = 2f64.powi(127);
    let floor = f.floor();
    if floor >= bound {
        return Ordering::Less;
    }
    if floor < -bound {
        return Ordering::Greater;
    }
    match i.cmp(&(floor as i128)) {
        Ordering::Equal if f != floor => Ordering::Less,
        other => other,
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use SortValue::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => cmp_f64(*a, *b),
            (Int(a), Float(b)) => cmp_int_f64(*a, *b),
            (Float(a), Int(b)) => cmp_int_f64(*b, *a).reverse(),
            (Str(a), Str(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            _ => self.kind().cmp(&other.kind()),
        }
    }
}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortValue {}

impl From<bool> for SortValue {
    fn from(b: bool) -> Self {
        SortValue::Bool(b)
    }
}

impl From<i64> for SortValue {
    fn from(i: i64) -> Self {
        SortValue::Int(i128::from(i))
    }
}

impl From<f64> for SortValue {
    fn from(f: f64) -> Self {
        SortValue::Float(f)
    }
}

impl From<&str> for SortValue {
    fn from(s: &str) -> Self {
        SortValue::Str(s.to_owned())
    }
}

impl From<String> for SortValue {
    fn from(s: String) -> Self {
        SortValue::Str(s)
    }
}
