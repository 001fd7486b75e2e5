//! Sort direction and value ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::value::{Number, Value};

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Ascending order (smallest first).
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl SortOrder {
    /// Parses a query token, ignoring ASCII case.
    ///
    /// Returns `None` for anything other than `asc` or `desc`, including the
    /// empty string.
    pub fn parse(token: &str) -> Option<SortOrder> {
        if token.eq_ignore_ascii_case("asc") {
            Some(SortOrder::Asc)
        } else if token.eq_ignore_ascii_case("desc") {
            Some(SortOrder::Desc)
        } else {
            None
        }
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }

    /// Returns the query token for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Asc => "Asc",
            SortOrder::Desc => "Desc",
        }
    }

    /// Compares two values in this direction.
    pub fn compare(self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        self.apply(compare_values(a, b))
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::parse(s).ok_or_else(|| format!("invalid sort order: '{}'", s))
    }
}

/// Total ordering of values used for sorting.
///
/// Values of the same type compare naturally. NaN sorts after every other
/// number and absent values sort after everything. Values of different types
/// are ranked by type: text, numbers, dates, enums, then booleans.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => compare_numbers(*a, *b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Enum { discriminant: a, .. }, Value::Enum { discriminant: b, .. }) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn compare_numbers(a: Number, b: Number) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

fn rank(value: &Value<'_>) -> u8 {
    match value {
        Value::String(_) => 0,
        Value::Number(_) => 1,
        Value::Date(_) => 2,
        Value::Enum { .. } => 3,
        Value::Bool(_) => 4,
        Value::None => 5,
    }
}
