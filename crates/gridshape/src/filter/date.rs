use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use super::{CompareOp, Filter, Predicate};
use crate::value::Value;

const DATE_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

/// Parses filter text as a date.
///
/// Accepts RFC 3339 (converted to UTC), `YYYY-MM-DD` with an optional
/// `HH:MM[:SS[.f]]` time separated by a space or `T`, and `MM/DD/YYYY`.
/// Dates without a time mean midnight.
///
/// ```
/// use gridshape::parse_date;
///
/// assert!(parse_date("2024-03-10").is_some());
/// assert!(parse_date("2024-03-10 14:30").is_some());
/// assert!(parse_date("yesterday").is_none());
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// Date comparison filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    op: CompareOp,
    value: String,
}

impl DateFilter {
    pub fn new(op: CompareOp, value: impl Into<String>) -> Self {
        DateFilter {
            op,
            value: value.into(),
        }
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The parsed operand.
    pub fn operand(&self) -> Option<NaiveDateTime> {
        parse_date(&self.value)
    }
}

impl Filter for DateFilter {
    fn operator(&self) -> &str {
        self.op.as_str()
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }

    fn predicate(&self) -> Option<Predicate> {
        let op = self.op;
        let operand = self.operand()?;

        Some(Box::new(move |field: &Value<'_>| match field {
            Value::Date(date) => op.eval_ordering(date.cmp(&operand)),
            Value::None => op.matches_none(),
            _ => false,
        }))
    }
}
