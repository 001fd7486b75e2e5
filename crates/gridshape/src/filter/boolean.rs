use super::{Filter, Predicate};
use crate::value::Value;

/// Boolean equality filter.
///
/// The raw value must be `true` or `false` in any case, otherwise the filter
/// is inert. Absent values never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanFilter {
    value: String,
}

impl BooleanFilter {
    pub const OPERATOR: &'static str = "Equals";

    pub fn new(value: impl Into<String>) -> Self {
        BooleanFilter {
            value: value.into(),
        }
    }

    /// The parsed operand.
    pub fn operand(&self) -> Option<bool> {
        let value = self.value.trim();
        if value.eq_ignore_ascii_case("true") {
            Some(true)
        } else if value.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl Filter for BooleanFilter {
    fn operator(&self) -> &str {
        Self::OPERATOR
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }

    fn predicate(&self) -> Option<Predicate> {
        let expected = self.operand()?;
        Some(Box::new(move |field: &Value<'_>| {
            field.as_bool() == Some(expected)
        }))
    }
}
