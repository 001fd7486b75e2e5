use super::{CompareOp, Filter, Predicate};
use crate::kind::FieldKind;
use crate::value::{Number, Value};

/// Numeric comparison filter.
///
/// The raw value is parsed for the column's [`FieldKind`] (see
/// [`Number::parse_as`]). When it does not parse the filter is inert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFilter {
    op: CompareOp,
    kind: FieldKind,
    value: String,
}

impl NumberFilter {
    pub fn new(op: CompareOp, kind: FieldKind, value: impl Into<String>) -> Self {
        NumberFilter {
            op,
            kind,
            value: value.into(),
        }
    }

    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The parsed operand, if the raw value is valid for the column kind.
    pub fn operand(&self) -> Option<Number> {
        Number::parse_as(self.kind, &self.value)
    }
}

impl Filter for NumberFilter {
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
            Value::Number(n) => n
                .compare(operand)
                .is_some_and(|ordering| op.eval_ordering(ordering)),
            Value::None => op.matches_none(),
            _ => false,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(op: CompareOp, kind: FieldKind, value: &str, field: Value<'_>) -> bool {
        let predicate = NumberFilter::new(op, kind, value).predicate().unwrap();
        predicate(&field)
    }

    #[test]
    fn comparisons() {
        assert!(matches(CompareOp::Equals, FieldKind::I32, "5", Value::from(5i32)));
        assert!(matches(CompareOp::LessThan, FieldKind::I32, "5", Value::from(4i32)));
        assert!(!matches(CompareOp::LessThan, FieldKind::I32, "5", Value::from(5i32)));
        assert!(matches(CompareOp::GreaterThanOrEqual, FieldKind::F64, "2.5", Value::from(2.5f64)));
        assert!(matches(CompareOp::NotEquals, FieldKind::U8, "1", Value::from(2u8)));
    }

    #[test]
    fn none_only_matches_not_equals() {
        assert!(!matches(CompareOp::Equals, FieldKind::I32, "5", Value::None));
        assert!(!matches(CompareOp::LessThan, FieldKind::I32, "5", Value::None));
        assert!(matches(CompareOp::NotEquals, FieldKind::I32, "5", Value::None));
    }

    #[test]
    fn unparseable_value_is_inert() {
        assert!(NumberFilter::new(CompareOp::Equals, FieldKind::I32, "five").predicate().is_none());
        assert!(NumberFilter::new(CompareOp::Equals, FieldKind::U8, "256").predicate().is_none());
        assert!(NumberFilter::new(CompareOp::Equals, FieldKind::I16, "1.5").predicate().is_none());
        assert!(NumberFilter::new(CompareOp::Equals, FieldKind::I16, "").predicate().is_none());
    }

    #[test]
    fn mixed_representations_compare() {
        assert!(matches(CompareOp::Equals, FieldKind::F32, "3", Value::from(3i64)));
        assert!(matches(CompareOp::GreaterThan, FieldKind::I64, "-1", Value::from(0u64)));
    }
}
