use super::{Filter, Predicate, TextOp};
use crate::value::Value;

/// Case-insensitive text filter.
///
/// Both sides are uppercased before comparing. An absent value never matches
/// `Equals`, `Contains`, `StartsWith` or `EndsWith`, and always matches
/// `NotEquals`. Non-text values are compared by their display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    op: TextOp,
    value: String,
}

impl TextFilter {
    pub fn new(op: TextOp, value: impl Into<String>) -> Self {
        TextFilter {
            op,
            value: value.into(),
        }
    }

    pub fn op(&self) -> TextOp {
        self.op
    }
}

impl Filter for TextFilter {
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
        let operand = self.value.to_uppercase();

        Some(Box::new(move |field: &Value<'_>| match field {
            Value::None => op == TextOp::NotEquals,
            Value::String(s) => op.eval(&s.to_uppercase(), &operand),
            other => op.eval(&other.to_string().to_uppercase(), &operand),
        }))
    }
}
