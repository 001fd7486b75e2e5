//! Operator tokens for the built-in filter families.
//!
//! Tokens are the `{operator}` part of a `{grid}-{column}-{operator}` query
//! key, spelled as [`as_str`](CompareOp::as_str) returns them. Registry
//! lookups ignore ASCII case.

use std::cmp::Ordering;
use std::fmt;

/// Comparison operator used by number and date filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    /// Date alias of `LessThan`.
    EarlierThan,
    /// Date alias of `GreaterThan`.
    LaterThan,
    /// Date alias of `LessThanOrEqual`.
    EarlierThanOrEqual,
    /// Date alias of `GreaterThanOrEqual`.
    LaterThanOrEqual,
}

impl CompareOp {
    /// Operators offered by the number filter.
    pub const NUMBER: [CompareOp; 6] = [
        CompareOp::Equals,
        CompareOp::NotEquals,
        CompareOp::LessThan,
        CompareOp::GreaterThan,
        CompareOp::LessThanOrEqual,
        CompareOp::GreaterThanOrEqual,
    ];

    /// Operators offered by the date filter.
    pub const DATE: [CompareOp; 6] = [
        CompareOp::Equals,
        CompareOp::NotEquals,
        CompareOp::EarlierThan,
        CompareOp::LaterThan,
        CompareOp::EarlierThanOrEqual,
        CompareOp::LaterThanOrEqual,
    ];

    /// Normalizes date aliases to their canonical form.
    pub fn normalize(self) -> CompareOp {
        match self {
            CompareOp::EarlierThan => CompareOp::LessThan,
            CompareOp::LaterThan => CompareOp::GreaterThan,
            CompareOp::EarlierThanOrEqual => CompareOp::LessThanOrEqual,
            CompareOp::LaterThanOrEqual => CompareOp::GreaterThanOrEqual,
            other => other,
        }
    }

    /// Evaluates the operator given the ordering of field value to operand.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        match self.normalize() {
            CompareOp::Equals => ordering == Ordering::Equal,
            CompareOp::NotEquals => ordering != Ordering::Equal,
            CompareOp::GreaterThan => ordering == Ordering::Greater,
            CompareOp::GreaterThanOrEqual => ordering != Ordering::Less,
            CompareOp::LessThan => ordering == Ordering::Less,
            CompareOp::LessThanOrEqual => ordering != Ordering::Greater,
            _ => false,
        }
    }

    /// Whether an absent field value satisfies this operator.
    ///
    /// Only `NotEquals` holds for a missing value.
    pub fn matches_none(self) -> bool {
        self == CompareOp::NotEquals
    }

    /// Canonical token.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Equals => "Equals",
            CompareOp::NotEquals => "NotEquals",
            CompareOp::LessThan => "LessThan",
            CompareOp::GreaterThan => "GreaterThan",
            CompareOp::LessThanOrEqual => "LessThanOrEqual",
            CompareOp::GreaterThanOrEqual => "GreaterThanOrEqual",
            CompareOp::EarlierThan => "EarlierThan",
            CompareOp::LaterThan => "LaterThan",
            CompareOp::EarlierThanOrEqual => "EarlierThanOrEqual",
            CompareOp::LaterThanOrEqual => "LaterThanOrEqual",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator used by text filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextOp {
    Equals,
    NotEquals,
    Contains,
    StartsWith,
    EndsWith,
}

impl TextOp {
    /// Every operator, in declaration order.
    pub const ALL: [TextOp; 5] = [
        TextOp::Equals,
        TextOp::NotEquals,
        TextOp::Contains,
        TextOp::StartsWith,
        TextOp::EndsWith,
    ];

    /// Tests `field` against `operand`. Both are expected in the same case.
    pub fn eval(self, field: &str, operand: &str) -> bool {
        match self {
            TextOp::Equals => field == operand,
            TextOp::NotEquals => field != operand,
            TextOp::Contains => field.contains(operand),
            TextOp::StartsWith => field.starts_with(operand),
            TextOp::EndsWith => field.ends_with(operand),
        }
    }

    /// Canonical token.
    pub fn as_str(self) -> &'static str {
        match self {
            TextOp::Equals => "Equals",
            TextOp::NotEquals => "NotEquals",
            TextOp::Contains => "Contains",
            TextOp::StartsWith => "StartsWith",
            TextOp::EndsWith => "EndsWith",
        }
    }
}

impl fmt::Display for TextOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
