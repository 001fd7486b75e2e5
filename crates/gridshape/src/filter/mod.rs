//! Column filters.
//!
//! A [`Filter`] holds an operator token and the raw text supplied by the
//! query, and knows how to turn that text into a predicate over a [`Value`].
//! A [`ColumnFilter`] binds a filter to the accessor of the column it was
//! resolved for and applies it to [`Rows`].
//!
//! Filters never fail. Text that does not parse for the column's kind
//! produces no predicate, and the filter passes its rows through untouched.
//!
//! | Family | Operators |
//! |--------|-----------|
//! | [`TextFilter`] | `Equals`, `NotEquals`, `Contains`, `StartsWith`, `EndsWith` |
//! | [`NumberFilter`] | `Equals`, `NotEquals`, `LessThan`, `GreaterThan`, `LessThanOrEqual`, `GreaterThanOrEqual` |
//! | [`BooleanFilter`] | `Equals` |
//! | [`DateFilter`] | `Equals`, `NotEquals`, `EarlierThan`, `LaterThan`, `EarlierThanOrEqual`, `LaterThanOrEqual` |

mod boolean;
mod date;
mod number;
mod op;
mod text;

use std::fmt;

pub use boolean::BooleanFilter;
pub use date::{parse_date, DateFilter};
pub use number::NumberFilter;
pub use op::{CompareOp, TextOp};
pub use text::TextFilter;

use crate::column::ValueFn;
use crate::rows::Rows;
use crate::value::Value;

/// Predicate over a single field value.
pub type Predicate = Box<dyn Fn(&Value<'_>) -> bool + Send + Sync>;

/// A filter over one field, independent of the record type.
///
/// Implement this to add filter kinds to a
/// [`FilterRegistry`](crate::FilterRegistry).
///
/// # Example
///
/// ```
/// use gridshape::{Filter, Predicate, Value};
///
/// #[derive(Debug)]
/// struct NonEmpty {
///     value: String,
/// }
///
/// impl Filter for NonEmpty {
///     fn operator(&self) -> &str {
///         "NonEmpty"
///     }
///
///     fn value(&self) -> &str {
///         &self.value
///     }
///
///     fn set_value(&mut self, value: String) {
///         self.value = value;
///     }
///
///     fn predicate(&self) -> Option<Predicate> {
///         Some(Box::new(|v: &Value<'_>| !v.to_string().is_empty()))
///     }
/// }
/// ```
pub trait Filter: fmt::Debug + Send + Sync {
    /// Operator token this filter was registered under.
    fn operator(&self) -> &str;

    /// Raw value from the query.
    fn value(&self) -> &str;

    /// Replaces the raw value.
    fn set_value(&mut self, value: String);

    /// Builds the predicate for the current raw value.
    ///
    /// Returns `None` when the value cannot be interpreted, which makes the
    /// filter inert.
    fn predicate(&self) -> Option<Predicate>;
}

/// A filter bound to the accessor of one column.
pub struct ColumnFilter<T> {
    accessor: ValueFn<T>,
    filter: Box<dyn Filter>,
}

impl<T> ColumnFilter<T> {
    /// Binds `filter` to `accessor`.
    pub fn new(accessor: ValueFn<T>, filter: Box<dyn Filter>) -> Self {
        ColumnFilter { accessor, filter }
    }

    /// Operator token of the underlying filter.
    pub fn operator(&self) -> &str {
        self.filter.operator()
    }

    /// Raw value of the underlying filter.
    pub fn value(&self) -> &str {
        self.filter.value()
    }

    /// Replaces the raw value of the underlying filter.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.filter.set_value(value.into());
    }

    /// The underlying filter.
    pub fn inner(&self) -> &dyn Filter {
        self.filter.as_ref()
    }

    /// Applies the filter to `rows`.
    ///
    /// An inert filter returns `rows` unchanged. Records whose accessor fails
    /// are tested as [`Value::None`].
    pub fn process<'a>(&self, rows: Rows<'a, T>) -> Rows<'a, T> {
        let Some(predicate) = self.filter.predicate() else {
            tracing::debug!(
                operator = self.filter.operator(),
                value = self.filter.value(),
                "filter value not usable, passing rows through"
            );
            return rows;
        };

        rows.retain(|item| match (self.accessor)(item) {
            Ok(value) => predicate(&value),
            Err(_) => predicate(&Value::None),
        })
    }
}

impl<T> fmt::Debug for ColumnFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnFilter")
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}
