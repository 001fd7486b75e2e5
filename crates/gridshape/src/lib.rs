//! Gridshape - Declarative sorting, filtering and cell rendering for typed
//! record grids.
//!
//! A grid is a list of [`Column`]s over records of some type `T`. Each column
//! names a field, says how to read it, and carries display settings. Given an
//! incoming [`GridQuery`] (the key/value pairs of a request), a grid:
//!
//! - resolves each column's sort order and filter from the query, once,
//! - filters the records, then sorts them, then runs extra processors such as
//!   the [`Pager`],
//! - renders every surviving cell as a formatted, HTML-escaped string.
//!
//! # Quick Start
//!
//! ```rust
//! use gridshape::{Column, FieldKind, Grid, GridQuery, SortOrder, Value};
//!
//! struct Task {
//!     title: String,
//!     priority: i32,
//!     done: bool,
//! }
//!
//! let tasks = vec![
//!     Task { title: "Write <docs>".into(), priority: 3, done: false },
//!     Task { title: "Fix bug".into(), priority: 5, done: false },
//!     Task { title: "Old task".into(), priority: 1, done: true },
//! ];
//!
//! let query = GridQuery::parse("Tasks-Done-Equals=false&Tasks-Sort=Priority&Tasks-Order=Desc");
//!
//! let grid = Grid::new("Tasks", query)
//!     .column(Column::new("Title", FieldKind::Text, |t: &Task| Value::from(&t.title)))
//!     .column(Column::typed("Priority", |t: &Task| t.priority))
//!     .column(Column::typed("Done", |t: &Task| t.done).initial_sort(SortOrder::Asc));
//!
//! let cells = grid.cells(&tasks).unwrap();
//! assert_eq!(cells[0], vec!["Fix bug", "5", "false"]);
//! assert_eq!(cells[1], vec!["Write &lt;docs&gt;", "3", "false"]);
//! ```
//!
//! # Query Keys
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `{grid}-Sort` | name of the column to sort by |
//! | `{grid}-Order` | `Asc` or `Desc`, any case |
//! | `{grid}-{column}-{operator}` | filter value for a column |
//! | `{grid}-Page` | 1-based page for the [`Pager`] |
//!
//! Unknown operators, filter values that do not parse and malformed orders
//! never fail: they simply do not filter or sort.
//!
//! # Filters
//!
//! | Filter name | Default for | Operators |
//! |-------------|-------------|-----------|
//! | `Text` | text and other kinds | `Equals`, `NotEquals`, `Contains`, `StartsWith`, `EndsWith` |
//! | `Number` | integer, float and decimal kinds | `Equals`, `NotEquals`, `LessThan`, `GreaterThan`, `LessThanOrEqual`, `GreaterThanOrEqual` |
//! | `Boolean` | `bool` | `Equals` |
//! | `Date` | dates and date-times | `Equals`, `NotEquals`, `EarlierThan`, `LaterThan`, `EarlierThanOrEqual`, `LaterThanOrEqual` |
//!
//! Enum columns have no default filter. Hosts add filters through
//! [`FilterRegistry`].

mod column;
mod config;
mod error;
mod filter;
pub mod format;
mod grid;
mod kind;
mod order;
mod pager;
mod processor;
mod query;
pub mod registry;
mod rows;
mod value;

// Re-export public API
pub use column::{value_fn, Column, ValueFn};
pub use config::{ColumnOptions, GridOptions};
pub use error::{GridError, OptionExt, Result};
pub use filter::{
    parse_date, BooleanFilter, ColumnFilter, CompareOp, DateFilter, Filter, NumberFilter,
    Predicate, TextFilter, TextOp,
};
pub use grid::{Grid, GridContext};
pub use kind::{FieldKind, FieldType};
pub use order::{compare_values, SortOrder};
pub use pager::Pager;
pub use processor::{GridProcessor, ProcessorType, RowProcessor};
pub use query::GridQuery;
pub use registry::{FilterFactory, FilterRegistry, ScopedRegistry};
pub use rows::Rows;
pub use value::{GridEnum, Number, Value};
