//! Row processing.
//!
//! [`GridProcessor`] applies the filters and sort orders resolved by a
//! grid's columns. Additional [`RowProcessor`]s run after it, `Pre`
//! processors first and `Post` processors (such as the
//! [`Pager`](crate::Pager)) last.

use std::cmp::Ordering;

use crate::column::Column;
use crate::grid::GridContext;
use crate::order::SortOrder;
use crate::rows::Rows;

/// When a [`RowProcessor`] runs relative to other processors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorType {
    /// Runs right after column filtering and sorting.
    Pre,
    /// Runs after every `Pre` processor.
    Post,
}

/// A step in the grid pipeline.
///
/// # Example
///
/// ```
/// use gridshape::{GridContext, ProcessorType, RowProcessor, Rows};
///
/// struct Evens;
///
/// impl RowProcessor<i32> for Evens {
///     fn processor_type(&self) -> ProcessorType {
///         ProcessorType::Pre
///     }
///
///     fn process<'a>(&self, rows: Rows<'a, i32>, _ctx: &GridContext<'_>) -> Rows<'a, i32> {
///         rows.retain(|n| n % 2 == 0)
///     }
/// }
/// ```
pub trait RowProcessor<T>: Send + Sync {
    fn processor_type(&self) -> ProcessorType;

    /// Transforms `rows`. Returning the input unchanged signals a no-op.
    fn process<'a>(&self, rows: Rows<'a, T>, ctx: &GridContext<'_>) -> Rows<'a, T>;
}

/// Applies column filters, then column sort orders.
#[derive(Debug)]
pub struct GridProcessor<'c, T> {
    columns: &'c [Column<T>],
}

impl<'c, T> GridProcessor<'c, T> {
    pub fn new(columns: &'c [Column<T>]) -> Self {
        GridProcessor { columns }
    }

    /// Filters and sorts `rows`.
    ///
    /// Every filterable column with a resolved filter narrows the rows in
    /// definition order. Sortable columns with a resolved order are then
    /// applied as successive stable passes in definition order, so the last
    /// active column is the primary key and earlier ones break ties. With no
    /// active filter or sort the input comes back unchanged.
    pub fn process<'a>(&self, rows: Rows<'a, T>, ctx: &GridContext<'_>) -> Rows<'a, T> {
        let rows = self.filter(rows, ctx);
        self.sort(rows, ctx)
    }

    fn filter<'a>(&self, mut rows: Rows<'a, T>, ctx: &GridContext<'_>) -> Rows<'a, T> {
        for column in self.columns {
            if column.is_filterable() == Some(false) {
                continue;
            }
            if let Some(filter) = column.filter(ctx) {
                let before = rows.len();
                rows = filter.process(rows);
                tracing::trace!(
                    grid = ctx.name(),
                    column = column.name(),
                    before,
                    after = rows.len(),
                    "filter pass"
                );
            }
        }
        rows
    }

    fn sort<'a>(&self, rows: Rows<'a, T>, ctx: &GridContext<'_>) -> Rows<'a, T> {
        let active: Vec<(&Column<T>, SortOrder)> = self
            .columns
            .iter()
            .filter(|column| column.is_sortable() != Some(false))
            .filter_map(|column| column.sort_order(ctx).map(|order| (column, order)))
            .collect();

        if active.is_empty() {
            return rows;
        }

        tracing::trace!(
            grid = ctx.name(),
            columns = active.len(),
            rows = rows.len(),
            "sort pass"
        );

        rows.sort_by(|a, b| {
            active
                .iter()
                .rev()
                .map(|(column, order)| order.compare(&column.sort_key(a), &column.sort_key(b)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or(Ordering::Equal)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FieldKind;
    use crate::query::GridQuery;
    use crate::registry::FilterRegistry;
    use crate::value::Value;

    #[derive(Debug, PartialEq)]
    struct Row {
        group: &'static str,
        rank: i32,
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::typed("Rank", |r: &Row| r.rank),
            Column::new("Group", FieldKind::Text, |r: &Row| Value::from(r.group)),
        ]
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { group: "b", rank: 2 },
            Row { group: "a", rank: 2 },
            Row { group: "b", rank: 1 },
            Row { group: "a", rank: 1 },
        ]
    }

    #[test]
    fn no_active_columns_returns_input() {
        let query = GridQuery::new();
        let registry = FilterRegistry::default();
        let ctx = GridContext::new("G", &query, &registry);

        let items = rows();
        let columns = columns();
        let result = GridProcessor::new(&columns).process(Rows::new(&items), &ctx);

        assert!(result.is_source_of(&items));
    }

    #[test]
    fn last_sorted_column_is_primary() {
        let query = GridQuery::new();
        let registry = FilterRegistry::default();
        let ctx = GridContext::new("G", &query, &registry);

        let mut columns = columns();
        columns[0].set_sort_order(Some(SortOrder::Desc));
        columns[1].set_sort_order(Some(SortOrder::Asc));

        let items = rows();
        let result = GridProcessor::new(&columns).process(Rows::new(&items), &ctx);
        let keys: Vec<_> = result.iter().map(|r| (r.group, r.rank)).collect();

        assert_eq!(keys, vec![("a", 2), ("a", 1), ("b", 2), ("b", 1)]);
    }

    #[test]
    fn unsortable_and_unfilterable_columns_are_skipped() {
        let query = GridQuery::parse("G-Sort=Rank&G-Order=Desc&G-Rank-Equals=1");
        let registry = FilterRegistry::default();
        let ctx = GridContext::new("G", &query, &registry);

        let columns = vec![Column::typed("Rank", |r: &Row| r.rank)
            .sortable(false)
            .filterable(false)];

        let items = rows();
        let result = GridProcessor::new(&columns).process(Rows::new(&items), &ctx);

        assert!(result.is_source_of(&items));
    }

    #[test]
    fn filters_combine_before_sorting() {
        let query = GridQuery::parse("G-Group-Equals=b&G-Rank-LessThan=3&G-Sort=Rank&G-Order=asc");
        let registry = FilterRegistry::default();
        let ctx = GridContext::new("G", &query, &registry);

        let items = rows();
        let columns = columns();
        let result = GridProcessor::new(&columns).process(Rows::new(&items), &ctx);

        assert_eq!(
            result.into_vec(),
            vec![&Row { group: "b", rank: 1 }, &Row { group: "b", rank: 2 }]
        );
    }
}
