//! Grids: columns plus the query and registry they resolve against.

use std::fmt;
use std::sync::Arc;

use crate::column::Column;
use crate::config::GridOptions;
use crate::error::{GridError, Result};
use crate::pager::Pager;
use crate::processor::{GridProcessor, ProcessorType, RowProcessor};
use crate::query::GridQuery;
use crate::registry::{self, FilterRegistry};
use crate::rows::Rows;

/// What a column needs to resolve its sort order and filter.
#[derive(Debug, Clone, Copy)]
pub struct GridContext<'g> {
    name: &'g str,
    query: &'g GridQuery,
    registry: &'g FilterRegistry,
}

impl<'g> GridContext<'g> {
    pub fn new(name: &'g str, query: &'g GridQuery, registry: &'g FilterRegistry) -> Self {
        GridContext {
            name,
            query,
            registry,
        }
    }

    /// Grid name, the prefix of every query key.
    pub fn name(&self) -> &'g str {
        self.name
    }

    pub fn query(&self) -> &'g GridQuery {
        self.query
    }

    pub fn registry(&self) -> &'g FilterRegistry {
        self.registry
    }
}

/// A named set of columns over records of type `T`.
///
/// # Example
///
/// ```
/// use gridshape::{Column, FieldKind, Grid, GridQuery, Value};
///
/// struct Product {
///     name: &'static str,
///     price: f64,
/// }
///
/// let items = vec![
///     Product { name: "Apple", price: 1.2 },
///     Product { name: "Pear", price: 0.8 },
///     Product { name: "Plum", price: 2.5 },
/// ];
///
/// let query = GridQuery::parse(
///     "Products-Name-StartsWith=p&Products-Sort=Price&Products-Order=desc",
/// );
/// let grid = Grid::new("Products", query)
///     .column(Column::new("Name", FieldKind::Text, |p: &Product| Value::from(p.name)))
///     .column(Column::typed("Price", |p: &Product| p.price).format("{0:F2}"));
///
/// let cells = grid.cells(&items).unwrap();
/// assert_eq!(cells, vec![vec!["Plum", "2.50"], vec!["Pear", "0.80"]]);
/// ```
pub struct Grid<T> {
    name: String,
    query: GridQuery,
    registry: Arc<FilterRegistry>,
    columns: Vec<Column<T>>,
    processors: Vec<Box<dyn RowProcessor<T>>>,
    pager: Option<Pager>,
}

impl<T> Grid<T> {
    /// Creates a grid using the process-wide default registry.
    pub fn new(name: impl Into<String>, query: GridQuery) -> Self {
        Grid {
            name: name.into(),
            query,
            registry: registry::global(),
            columns: Vec::new(),
            processors: Vec::new(),
            pager: None,
        }
    }

    /// Uses `registry` instead of the process-wide default.
    pub fn with_registry(mut self, registry: impl Into<Arc<FilterRegistry>>) -> Self {
        self.registry = registry.into();
        self
    }

    /// Appends a column.
    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a processor to run after column processing.
    pub fn processor(mut self, processor: impl RowProcessor<T> + 'static) -> Self {
        self.processors.push(Box::new(processor));
        self
    }

    /// Pages the result, `rows_per_page` rows at a time.
    pub fn rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.pager = Some(Pager::new(rows_per_page));
        self
    }

    pub fn add_column(&mut self, column: Column<T>) {
        self.columns.push(column);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn query(&self) -> &GridQuery {
        &self.query
    }

    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn pager(&self) -> Option<&Pager> {
        self.pager.as_ref()
    }

    pub fn pager_mut(&mut self) -> Option<&mut Pager> {
        self.pager.as_mut()
    }

    /// Looks up a column by exact name.
    pub fn column_named(&self, name: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn column_named_mut(&mut self, name: &str) -> Option<&mut Column<T>> {
        self.columns.iter_mut().find(|c| c.name() == name)
    }

    /// Header texts in column order.
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(Column::header).collect()
    }

    pub fn context(&self) -> GridContext<'_> {
        GridContext::new(&self.name, &self.query, &self.registry)
    }

    /// Replaces the raw value of a column's active filter.
    ///
    /// Resolves the filter first if needed. Does nothing when the column has
    /// no filter.
    pub fn set_filter_value(&mut self, column: &str, value: impl Into<String>) -> Result<()> {
        let ctx = GridContext::new(&self.name, &self.query, &self.registry);
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name() == column)
            .ok_or_else(|| GridError::UnknownColumn(column.to_string()))?;
        column.set_filter_value(&ctx, value);
        Ok(())
    }

    /// Rebuilds the filter of `column` with another operator, keeping its
    /// value. Unknown operators leave the column unfiltered.
    pub fn set_filter_operator(&mut self, column: &str, operator: &str) -> Result<()> {
        let ctx = GridContext::new(&self.name, &self.query, &self.registry);
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.name() == column)
            .ok_or_else(|| GridError::UnknownColumn(column.to_string()))?;
        column.set_filter_operator(&ctx, operator);
        Ok(())
    }

    /// Applies options. Fails without changing anything if an option names
    /// a column the grid does not have.
    pub fn configure(&mut self, options: &GridOptions) -> Result<()> {
        if let Some(unknown) = options
            .columns
            .keys()
            .find(|name| self.column_named(name).is_none())
        {
            return Err(GridError::UnknownColumn(unknown.clone()));
        }

        if let Some(name) = &options.name {
            self.name = name.clone();
        }
        if let Some(rows_per_page) = options.rows_per_page {
            self.pager = Some(Pager::new(rows_per_page));
        }
        for (name, column_options) in &options.columns {
            if let Some(column) = self.column_named_mut(name) {
                column.configure(column_options);
            }
        }
        Ok(())
    }

    /// Runs column filters and sorts, then `Pre` processors, then `Post`
    /// processors, then the pager.
    ///
    /// `items` is never modified. When nothing applies the returned rows are
    /// `items` itself.
    pub fn process<'a>(&self, items: &'a [T]) -> Rows<'a, T> {
        let ctx = self.context();
        let mut rows = GridProcessor::new(&self.columns).process(Rows::new(items), &ctx);

        for stage in [ProcessorType::Pre, ProcessorType::Post] {
            for processor in self
                .processors
                .iter()
                .filter(|p| p.processor_type() == stage)
            {
                rows = processor.process(rows, &ctx);
            }
        }

        if let Some(pager) = &self.pager {
            rows = pager.process(rows, &ctx);
        }

        tracing::debug!(
            grid = %self.name,
            total = items.len(),
            shown = rows.len(),
            "processed grid"
        );
        rows
    }

    /// Display strings of the processed rows, one vector per row.
    pub fn cells(&self, items: &[T]) -> Result<Vec<Vec<String>>> {
        self.process(items)
            .iter()
            .map(|item| {
                self.columns
                    .iter()
                    .map(|column| column.value_for(item))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}

impl<T> fmt::Debug for Grid<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("name", &self.name)
            .field("query", &self.query)
            .field("columns", &self.columns)
            .field("processors", &self.processors.len())
            .field("pager", &self.pager)
            .finish_non_exhaustive()
    }
}
