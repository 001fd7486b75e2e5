//! Grid column definitions.
//!
//! A [`Column`] describes one projected field of a record: how to read it,
//! how to show it, and whether it can be sorted or filtered. Its active sort
//! order and filter are resolved from the grid query on first access and
//! then frozen.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::ColumnOptions;
use crate::error::{GridError, Result};
use crate::filter::ColumnFilter;
use crate::format;
use crate::grid::GridContext;
use crate::kind::{FieldKind, FieldType};
use crate::order::SortOrder;
use crate::value::Value;

/// Shared, fallible value function over records of type `T`.
pub type ValueFn<T> = Arc<dyn for<'a> Fn(&'a T) -> Result<Value<'a>> + Send + Sync>;

/// Wraps a closure as a [`ValueFn`].
///
/// Closures passed here directly get their higher-ranked signature inferred,
/// so they may return values borrowed from the record.
pub fn value_fn<T, F>(f: F) -> ValueFn<T>
where
    F: for<'a> Fn(&'a T) -> Result<Value<'a>> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// One column of a grid over records of type `T`.
///
/// # Example
///
/// ```
/// use gridshape::{Column, FieldKind, GridContext, GridQuery, FilterRegistry, SortOrder, Value};
///
/// struct User {
///     name: String,
/// }
///
/// let column = Column::new("Name", FieldKind::Text, |u: &User| Value::from(&u.name))
///     .title("User name")
///     .initial_sort(SortOrder::Asc);
///
/// let query = GridQuery::parse("Users-Sort=Name&Users-Order=Desc");
/// let registry = FilterRegistry::default();
/// let ctx = GridContext::new("Users", &query, &registry);
///
/// assert_eq!(column.sort_order(&ctx), Some(SortOrder::Desc));
/// assert_eq!(column.value_for(&User { name: "<b>".into() }).unwrap(), "&lt;b&gt;");
/// ```
pub struct Column<T> {
    name: String,
    title: String,
    kind: FieldKind,
    expression_value: ValueFn<T>,
    render_value: Option<ValueFn<T>>,
    is_sortable: Option<bool>,
    is_filterable: Option<bool>,
    initial_sort_order: Option<SortOrder>,
    format: Option<String>,
    is_encoded: bool,
    filter_name: Option<String>,
    sort_order: OnceCell<Option<SortOrder>>,
    filter: OnceCell<Option<ColumnFilter<T>>>,
}

impl<T> Column<T> {
    fn with_parts(name: String, kind: FieldKind, expression_value: ValueFn<T>) -> Self {
        Column {
            title: name.clone(),
            name,
            kind,
            expression_value,
            render_value: None,
            is_sortable: None,
            is_filterable: None,
            initial_sort_order: None,
            format: None,
            is_encoded: true,
            filter_name: kind.default_filter_name().map(str::to_string),
            sort_order: OnceCell::new(),
            filter: OnceCell::new(),
        }
    }

    /// Creates a member-backed column.
    ///
    /// Sortable and filterable are left unset, which the grid treats as
    /// enabled. The default filter name follows `kind`.
    pub fn new<F>(name: impl Into<String>, kind: FieldKind, accessor: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Value<'a> + Send + Sync + 'static,
    {
        Column::with_parts(
            name.into(),
            kind,
            value_fn(move |item: &T| Ok(accessor(item))),
        )
    }

    /// Creates a member-backed column whose kind comes from the field type.
    ///
    /// ```
    /// use gridshape::{Column, FieldKind};
    ///
    /// struct Order {
    ///     total: Option<u32>,
    /// }
    ///
    /// let column = Column::typed("Total", |o: &Order| o.total);
    /// assert_eq!(column.kind(), FieldKind::U32);
    /// assert_eq!(column.filter_name(), Some("Number"));
    /// ```
    pub fn typed<V, F>(name: impl Into<String>, accessor: F) -> Self
    where
        V: FieldType + Into<Value<'static>>,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        Column::with_parts(
            name.into(),
            V::field_kind(),
            value_fn(move |item: &T| Ok(accessor(item).into())),
        )
    }

    /// Creates a column from a computed value that is not a plain member.
    ///
    /// Computed columns are neither sortable nor filterable unless enabled
    /// explicitly.
    pub fn computed<F>(name: impl Into<String>, compute: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Result<Value<'a>> + Send + Sync + 'static,
    {
        let mut column = Column::with_parts(name.into(), FieldKind::Other, value_fn(compute));
        column.is_sortable = Some(false);
        column.is_filterable = Some(false);
        column
    }

    // ========================================================================
    // Builders
    // ========================================================================

    /// Sets the header text.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enables or disables sorting.
    pub fn sortable(mut self, sortable: bool) -> Self {
        self.is_sortable = Some(sortable);
        self
    }

    /// Enables or disables filtering.
    pub fn filterable(mut self, filterable: bool) -> Self {
        self.is_filterable = Some(filterable);
        self
    }

    /// Sets the order used when the query does not choose one.
    pub fn initial_sort(mut self, order: SortOrder) -> Self {
        self.initial_sort_order = Some(order);
        self
    }

    /// Sets the display template, e.g. `"{0:F2} EUR"`.
    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }

    /// Turns HTML escaping of the display value on or off.
    pub fn encoded(mut self, encoded: bool) -> Self {
        self.is_encoded = encoded;
        self
    }

    /// Overrides the registry filter name.
    pub fn with_filter_name(mut self, name: impl Into<String>) -> Self {
        self.filter_name = Some(name.into());
        self
    }

    /// Overrides the value shown in cells. Sorting and filtering keep using
    /// the column accessor.
    pub fn render_with<F>(mut self, render: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Result<Value<'a>> + Send + Sync + 'static,
    {
        self.render_value = Some(value_fn(render));
        self
    }

    /// Replaces the column accessor.
    pub fn expression_with<F>(mut self, expression: F) -> Self
    where
        F: for<'a> Fn(&'a T) -> Result<Value<'a>> + Send + Sync + 'static,
    {
        self.expression_value = value_fn(expression);
        self
    }

    /// Applies every option that is set.
    pub fn configure(&mut self, options: &ColumnOptions) {
        if let Some(title) = &options.title {
            self.title = title.clone();
        }
        if let Some(sortable) = options.sortable {
            self.is_sortable = Some(sortable);
        }
        if let Some(filterable) = options.filterable {
            self.is_filterable = Some(filterable);
        }
        if let Some(order) = options.initial_sort_order {
            self.initial_sort_order = Some(order);
        }
        if let Some(template) = &options.format {
            self.format = Some(template.clone());
        }
        if let Some(encoded) = options.encoded {
            self.is_encoded = encoded;
        }
        if let Some(filter_name) = &options.filter_name {
            self.filter_name = Some(filter_name.clone());
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Stable name used in query keys.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header text.
    pub fn header(&self) -> &str {
        &self.title
    }

    /// Declared kind of the underlying field.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// `None` means not configured, which processing treats as sortable.
    pub fn is_sortable(&self) -> Option<bool> {
        self.is_sortable
    }

    /// `None` means not configured, which processing treats as filterable.
    pub fn is_filterable(&self) -> Option<bool> {
        self.is_filterable
    }

    pub fn initial_sort_order(&self) -> Option<SortOrder> {
        self.initial_sort_order
    }

    pub fn format_template(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn is_encoded(&self) -> bool {
        self.is_encoded
    }

    /// Registry filter name, `None` when the column has no default filter.
    pub fn filter_name(&self) -> Option<&str> {
        self.filter_name.as_deref()
    }

    pub(crate) fn accessor(&self) -> ValueFn<T> {
        Arc::clone(&self.expression_value)
    }

    /// Evaluates the column accessor.
    pub fn expression_value<'a>(&self, item: &'a T) -> Result<Value<'a>> {
        (self.expression_value)(item)
    }

    /// Value used as the sort key. Accessor failures sort as absent values.
    pub fn sort_key<'a>(&self, item: &'a T) -> Value<'a> {
        self.expression_value(item).unwrap_or(Value::None)
    }

    // ========================================================================
    // Sort order
    // ========================================================================

    /// Active sort order, resolved from the query on first call.
    ///
    /// When `{grid}-Sort` names this column and `{grid}-Order` holds `Asc` or
    /// `Desc` (any case), that order wins. In every other case the initial
    /// sort order applies. Later calls return the first result whatever
    /// query they are given.
    pub fn sort_order(&self, ctx: &GridContext<'_>) -> Option<SortOrder> {
        *self
            .sort_order
            .get_or_init(|| self.resolve_sort_order(ctx))
    }

    /// Sets the sort order, bypassing and freezing query resolution.
    pub fn set_sort_order(&mut self, order: Option<SortOrder>) {
        self.sort_order = OnceCell::with_value(order);
    }

    fn resolve_sort_order(&self, ctx: &GridContext<'_>) -> Option<SortOrder> {
        let sort_key = format!("{}-Sort", ctx.name());
        if ctx.query().get(&sort_key) != Some(self.name.as_str()) {
            return self.initial_sort_order;
        }

        let order_key = format!("{}-Order", ctx.name());
        let order = ctx
            .query()
            .get(&order_key)
            .and_then(SortOrder::parse)
            .or(self.initial_sort_order);

        tracing::debug!(
            grid = ctx.name(),
            column = %self.name,
            order = ?order,
            "resolved sort order"
        );
        order
    }

    // ========================================================================
    // Filter
    // ========================================================================

    /// Active filter, resolved from the query on first call.
    ///
    /// The first key of the form `{grid}-{column}-{operator}` in query order
    /// decides; the registry then builds the filter for that operator and the
    /// key's first value. Unknown operators resolve to no filter.
    pub fn filter(&self, ctx: &GridContext<'_>) -> Option<&ColumnFilter<T>> {
        self.filter
            .get_or_init(|| self.resolve_filter(ctx))
            .as_ref()
    }

    /// Mutable access to the active filter, resolving it first if needed.
    pub fn filter_mut(&mut self, ctx: &GridContext<'_>) -> Option<&mut ColumnFilter<T>> {
        if self.filter.get().is_none() {
            let resolved = self.resolve_filter(ctx);
            self.filter = OnceCell::with_value(resolved);
        }
        self.filter.get_mut().and_then(Option::as_mut)
    }

    /// Sets the filter, bypassing and freezing query resolution.
    pub fn set_filter(&mut self, filter: Option<ColumnFilter<T>>) {
        self.filter = OnceCell::with_value(filter);
    }

    /// Raw value of the active filter.
    pub fn filter_value(&self, ctx: &GridContext<'_>) -> Option<&str> {
        self.filter(ctx).map(ColumnFilter::value)
    }

    /// Replaces the raw value of the active filter. Does nothing without one.
    pub fn set_filter_value(&mut self, ctx: &GridContext<'_>, value: impl Into<String>) {
        if let Some(filter) = self.filter_mut(ctx) {
            filter.set_value(value);
        }
    }

    /// Operator token of the active filter.
    pub fn filter_operator(&self, ctx: &GridContext<'_>) -> Option<&str> {
        self.filter(ctx).map(ColumnFilter::operator)
    }

    /// Rebuilds the active filter with `operator`, keeping its raw value.
    ///
    /// The registry in `ctx` builds the new filter, which then stays fixed.
    /// An operator the registry does not know leaves the column without a
    /// filter.
    pub fn set_filter_operator(&mut self, ctx: &GridContext<'_>, operator: &str) {
        let value = self
            .filter_value(ctx)
            .map(str::to_string)
            .unwrap_or_default();
        let filter = ctx.registry().get_filter(self, operator, &value);
        tracing::debug!(
            grid = ctx.name(),
            column = %self.name,
            operator,
            resolved = filter.is_some(),
            "filter operator set"
        );
        self.set_filter(filter);
    }

    fn resolve_filter(&self, ctx: &GridContext<'_>) -> Option<ColumnFilter<T>> {
        let prefix = format!("{}-{}-", ctx.name(), self.name);
        let (key, value) = ctx.query().iter().find(|(key, _)| key.starts_with(&prefix))?;
        let operator = &key[prefix.len()..];

        let filter = ctx.registry().get_filter(self, operator, value);
        tracing::debug!(
            grid = ctx.name(),
            column = %self.name,
            operator,
            value,
            resolved = filter.is_some(),
            "resolved filter"
        );
        filter
    }

    // ========================================================================
    // Display
    // ========================================================================

    /// Display string for one cell.
    ///
    /// Uses the render override when set, the accessor otherwise. A
    /// [`GridError::MissingValue`] and an absent value both render as an
    /// empty string; any other error is returned. The format template is
    /// applied next, then HTML escaping when the column is encoded.
    pub fn value_for(&self, item: &T) -> Result<String> {
        let compute = self.render_value.as_ref().unwrap_or(&self.expression_value);
        let value = match compute(item) {
            Ok(value) => value,
            Err(GridError::MissingValue) => {
                tracing::debug!(column = %self.name, "missing value rendered as empty cell");
                return Ok(String::new());
            }
            Err(err) => return Err(err),
        };

        if value.is_none() {
            return Ok(String::new());
        }

        let text = match &self.format {
            Some(template) => format::apply(template, &value)?,
            None => value.to_string(),
        };

        Ok(if self.is_encoded {
            format::escape_html(&text)
        } else {
            text
        })
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("is_sortable", &self.is_sortable)
            .field("is_filterable", &self.is_filterable)
            .field("initial_sort_order", &self.initial_sort_order)
            .field("format", &self.format)
            .field("is_encoded", &self.is_encoded)
            .field("filter_name", &self.filter_name)
            .finish_non_exhaustive()
    }
}
