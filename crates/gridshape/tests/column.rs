//! Column resolution and value rendering.

use chrono::{NaiveDate, NaiveDateTime};
use gridshape::{
    Column, ColumnFilter, FieldKind, Filter, FilterRegistry, Grid, GridContext, GridError,
    GridEnum, GridQuery, OptionExt, Predicate, SortOrder, Value,
};

// ============================================================================
// Test helpers
// ============================================================================

#[derive(Debug, Default)]
struct GridModel {
    name: Option<String>,
    sum: i32,
}

fn name_column() -> Column<GridModel> {
    Column::new("Name", FieldKind::Text, |m: &GridModel| {
        Value::from(m.name.as_deref())
    })
}

fn named(name: &str) -> GridModel {
    GridModel {
        name: Some(name.to_string()),
        ..GridModel::default()
    }
}

/// Records the operator and value the registry was asked for.
#[derive(Debug)]
struct Recorder {
    operator: String,
    value: String,
}

impl Filter for Recorder {
    fn operator(&self) -> &str {
        &self.operator
    }

    fn value(&self) -> &str {
        &self.value
    }

    fn set_value(&mut self, value: String) {
        self.value = value;
    }

    fn predicate(&self) -> Option<Predicate> {
        None
    }
}

fn recording_registry(operators: &[&str]) -> FilterRegistry {
    let mut registry = FilterRegistry::new();
    for operator in operators {
        let token = operator.to_string();
        registry.register("Text", operator, move |_, value| {
            Box::new(Recorder {
                operator: token.clone(),
                value: value.to_string(),
            })
        });
    }
    registry
}

fn sort_order(query: &str, name: &str, initial: Option<SortOrder>) -> Option<SortOrder> {
    let query = GridQuery::parse(query);
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    let mut column = Column::new(name, FieldKind::Text, |m: &GridModel| {
        Value::from(m.name.as_deref())
    });
    if let Some(order) = initial {
        column = column.initial_sort(order);
    }
    column.sort_order(&ctx)
}

// ============================================================================
// Sort order
// ============================================================================

#[test]
fn sort_order_is_kept_after_it_is_set() {
    let query = GridQuery::parse("Grid-Sort=Name&Grid-Order=Asc");
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    let mut column = name_column();
    column.set_sort_order(None);

    assert_eq!(column.sort_order(&ctx), None);
}

#[test]
fn sort_order_from_query() {
    assert_eq!(
        sort_order("Grid-Sort=Name&Grid-Order=Asc", "Name", Some(SortOrder::Desc)),
        Some(SortOrder::Asc)
    );
    assert_eq!(
        sort_order("Grid-Sort=Name&Grid-Order=Desc", "Name", Some(SortOrder::Asc)),
        Some(SortOrder::Desc)
    );
    assert_eq!(
        sort_order("Grid-Sort=Name&Grid-Order=desc", "Name", None),
        Some(SortOrder::Desc)
    );
}

#[test]
fn sort_order_without_matching_sort_key_is_initial() {
    assert_eq!(
        sort_order("Grid-Order=Desc", "Name", Some(SortOrder::Asc)),
        Some(SortOrder::Asc)
    );
    assert_eq!(
        sort_order("Grid-Order=Desc", "", Some(SortOrder::Asc)),
        Some(SortOrder::Asc)
    );
    assert_eq!(
        sort_order("Gride-Sort=Name&Grid-Order=Asc", "Name", Some(SortOrder::Asc)),
        Some(SortOrder::Asc)
    );
    assert_eq!(
        sort_order("RGrid-Sort=Name&Grid-Order=Asc", "Name", Some(SortOrder::Desc)),
        Some(SortOrder::Desc)
    );
    assert_eq!(
        sort_order("Grid-Sort=name&Grid-Order=Asc", "Name", None),
        None
    );
}

#[test]
fn sort_order_with_empty_or_bad_order_is_initial() {
    assert_eq!(
        sort_order("Grid-Sort=Name&Grid-Order=", "Name", Some(SortOrder::Desc)),
        Some(SortOrder::Desc)
    );
    assert_eq!(
        sort_order("Grid-Sort=Name&Grid-Order=Up", "Name", Some(SortOrder::Asc)),
        Some(SortOrder::Asc)
    );
    assert_eq!(sort_order("Grid-Sort=Name", "Name", None), None);
}

#[test]
fn sort_order_does_not_change_after_first_read() {
    let cases = [
        ("Grid-Sort=Name&Grid-Order=", "Grid-Sort=Name&Grid-Order=Desc", None),
        (
            "Grid-Sort=Name&Grid-Order=Asc",
            "Grid-Sort=Name&Grid-Order=Desc",
            Some(SortOrder::Asc),
        ),
        (
            "Grid-Sort=Name&Grid-Order=Desc",
            "Grid-Sort=Name&Grid-Order=Asc",
            Some(SortOrder::Desc),
        ),
    ];
    let registry = FilterRegistry::default();

    for (initial, changed, expected) in cases {
        let column = name_column();

        let first = GridQuery::parse(initial);
        column.sort_order(&GridContext::new("Grid", &first, &registry));

        let second = GridQuery::parse(changed);
        assert_eq!(
            column.sort_order(&GridContext::new("Grid", &second, &registry)),
            expected,
            "{initial} then {changed}"
        );
    }
}

// ============================================================================
// Filter
// ============================================================================

#[test]
fn filter_is_kept_after_it_is_set() {
    let query = GridQuery::parse("Grid-Name-Equals=Test");
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    let mut column = name_column();
    column.set_filter(None);

    assert!(column.filter(&ctx).is_none());
}

#[test]
fn filter_from_first_matching_key() {
    let cases = [
        ("Grid-Name-=", "", ""),
        ("Grid-Name-Equals=", "Equals", ""),
        ("Grid-Name-Equals", "Equals", ""),
        ("Grid-Name-Equals=Test", "Equals", "Test"),
        ("Grid-Name-Equals=Test&Grid-Name-Equals=Value", "Equals", "Test"),
        ("Grid-Name-Equals=Test&Grid-Name-Contains=Value", "Equals", "Test"),
    ];
    let registry = recording_registry(&["", "Equals", "Contains"]);

    for (query, operator, value) in cases {
        let query = GridQuery::parse(query);
        let ctx = GridContext::new("Grid", &query, &registry);
        let column = name_column();

        let filter = column.filter(&ctx).expect("filter resolves");
        assert_eq!(filter.operator(), operator);
        assert_eq!(filter.value(), value);
    }
}

#[test]
fn filter_absent_without_matching_key() {
    let registry = recording_registry(&["", "Equals"]);

    for query in ["", "value", "=value", "Grid-Name=value", "RGrid-Name-Equals=value"] {
        let query = GridQuery::parse(query);
        let ctx = GridContext::new("Grid", &query, &registry);

        assert!(name_column().filter(&ctx).is_none());
    }
}

#[test]
fn filter_absent_for_unknown_operator() {
    let query = GridQuery::parse("Grid-Name-Resembles=x");
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    assert!(name_column().filter(&ctx).is_none());
}

#[test]
fn filter_does_not_change_after_first_read() {
    let registry = FilterRegistry::default();
    let column = name_column();

    let first = GridQuery::parse("Grid-Name-Equals=Test");
    let resolved = column
        .filter(&GridContext::new("Grid", &first, &registry))
        .map(ColumnFilter::value)
        .map(str::to_string);

    let second = GridQuery::parse("Grid-Name-Contains=Other");
    let again = column.filter(&GridContext::new("Grid", &second, &registry));

    assert_eq!(resolved.as_deref(), Some("Test"));
    assert_eq!(again.map(ColumnFilter::operator), Some("Equals"));
    assert_eq!(again.map(ColumnFilter::value), Some("Test"));
}

#[test]
fn filter_value_and_operator() {
    let query = GridQuery::parse("Grid-Name-StartsWith=Te");
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    let mut column = name_column();
    assert_eq!(column.filter_value(&ctx), Some("Te"));
    assert_eq!(column.filter_operator(&ctx), Some("StartsWith"));

    column.set_filter_value(&ctx, "T");
    assert_eq!(column.filter_value(&ctx), Some("T"));

    column.set_filter(None);
    assert_eq!(column.filter_value(&ctx), None);
    assert_eq!(column.filter_operator(&ctx), None);
}

#[test]
fn set_filter_operator_keeps_value() {
    let query = GridQuery::parse("Grid-Name-StartsWith=Te");
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    let mut column = name_column();
    column.set_filter_operator(&ctx, "EndsWith");
    assert_eq!(column.filter_operator(&ctx), Some("EndsWith"));
    assert_eq!(column.filter_value(&ctx), Some("Te"));

    // The rebuilt filter stays fixed against later queries.
    let other = GridQuery::parse("Grid-Name-Equals=x");
    let later = GridContext::new("Grid", &other, &registry);
    assert_eq!(column.filter_operator(&later), Some("EndsWith"));

    column.set_filter_operator(&ctx, "LessThan");
    assert_eq!(column.filter_operator(&ctx), None);
}

#[test]
fn set_filter_operator_without_filter_uses_empty_value() {
    let query = GridQuery::new();
    let registry = FilterRegistry::default();
    let ctx = GridContext::new("Grid", &query, &registry);

    let mut column = name_column();
    column.set_filter_operator(&ctx, "Contains");
    assert_eq!(column.filter_operator(&ctx), Some("Contains"));
    assert_eq!(column.filter_value(&ctx), Some(""));
}

#[test]
fn set_filter_operator_through_grid() {
    let items = vec![named("Test"), named("atest"), named("Tes")];
    let mut grid = Grid::new("Grid", GridQuery::parse("Grid-Name-StartsWith=test"))
        .with_registry(FilterRegistry::default())
        .column(name_column());

    grid.set_filter_operator("Name", "EndsWith").unwrap();
    let names: Vec<_> = grid
        .process(&items)
        .iter()
        .map(|m| m.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("Test"), Some("atest")]);

    assert_eq!(
        grid.set_filter_operator("Missing", "Equals"),
        Err(GridError::UnknownColumn("Missing".into()))
    );
}

// ============================================================================
// Construction
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Status {
    Open,
    Closed,
}

impl GridEnum for Status {
    fn discriminant(&self) -> u32 {
        *self as u32
    }

    fn label(&self) -> &'static str {
        match self {
            Status::Open => "Open",
            Status::Closed => "Closed",
        }
    }
}

struct AllTypes {
    i8_field: i8,
    u8_field: u8,
    i16_field: i16,
    u16_field: u16,
    i32_field: i32,
    u32_field: u32,
    i64_field: i64,
    u64_field: u64,
    f32_field: f32,
    f64_field: f64,
    bool_field: bool,
    date_field: NaiveDateTime,
    nullable_i32: Option<i32>,
    nullable_f64: Option<f64>,
    nullable_bool: Option<bool>,
    nullable_date: Option<NaiveDate>,
    status: Status,
    text: String,
}

#[test]
fn default_filter_names_follow_field_type() {
    let number = Some("Number");
    assert_eq!(Column::typed("a", |m: &AllTypes| m.i8_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.u8_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.i16_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.u16_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.i32_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.u32_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.i64_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.u64_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.f32_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.f64_field).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.nullable_i32).filter_name(), number);
    assert_eq!(Column::typed("a", |m: &AllTypes| m.nullable_f64).filter_name(), number);

    assert_eq!(
        Column::typed("a", |m: &AllTypes| m.bool_field).filter_name(),
        Some("Boolean")
    );
    assert_eq!(
        Column::typed("a", |m: &AllTypes| m.nullable_bool).filter_name(),
        Some("Boolean")
    );
    assert_eq!(
        Column::typed("a", |m: &AllTypes| m.date_field).filter_name(),
        Some("Date")
    );
    assert_eq!(
        Column::typed("a", |m: &AllTypes| m.nullable_date).filter_name(),
        Some("Date")
    );

    assert_eq!(
        Column::typed("a", |m: &AllTypes| m.text.clone()).filter_name(),
        Some("Text")
    );
    assert_eq!(
        Column::new("a", FieldKind::Decimal, |_: &AllTypes| Value::None).filter_name(),
        number
    );

    let status = Column::new("a", FieldKind::Enum, |m: &AllTypes| Value::enumeration(&m.status));
    assert_eq!(status.filter_name(), None);
}

#[test]
fn member_columns_leave_flags_unset() {
    let column = Column::typed("Sum", |m: &GridModel| m.sum);
    assert_eq!(column.is_sortable(), None);
    assert_eq!(column.is_filterable(), None);
    assert!(column.is_encoded());
}

#[test]
fn computed_columns_are_not_sortable_or_filterable() {
    let column = Column::computed("Debug", |m: &GridModel| Ok(Value::from(format!("{m:?}"))));
    assert_eq!(column.is_sortable(), Some(false));
    assert_eq!(column.is_filterable(), Some(false));
}

#[test]
fn expression_value_reads_member() {
    let column = name_column();
    assert_eq!(
        column.expression_value(&named("TestName")),
        Ok(Value::from("TestName"))
    );
}

// ============================================================================
// Value rendering
// ============================================================================

#[test]
fn value_for_uses_expression_value() {
    let column = name_column().expression_with(|_: &GridModel| Ok(Value::from("TestValue")));
    assert_eq!(column.value_for(&GridModel::default()).unwrap(), "TestValue");
}

#[test]
fn value_for_prefers_render_value() {
    let column = name_column()
        .expression_with(|_: &GridModel| Ok(Value::from("ExpressionValue")))
        .render_with(|_: &GridModel| Ok(Value::from("RenderValue")));
    assert_eq!(column.value_for(&GridModel::default()).unwrap(), "RenderValue");
}

#[test]
fn value_for_renders_missing_values_empty() {
    let expression = name_column().expression_with(|m: &GridModel| {
        let name = m.name.as_ref().or_missing()?;
        Ok(Value::from(name.len()))
    });
    assert_eq!(expression.value_for(&GridModel::default()).unwrap(), "");

    let render = name_column().render_with(|m: &GridModel| {
        let name = m.name.as_ref().or_missing()?;
        Ok(Value::from(name.len().to_string()))
    });
    assert_eq!(render.value_for(&GridModel::default()).unwrap(), "");
}

#[test]
fn value_for_propagates_other_errors() {
    let expression = name_column().expression_with(|_: &GridModel| {
        let n: i32 = "Zero".parse()?;
        Ok(Value::from(n))
    });
    assert!(matches!(
        expression.value_for(&GridModel::default()),
        Err(GridError::Parse(_))
    ));

    let render = name_column().render_with(|_: &GridModel| {
        let n: i32 = "Zero".parse()?;
        Ok(Value::from(n.to_string()))
    });
    assert!(matches!(
        render.value_for(&GridModel::default()),
        Err(GridError::Parse(_))
    ));
}

#[test]
fn value_for_formats_and_encodes() {
    let cases = [
        (None, Some("For {0}"), true, ""),
        (None, Some("For {0}"), false, ""),
        (Some("<name>"), None, false, "<name>"),
        (Some("<name>"), None, true, "&lt;name&gt;"),
        (Some("<name>"), Some("For <{0}>"), false, "For <<name>>"),
        (Some("<name>"), Some("For <{0}>"), true, "For &lt;&lt;name&gt;&gt;"),
    ];

    for (name, format, encoded, expected) in cases {
        let model = GridModel {
            name: name.map(str::to_string),
            sum: 0,
        };

        let mut column = name_column().encoded(encoded);
        if let Some(format) = format {
            column = column.format(format);
        }
        assert_eq!(column.value_for(&model).unwrap(), expected, "expression value");

        let mut render = name_column()
            .render_with(|m: &GridModel| Ok(Value::from(m.name.as_deref())))
            .encoded(encoded);
        if let Some(format) = format {
            render = render.format(format);
        }
        assert_eq!(render.value_for(&model).unwrap(), expected, "render value");
    }
}

#[test]
fn value_for_reports_malformed_format() {
    let column = name_column().format("For {0");
    assert!(matches!(
        column.value_for(&named("x")),
        Err(GridError::InvalidFormat { .. })
    ));

    // Absent values skip formatting entirely.
    assert_eq!(column.value_for(&GridModel::default()).unwrap(), "");
}

#[test]
fn value_for_other_kinds() {
    struct Row {
        price: f64,
        when: NaiveDate,
        status: Status,
        active: bool,
    }
    let row = Row {
        price: 1234.5,
        when: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
        status: Status::Closed,
        active: true,
    };

    let price = Column::typed("Price", |r: &Row| r.price).format("{0:N2} EUR");
    assert_eq!(price.value_for(&row).unwrap(), "1,234.50 EUR");

    let when = Column::typed("When", |r: &Row| r.when).format("{0:%d/%m/%Y}");
    assert_eq!(when.value_for(&row).unwrap(), "29/02/2024");

    let status = Column::new("Status", FieldKind::Enum, |r: &Row| Value::enumeration(&r.status));
    assert_eq!(status.value_for(&row).unwrap(), "Closed");

    let active = Column::typed("Active", |r: &Row| r.active);
    assert_eq!(active.value_for(&row).unwrap(), "true");
}
