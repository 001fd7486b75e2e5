//! Serializable grid and column options.
//!
//! Options let a host keep column presentation in JSON or YAML next to the
//! code that declares accessors. Every field is optional; only fields that
//! are set override what the column or grid already has.
//!
//! ```
//! use gridshape::{GridOptions, SortOrder};
//!
//! let options: GridOptions = serde_json::from_str(r#"{
//!     "rows_per_page": 20,
//!     "columns": {
//!         "Total": { "format": "{0:N2}", "initial_sort_order": "desc" }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(options.rows_per_page, Some(20));
//! assert_eq!(options.columns["Total"].initial_sort_order, Some(SortOrder::Desc));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::order::SortOrder;

/// Overrides for one column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnOptions {
    /// Header text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filterable: Option<bool>,
    /// Order used when the query does not choose one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_sort_order: Option<SortOrder>,
    /// Display template, e.g. `"{0:F2}"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// HTML escaping of display values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoded: Option<bool>,
    /// Registry filter name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_name: Option<String>,
}

/// Overrides for a whole grid.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Grid name used as the query key prefix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Installs a pager when set. `0` disables paging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_per_page: Option<usize>,
    /// Column overrides keyed by column name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<String, ColumnOptions>,
}
