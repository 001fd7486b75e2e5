//! Filter registry.
//!
//! [`FilterRegistry`] maps a filter name (`"Text"`, `"Number"`, `"Boolean"`,
//! `"Date"` or any host-defined name) and an operator token to a factory that
//! builds a [`Filter`]. Both lookups ignore ASCII case.
//!
//! Grids read filters from the registry carried by their
//! [`GridContext`](crate::GridContext). New grids start from the process-wide
//! default returned by [`global`], which can be swapped with
//! [`replace_global`] or for the lifetime of a guard with [`scoped`].
//!
//! # Example
//!
//! ```
//! use gridshape::{FilterRegistry, TextFilter, TextOp};
//!
//! let mut registry = FilterRegistry::default();
//! registry.register("Code", "Is", |_, value| {
//!     Box::new(TextFilter::new(TextOp::Equals, value))
//! });
//!
//! assert!(registry.contains("code", "IS"));
//! assert!(registry.contains("Number", "LessThan"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::column::Column;
use crate::filter::{
    BooleanFilter, ColumnFilter, CompareOp, DateFilter, Filter, NumberFilter, TextFilter, TextOp,
};
use crate::kind::{self, FieldKind};

/// Builds a filter for a column kind and raw query value.
pub type FilterFactory = Arc<dyn Fn(FieldKind, &str) -> Box<dyn Filter> + Send + Sync>;

#[derive(Clone)]
struct FilterEntry {
    name: String,
    operators: Vec<(String, FilterFactory)>,
}

impl FilterEntry {
    fn position(&self, operator: &str) -> Option<usize> {
        self.operators
            .iter()
            .position(|(token, _)| token.eq_ignore_ascii_case(operator))
    }
}

/// Registry of filter factories keyed by filter name and operator.
#[derive(Clone)]
pub struct FilterRegistry {
    entries: HashMap<String, FilterEntry>,
}

impl FilterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        FilterRegistry {
            entries: HashMap::new(),
        }
    }

    /// Registers a factory, replacing any factory under the same pair.
    pub fn register<F>(&mut self, filter_name: &str, operator: &str, factory: F) -> &mut Self
    where
        F: Fn(FieldKind, &str) -> Box<dyn Filter> + Send + Sync + 'static,
    {
        let entry = self
            .entries
            .entry(filter_name.to_ascii_lowercase())
            .or_insert_with(|| FilterEntry {
                name: filter_name.to_string(),
                operators: Vec::new(),
            });

        let factory: FilterFactory = Arc::new(factory);
        match entry.position(operator) {
            Some(index) => entry.operators[index] = (operator.to_string(), factory),
            None => entry.operators.push((operator.to_string(), factory)),
        }
        self
    }

    /// Removes one operator. Returns whether it was registered.
    pub fn remove(&mut self, filter_name: &str, operator: &str) -> bool {
        let key = filter_name.to_ascii_lowercase();
        let Some(entry) = self.entries.get_mut(&key) else {
            return false;
        };
        let Some(index) = entry.position(operator) else {
            return false;
        };

        entry.operators.remove(index);
        if entry.operators.is_empty() {
            self.entries.remove(&key);
        }
        true
    }

    /// Whether the pair is registered.
    pub fn contains(&self, filter_name: &str, operator: &str) -> bool {
        self.factory(filter_name, operator).is_some()
    }

    /// Operators registered under a filter name, in registration order.
    pub fn operators(&self, filter_name: &str) -> Vec<&str> {
        self.entries
            .get(&filter_name.to_ascii_lowercase())
            .map(|entry| entry.operators.iter().map(|(op, _)| op.as_str()).collect())
            .unwrap_or_default()
    }

    /// Registered filter names, sorted.
    pub fn filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.values().map(|e| e.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn factory(&self, filter_name: &str, operator: &str) -> Option<&FilterFactory> {
        let entry = self.entries.get(&filter_name.to_ascii_lowercase())?;
        entry.position(operator).map(|index| &entry.operators[index].1)
    }

    /// Builds the filter for `column`.
    ///
    /// Returns `None` when the column is explicitly not filterable, has no
    /// filter name, or the pair is not registered.
    pub fn get_filter<T>(
        &self,
        column: &Column<T>,
        operator: &str,
        value: &str,
    ) -> Option<ColumnFilter<T>> {
        if column.is_filterable() == Some(false) {
            return None;
        }
        let filter_name = column.filter_name()?;

        let Some(factory) = self.factory(filter_name, operator) else {
            tracing::debug!(
                column = column.name(),
                filter = filter_name,
                operator,
                "no filter registered for operator"
            );
            return None;
        };

        Some(ColumnFilter::new(
            column.accessor(),
            factory(column.kind(), value),
        ))
    }
}

impl Default for FilterRegistry {
    /// Registry with the built-in text, number, boolean and date filters.
    fn default() -> Self {
        let mut registry = FilterRegistry::new();

        for op in TextOp::ALL {
            registry.register(kind::TEXT, op.as_str(), move |_, value| {
                Box::new(TextFilter::new(op, value))
            });
        }
        for op in CompareOp::NUMBER {
            registry.register(kind::NUMBER, op.as_str(), move |kind, value| {
                Box::new(NumberFilter::new(op, kind, value))
            });
        }
        registry.register(kind::BOOLEAN, BooleanFilter::OPERATOR, |_, value| {
            Box::new(BooleanFilter::new(value))
        });
        for op in CompareOp::DATE {
            registry.register(kind::DATE, op.as_str(), move |_, value| {
                Box::new(DateFilter::new(op, value))
            });
        }

        registry
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.filter_names() {
            map.entry(&name, &self.operators(name));
        }
        map.finish()
    }
}

// ============================================================================
// Process-wide default
// ============================================================================

static GLOBAL: Lazy<RwLock<Arc<FilterRegistry>>> =
    Lazy::new(|| RwLock::new(Arc::new(FilterRegistry::default())));

/// The process-wide default registry.
pub fn global() -> Arc<FilterRegistry> {
    let guard = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

/// Replaces the process-wide default registry and returns the previous one.
///
/// Grids created before the call keep the registry they started with.
pub fn replace_global(registry: impl Into<Arc<FilterRegistry>>) -> Arc<FilterRegistry> {
    let mut guard = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *guard, registry.into())
}

/// Installs `registry` as the process-wide default until the guard drops.
///
/// ```
/// use gridshape::registry::{self, FilterRegistry};
///
/// {
///     let _guard = registry::scoped(FilterRegistry::new());
///     assert!(!registry::global().contains("Text", "Equals"));
/// }
/// ```
pub fn scoped(registry: impl Into<Arc<FilterRegistry>>) -> ScopedRegistry {
    ScopedRegistry {
        previous: Some(replace_global(registry)),
    }
}

/// Restores the previous process-wide registry on drop.
#[must_use = "the previous registry is restored as soon as the guard drops"]
#[derive(Debug)]
pub struct ScopedRegistry {
    previous: Option<Arc<FilterRegistry>>,
}

impl Drop for ScopedRegistry {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            replace_global(previous);
        }
    }
}
