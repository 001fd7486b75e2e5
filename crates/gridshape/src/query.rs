//! Incoming grid query parameters.
//!
//! A [`GridQuery`] is a flat, ordered multimap of string keys to string
//! values, usually parsed from a URL query string. Grids read three key
//! shapes from it:
//!
//! ```text
//! {grid}-Sort=Name              column to sort by
//! {grid}-Order=Desc             direction for that column
//! {grid}-{column}-{op}=value    filter on a column
//! {grid}-Page=2                 current page (when paged)
//! ```

use url::form_urlencoded;

/// Ordered multimap of query keys to values.
///
/// Keys keep the position of their first occurrence; repeated keys append
/// their values to that entry. Only the first value of a key is
/// authoritative, the rest are kept for inspection.
///
/// # Example
///
/// ```
/// use gridshape::GridQuery;
///
/// let query = GridQuery::parse("Grid-Sort=Name&Grid-Name-Equals=a&Grid-Name-Equals=b");
///
/// assert_eq!(query.get("Grid-Sort"), Some("Name"));
/// assert_eq!(query.get("Grid-Name-Equals"), Some("a"));
/// assert_eq!(query.get_all("Grid-Name-Equals"), &["a", "b"]);
/// assert_eq!(query.get("Grid-Order"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridQuery {
    entries: Vec<(String, Vec<String>)>,
}

impl GridQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        GridQuery::default()
    }

    /// Parses an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored. Pairs without `=` get an empty value, and
    /// pairs with an empty key are dropped.
    pub fn parse(input: &str) -> Self {
        let input = input.strip_prefix('?').unwrap_or(input);
        form_urlencoded::parse(input.as_bytes())
            .filter(|(key, _)| !key.is_empty())
            .collect()
    }

    /// Appends a value to `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    /// Builder form of [`append`](Self::append).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Returns the authoritative (first) value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
    }

    /// Returns every value supplied for `key`.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// Iterates over keys and their first value, in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, values)| {
            (
                key.as_str(),
                values.first().map(String::as_str).unwrap_or_default(),
            )
        })
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the query has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for GridQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut query = GridQuery::new();
        for (key, value) in iter {
            query.append(key, value);
        }
        query
    }
}
