//! The record sequence flowing through grid processing.

use std::cmp::Ordering;

/// Records as seen by processors: either the untouched source slice or a
/// selection of references into it.
///
/// Processors that change nothing hand their input back unchanged, so a
/// no-op is observable with [`Rows::is_source_of`]. The source collection is
/// never mutated.
#[derive(Debug)]
pub enum Rows<'a, T> {
    /// The caller's collection, unchanged.
    Source(&'a [T]),
    /// A filtered and/or reordered view into the collection.
    View(Vec<&'a T>),
}

impl<'a, T> Rows<'a, T> {
    /// Wraps a source collection.
    pub fn new(items: &'a [T]) -> Self {
        Rows::Source(items)
    }

    /// Returns `true` if these rows are exactly `items`, untouched.
    pub fn is_source_of(&self, items: &[T]) -> bool {
        match self {
            Rows::Source(source) => std::ptr::eq(*source, items),
            Rows::View(_) => false,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Rows::Source(source) => source.len(),
            Rows::View(view) => view.len(),
        }
    }

    /// Returns `true` if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the rows in order.
    pub fn iter(&self) -> Iter<'a, '_, T> {
        match self {
            Rows::Source(source) => Iter::Source(source.iter()),
            Rows::View(view) => Iter::View(view.iter()),
        }
    }

    /// Collects the rows into a vector of references.
    pub fn into_vec(self) -> Vec<&'a T> {
        match self {
            Rows::Source(source) => source.iter().collect(),
            Rows::View(view) => view,
        }
    }

    /// Keeps the rows matching `predicate`, preserving order.
    pub fn retain<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&T) -> bool,
    {
        let mut view = self.into_vec();
        view.retain(|item| predicate(item));
        Rows::View(view)
    }

    /// Stable sort by `compare`.
    pub fn sort_by<C>(self, mut compare: C) -> Self
    where
        C: FnMut(&T, &T) -> Ordering,
    {
        let mut view = self.into_vec();
        view.sort_by(|a, b| compare(a, b));
        Rows::View(view)
    }

    /// Skips `skip` rows and keeps at most `take` of the rest.
    pub fn slice(self, skip: usize, take: usize) -> Self {
        Rows::View(self.into_vec().into_iter().skip(skip).take(take).collect())
    }
}

impl<'a, T> From<&'a [T]> for Rows<'a, T> {
    fn from(items: &'a [T]) -> Self {
        Rows::Source(items)
    }
}

impl<'a, T> From<&'a Vec<T>> for Rows<'a, T> {
    fn from(items: &'a Vec<T>) -> Self {
        Rows::Source(items.as_slice())
    }
}

/// Iterator over [`Rows`].
pub enum Iter<'a, 'r, T> {
    #[doc(hidden)]
    Source(std::slice::Iter<'a, T>),
    #[doc(hidden)]
    View(std::slice::Iter<'r, &'a T>),
}

impl<'a, T> Iterator for Iter<'a, '_, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Iter::Source(iter) => iter.next(),
            Iter::View(iter) => iter.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Iter::Source(iter) => iter.size_hint(),
            Iter::View(iter) => iter.size_hint(),
        }
    }
}

impl<'a, 'r, T> IntoIterator for &'r Rows<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, 'r, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_identity() {
        let items = vec![1, 2, 3];
        let other = vec![1, 2, 3];
        let rows = Rows::from(&items);

        assert!(rows.is_source_of(&items));
        assert!(!rows.is_source_of(&other));
    }

    #[test]
    fn retain_produces_view() {
        let items = vec![1, 2, 3, 4];
        let rows = Rows::new(&items).retain(|n| n % 2 == 0);

        assert!(!rows.is_source_of(&items));
        assert_eq!(rows.into_vec(), vec![&2, &4]);
        assert_eq!(items, vec![1, 2, 3, 4]);
    }

    #[test]
    fn sort_is_stable() {
        let items = vec![(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')];
        let rows = Rows::new(&items).sort_by(|a, b| a.0.cmp(&b.0));

        let letters: Vec<char> = rows.iter().map(|item| item.1).collect();
        assert_eq!(letters, vec!['b', 'd', 'a', 'c']);
    }

    #[test]
    fn slice_pages() {
        let items: Vec<u32> = (1..=5).collect();
        let rows = Rows::new(&items).slice(2, 2);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.into_vec(), vec![&3, &4]);
        assert!(Rows::new(&items).slice(10, 2).is_empty());
    }
}
