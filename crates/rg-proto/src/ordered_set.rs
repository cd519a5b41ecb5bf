use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::collections::btree_set;

/// Deduplicating set that always enumerates in ascending order.
///
/// Used for source paths, visibility labels and resolved dependencies
/// (lexicographic) as well as [`Module`](crate::Module) records (name, then
/// filepath).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderedSet<T: Ord> {
    items: BTreeSet<T>,
}

impl<T: Ord> OrderedSet<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeSet::new(),
        }
    }

    /// Insert a value. Returns `false` if it was already present.
    pub fn insert(&mut self, value: T) -> bool {
        self.items.insert(value)
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.contains(value)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Ord + Clone> OrderedSet<T> {
    /// Snapshot of the elements in order
    pub fn values(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: Ord> Default for OrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Ord> Extend<T> for OrderedSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T: Ord> IntoIterator for OrderedSet<T> {
    type Item = T;
    type IntoIter = btree_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T: Ord> IntoIterator for &'a OrderedSet<T> {
    type Item = &'a T;
    type IntoIter = btree_set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
