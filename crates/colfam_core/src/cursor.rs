//! Read cursors over a [`SortedColumns`].
//!
//! - [`Iter`] walks every column in one direction
//! - [`SlicesIter`] walks only the columns inside an ordered list of
//!   [`ColumnSlice`]s, resolving each slice lazily by binary search
//! - [`SortedView`] is a direction-fixed view, independent of storage order

use crate::column::Column;
use crate::columns::SortedColumns;
use crate::comparator::ColumnComparator;
use crate::slice::{directed, ColumnSlice};
use std::cmp::Ordering;
use std::iter::FusedIterator;
use std::ops::Range;

/// Iterator over all columns in one direction.
#[derive(Debug, Clone)]
pub struct Iter<'a, C> {
    inner: std::slice::Iter<'a, C>,
    /// Walk storage from the back.
    backward: bool,
}

impl<'a, C> Iter<'a, C> {
    pub(crate) fn new(columns: &'a [C], backward: bool) -> Self {
        Self {
            inner: columns.iter(),
            backward,
        }
    }
}

impl<'a, C> Iterator for Iter<'a, C> {
    type Item = &'a C;

    fn next(&mut self) -> Option<Self::Item> {
        if self.backward {
            self.inner.next_back()
        } else {
            self.inner.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<C> DoubleEndedIterator for Iter<'_, C> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.backward {
            self.inner.next()
        } else {
            self.inner.next_back()
        }
    }
}

impl<C> ExactSizeIterator for Iter<'_, C> {}

impl<C> FusedIterator for Iter<'_, C> {}

/// Iterator over the columns inside an ordered list of slices.
///
/// Each slice is resolved to a range of positions only when the previous
/// one is used up, so memory stays flat however many slices are given.
/// A slice that matches nothing contributes nothing.
pub struct SlicesIter<'a, C> {
    columns: &'a [C],
    comparator: &'a dyn ColumnComparator,
    slices: &'a [ColumnSlice],
    /// Traversal runs against storage order.
    backward: bool,
    /// Traversal is descending by name.
    descending: bool,
    next_slice: usize,
    /// Remaining positions of the current slice, in traversal order.
    current: Range<usize>,
}

impl<'a, C: Column> SlicesIter<'a, C> {
    pub(crate) fn new(
        columns: &'a SortedColumns<C>,
        slices: &'a [ColumnSlice],
        descending: bool,
    ) -> Self {
        Self {
            columns: &columns.columns,
            comparator: columns.comparator().as_ref(),
            slices,
            backward: descending != columns.is_reversed(),
            descending,
            next_slice: 0,
            current: 0..0,
        }
    }

    fn at(&self, position: usize) -> &'a C {
        let columns = self.columns;
        if self.backward {
            &columns[columns.len() - 1 - position]
        } else {
            &columns[position]
        }
    }

    /// First position whose column does not satisfy `before`.
    fn partition_point(&self, before: impl Fn(Ordering) -> bool, key: &[u8]) -> usize {
        let (mut lo, mut hi) = (0, self.columns.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let ord = directed(self.comparator, self.at(mid).name(), key, self.descending);
            if before(ord) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    fn resolve(&self, slice: &ColumnSlice) -> Range<usize> {
        let start = slice
            .start_bound()
            .map_or(0, |key| self.partition_point(|ord| ord == Ordering::Less, key));
        let end = slice.finish_bound().map_or(self.columns.len(), |key| {
            self.partition_point(|ord| ord != Ordering::Greater, key)
        });
        start..end
    }
}

impl<'a, C: Column> Iterator for SlicesIter<'a, C> {
    type Item = &'a C;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(position) = self.current.next() {
                return Some(self.at(position));
            }
            let slices = self.slices;
            let slice = slices.get(self.next_slice)?;
            self.next_slice += 1;
            self.current = self.resolve(slice);
        }
    }
}

impl<C: Column> FusedIterator for SlicesIter<'_, C> {}

/// A view of a container's columns in a fixed direction.
pub struct SortedView<'a, C> {
    columns: &'a SortedColumns<C>,
    descending: bool,
}

impl<C> Clone for SortedView<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for SortedView<'_, C> {}

impl<'a, C: Column> SortedView<'a, C> {
    pub(crate) fn new(columns: &'a SortedColumns<C>, descending: bool) -> Self {
        Self {
            columns,
            descending,
        }
    }

    /// Iterates over the view.
    pub fn iter(&self) -> Iter<'a, C> {
        self.columns.walk(self.descending)
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the view is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns the first column of the view.
    pub fn first(&self) -> Option<&'a C> {
        self.iter().next()
    }

    /// Returns the last column of the view.
    pub fn last(&self) -> Option<&'a C> {
        self.iter().next_back()
    }
}

impl<'a, C: Column> IntoIterator for SortedView<'a, C> {
    type Item = &'a C;
    type IntoIter = Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
