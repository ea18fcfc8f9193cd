//! Array-backed sorted column container.
//!
//! [`SortedColumns`] is the in-memory representation of a row while it is
//! built, merged or compacted. Columns live in one contiguous `Vec`, sorted
//! by name in storage order and unique by name.
//!
//! ## Invariants
//!
//! - No two stored columns have equal names
//! - Columns are sorted ascending, or descending for reversed containers,
//!   between any two public calls
//! - Name collisions are resolved by a [`Reconciler`], never by the caller
//!
//! ## Concurrency
//!
//! The container has a single owner. Structural mutation takes `&mut self`,
//! so readers and writers cannot overlap; serializing access to a shared
//! row is up to the layer that owns it.

use crate::batch::BatchRemoveIter;
use crate::column::Column;
use crate::comparator::ColumnComparator;
use crate::config::ColumnsConfig;
use crate::cursor::{Iter, SlicesIter, SortedView};
use crate::error::CoreResult;
use crate::reconcile::{Allocator, Reconciler, TakeIncoming};
use crate::removal::RemovalIter;
use crate::slice::{directed, ColumnSlice};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// An ordered, duplicate-free collection of columns backed by a `Vec`.
///
/// # Example
///
/// ```rust
/// use colfam_core::{BytesComparator, Cell, HeapAllocator, SortedColumns};
/// use std::sync::Arc;
///
/// let mut row = SortedColumns::new(Arc::new(BytesComparator), false);
/// row.add_column(Cell::named(&b"b"[..]), &HeapAllocator);
/// row.add_column(Cell::named(&b"a"[..]), &HeapAllocator);
///
/// let names: Vec<&[u8]> = row.iter().map(|c| c.name_bytes().as_ref()).collect();
/// assert_eq!(names, vec![&b"a"[..], &b"b"[..]]);
/// ```
pub struct SortedColumns<C> {
    /// Columns in storage order.
    pub(crate) columns: Vec<C>,
    /// Natural order over names.
    comparator: Arc<dyn ColumnComparator>,
    /// Policy used when a call does not supply its own.
    reconciler: Arc<dyn Reconciler<C>>,
    /// Whether storage order is descending.
    reversed: bool,
}

impl<C: Column + 'static> SortedColumns<C> {
    /// Creates an empty container that resolves collisions with
    /// [`TakeIncoming`].
    pub fn new(comparator: Arc<dyn ColumnComparator>, reversed: bool) -> Self {
        Self::with_config(
            comparator,
            Arc::new(TakeIncoming),
            ColumnsConfig::new().reversed(reversed),
        )
    }
}

impl<C: Column> SortedColumns<C> {
    /// Creates an empty container from a configuration.
    pub fn with_config(
        comparator: Arc<dyn ColumnComparator>,
        reconciler: Arc<dyn Reconciler<C>>,
        config: ColumnsConfig,
    ) -> Self {
        Self {
            columns: Vec::with_capacity(config.initial_capacity),
            comparator,
            reconciler,
            reversed: config.reversed,
        }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the container holds no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Returns true if columns are stored in descending order.
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Returns the comparator the container was created with.
    pub fn comparator(&self) -> &Arc<dyn ColumnComparator> {
        &self.comparator
    }

    /// Returns the default reconciler.
    pub fn reconciler(&self) -> &Arc<dyn Reconciler<C>> {
        &self.reconciler
    }

    /// Compares two names in storage order.
    fn internal_compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        directed(self.comparator.as_ref(), a, b, self.reversed)
    }

    /// Binary search by name over storage.
    fn search(&self, name: &[u8]) -> Result<usize, usize> {
        self.columns
            .binary_search_by(|probe| self.internal_compare(probe.name(), name))
    }

    /// Maps a position in a traversal to an index in storage.
    ///
    /// Positions are counted from the start of the traversal; `descending`
    /// selects the traversal direction.
    pub(crate) fn storage_index(&self, position: usize, descending: bool) -> usize {
        if descending == self.reversed {
            position
        } else {
            self.columns.len() - 1 - position
        }
    }

    /// Adds a column, reconciling with the default reconciler on collision.
    pub fn add_column(&mut self, column: C, allocator: &dyn Allocator) {
        let reconciler = Arc::clone(&self.reconciler);
        self.add_column_with(column, allocator, reconciler.as_ref());
    }

    /// Adds a column, reconciling with `reconciler` on collision.
    ///
    /// Columns that sort after the last stored column are appended without
    /// searching. Otherwise the insertion point is found by binary search
    /// and later columns are shifted.
    pub fn add_column_with(
        &mut self,
        column: C,
        allocator: &dyn Allocator,
        reconciler: &dyn Reconciler<C>,
    ) {
        let against_last = self
            .columns
            .last()
            .map(|last| self.internal_compare(last.name(), column.name()));

        match against_last {
            None | Some(Ordering::Less) => self.columns.push(column),
            Some(Ordering::Equal) => {
                let idx = self.columns.len() - 1;
                self.resolve_at(idx, column, allocator, reconciler);
            }
            Some(Ordering::Greater) => match self.search(column.name()) {
                Ok(idx) => self.resolve_at(idx, column, allocator, reconciler),
                Err(idx) => self.columns.insert(idx, column),
            },
        }
    }

    fn resolve_at(
        &mut self,
        idx: usize,
        incoming: C,
        allocator: &dyn Allocator,
        reconciler: &dyn Reconciler<C>,
    ) {
        trace!(idx, "reconciling column with duplicate name");
        let existing = self.columns[idx].clone();
        self.columns[idx] = reconciler.reconcile(existing, incoming, allocator);
    }

    /// Appends a column that must sort strictly after every stored column.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfOrderAppend`](crate::CoreError::OutOfOrderAppend)
    /// if the column does not sort after the last stored column. The
    /// container is left unchanged.
    pub fn maybe_append_column(&mut self, column: C) -> CoreResult<()> {
        if let Some(last) = self.columns.last() {
            if self.internal_compare(last.name(), column.name()) != Ordering::Less {
                return Err(crate::error::CoreError::OutOfOrderAppend);
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Merges every column of `other` into this container using the default
    /// reconciler.
    pub fn add_all(&mut self, other: &SortedColumns<C>, allocator: &dyn Allocator) {
        let reconciler = Arc::clone(&self.reconciler);
        self.add_all_with(other, allocator, reconciler.as_ref(), |c| c);
    }

    /// Merges every column of `other` into this container.
    ///
    /// Both sides are walked once in storage order, like the merge step of a
    /// merge sort, so the cost is linear in the combined size. `other` may be
    /// stored in either direction. `transform` is applied to each column
    /// taken from `other` before it is stored or reconciled, and must not
    /// change its name. The merged array replaces the stored one only once
    /// the walk completes, so a panicking `transform` or `reconciler` leaves
    /// this container unchanged.
    pub fn add_all_with<F>(
        &mut self,
        other: &SortedColumns<C>,
        allocator: &dyn Allocator,
        reconciler: &dyn Reconciler<C>,
        mut transform: F,
    ) where
        F: FnMut(C) -> C,
    {
        if other.is_empty() {
            return;
        }

        let mut merged = Vec::with_capacity(self.columns.len() + other.len());
        let mut mine = self.columns.iter().peekable();
        let mut theirs = other.walk(self.reversed).peekable();
        let mut reconciled = 0usize;

        loop {
            let ord = match (mine.peek(), theirs.peek()) {
                (Some(a), Some(b)) => self.internal_compare(a.name(), b.name()),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => break,
            };

            match ord {
                Ordering::Less => merged.extend(mine.next().cloned()),
                Ordering::Greater => {
                    if let Some(col) = theirs.next() {
                        merged.push(transform(col.clone()));
                    }
                }
                Ordering::Equal => {
                    if let (Some(a), Some(b)) = (mine.next(), theirs.next()) {
                        merged.push(reconciler.reconcile(
                            a.clone(),
                            transform(b.clone()),
                            allocator,
                        ));
                        reconciled += 1;
                    }
                }
            }
        }

        debug!(
            incoming = other.len(),
            reconciled,
            total = merged.len(),
            "merged sorted columns"
        );
        self.columns = merged;
    }

    /// Returns the column with the given name.
    pub fn get_column(&self, name: &[u8]) -> Option<&C> {
        self.search(name).ok().map(|idx| &self.columns[idx])
    }

    /// Returns true if a column with the given name is stored.
    pub fn contains(&self, name: &[u8]) -> bool {
        self.search(name).is_ok()
    }

    /// Replaces the column named `name` with `column` in place.
    ///
    /// Returns false, leaving the container unchanged, if no such column is
    /// stored. `column` must carry the same name.
    pub fn replace(&mut self, name: &[u8], column: C) -> bool {
        match self.search(name) {
            Ok(idx) => {
                self.columns[idx] = column;
                true
            }
            Err(_) => false,
        }
    }

    /// Removes every column.
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Returns the column names in ascending order.
    pub fn column_names(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.iter().map(Column::name)
    }

    /// Iterates over all columns in ascending order.
    pub fn iter(&self) -> Iter<'_, C> {
        self.walk(false)
    }

    /// Iterates over all columns, descending if `descending` is set.
    pub(crate) fn walk(&self, descending: bool) -> Iter<'_, C> {
        Iter::new(&self.columns, descending != self.reversed)
    }

    /// Iterates in ascending order over the columns inside `slices`.
    ///
    /// Slices must be ascending and disjoint.
    pub fn iter_slices<'a>(&'a self, slices: &'a [ColumnSlice]) -> SlicesIter<'a, C> {
        SlicesIter::new(self, slices, false)
    }

    /// Iterates in descending order over the columns inside `slices`.
    ///
    /// Slices must be descending and disjoint, with each slice's `start`
    /// being its greater bound.
    pub fn reverse_iter_slices<'a>(&'a self, slices: &'a [ColumnSlice]) -> SlicesIter<'a, C> {
        SlicesIter::new(self, slices, true)
    }

    /// Returns an ascending view of the columns, whatever the storage order.
    pub fn sorted_columns(&self) -> SortedView<'_, C> {
        SortedView::new(self, false)
    }

    /// Returns a descending view of the columns, whatever the storage order.
    pub fn reverse_sorted_columns(&self) -> SortedView<'_, C> {
        SortedView::new(self, true)
    }

    /// Returns an ascending cursor that removes columns immediately.
    pub fn removal_iter(&mut self) -> RemovalIter<'_, C> {
        RemovalIter::new(self, false)
    }

    /// Returns a descending cursor that removes columns immediately.
    pub fn reverse_removal_iter(&mut self) -> RemovalIter<'_, C> {
        RemovalIter::new(self, true)
    }

    /// Starts a batch removal session over all columns in ascending order.
    pub fn batch_remove_iter(&mut self) -> BatchRemoveIter<'_, C> {
        BatchRemoveIter::new(self)
    }

    /// Keeps only the columns for which `keep` returns true.
    ///
    /// Runs one batch removal session, so the cost is linear however many
    /// columns go. Returns the number of columns removed.
    pub fn retain<F>(&mut self, mut keep: F) -> CoreResult<usize>
    where
        F: FnMut(&C) -> bool,
    {
        let mut session = self.batch_remove_iter();
        while session.has_next() {
            if !keep(session.next()?) {
                session.remove()?;
            }
        }
        let removed = session.commit()?;
        debug!(removed, "retained columns");
        Ok(removed)
    }
}

impl<C: Column> Clone for SortedColumns<C> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
            comparator: Arc::clone(&self.comparator),
            reconciler: Arc::clone(&self.reconciler),
            reversed: self.reversed,
        }
    }
}

impl<C: Column + fmt::Debug> fmt::Debug for SortedColumns<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortedColumns")
            .field("reversed", &self.reversed)
            .field("columns", &self.columns)
            .finish()
    }
}

impl<'a, C: Column> IntoIterator for &'a SortedColumns<C> {
    type Item = &'a C;
    type IntoIter = Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Cell;
    use crate::comparator::Int32Comparator;
    use crate::reconcile::{HeapAllocator, HighestTimestamp, KeepExisting};

    fn cell(v: i32) -> Cell {
        Cell::named(v.to_be_bytes().to_vec())
    }

    fn int(c: &Cell) -> i32 {
        i32::from_be_bytes(c.name().try_into().unwrap())
    }

    fn ints<'a>(iter: impl Iterator<Item = &'a Cell>) -> Vec<i32> {
        iter.map(int).collect()
    }

    fn columns(values: &[i32], reversed: bool) -> SortedColumns<Cell> {
        let mut cols = SortedColumns::new(Arc::new(Int32Comparator), reversed);
        for v in values {
            cols.add_column(cell(*v), &HeapAllocator);
        }
        cols
    }

    #[test]
    fn add_keeps_ascending_iteration() {
        for reversed in [false, true] {
            let cols = columns(&[5, -1, 3, 9, 0], reversed);
            assert_eq!(ints(cols.iter()), vec![-1, 0, 3, 5, 9]);
        }
    }

    #[test]
    fn storage_follows_direction() {
        let cols = columns(&[1, 2, 3], true);
        assert_eq!(ints(cols.columns.iter()), vec![3, 2, 1]);

        let cols = columns(&[3, 2, 1], false);
        assert_eq!(ints(cols.columns.iter()), vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_uses_default_reconciler() {
        let mut cols = SortedColumns::new(Arc::new(Int32Comparator), false);
        cols.add_column(Cell::new(1i32.to_be_bytes().to_vec(), &b"a"[..], 1), &HeapAllocator);
        cols.add_column(Cell::new(1i32.to_be_bytes().to_vec(), &b"b"[..], 0), &HeapAllocator);

        assert_eq!(cols.len(), 1);
        assert_eq!(cols.iter().next().unwrap().value().as_ref(), b"b");
    }

    #[test]
    fn duplicate_uses_supplied_reconciler() {
        let mut cols = columns(&[1, 2, 3], false);
        let name = 2i32.to_be_bytes().to_vec();

        cols.add_column_with(Cell::new(name.clone(), &b"x"[..], 5), &HeapAllocator, &HighestTimestamp);
        cols.add_column_with(Cell::new(name.clone(), &b"y"[..], 4), &HeapAllocator, &HighestTimestamp);

        assert_eq!(cols.len(), 3);
        assert_eq!(cols.get_column(&name).unwrap().value().as_ref(), b"x");
    }

    #[test]
    fn configured_reconciler() {
        let mut cols: SortedColumns<Cell> = SortedColumns::with_config(
            Arc::new(Int32Comparator),
            Arc::new(KeepExisting),
            ColumnsConfig::new().initial_capacity(8),
        );
        let name = 7i32.to_be_bytes().to_vec();
        cols.add_column(Cell::new(name.clone(), &b"first"[..], 0), &HeapAllocator);
        cols.add_column(Cell::new(name.clone(), &b"second"[..], 9), &HeapAllocator);

        assert_eq!(cols.get_column(&name).unwrap().value().as_ref(), b"first");
    }

    #[test]
    fn maybe_append_rejects_out_of_order() {
        let mut cols = columns(&[1, 5], false);
        assert!(cols.maybe_append_column(cell(9)).is_ok());
        assert_eq!(
            cols.maybe_append_column(cell(9)),
            Err(crate::error::CoreError::OutOfOrderAppend)
        );
        assert!(cols.maybe_append_column(cell(3)).is_err());
        assert_eq!(ints(cols.iter()), vec![1, 5, 9]);

        let mut reversed = columns(&[5], true);
        assert!(reversed.maybe_append_column(cell(3)).is_ok());
        assert!(reversed.maybe_append_column(cell(4)).is_err());
        assert_eq!(ints(reversed.iter()), vec![3, 5]);
    }

    #[test]
    fn add_all_merges_across_directions() {
        for (left, right) in [(false, false), (false, true), (true, false), (true, true)] {
            let mut cols = columns(&[2, 4, 5, 6], left);
            let other = columns(&[1, 3, 5, 6, 10], right);

            cols.add_all(&other, &HeapAllocator);
            assert_eq!(ints(cols.iter()), vec![1, 2, 3, 4, 5, 6, 10]);
            let stored = ints(cols.columns.iter());
            let expected = if left {
                vec![10, 6, 5, 4, 3, 2, 1]
            } else {
                vec![1, 2, 3, 4, 5, 6, 10]
            };
            assert_eq!(stored, expected);
        }
    }

    #[test]
    fn add_all_applies_transform_to_incoming_only() {
        let mut cols = columns(&[1, 2], false);
        let mut other = SortedColumns::new(Arc::new(Int32Comparator), false);
        other.add_column(Cell::new(2i32.to_be_bytes().to_vec(), &b"o"[..], 0), &HeapAllocator);
        other.add_column(Cell::new(3i32.to_be_bytes().to_vec(), &b"o"[..], 0), &HeapAllocator);

        let stamp = |c: Cell| Cell::new(c.name_bytes().clone(), c.value().clone(), 42);
        cols.add_all_with(&other, &HeapAllocator, &TakeIncoming, stamp);

        let stamps: Vec<i64> = cols.iter().map(Cell::timestamp).collect();
        assert_eq!(stamps, vec![0, 42, 42]);
    }

    #[test]
    fn add_all_panicking_transform_keeps_row() {
        let mut cols = columns(&[1, 3, 5], true);
        let other = columns(&[2, 3, 4], false);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            cols.add_all_with(&other, &HeapAllocator, &TakeIncoming, |c: Cell| {
                if int(&c) == 3 {
                    panic!("transform failed");
                }
                c
            });
        }));

        assert!(result.is_err());
        assert_eq!(ints(cols.iter()), vec![1, 3, 5]);
        assert_eq!(ints(cols.columns.iter()), vec![5, 3, 1]);
    }

    #[test]
    fn mixed_width_names_stay_sorted() {
        let min = i32::MIN.to_be_bytes().to_vec();
        let high = 0x7f00_0000i32.to_be_bytes().to_vec();
        let short = vec![0x7f, 1];

        let mut cols = SortedColumns::new(Arc::new(Int32Comparator), false);
        for name in [high.clone(), short.clone(), min.clone()] {
            cols.add_column(Cell::named(name), &HeapAllocator);
        }

        let stored: Vec<&[u8]> = cols.column_names().collect();
        assert_eq!(stored, vec![&min[..], &high[..], &short[..]]);
        assert!(cols.contains(&min));
        assert!(cols.contains(&short));
    }

    #[test]
    fn add_all_empty_other_is_noop() {
        let mut cols = columns(&[1, 2], true);
        let other = columns(&[], false);
        cols.add_all(&other, &HeapAllocator);
        assert_eq!(ints(cols.iter()), vec![1, 2]);
    }

    #[test]
    fn lookup_and_replace() {
        let mut cols = columns(&[1, 3, 5], true);
        let three = 3i32.to_be_bytes();
        let four = 4i32.to_be_bytes();

        assert!(cols.contains(&three));
        assert!(!cols.contains(&four));
        assert!(cols.get_column(&four).is_none());

        assert!(cols.replace(&three, Cell::new(three.to_vec(), &b"v"[..], 1)));
        assert!(!cols.replace(&four, cell(4)));
        assert_eq!(cols.get_column(&three).unwrap().value().as_ref(), b"v");
        assert_eq!(cols.len(), 3);
    }

    #[test]
    fn retain_removes_rejected() {
        let mut cols = columns(&(0..20).collect::<Vec<_>>(), true);
        let removed = cols.retain(|c| int(c) % 3 == 0).unwrap();

        assert_eq!(removed, 13);
        assert_eq!(ints(cols.iter()), vec![0, 3, 6, 9, 12, 15, 18]);
    }

    #[test]
    fn clone_is_independent() {
        let mut cols = columns(&[1, 2], false);
        let snapshot = cols.clone();
        cols.clear();

        assert!(cols.is_empty());
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.column_names().count(), 2);
    }
}
