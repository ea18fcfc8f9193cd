//! Cursor with immediate, single-column removal.

use crate::column::Column;
use crate::columns::SortedColumns;
use crate::error::{CoreError, CoreResult};
use tracing::trace;

/// A cursor that can remove the column it just returned.
///
/// Each [`remove`](Self::remove) shifts the backing array to close the gap,
/// so a removal costs O(n). Use a
/// [`BatchRemoveIter`](crate::BatchRemoveIter) when many columns go at once.
///
/// The container stays sorted and duplicate-free after every call.
///
/// # Example
///
/// ```rust
/// use colfam_core::{Cell, HeapAllocator, Int32Comparator, SortedColumns};
/// use std::sync::Arc;
///
/// let mut row = SortedColumns::new(Arc::new(Int32Comparator), false);
/// for v in [1i32, 2, 3] {
///     row.add_column(Cell::named(v.to_be_bytes().to_vec()), &HeapAllocator);
/// }
///
/// let mut iter = row.reverse_removal_iter();
/// iter.next()?;
/// iter.remove()?;
/// drop(iter);
///
/// assert_eq!(row.len(), 2);
/// # Ok::<(), colfam_core::CoreError>(())
/// ```
pub struct RemovalIter<'a, C> {
    columns: &'a mut SortedColumns<C>,
    descending: bool,
    /// Traversal position of the next column to return.
    next_position: usize,
    /// Traversal position of the column last returned, until removed.
    current: Option<usize>,
}

impl<'a, C: Column> RemovalIter<'a, C> {
    pub(crate) fn new(columns: &'a mut SortedColumns<C>, descending: bool) -> Self {
        Self {
            columns,
            descending,
            next_position: 0,
            current: None,
        }
    }

    /// Returns true if a column remains.
    pub fn has_next(&self) -> bool {
        self.next_position < self.columns.len()
    }

    /// Returns the next column and advances.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::IteratorExhausted`] if no column remains.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CoreResult<&C> {
        if !self.has_next() {
            return Err(CoreError::IteratorExhausted);
        }
        let position = self.next_position;
        self.next_position += 1;
        self.current = Some(position);

        let idx = self.columns.storage_index(position, self.descending);
        Ok(&self.columns.columns[idx])
    }

    /// Removes the column returned by the last call to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRemovalState`] if `next` was not called
    /// or the column was already removed.
    pub fn remove(&mut self) -> CoreResult<C> {
        let position = self.current.take().ok_or_else(|| {
            CoreError::invalid_removal_state("remove called without a preceding next")
        })?;
        let idx = self.columns.storage_index(position, self.descending);
        let removed = self.columns.columns.remove(idx);
        // Everything after the gap moved one position closer.
        self.next_position -= 1;
        trace!(idx, remaining = self.columns.len(), "removed column");
        Ok(removed)
    }
}
