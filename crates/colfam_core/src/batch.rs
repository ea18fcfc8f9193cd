//! Batch removal sessions.
//!
//! A [`BatchRemoveIter`] scans a container once in ascending order and marks
//! columns for removal without touching the backing array. A single
//! [`commit`](BatchRemoveIter::commit) then rebuilds the array from the
//! unmarked columns, so removing k of n columns costs O(n) instead of
//! O(k * n).
//!
//! ## State machine
//!
//! ```text
//!            next               remove
//! Ready ───────────► Positioned ───────► Marked
//!   │                 ▲      │  ◄──────────┘ │
//!   │                 └─next─┘     next      │
//!   └──────────────── commit ────────────────┴──► Committed
//! ```
//!
//! - `remove` is only valid in `Positioned`
//! - `commit` is valid exactly once
//! - Dropping an uncommitted session discards its marks

use crate::column::Column;
use crate::columns::SortedColumns;
use crate::error::{CoreError, CoreResult};
use tracing::{debug, trace};

/// Lifecycle state of a [`BatchRemoveIter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Positioned before the first column.
    Ready,
    /// On a column returned by `next`, not marked.
    Positioned,
    /// On a column returned by `next`, marked for removal.
    Marked,
    /// Consumed by `commit`.
    Committed,
}

/// A scan-and-mark removal session over a [`SortedColumns`].
///
/// Marks are a property of the session, not of the container: until
/// [`commit`](Self::commit), reading the container through
/// [`columns`](Self::columns) still shows every column.
pub struct BatchRemoveIter<'a, C: Column> {
    columns: &'a mut SortedColumns<C>,
    /// Storage indexes marked for removal.
    removed: Vec<bool>,
    removed_count: usize,
    /// Ascending position of the next column to return.
    next_position: usize,
    /// Storage index of the column last returned.
    current: usize,
    state: SessionState,
}

impl<'a, C: Column> BatchRemoveIter<'a, C> {
    pub(crate) fn new(columns: &'a mut SortedColumns<C>) -> Self {
        let len = columns.len();
        Self {
            columns,
            removed: vec![false; len],
            removed_count: 0,
            next_position: 0,
            current: 0,
            state: SessionState::Ready,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the container as other readers see it.
    pub fn columns(&self) -> &SortedColumns<C> {
        &*self.columns
    }

    /// Returns the number of columns marked so far.
    pub fn marked(&self) -> usize {
        self.removed_count
    }

    /// Returns true if an unvisited column remains.
    pub fn has_next(&self) -> bool {
        self.state != SessionState::Committed && self.next_position < self.removed.len()
    }

    /// Returns the next column in ascending order and advances.
    ///
    /// # Errors
    ///
    /// - [`CoreError::IteratorExhausted`] if every column was visited
    /// - [`CoreError::SessionAlreadyCommitted`] after `commit`
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CoreResult<&C> {
        if self.state == SessionState::Committed {
            return Err(CoreError::SessionAlreadyCommitted);
        }
        if self.next_position >= self.removed.len() {
            return Err(CoreError::IteratorExhausted);
        }
        self.current = self.columns.storage_index(self.next_position, false);
        self.next_position += 1;
        self.state = SessionState::Positioned;
        Ok(&self.columns.columns[self.current])
    }

    /// Marks the column returned by the last call to `next` for removal.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidRemovalState`] before the first `next`, or if the
    ///   column is already marked
    /// - [`CoreError::SessionAlreadyCommitted`] after `commit`
    pub fn remove(&mut self) -> CoreResult<()> {
        match self.state {
            SessionState::Positioned => {
                self.removed[self.current] = true;
                self.removed_count += 1;
                self.state = SessionState::Marked;
                Ok(())
            }
            SessionState::Ready => Err(CoreError::invalid_removal_state(
                "remove called before next",
            )),
            SessionState::Marked => Err(CoreError::invalid_removal_state(
                "column already marked for removal",
            )),
            SessionState::Committed => Err(CoreError::SessionAlreadyCommitted),
        }
    }

    /// Drops every marked column in one pass and ends the session.
    ///
    /// Unmarked columns keep their order; nothing is reconciled. Returns the
    /// number of columns removed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionAlreadyCommitted`] if called twice.
    pub fn commit(&mut self) -> CoreResult<usize> {
        if self.state == SessionState::Committed {
            return Err(CoreError::SessionAlreadyCommitted);
        }
        self.state = SessionState::Committed;

        if self.removed_count == 0 {
            return Ok(0);
        }

        let old = std::mem::take(&mut self.columns.columns);
        let mut kept = Vec::with_capacity(old.len() - self.removed_count);
        kept.extend(
            old.into_iter()
                .zip(&self.removed)
                .filter(|(_, removed)| !**removed)
                .map(|(column, _)| column),
        );
        self.columns.columns = kept;

        debug!(
            removed = self.removed_count,
            remaining = self.columns.len(),
            "committed batch removal"
        );
        Ok(self.removed_count)
    }
}

impl<C: Column> Drop for BatchRemoveIter<'_, C> {
    fn drop(&mut self) {
        if self.state != SessionState::Committed && self.removed_count > 0 {
            trace!(
                pending = self.removed_count,
                "batch removal session dropped without commit"
            );
        }
    }
}
