//! Column name ranges.

use crate::comparator::ColumnComparator;
use bytes::Bytes;
use std::cmp::Ordering;

/// An inclusive range of column names, read in traversal direction.
///
/// `start` is where a scan begins and `finish` is where it ends, so for a
/// descending scan `start` is the greater bound. `None` leaves that end of
/// the range open.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnSlice {
    /// First name to include, in traversal direction.
    pub start: Option<Bytes>,
    /// Last name to include, in traversal direction.
    pub finish: Option<Bytes>,
}

/// The universal slice list: one slice covering every name.
pub const ALL_COLUMNS: &[ColumnSlice] = &[ColumnSlice::ALL];

impl ColumnSlice {
    /// A slice covering every name.
    pub const ALL: ColumnSlice = ColumnSlice {
        start: None,
        finish: None,
    };

    /// Creates a slice from optional bounds.
    pub fn new(start: Option<Bytes>, finish: Option<Bytes>) -> Self {
        Self { start, finish }
    }

    /// Creates a slice from `start` to the end of the traversal.
    pub fn starting_at(start: impl Into<Bytes>) -> Self {
        Self::new(Some(start.into()), None)
    }

    /// Creates a slice from the beginning of the traversal to `finish`.
    pub fn ending_at(finish: impl Into<Bytes>) -> Self {
        Self::new(None, Some(finish.into()))
    }

    /// Creates a slice with both ends bounded.
    pub fn between(start: impl Into<Bytes>, finish: impl Into<Bytes>) -> Self {
        Self::new(Some(start.into()), Some(finish.into()))
    }

    /// Returns the start bound, treating an empty name as open.
    pub fn start_bound(&self) -> Option<&[u8]> {
        self.start.as_deref().filter(|b| !b.is_empty())
    }

    /// Returns the finish bound, treating an empty name as open.
    pub fn finish_bound(&self) -> Option<&[u8]> {
        self.finish.as_deref().filter(|b| !b.is_empty())
    }

    /// Returns true if both ends are open.
    pub fn is_unbounded(&self) -> bool {
        self.start_bound().is_none() && self.finish_bound().is_none()
    }

    /// Returns true if `name` falls inside this slice.
    ///
    /// `reversed` states whether the slice is read in descending order.
    pub fn includes(
        &self,
        comparator: &dyn ColumnComparator,
        name: &[u8],
        reversed: bool,
    ) -> bool {
        let cmp = |a: &[u8], b: &[u8]| directed(comparator, a, b, reversed);
        let after_start = self
            .start_bound()
            .map_or(true, |start| cmp(start, name) != Ordering::Greater);
        let before_finish = self
            .finish_bound()
            .map_or(true, |finish| cmp(name, finish) != Ordering::Greater);
        after_start && before_finish
    }
}

/// Compares in traversal direction.
pub(crate) fn directed(
    comparator: &dyn ColumnComparator,
    a: &[u8],
    b: &[u8],
    reversed: bool,
) -> Ordering {
    let ord = comparator.compare(a, b);
    if reversed {
        ord.reverse()
    } else {
        ord
    }
}
