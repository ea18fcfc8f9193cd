//! Test fixtures and container helpers.
//!
//! Rows in tests are usually built from small integers, encoded as 4-byte
//! big-endian names and ordered by [`Int32Comparator`].

use bytes::Bytes;
use colfam_core::{
    Allocator, Cell, Column, ColumnsFactory, HeapAllocator, Int32Comparator, SortedColumns,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Encodes an integer as a column name.
pub fn int_name(value: i32) -> Bytes {
    Bytes::copy_from_slice(&value.to_be_bytes())
}

/// Decodes a column name written by [`int_name`].
pub fn name_int(name: &[u8]) -> i32 {
    let arr: [u8; 4] = name.try_into().expect("column name should be 4 bytes");
    i32::from_be_bytes(arr)
}

/// Creates a cell named by an integer, with an empty value.
pub fn int_cell(value: i32) -> Cell {
    Cell::named(int_name(value))
}

/// Creates a cell named by an integer with a value and timestamp.
pub fn int_cell_at(value: i32, payload: &str, timestamp: i64) -> Cell {
    Cell::new(int_name(value), payload.as_bytes().to_vec(), timestamp)
}

/// Returns a factory ordering names as integers.
pub fn int_factory() -> ColumnsFactory<Cell> {
    ColumnsFactory::new(Arc::new(Int32Comparator))
}

/// Builds a container from `values`.
///
/// Reversed containers are fed the values back to front, mirroring how a
/// reversed query produces them.
pub fn int_columns(values: &[i32], reversed: bool) -> SortedColumns<Cell> {
    let mut columns = int_factory().create(reversed);
    let feed: Box<dyn Iterator<Item = &i32>> = if reversed {
        Box::new(values.iter().rev())
    } else {
        Box::new(values.iter())
    };
    for value in feed {
        columns.add_column(int_cell(*value), &HeapAllocator);
    }
    columns
}

/// Collects the integer names of an iterator of columns.
pub fn names<'a, C, I>(iter: I) -> Vec<i32>
where
    C: Column + 'a,
    I: IntoIterator<Item = &'a C>,
{
    iter.into_iter().map(|c| name_int(c.name())).collect()
}

/// Allocator that counts what reconcilers report.
#[derive(Debug, Default)]
pub struct CountingAllocator {
    allocated: AtomicUsize,
    released: AtomicUsize,
}

impl CountingAllocator {
    /// Creates a new counting allocator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total bytes reported as allocated.
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    /// Returns the total bytes reported as released.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::Relaxed)
    }
}

impl Allocator for CountingAllocator {
    fn allocate(&self, bytes: usize) {
        self.allocated.fetch_add(bytes, Ordering::Relaxed);
    }

    fn release(&self, bytes: usize) {
        self.released.fetch_add(bytes, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_name_round_trip() {
        assert_eq!(name_int(&int_name(-7)), -7);
        assert_eq!(int_cell(12).name(), &12i32.to_be_bytes());
    }

    #[test]
    fn int_columns_sorted_in_both_directions() {
        assert_eq!(names(int_columns(&[3, 1, 2], false).iter()), vec![1, 2, 3]);
        assert_eq!(names(int_columns(&[3, 1, 2], true).iter()), vec![1, 2, 3]);
    }

    #[test]
    fn counting_allocator_accumulates() {
        let alloc = CountingAllocator::new();
        alloc.allocate(10);
        alloc.allocate(5);
        alloc.release(4);
        assert_eq!(alloc.allocated(), 15);
        assert_eq!(alloc.released(), 4);
    }
}
