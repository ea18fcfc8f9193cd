//! Benchmark workloads for colfam.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use colfam_core::{Cell, HeapAllocator, SortedColumns};
use colfam_testkit::{int_cell, int_factory};
use rand::seq::SliceRandom;

/// Returns `0..count` in random order.
pub fn shuffled_values(count: usize) -> Vec<i32> {
    let mut values: Vec<i32> = (0..count as i32).collect();
    values.shuffle(&mut rand::thread_rng());
    values
}

/// Builds a row of `count` columns named `offset`, `offset + stride`, ...
pub fn strided_row(count: usize, stride: i32, offset: i32, reversed: bool) -> SortedColumns<Cell> {
    let mut row = int_factory().create(reversed);
    for i in 0..count as i32 {
        row.add_column(int_cell(i * stride + offset), &HeapAllocator);
    }
    row
}
