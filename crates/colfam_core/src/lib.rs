//! # colfam Core
//!
//! In-memory, per-row column container for the colfam storage engine.
//!
//! This crate provides:
//! - [`SortedColumns`], an array-backed, sorted, duplicate-free column
//!   container with a fixed storage direction
//! - Linear-time merging of containers with caller-supplied reconciliation
//! - Plain and slice-restricted cursors in both directions
//! - Two removal protocols: [`RemovalIter`] for a few immediate removals
//!   and [`BatchRemoveIter`] for bulk removal committed in one pass
//!
//! The container is single-owner. It performs no locking and no I/O.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod column;
mod columns;
mod comparator;
mod config;
mod cursor;
mod error;
mod factory;
mod reconcile;
mod removal;
mod slice;

pub use batch::{BatchRemoveIter, SessionState};
pub use column::{Cell, Column};
pub use columns::SortedColumns;
pub use comparator::{BytesComparator, ColumnComparator, Int32Comparator};
pub use config::ColumnsConfig;
pub use cursor::{Iter, SlicesIter, SortedView};
pub use error::{CoreError, CoreResult};
pub use factory::ColumnsFactory;
pub use reconcile::{
    Allocator, HeapAllocator, HighestTimestamp, KeepExisting, Reconciler, TakeIncoming,
};
pub use removal::RemovalIter;
pub use slice::{ColumnSlice, ALL_COLUMNS};
