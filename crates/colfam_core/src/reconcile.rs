//! Reconciliation of columns sharing a name, and the allocator handle.
//!
//! Whenever an insert or a merge meets a name that is already stored, the
//! container asks a [`Reconciler`] which of the two columns survives. The
//! [`Allocator`] handed to the mutation is forwarded to the reconciler
//! untouched; the container never calls it.

use crate::column::Cell;

/// Opaque memory accounting handle.
///
/// Implementations belong to the surrounding engine. Every method has a
/// no-op default so handles only override what they track.
pub trait Allocator {
    /// Records that `bytes` were retained on behalf of a column.
    fn allocate(&self, bytes: usize) {
        let _ = bytes;
    }

    /// Records that `bytes` retained earlier were released.
    fn release(&self, bytes: usize) {
        let _ = bytes;
    }
}

/// Allocator that leaves all accounting to the global heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {}

/// Merge policy for two columns with equal names.
pub trait Reconciler<C>: Send + Sync {
    /// Returns the column to keep out of `existing` and `incoming`.
    fn reconcile(&self, existing: C, incoming: C, allocator: &dyn Allocator) -> C;
}

impl<C, F> Reconciler<C> for F
where
    F: Fn(C, C, &dyn Allocator) -> C + Send + Sync,
{
    fn reconcile(&self, existing: C, incoming: C, allocator: &dyn Allocator) -> C {
        self(existing, incoming, allocator)
    }
}

/// Always keeps the incoming column.
#[derive(Debug, Clone, Copy, Default)]
pub struct TakeIncoming;

impl<C> Reconciler<C> for TakeIncoming {
    fn reconcile(&self, _existing: C, incoming: C, _allocator: &dyn Allocator) -> C {
        incoming
    }
}

/// Always keeps the stored column.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepExisting;

impl<C> Reconciler<C> for KeepExisting {
    fn reconcile(&self, existing: C, _incoming: C, _allocator: &dyn Allocator) -> C {
        existing
    }
}

/// Last-write-wins for [`Cell`]s.
///
/// The higher timestamp wins. On a tie the greater value wins so that the
/// outcome does not depend on arrival order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestTimestamp;

impl Reconciler<Cell> for HighestTimestamp {
    fn reconcile(&self, existing: Cell, incoming: Cell, allocator: &dyn Allocator) -> Cell {
        let keep_incoming = match incoming.timestamp().cmp(&existing.timestamp()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => incoming.value() > existing.value(),
        };
        if keep_incoming {
            allocator.release(existing.data_size());
            allocator.allocate(incoming.data_size());
            incoming
        } else {
            existing
        }
    }
}
