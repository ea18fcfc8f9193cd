//! Container factory.

use crate::column::Column;
use crate::columns::SortedColumns;
use crate::comparator::ColumnComparator;
use crate::config::ColumnsConfig;
use crate::reconcile::{Reconciler, TakeIncoming};
use std::sync::Arc;

/// Creates containers that share a comparator and a default reconciler.
///
/// A table typically owns one factory and asks it for a fresh container
/// per row.
///
/// # Example
///
/// ```rust
/// use colfam_core::{Cell, ColumnsFactory, HighestTimestamp, Int32Comparator};
/// use std::sync::Arc;
///
/// let factory: ColumnsFactory<Cell> = ColumnsFactory::new(Arc::new(Int32Comparator))
///     .with_reconciler(Arc::new(HighestTimestamp));
///
/// let row = factory.create(true);
/// assert!(row.is_reversed());
/// assert!(row.is_empty());
/// ```
pub struct ColumnsFactory<C> {
    comparator: Arc<dyn ColumnComparator>,
    reconciler: Arc<dyn Reconciler<C>>,
    config: ColumnsConfig,
}

impl<C: Column + 'static> ColumnsFactory<C> {
    /// Creates a factory that resolves collisions with [`TakeIncoming`].
    pub fn new(comparator: Arc<dyn ColumnComparator>) -> Self {
        Self {
            comparator,
            reconciler: Arc::new(TakeIncoming),
            config: ColumnsConfig::default(),
        }
    }
}

impl<C: Column> ColumnsFactory<C> {
    /// Sets the default reconciler of created containers.
    #[must_use]
    pub fn with_reconciler(mut self, reconciler: Arc<dyn Reconciler<C>>) -> Self {
        self.reconciler = reconciler;
        self
    }

    /// Sets the configuration of created containers.
    ///
    /// The `reversed` flag of `config` is used by
    /// [`create_default`](Self::create_default) only.
    #[must_use]
    pub fn with_config(mut self, config: ColumnsConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the shared comparator.
    pub fn comparator(&self) -> &Arc<dyn ColumnComparator> {
        &self.comparator
    }

    /// Creates an empty container stored in the given direction.
    pub fn create(&self, reversed: bool) -> SortedColumns<C> {
        SortedColumns::with_config(
            Arc::clone(&self.comparator),
            Arc::clone(&self.reconciler),
            self.config.reversed(reversed),
        )
    }

    /// Creates an empty container using the configured direction.
    pub fn create_default(&self) -> SortedColumns<C> {
        self.create(self.config.reversed)
    }
}

impl<C> Clone for ColumnsFactory<C> {
    fn clone(&self) -> Self {
        Self {
            comparator: Arc::clone(&self.comparator),
            reconciler: Arc::clone(&self.reconciler),
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Cell;
    use crate::comparator::BytesComparator;
    use crate::reconcile::{HeapAllocator, KeepExisting};

    #[test]
    fn create_respects_direction() {
        let factory: ColumnsFactory<Cell> = ColumnsFactory::new(Arc::new(BytesComparator));
        assert!(!factory.create(false).is_reversed());
        assert!(factory.create(true).is_reversed());
        assert!(!factory.create_default().is_reversed());

        let factory = factory.with_config(ColumnsConfig::new().reversed(true));
        assert!(factory.create_default().is_reversed());
    }

    #[test]
    fn created_containers_share_reconciler() {
        let factory: ColumnsFactory<Cell> =
            ColumnsFactory::new(Arc::new(BytesComparator)).with_reconciler(Arc::new(KeepExisting));

        let mut row = factory.clone().create(false);
        row.add_column(Cell::new(&b"a"[..], &b"1"[..], 0), &HeapAllocator);
        row.add_column(Cell::new(&b"a"[..], &b"2"[..], 0), &HeapAllocator);

        assert_eq!(row.get_column(b"a").unwrap().value().as_ref(), b"1");
        assert!(Arc::ptr_eq(row.comparator(), factory.comparator()));
    }
}
