//! Container configuration.

/// Configuration for creating a [`SortedColumns`](crate::SortedColumns).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnsConfig {
    /// Number of columns to reserve space for up front.
    pub initial_capacity: usize,

    /// Whether columns are stored in descending key order.
    ///
    /// Reversed containers are cheapest to fill when columns arrive in
    /// descending order, as produced by reversed slice queries.
    pub reversed: bool,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            reversed: false,
        }
    }
}

impl ColumnsConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial capacity.
    #[must_use]
    pub const fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the storage direction.
    #[must_use]
    pub const fn reversed(mut self, value: bool) -> Self {
        self.reversed = value;
        self
    }
}
