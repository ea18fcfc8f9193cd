//! Column trait and the standard `Cell` column.

use bytes::Bytes;

/// A named entry of a row.
///
/// The container only ever looks at the name. Everything else about a
/// column is opaque to it and is resolved by a
/// [`Reconciler`](crate::Reconciler) when two columns share a name.
pub trait Column: Clone {
    /// Returns the column name used for ordering.
    fn name(&self) -> &[u8];
}

/// A column with a byte-string value and a write timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cell {
    name: Bytes,
    value: Bytes,
    timestamp: i64,
}

impl Cell {
    /// Creates a new cell.
    pub fn new(name: impl Into<Bytes>, value: impl Into<Bytes>, timestamp: i64) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            timestamp,
        }
    }

    /// Creates a cell with an empty value and a zero timestamp.
    pub fn named(name: impl Into<Bytes>) -> Self {
        Self::new(name, Bytes::new(), 0)
    }

    /// Returns the name as shared bytes.
    pub fn name_bytes(&self) -> &Bytes {
        &self.name
    }

    /// Returns the value.
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Returns the write timestamp.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the combined size of name and value in bytes.
    pub fn data_size(&self) -> usize {
        self.name.len() + self.value.len() + std::mem::size_of::<i64>()
    }
}

impl Column for Cell {
    fn name(&self) -> &[u8] {
        &self.name
    }
}
