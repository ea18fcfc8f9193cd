//! Column name comparators.

use std::cmp::Ordering;

/// A total order over column names.
///
/// The comparator is fixed when a container is created. Containers stored in
/// reverse order still call it in natural order and flip the result
/// themselves.
pub trait ColumnComparator: Send + Sync {
    /// Compares two column names.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

impl<F> ColumnComparator for F
where
    F: Fn(&[u8], &[u8]) -> Ordering + Send + Sync,
{
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        self(a, b)
    }
}

/// Unsigned lexicographic byte order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesComparator;

impl ColumnComparator for BytesComparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

/// Big-endian signed 32-bit integer order.
///
/// The empty name sorts first. Names that are not exactly four bytes wide
/// sort after every integer name, in byte order among themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct Int32Comparator;

/// Width class of a name under [`Int32Comparator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Int32Key<'a> {
    Empty,
    Int(i32),
    Other(&'a [u8]),
}

impl Int32Comparator {
    fn key(name: &[u8]) -> Int32Key<'_> {
        match <[u8; 4]>::try_from(name) {
            Ok(arr) => Int32Key::Int(i32::from_be_bytes(arr)),
            Err(_) if name.is_empty() => Int32Key::Empty,
            Err(_) => Int32Key::Other(name),
        }
    }
}

impl ColumnComparator for Int32Comparator {
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        Self::key(a).cmp(&Self::key(b))
    }
}
