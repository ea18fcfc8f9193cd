//! # colfam Testkit
//!
//! Test utilities for colfam.
//!
//! This crate provides:
//! - Fixtures for building integer-named rows
//! - A counting allocator for checking that accounting handles are forwarded
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust
//! use colfam_testkit::prelude::*;
//!
//! let row = int_columns(&[3, 1, 2], true);
//! assert_eq!(names(row.iter()), vec![1, 2, 3]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
