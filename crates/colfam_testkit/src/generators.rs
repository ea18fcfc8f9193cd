//! Property-based test generators using proptest.
//!
//! Provides strategies for generating rows and slice lists that keep the
//! preconditions the container relies on (ordered, disjoint slices).

use crate::fixtures::int_name;
use colfam_core::ColumnSlice;
use proptest::prelude::*;

/// Strategy for column name values, small enough to collide often.
pub fn name_value_strategy() -> impl Strategy<Value = i32> {
    -64i32..64
}

/// Strategy for an unordered sequence of name values, duplicates included.
pub fn insert_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(name_value_strategy(), 0..max_len)
}

/// Strategy for `(name, timestamp)` writes.
pub fn timestamped_writes_strategy(max_len: usize) -> impl Strategy<Value = Vec<(i32, i64)>> {
    prop::collection::vec((name_value_strategy(), 0i64..1000), 0..max_len)
}

/// Strategy for a list of ascending, disjoint slices.
///
/// Each slice bound is open with some probability.
pub fn ascending_slices_strategy(max_slices: usize) -> impl Strategy<Value = Vec<ColumnSlice>> {
    (
        prop::collection::btree_set(name_value_strategy(), 0..(max_slices * 2)),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(points, open_start, open_finish)| {
            let points: Vec<i32> = points.into_iter().collect();
            let count = points.len() / 2;
            points
                .chunks_exact(2)
                .enumerate()
                .map(|(i, pair)| {
                    let start = if i == 0 && open_start {
                        None
                    } else {
                        Some(int_name(pair[0]))
                    };
                    let finish = if i + 1 == count && open_finish {
                        None
                    } else {
                        Some(int_name(pair[1]))
                    };
                    ColumnSlice::new(start, finish)
                })
                .collect()
        })
}

/// Reverses an ascending slice list for a descending scan.
pub fn reverse_slices(slices: &[ColumnSlice]) -> Vec<ColumnSlice> {
    slices
        .iter()
        .rev()
        .map(|s| ColumnSlice::new(s.finish.clone(), s.start.clone()))
        .collect()
}

/// Environment variable selecting the property test profile.
pub const PROFILE_ENV: &str = "COLFAM_PROPTEST";

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl Default for PropTestConfig {
    fn default() -> Self {
        Self {
            cases: 256,
            max_shrink_iters: 1000,
        }
    }
}

impl PropTestConfig {
    /// Creates a configuration for quick tests.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Creates a configuration for thorough tests.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 1024,
            max_shrink_iters: 10000,
        }
    }

    /// Picks a profile from the `COLFAM_PROPTEST` environment variable.
    ///
    /// `quick` and `thorough` select those profiles; anything else, or an
    /// unset variable, selects the default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_profile(std::env::var(PROFILE_ENV).ok().as_deref())
    }

    fn from_profile(profile: Option<&str>) -> Self {
        match profile {
            Some("quick") => Self::quick(),
            Some("thorough") => Self::thorough(),
            _ => Self::default(),
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}
