//! Shared test utilities for the foodmap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Stakeholder and CSV fixtures
//! - Stakeholder list generators
//! - Test data path helpers
//! - Coordinate assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Coordinate tolerance used by [`assert_lat_lng_eq!`] when none is given,
/// about 10 cm at the equator.
pub const COORD_EPSILON: f64 = 1e-6;

/// Skip a test when a sample upload is missing.
///
/// Sample CSVs live in `services/importer/testdata/`; `TEST_DATA_DIR`
/// overrides the location.
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_sample_upload() {
///     let path = require_test_file!("sample_import.csv");
/// }
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: sample upload '{}' not found under services/importer/testdata \
                     or TEST_DATA_DIR",
                    $name
                );
                return;
            }
        }
    }};
}

/// Compare two `(latitude, longitude)` pairs, naming the axis that differs.
///
/// ```ignore
/// use test_utils::{assert_lat_lng_eq, coords};
///
/// assert_lat_lng_eq!((row.latitude, row.longitude), coords::SPRINGFIELD_IL);
/// assert_lat_lng_eq!((39.80001, -89.6), coords::SPRINGFIELD_IL, 1e-3);
/// ```
#[macro_export]
macro_rules! assert_lat_lng_eq {
    ($actual:expr, $expected:expr) => {
        $crate::assert_lat_lng_eq!($actual, $expected, $crate::COORD_EPSILON)
    };
    ($actual:expr, $expected:expr, $epsilon:expr) => {{
        let (actual_lat, actual_lon): (f64, f64) = $actual;
        let (expected_lat, expected_lon): (f64, f64) = $expected;
        let epsilon: f64 = $epsilon;
        for (axis, actual, expected) in [
            ("latitude", actual_lat, expected_lat),
            ("longitude", actual_lon, expected_lon),
        ] {
            if !((actual - expected).abs() <= epsilon) {
                panic!(
                    "{} mismatch: got ({}, {}), expected ({}, {}), tolerance {}",
                    axis, actual_lat, actual_lon, expected_lat, expected_lon, epsilon
                );
            }
        }
    }};
}
