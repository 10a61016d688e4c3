//! Shared test utilities for the station-heatmap workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Calendar row generators (constant, seasonal, leap/non-leap years)
//! - Palette and station-file fixtures
//! - Approximate-equality assertion macros
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, fixtures};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of a present matrix cell.
///
/// Fails when the cell is missing, so a missing value can never pass for a
/// number.
///
/// ```ignore
/// use test_utils::assert_cell_approx_eq;
///
/// assert_cell_approx_eq!(Some(2.0001), 2.0, 0.001);
/// ```
#[macro_export]
macro_rules! assert_cell_approx_eq {
    ($cell:expr, $expected:expr, $epsilon:expr) => {{
        match $cell {
            Some(value) => $crate::assert_approx_eq!(value, $expected, $epsilon),
            None => panic!(
                "assertion failed: cell is missing, expected `{:?}`",
                $expected
            ),
        }
    }};
}
