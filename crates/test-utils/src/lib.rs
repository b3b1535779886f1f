//! Shared test utilities for the weather tile workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic field generators
//! - Grid descriptor and tile fixtures
//! - Vector tile decoding for round-trip checks (geozero)
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
//! use test_utils::{create_index_grid, fixtures, mvt};
//! ```

pub mod fixtures;
pub mod generators;
pub mod mvt;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Assert that two floats are within `tolerance` of each other.
///
/// ```
/// use test_utils::assert_close;
///
/// assert_close!(0.1 + 0.2, 0.3, 1e-12);
/// ```
#[macro_export]
macro_rules! assert_close {
    ($left:expr, $right:expr, $tolerance:expr) => {{
        let (left, right, tolerance): (f64, f64, f64) = ($left, $right, $tolerance);
        assert!(
            (left - right).abs() <= tolerance,
            "assertion failed: `{} ≈ {}` (left: {}, right: {}, tolerance: {})",
            stringify!($left),
            stringify!($right),
            left,
            right,
            tolerance
        );
    }};
}
