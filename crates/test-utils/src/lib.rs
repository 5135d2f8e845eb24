//! Shared test utilities for the field-health workspace.
//!
//! This crate provides:
//! - Field geometry and farm fixtures
//! - Fake imagery providers (instant and gated) for orchestration tests
//! - Approximate-equality assertions for coordinates
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../../crates/test-utils" }
//! ```

pub mod fixtures;
pub mod providers;

pub use fixtures::*;
pub use providers::*;

/// Approximate floating-point equality assertion.
///
/// ```
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(28.65001_f64, 28.65_f64, 0.001_f64);
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

/// Approximate equality of two bounding-box arrays `[minLon, minLat, maxLon, maxLat]`.
///
/// ```
/// use test_utils::assert_bbox_approx_eq;
///
/// assert_bbox_approx_eq!([77.1, 28.65, 77.105, 28.655], [77.1, 28.65, 77.105, 28.655], 1e-9);
/// ```
#[macro_export]
macro_rules! assert_bbox_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: [f64; 4] = $left;
        let right: [f64; 4] = $right;
        for i in 0..4 {
            $crate::assert_approx_eq!(left[i], right[i], $epsilon);
        }
    }};
}
