//! Shared test utilities for the glorys-merge workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic source grid generators
//! - Common bounding box and axis fixtures
//! - Temporary directory helpers for NetCDF round trips
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
//! use test_utils::{SourceGridBuilder, fixtures};
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use generators::*;
pub use paths::*;

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

/// Macro for approximate equality of `(lat, lon)` pairs.
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((10.5001, -69.5), (10.5, -69.5), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Asserts two coordinate axes hold bit-identical values.
#[macro_export]
macro_rules! assert_axis_identical {
    ($left:expr, $right:expr) => {{
        let left = &$left;
        let right = &$right;
        if let Some((index, l, r)) = left.first_difference(right) {
            panic!(
                "axes differ at index {}: `{:?}` vs `{:?}` (lengths {} and {})",
                index,
                l,
                r,
                left.len(),
                right.len()
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_axis_identical_passes() {
        let axis = ascending_axis(10.0, 0.5, 5);
        assert_axis_identical!(axis, axis.clone());
    }

    #[test]
    #[should_panic(expected = "axes differ")]
    fn test_assert_axis_identical_fails_on_noise() {
        let axis = ascending_axis(10.0, 0.5, 5);
        assert_axis_identical!(axis, jitter_axis(&axis, 1e-9));
    }
}
