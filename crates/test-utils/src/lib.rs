//! Shared test utilities for the hazard risk workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Float assertion macros
//! - Synthetic hazard layer generators
//! - Fixture directories populated with layer CSV files
//! - Log capture for asserting on emitted warnings
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
//! use test_utils::{assert_approx_eq, create_flood_grid};
//! ```

pub mod fixtures;
pub mod generators;
pub mod logs;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use logs::capture_logs;

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

/// Assert that two grids have the same shape and approximately equal cells.
///
/// NaN cells only match NaN cells.
#[macro_export]
macro_rules! assert_grid_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: &risk_common::Grid = &$left;
        let right: &risk_common::Grid = &$right;
        assert_eq!(left.shape(), right.shape(), "grid shapes differ");
        for (i, (a, b)) in left.values().iter().zip(right.values()).enumerate() {
            if a.is_nan() || b.is_nan() {
                assert!(a.is_nan() && b.is_nan(), "cell {}: {} vs {}", i, a, b);
            } else {
                $crate::assert_approx_eq!(*a, *b, $epsilon);
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use risk_common::Grid;

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_grid_approx_eq_passes() {
        let a = Grid::new(1, 3, vec![1.0, f64::NAN, 3.0]).unwrap();
        let b = Grid::new(1, 3, vec![1.0000001, f64::NAN, 3.0]).unwrap();
        assert_grid_approx_eq!(a, b, 1e-6);
    }

    #[test]
    #[should_panic(expected = "grid shapes differ")]
    fn test_assert_grid_approx_eq_shape_mismatch() {
        assert_grid_approx_eq!(Grid::filled(1, 2, 0.0), Grid::filled(2, 1, 0.0), 1e-6);
    }
}
