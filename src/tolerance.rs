//! Numeric tolerances and limits.
//!
//! These are fixed for the whole crate; no operation accepts a per-call
//! override. Tests and callers compare floating results against
//! [`POINT_EPSILON`] and [`KNOT_EPSILON`].

use num_traits::{Float, ToPrimitive};

/// Maximum distance at which two points are considered equal.
pub const POINT_EPSILON: f64 = 1e-5;

/// Maximum distance at which two knot values are considered equal.
///
/// Tied to [`MAX_NUM_KNOTS`]: `KNOT_EPSILON == 1 / MAX_NUM_KNOTS`.
pub const KNOT_EPSILON: f64 = 1e-4;

/// Vectors shorter than this are treated as having zero length.
pub const LENGTH_ZERO: f64 = 1e-4;

/// Upper bound on the length of a knot vector.
pub const MAX_NUM_KNOTS: usize = 10_000;

/// Sample count used by [`BSpline::sample`](crate::curves::BSpline::sample) when given `0`.
pub const DEFAULT_SAMPLE_COUNT: usize = 100;

/// Chord samples used by equidistant reparametrization when given `0`.
pub const DEFAULT_CHORD_SAMPLES: usize = 200;

/// Returns `true` if two knot values are within [`KNOT_EPSILON`].
#[inline]
pub fn knots_equal<F: Float>(a: F, b: F) -> bool {
    (a - b).abs() < cast(KNOT_EPSILON)
}

/// Divides `num` by `den`, yielding zero when `den` is zero.
///
/// A zero-length knot interval contributes no weight to a blend, which is
/// exactly what repeated knots require.
#[inline]
pub fn safe_div<F: Float>(num: F, den: F) -> F {
    if den.abs() < F::epsilon() {
        F::zero()
    } else {
        num / den
    }
}

/// Converts a primitive into `F`.
///
/// Every `usize`/`f64` fits (possibly rounded) into `f32` and `f64`, so the
/// NaN fallback is never observed for the scalars this crate targets.
#[inline]
pub(crate) fn cast<F: Float, T: ToPrimitive>(value: T) -> F {
    F::from(value).unwrap_or_else(F::nan)
}

/// Converts `F` into `f64` for error reporting.
#[inline]
pub(crate) fn to_f64<F: Float>(value: F) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0_f64, 0.0), 0.0);
        assert_eq!(safe_div(3.0_f64, 2.0), 1.5);
        assert_eq!(safe_div(-0.5_f64, -0.0), 0.0);
    }

    #[test]
    fn test_knots_equal() {
        assert!(knots_equal(0.5_f64, 0.5 + KNOT_EPSILON / 2.0));
        assert!(!knots_equal(0.5_f64, 0.5 + KNOT_EPSILON * 2.0));
    }

    #[test]
    fn test_epsilons_are_consistent() {
        assert_eq!(KNOT_EPSILON, 1.0 / MAX_NUM_KNOTS as f64);
        assert!(POINT_EPSILON < KNOT_EPSILON);
    }

    #[test]
    fn test_cast_f32() {
        let x: f32 = cast(0.25_f64);
        assert_eq!(x, 0.25);
        let n: f64 = cast(7_usize);
        assert_eq!(n, 7.0);
    }
}
