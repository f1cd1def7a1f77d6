//! Vector helpers on plain slices, for points of any dimension.
//!
//! Control points are stored as flat rows of `dimension` scalars; these
//! functions operate on such rows directly. Mismatched lengths are
//! truncated to the shorter slice.

use crate::tolerance::{cast, LENGTH_ZERO};
use num_traits::Float;

/// Computes the dot product of two vectors.
#[inline]
pub fn dot<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter()
        .zip(b)
        .fold(F::zero(), |acc, (&x, &y)| acc + x * y)
}

/// Returns the Euclidean length of a vector.
#[inline]
pub fn magnitude<F: Float>(a: &[F]) -> F {
    dot(a, a).sqrt()
}

/// Returns the Euclidean distance between two points.
#[inline]
pub fn distance<F: Float>(a: &[F], b: &[F]) -> F {
    a.iter()
        .zip(b)
        .fold(F::zero(), |acc, (&x, &y)| acc + (x - y) * (x - y))
        .sqrt()
}

/// Returns `a - b`.
#[inline]
pub fn sub<F: Float>(a: &[F], b: &[F]) -> Vec<F> {
    a.iter().zip(b).map(|(&x, &y)| x - y).collect()
}

/// Returns the unit vector pointing along `a`.
///
/// Returns `None` if `a` is shorter than [`LENGTH_ZERO`].
pub fn normalize<F: Float>(a: &[F]) -> Option<Vec<F>> {
    let mag = magnitude(a);
    if mag < cast(LENGTH_ZERO) {
        return None;
    }
    Some(a.iter().map(|&x| x / mag).collect())
}

/// Returns the angle between two vectors in degrees.
///
/// A zero-length vector is orthogonal to everything, so its angle to any
/// other vector is 90°.
pub fn angle<F: Float>(a: &[F], b: &[F]) -> F {
    angle_between(dot(a, b), magnitude(a), magnitude(b))
}

/// Angle in degrees from a dot product and the two magnitudes.
#[inline]
pub(crate) fn angle_between<F: Float>(dot: F, mag_a: F, mag_b: F) -> F {
    let denom = mag_a * mag_b;
    let cos = if denom < F::epsilon() {
        F::zero()
    } else {
        (dot / denom).max(-F::one()).min(F::one())
    };
    cos.acos().to_degrees()
}
