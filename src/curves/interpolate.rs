//! Interpolating curve constructors.
//!
//! Both constructors return a cubic [`BSpline`] built from chained Bézier
//! segments ([`KnotPolicy::Beziers`]), so the result passes through every
//! input point at the segment joints.
//!
//! # Example
//!
//! ```
//! use splinum::curves::interpolate_cubic_natural;
//!
//! let points = [0.0, 0.0, 1.0, 2.0, 3.0, 1.0];
//! let spline = interpolate_cubic_natural(&points, 2).unwrap();
//!
//! // Two segments, joined at u = 0.5.
//! let joint = spline.eval(0.5).unwrap();
//! assert!((joint[0] - 1.0_f64).abs() < 1e-9);
//! assert!((joint[1] - 2.0_f64).abs() < 1e-9);
//! ```

use super::bspline::{row_count, BSpline};
use super::knots::KnotPolicy;
use crate::error::SplineError;
use crate::linalg::solve_tridiagonal;
use crate::primitives::ops;
use num_traits::Float;

/// Interpolates `points` with a natural cubic spline.
///
/// `points` is a flat buffer of `dimension`-sized rows. The tangents `T_i`
/// at the points solve the tridiagonal system
///
/// ```text
/// 2 T0     +   T1           = 3 (P1 - P0)
///   T(i-1) + 4 Ti + T(i+1)  = 3 (P(i+1) - P(i-1))
///   T(m-2) + 2 T(m-1)       = 3 (P(m-1) - P(m-2))
/// ```
///
/// and each segment becomes the Bézier quadruple
/// `{Pi, Pi + Ti/3, P(i+1) - T(i+1)/3, P(i+1)}`. The result has
/// `4 (m - 1)` control points and a `[0, 1]` domain.
///
/// # Errors
///
/// - [`SplineError::InvalidDimension`] if `dimension == 0`.
/// - [`SplineError::ControlPointLength`] if the buffer does not split into rows.
/// - [`SplineError::InsufficientPoints`] for fewer than two points.
pub fn interpolate_cubic_natural<F: Float>(
    points: &[F],
    dimension: usize,
) -> Result<BSpline<F>, SplineError> {
    let m = row_count(points.len(), dimension)?;
    if m < 2 {
        return Err(SplineError::InsufficientPoints {
            count: m,
            required: 2,
        });
    }
    log::debug!("natural cubic interpolation of {m} points in {dimension}D");

    let tangents = natural_tangents(points, m, dimension)?;
    let third = F::one() / (F::one() + F::one() + F::one());

    let mut control_points = Vec::with_capacity(4 * (m - 1) * dimension);
    for i in 0..m - 1 {
        let p0 = &points[i * dimension..(i + 1) * dimension];
        let p1 = &points[(i + 1) * dimension..(i + 2) * dimension];
        let t0 = &tangents[i * dimension..(i + 1) * dimension];
        let t1 = &tangents[(i + 1) * dimension..(i + 2) * dimension];
        push_bezier(&mut control_points, p0, p1, |d| t0[d] * third, |d| t1[d] * third);
    }

    BSpline::new(control_points, dimension, 3, KnotPolicy::Beziers)
}

/// Solves the natural end-condition tangent system for all coordinates.
fn natural_tangents<F: Float>(
    points: &[F],
    m: usize,
    dimension: usize,
) -> Result<Vec<F>, SplineError> {
    let one = F::one();
    let two = one + one;
    let three = two + one;
    let four = two + two;

    let lower: Vec<F> = (0..m).map(|i| if i == 0 { F::zero() } else { one }).collect();
    let upper: Vec<F> = (0..m).map(|i| if i + 1 == m { F::zero() } else { one }).collect();
    let diag: Vec<F> = (0..m)
        .map(|i| if i == 0 || i + 1 == m { two } else { four })
        .collect();

    let row = |i: usize| &points[i * dimension..(i + 1) * dimension];
    let mut rhs = Vec::with_capacity(m * dimension);
    for i in 0..m {
        let (a, b) = (row(i.saturating_sub(1)), row((i + 1).min(m - 1)));
        rhs.extend(a.iter().zip(b).map(|(&a, &b)| three * (b - a)));
    }

    solve_tridiagonal(&lower, &diag, &upper, &mut rhs, dimension)?;
    Ok(rhs)
}

/// Interpolates `points` with a Catmull-Rom spline.
///
/// `alpha` selects the knot parametrization and is clamped to `[0, 1]`:
/// `0` is uniform, `0.5` centripetal and `1` chordal. Consecutive points
/// within `epsilon` of each other are merged first. `first` and `last`
/// are optional phantom points that shape the end tangents; when absent,
/// or within `epsilon` of the adjacent end point, the second (or
/// second-to-last) point is mirrored instead.
///
/// If a single point remains after merging, the result is a cubic whose
/// four control points all equal that point.
///
/// # Errors
///
/// - [`SplineError::InvalidDimension`] if `dimension == 0`.
/// - [`SplineError::ControlPointLength`] if the buffer does not split into rows.
/// - [`SplineError::InsufficientPoints`] if `points` is empty.
/// - [`SplineError::DimensionMismatch`] if a phantom point has the wrong length.
pub fn interpolate_catmull_rom<F: Float>(
    points: &[F],
    dimension: usize,
    alpha: F,
    first: Option<&[F]>,
    last: Option<&[F]>,
    epsilon: F,
) -> Result<BSpline<F>, SplineError> {
    let count = row_count(points.len(), dimension)?;
    if count == 0 {
        return Err(SplineError::InsufficientPoints {
            count: 0,
            required: 1,
        });
    }
    for point in [first, last].into_iter().flatten() {
        if point.len() != dimension {
            return Err(SplineError::DimensionMismatch {
                expected: dimension,
                found: point.len(),
            });
        }
    }
    let alpha = alpha.max(F::zero()).min(F::one());
    let eps = epsilon.abs();

    // Drop points that coincide with their predecessor.
    let mut rows: Vec<&[F]> = Vec::with_capacity(count + 2);
    for point in points.chunks_exact(dimension) {
        match rows.last() {
            Some(prev) if ops::distance(prev, point) <= eps => {}
            _ => rows.push(point),
        }
    }
    log::debug!(
        "catmull-rom interpolation of {} points ({} after merging) in {dimension}D",
        count,
        rows.len()
    );

    if rows.len() == 1 {
        let control_points = rows[0].repeat(4);
        return BSpline::new(control_points, dimension, 3, KnotPolicy::Beziers);
    }

    let n = rows.len();
    let head = phantom(first, rows[0], rows[1], eps);
    let tail = phantom(last, rows[n - 1], rows[n - 2], eps);

    let mut chain: Vec<&[F]> = Vec::with_capacity(n + 2);
    chain.push(&head);
    chain.extend_from_slice(&rows);
    chain.push(&tail);

    let third = F::one() / (F::one() + F::one() + F::one());
    let mut control_points = Vec::with_capacity(4 * (n - 1) * dimension);
    for window in chain.windows(4) {
        let [p0, p1, p2, p3] = [window[0], window[1], window[2], window[3]];

        let t0 = F::zero();
        let t1 = t0 + ops::distance(p0, p1).powf(alpha);
        let t2 = t1 + ops::distance(p1, p2).powf(alpha);
        let t3 = t2 + ops::distance(p2, p3).powf(alpha);

        let c1 = (t2 - t1) / (t2 - t0);
        let c2 = (t1 - t0) / (t2 - t0);
        let d1 = (t3 - t2) / (t3 - t1);
        let d2 = (t2 - t1) / (t3 - t1);

        let m1 = |d: usize| {
            (t2 - t1) * (c1 * (p1[d] - p0[d]) / (t1 - t0) + c2 * (p2[d] - p1[d]) / (t2 - t1))
        };
        let m2 = |d: usize| {
            (t2 - t1) * (d1 * (p2[d] - p1[d]) / (t2 - t1) + d2 * (p3[d] - p2[d]) / (t3 - t2))
        };
        push_bezier(
            &mut control_points,
            p1,
            p2,
            |d| m1(d) * third,
            |d| m2(d) * third,
        );
    }

    BSpline::new(control_points, dimension, 3, KnotPolicy::Beziers)
}

/// Returns `given` if it is farther than `eps` from `end`, otherwise `end`
/// mirrored across `neighbor`.
fn phantom<F: Float>(given: Option<&[F]>, end: &[F], neighbor: &[F], eps: F) -> Vec<F> {
    match given {
        Some(point) if ops::distance(point, end) > eps => point.to_vec(),
        _ => end
            .iter()
            .zip(neighbor)
            .map(|(&e, &n)| e + (e - n))
            .collect(),
    }
}

/// Appends the cubic Bézier `{p0, p0 + h0, p1 - h1, p1}`.
fn push_bezier<F: Float>(
    out: &mut Vec<F>,
    p0: &[F],
    p1: &[F],
    h0: impl Fn(usize) -> F,
    h1: impl Fn(usize) -> F,
) {
    out.extend_from_slice(p0);
    out.extend(p0.iter().enumerate().map(|(d, &v)| v + h0(d)));
    out.extend(p1.iter().enumerate().map(|(d, &v)| v - h1(d)));
    out.extend_from_slice(p1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tolerance::POINT_EPSILON;
    use approx::assert_relative_eq;

    fn assert_points_eq(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert_relative_eq!(*a, *e, epsilon = POINT_EPSILON);
        }
    }

    #[test]
    fn test_natural_cubic_five_points() {
        let points = [1.0, -1.0, -1.0, 2.0, 1.0, 4.0, 4.0, 3.0, 7.0, 5.0];
        let spline = interpolate_cubic_natural(&points, 2).unwrap();

        assert_eq!(spline.degree(), 3);
        assert_eq!(spline.num_control_points(), 16);
        assert_points_eq(
            spline.control_points(),
            &[
                1.0, -1.0, 0.0, 0.0, -1.0, 1.0, -1.0, 2.0, //
                -1.0, 2.0, -1.0, 3.0, 0.0, 4.0, 1.0, 4.0, //
                1.0, 4.0, 2.0, 4.0, 3.0, 3.0, 4.0, 3.0, //
                4.0, 3.0, 5.0, 3.0, 6.0, 4.0, 7.0, 5.0,
            ],
        );

        let knots = spline.knots().as_slice();
        assert_eq!(knots.len(), 20);
        for (i, &knot) in knots.iter().enumerate() {
            assert_relative_eq!(knot, (i / 4) as f64 * 0.25, epsilon = 1e-12);
        }

        // Passes through every input point at the segment joints.
        for (i, point) in points.chunks_exact(2).enumerate() {
            let u = i as f64 * 0.25;
            assert_points_eq(&spline.eval(u).unwrap(), point);
        }
    }

    #[test]
    fn test_natural_cubic_two_points_is_line() {
        let spline = interpolate_cubic_natural(&[0.0, 0.0, 3.0, 3.0], 2).unwrap();
        assert_points_eq(
            spline.control_points(),
            &[0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0],
        );
        assert_points_eq(&spline.eval(0.5).unwrap(), &[1.5, 1.5]);
    }

    #[test]
    fn test_natural_cubic_collinear() {
        let points = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let spline = interpolate_cubic_natural(&points, 3).unwrap();
        for point in spline.sample(25).unwrap() {
            assert_relative_eq!(point[0], point[1], epsilon = 1e-12);
            assert_relative_eq!(point[1], point[2], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_natural_cubic_errors() {
        assert_eq!(
            interpolate_cubic_natural(&[1.0, 2.0], 2).unwrap_err(),
            SplineError::InsufficientPoints {
                count: 1,
                required: 2
            }
        );
        assert_eq!(
            interpolate_cubic_natural::<f64>(&[], 2).unwrap_err(),
            SplineError::InsufficientPoints {
                count: 0,
                required: 2
            }
        );
        assert_eq!(
            interpolate_cubic_natural(&[1.0, 2.0, 3.0], 2).unwrap_err(),
            SplineError::ControlPointLength {
                len: 3,
                dimension: 2
            }
        );
        assert_eq!(
            interpolate_cubic_natural(&[1.0, 2.0], 0).unwrap_err(),
            SplineError::InvalidDimension { dimension: 0 }
        );
    }

    #[test]
    fn test_catmull_rom_uniform() {
        let points = [0.0, 0.0, 1.0, 1.0, 2.0, 0.0];
        let spline = interpolate_catmull_rom(&points, 2, 0.0, None, None, POINT_EPSILON).unwrap();
        assert_eq!(spline.num_control_points(), 8);

        // Mirrored phantoms (-1,-1) and (3,-1); uniform tangents (p2 - p0) / 2.
        assert_points_eq(
            &spline.control_points()[..8],
            &[0.0, 0.0, 1.0 / 3.0, 1.0 / 3.0, 2.0 / 3.0, 1.0, 1.0, 1.0],
        );
        assert_points_eq(&spline.eval(0.5).unwrap(), &[1.0, 1.0]);
        assert_points_eq(&spline.eval(1.0).unwrap(), &[2.0, 0.0]);
    }

    #[test]
    fn test_catmull_rom_passes_through_points() {
        let points = [0.0, 0.0, 1.0, 2.0, 3.0, 2.5, 4.0, 0.0];
        let spline = interpolate_catmull_rom(&points, 2, 0.5, None, None, POINT_EPSILON).unwrap();
        for (i, point) in points.chunks_exact(2).enumerate() {
            let u = i as f64 / 3.0;
            assert_points_eq(&spline.eval(u).unwrap(), point);
        }
    }

    #[test]
    fn test_catmull_rom_phantoms() {
        let points = [0.0, 0.0, 1.0, 0.0];
        let first = [0.0, -1.0];
        let mirrored = interpolate_catmull_rom(&points, 2, 0.0, None, None, 0.0).unwrap();
        let shaped =
            interpolate_catmull_rom(&points, 2, 0.0, Some(&first[..]), None, 0.0).unwrap();
        assert_ne!(mirrored.control_point(1), shaped.control_point(1));

        // A phantom on top of the end point is ignored.
        let ignored =
            interpolate_catmull_rom(&points, 2, 0.0, Some(&[0.0, 0.0][..]), None, 0.0).unwrap();
        assert_eq!(mirrored, ignored);

        assert!(matches!(
            interpolate_catmull_rom(&points, 2, 0.0, Some(&[0.0][..]), None, 0.0),
            Err(SplineError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_catmull_rom_merges_duplicates() {
        let points = [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0 + 1e-9, 2.0, 0.0];
        let spline = interpolate_catmull_rom(&points, 2, 0.5, None, None, 1e-6).unwrap();
        assert_eq!(spline.num_control_points(), 8);
    }

    #[test]
    fn test_catmull_rom_single_point() {
        let points = [2.0, 3.0, 2.0, 3.0];
        let spline = interpolate_catmull_rom(&points, 2, 0.5, None, None, POINT_EPSILON).unwrap();
        assert_eq!(spline.degree(), 3);
        assert_eq!(spline.num_control_points(), 4);
        assert!(spline.control_points_iter().all(|p| p == [2.0, 3.0]));

        assert_eq!(
            interpolate_catmull_rom::<f64>(&[], 2, 0.5, None, None, POINT_EPSILON).unwrap_err(),
            SplineError::InsufficientPoints {
                count: 0,
                required: 1
            }
        );
    }
}
