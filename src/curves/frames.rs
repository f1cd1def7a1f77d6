//! Rotation-minimizing frames along spatial curves.
//!
//! Frames are propagated with the double reflection method of Wang, Jüttler,
//! Zheng and Liu ("Computation of Rotation Minimizing Frames", 2008): the
//! normal of frame `i` is reflected across the bisector plane of the chord
//! to frame `i + 1`, then across the plane that maps the reflected tangent
//! onto the next tangent.
//!
//! # Example
//!
//! ```
//! use splinum::curves::{compute_frames, BSpline, KnotPolicy};
//!
//! let points: Vec<f64> = vec![
//!     0.0, 0.0, 0.0,
//!     1.0, 1.0, 0.0,
//!     2.0, 0.0, 1.0,
//!     3.0, 1.0, 1.0,
//! ];
//! let spline = BSpline::new(points, 3, 3, KnotPolicy::Clamped).unwrap();
//! let frames = compute_frames(&spline, &spline.uniform_knot_seq(20)).unwrap();
//!
//! assert_eq!(frames.len(), 20);
//! let f = &frames[7];
//! assert!(f.tangent.dot(f.normal).abs() < 1e-9);
//! ```

use super::bspline::BSpline;
use crate::error::SplineError;
use crate::primitives::Vec3;
use crate::tolerance::{cast, to_f64, LENGTH_ZERO};
use num_traits::Float;
use std::cmp::Ordering;
use std::ops::Index;

/// An orthonormal frame attached to a point on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame<F> {
    /// Curve point.
    pub position: Vec3<F>,
    /// Unit first derivative.
    pub tangent: Vec3<F>,
    /// Unit vector perpendicular to the tangent.
    pub normal: Vec3<F>,
    /// `tangent × normal`.
    pub binormal: Vec3<F>,
}

/// The frames computed for a parameter sequence, in parameter order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence<F> {
    frames: Vec<Frame<F>>,
}

impl<F> FrameSequence<F> {
    #[inline]
    pub fn at(&self, index: usize) -> Option<&Frame<F>> {
        self.frames.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame<F>> {
        self.frames.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Frame<F>] {
        &self.frames
    }
}

impl<F> Index<usize> for FrameSequence<F> {
    type Output = Frame<F>;

    fn index(&self, index: usize) -> &Frame<F> {
        &self.frames[index]
    }
}

impl<F> IntoIterator for FrameSequence<F> {
    type Item = Frame<F>;
    type IntoIter = std::vec::IntoIter<Frame<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.into_iter()
    }
}

impl<'a, F> IntoIterator for &'a FrameSequence<F> {
    type Item = &'a Frame<F>;
    type IntoIter = std::slice::Iter<'a, Frame<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Computes rotation-minimizing frames at the strictly ascending `params`.
///
/// The first normal is derived from the world axis least aligned with the
/// first tangent. An empty `params` yields an empty sequence.
///
/// # Errors
///
/// Checked in this order:
/// - [`SplineError::DimensionMismatch`] unless the curve is 3-dimensional.
/// - [`SplineError::NonAscendingParameters`] at the first parameter not
///   greater than its predecessor.
/// - [`SplineError::CannotDeriveConstant`] for a degree-0 curve.
/// - [`SplineError::ParameterOutOfDomain`] from evaluation.
/// - [`SplineError::CurveDegeneracy`] where the derivative vanishes.
pub fn compute_frames<F: Float>(
    curve: &BSpline<F>,
    params: &[F],
) -> Result<FrameSequence<F>, SplineError> {
    propagate(curve, params, None)
}

/// Like [`compute_frames`], but starts from a caller-supplied normal.
///
/// `first_normal` is orthogonalized against the first tangent and
/// normalized.
///
/// # Errors
///
/// As [`compute_frames`], plus [`SplineError::DegenerateNormal`] if
/// `first_normal` is (nearly) parallel to the first tangent.
pub fn compute_frames_with_normal<F: Float>(
    curve: &BSpline<F>,
    params: &[F],
    first_normal: Vec3<F>,
) -> Result<FrameSequence<F>, SplineError> {
    propagate(curve, params, Some(first_normal))
}

fn propagate<F: Float>(
    curve: &BSpline<F>,
    params: &[F],
    first_normal: Option<Vec3<F>>,
) -> Result<FrameSequence<F>, SplineError> {
    if curve.dimension() != 3 {
        return Err(SplineError::DimensionMismatch {
            expected: 3,
            found: curve.dimension(),
        });
    }
    let ascending = |w: &[F]| w[1].partial_cmp(&w[0]) == Some(Ordering::Greater);
    if let Some(i) = params.windows(2).position(|w| !ascending(w)) {
        return Err(SplineError::NonAscendingParameters { index: i + 1 });
    }
    let derivative = curve.derive()?;

    let Some(&u0) = params.first() else {
        return Ok(FrameSequence { frames: Vec::new() });
    };
    log::debug!("computing {} rotation-minimizing frames", params.len());

    let positions = params
        .iter()
        .map(|&u| curve.eval(u).and_then(|p| Vec3::try_from(p.as_slice())))
        .collect::<Result<Vec<_>, _>>()?;
    let velocities = params
        .iter()
        .map(|&u| derivative.eval(u).and_then(|d| Vec3::try_from(d.as_slice())))
        .collect::<Result<Vec<_>, _>>()?;
    let tangents = velocities
        .iter()
        .zip(params)
        .map(|(v, &u)| {
            v.normalize()
                .ok_or(SplineError::CurveDegeneracy { u: to_f64(u) })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let t0 = tangents[0];
    let n0 = match first_normal {
        Some(n) => orthonormalize(n, t0).ok_or(SplineError::DegenerateNormal)?,
        None => orthonormalize(least_aligned_axis(t0), t0)
            .ok_or(SplineError::CurveDegeneracy { u: to_f64(u0) })?,
    };

    let mut frames = Vec::with_capacity(params.len());
    frames.push(Frame {
        position: positions[0],
        tangent: t0,
        normal: n0,
        binormal: t0.cross(n0),
    });

    for i in 1..params.len() {
        let prev = frames[i - 1];
        let (position, tangent) = (positions[i], tangents[i]);
        let normal = double_reflection(&prev, position, tangent, params[i]);
        frames.push(Frame {
            position,
            tangent,
            normal,
            binormal: tangent.cross(normal),
        });
    }

    Ok(FrameSequence { frames })
}

/// Carries `prev.normal` to the frame at `position` with unit `tangent`.
fn double_reflection<F: Float>(
    prev: &Frame<F>,
    position: Vec3<F>,
    tangent: Vec3<F>,
    u: F,
) -> Vec3<F> {
    let two = F::one() + F::one();

    // R1: reflection across the chord's bisector plane.
    let v1 = position - prev.position;
    let c1 = v1.dot(v1);
    let (r_l, t_l) = if c1.sqrt() < cast(LENGTH_ZERO) {
        log::warn!(
            "zero-length chord before u = {}, skipping first reflection",
            to_f64(u)
        );
        (prev.normal, prev.tangent)
    } else {
        let k = two / c1;
        (
            prev.normal - v1 * (k * v1.dot(prev.normal)),
            prev.tangent - v1 * (k * v1.dot(prev.tangent)),
        )
    };

    // R2: maps the reflected tangent onto the new one.
    let v2 = tangent - t_l;
    let c2 = v2.dot(v2);
    let r = if c2 < F::epsilon() {
        r_l
    } else {
        r_l - v2 * ((two / c2) * v2.dot(r_l))
    };

    // Keep the normal exactly perpendicular despite rounding.
    orthonormalize(r, tangent).unwrap_or(r)
}

/// Gram-Schmidt step: the unit component of `v` perpendicular to unit `t`.
fn orthonormalize<F: Float>(v: Vec3<F>, t: Vec3<F>) -> Option<Vec3<F>> {
    (v - t * v.dot(t)).normalize()
}

/// The world axis with the smallest absolute component in `t`.
fn least_aligned_axis<F: Float>(t: Vec3<F>) -> Vec3<F> {
    let (ax, ay, az) = (t.x.abs(), t.y.abs(), t.z.abs());
    if ax <= ay && ax <= az {
        Vec3::unit_x()
    } else if ay <= az {
        Vec3::unit_y()
    } else {
        Vec3::unit_z()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::KnotPolicy;
    use crate::tolerance::POINT_EPSILON;
    use approx::assert_relative_eq;

    const ANGLE_EPSILON: f64 = 1e-3;

    fn spatial_cubic() -> BSpline<f64> {
        let points = vec![
            100.0, 200.0, 0.0, //
            150.0, 220.0, 10.0, //
            190.0, 120.0, 50.0, //
            260.0, 70.0, 30.0, //
            300.0, 200.0, 20.0,
        ];
        BSpline::new(points, 3, 3, KnotPolicy::Clamped).unwrap()
    }

    #[test]
    fn test_frames_follow_curve() {
        let spline = spatial_cubic();
        let derivative = spline.derive().unwrap();
        let params = spline.uniform_knot_seq(50);
        let frames = compute_frames(&spline, &params).unwrap();
        assert_eq!(frames.len(), 50);

        for (frame, &u) in frames.iter().zip(&params) {
            let position = Vec3::try_from(spline.eval(u).unwrap().as_slice()).unwrap();
            assert!(frame.position.distance(position) <= POINT_EPSILON);

            let d = Vec3::try_from(derivative.eval(u).unwrap().as_slice()).unwrap();
            let tangent = d.normalize().unwrap();
            assert!(frame.tangent.distance(tangent) <= POINT_EPSILON);
        }
    }

    #[test]
    fn test_frames_are_orthonormal() {
        let spline = spatial_cubic();
        let frames = compute_frames(&spline, &spline.uniform_knot_seq(100)).unwrap();

        for frame in &frames {
            assert_relative_eq!(frame.normal.angle(frame.tangent), 90.0, epsilon = ANGLE_EPSILON);
            assert_relative_eq!(frame.normal.angle(frame.binormal), 90.0, epsilon = ANGLE_EPSILON);
            assert_relative_eq!(frame.binormal.angle(frame.tangent), 90.0, epsilon = ANGLE_EPSILON);
            assert_relative_eq!(frame.normal.magnitude(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(frame.binormal.magnitude(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_planar_curve_keeps_out_of_plane_normal() {
        let points = vec![
            0.0, 0.0, 0.0, //
            1.0, 2.0, 0.0, //
            3.0, -1.0, 0.0, //
            4.0, 1.0, 0.0,
        ];
        let spline = BSpline::new(points, 3, 3, KnotPolicy::Clamped).unwrap();
        let frames = compute_frames(&spline, &spline.uniform_knot_seq(40)).unwrap();
        for frame in &frames {
            assert_relative_eq!(frame.normal.z.abs(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(frame.binormal.z, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_straight_line_frames_are_constant() {
        let points = vec![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 2.0];
        let line = BSpline::new(points, 3, 2, KnotPolicy::Clamped).unwrap();
        let frames = compute_frames(&line, &line.uniform_knot_seq(10)).unwrap();
        let first = frames[0];
        for frame in frames.iter().skip(1) {
            assert!(frame.tangent.distance(first.tangent) <= POINT_EPSILON);
            assert!(frame.normal.distance(first.normal) <= POINT_EPSILON);
            assert!(frame.binormal.distance(first.binormal) <= POINT_EPSILON);
        }
    }

    #[test]
    fn test_initial_normal_uses_least_aligned_axis() {
        // Tangent along x: the least aligned axis is y.
        let points = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let line = BSpline::new(points, 3, 1, KnotPolicy::Clamped).unwrap();
        let frames = compute_frames(&line, &[0.0, 1.0]).unwrap();
        assert_eq!(frames[0].normal, Vec3::unit_y());
        assert_eq!(frames[0].binormal, Vec3::unit_z());
    }

    #[test]
    fn test_supplied_first_normal() {
        let spline = spatial_cubic();
        let params = spline.uniform_knot_seq(30);
        let frames = compute_frames_with_normal(&spline, &params, Vec3::new(0.0, 0.0, 5.0)).unwrap();
        let t0 = frames[0].tangent;
        let expected = (Vec3::unit_z() - t0 * t0.z).normalize().unwrap();
        assert!(frames[0].normal.distance(expected) <= POINT_EPSILON);
        for frame in &frames {
            assert_relative_eq!(frame.normal.angle(frame.tangent), 90.0, epsilon = ANGLE_EPSILON);
        }

        let line = BSpline::new(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0], 3, 1, KnotPolicy::Clamped)
            .unwrap();
        assert_eq!(
            compute_frames_with_normal(&line, &[0.0, 1.0], Vec3::new(2.0, 0.0, 0.0)),
            Err(SplineError::DegenerateNormal)
        );
    }

    #[test]
    fn test_empty_params() {
        let spline = spatial_cubic();
        let frames = compute_frames(&spline, &[]).unwrap();
        assert!(frames.is_empty());
        assert_eq!(frames.at(0), None);
    }

    #[test]
    fn test_rejects_planar_curve_data() {
        let points = vec![0.0, 0.0, 1.0, 1.0, 2.0, 0.0];
        let spline = BSpline::new(points, 2, 2, KnotPolicy::Clamped).unwrap();
        assert_eq!(
            compute_frames(&spline, &[0.0, 1.0]),
            Err(SplineError::DimensionMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_rejects_non_ascending_params() {
        let spline = spatial_cubic();
        assert_eq!(
            compute_frames(&spline, &[0.0, 0.5, 0.5, 1.0]),
            Err(SplineError::NonAscendingParameters { index: 2 })
        );
        assert_eq!(
            compute_frames(&spline, &[0.5, 0.2]),
            Err(SplineError::NonAscendingParameters { index: 1 })
        );
    }

    #[test]
    fn test_rejects_constant_curve() {
        let spline = BSpline::new(vec![1.0, 2.0, 3.0], 3, 0, KnotPolicy::Clamped).unwrap();
        assert_eq!(
            compute_frames(&spline, &[0.5]),
            Err(SplineError::CannotDeriveConstant)
        );
    }

    #[test]
    fn test_rejects_out_of_domain() {
        let spline = spatial_cubic();
        assert!(matches!(
            compute_frames(&spline, &[0.5, 1.5]),
            Err(SplineError::ParameterOutOfDomain { .. })
        ));
    }

    #[test]
    fn test_rejects_vanishing_derivative() {
        // The first span has coincident control points.
        let points = vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        let spline = BSpline::new(points, 3, 1, KnotPolicy::Clamped).unwrap();
        assert_eq!(
            compute_frames(&spline, &[0.0, 0.75]),
            Err(SplineError::CurveDegeneracy { u: 0.0 })
        );
    }
}
