//! B-spline curves of arbitrary degree and dimension.
//!
//! Control points are stored as one flat buffer of `dimension`-sized rows,
//! so the same type covers planar, spatial and higher-dimensional curves.
//! A curve is an immutable value: every transformation (derivative,
//! tension, replaced control points or knots) returns a new curve.
//!
//! # Example
//!
//! ```
//! use splinum::curves::{BSpline, KnotPolicy};
//!
//! // A planar cubic with a clamped knot vector.
//! let control_points = vec![
//!     0.0, 0.0,
//!     1.0, 2.0,
//!     2.0, 2.0,
//!     3.0, 0.0,
//!     4.0, 1.0,
//! ];
//! let spline = BSpline::new(control_points, 2, 3, KnotPolicy::Clamped).unwrap();
//!
//! // Clamped curves start at their first control point.
//! let start = spline.eval(0.0).unwrap();
//! assert_eq!(start, vec![0.0, 0.0]);
//! ```

use super::chord::ChordLengths;
use super::knots::{KnotPolicy, KnotVector};
use crate::error::SplineError;
use crate::primitives::ops;
use crate::tolerance::{
    cast, knots_equal, safe_div, to_f64, DEFAULT_CHORD_SAMPLES, DEFAULT_SAMPLE_COUNT,
};
use num_traits::Float;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A B-spline curve.
///
/// Holds `n + 1` control points of `dimension` components each, a degree
/// `p <= n` and a knot vector of `n + p + 2` knots. The curve is defined on
/// the domain `[U[p], U[n+1]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BSpline<F> {
    degree: usize,
    dimension: usize,
    control_points: Vec<F>,
    knots: KnotVector<F>,
}

/// Result of [`BSpline::bisect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Bisection<F> {
    /// The last evaluated parameter.
    pub parameter: F,
    /// The curve point at `parameter`.
    pub point: Vec<F>,
    /// Number of evaluations performed.
    pub iterations: usize,
    /// Whether the searched component came within tolerance of the target.
    pub converged: bool,
}

impl<F: Float> BSpline<F> {
    /// Creates a curve whose knot vector is generated from `policy`.
    ///
    /// `control_points` is a flat buffer of rows with `dimension` components.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InvalidDimension`] if `dimension == 0`.
    /// - [`SplineError::ControlPointLength`] if the buffer does not split into rows.
    /// - Any error of [`KnotVector::generate`].
    pub fn new(
        control_points: Vec<F>,
        dimension: usize,
        degree: usize,
        policy: KnotPolicy,
    ) -> Result<Self, SplineError> {
        let count = row_count(control_points.len(), dimension)?;
        let knots = KnotVector::generate(count, degree, policy)?;
        Ok(Self {
            degree,
            dimension,
            control_points,
            knots,
        })
    }

    /// Creates a curve with an explicit knot vector.
    ///
    /// # Errors
    ///
    /// As [`new`](Self::new), plus any error of [`KnotVector::from_knots`].
    pub fn with_knots(
        control_points: Vec<F>,
        dimension: usize,
        degree: usize,
        knots: Vec<F>,
    ) -> Result<Self, SplineError> {
        let count = row_count(control_points.len(), dimension)?;
        let knots = KnotVector::from_knots(knots, count, degree)?;
        Ok(Self {
            degree,
            dimension,
            control_points,
            knots,
        })
    }

    /// Polynomial degree of each piece.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Degree plus one.
    #[inline]
    pub fn order(&self) -> usize {
        self.degree + 1
    }

    /// Number of components per control point.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn num_control_points(&self) -> usize {
        self.control_points.len() / self.dimension
    }

    /// The control points as one flat buffer.
    #[inline]
    pub fn control_points(&self) -> &[F] {
        &self.control_points
    }

    /// Returns control point `index`, or `None` if out of range.
    pub fn control_point(&self, index: usize) -> Option<&[F]> {
        let start = index.checked_mul(self.dimension)?;
        let end = start.checked_add(self.dimension)?;
        self.control_points.get(start..end)
    }

    /// Iterates over the control points.
    pub fn control_points_iter(&self) -> std::slice::ChunksExact<'_, F> {
        self.control_points.chunks_exact(self.dimension)
    }

    #[inline]
    pub fn knots(&self) -> &KnotVector<F> {
        &self.knots
    }

    /// Returns the valid parameter range `(U[p], U[n+1])`.
    #[inline]
    pub fn domain(&self) -> (F, F) {
        self.knots.domain(self.degree)
    }

    /// Returns a copy of this curve with all control points replaced.
    ///
    /// # Errors
    ///
    /// [`SplineError::DimensionMismatch`] if the buffer length changes.
    pub fn with_control_points(&self, control_points: Vec<F>) -> Result<Self, SplineError> {
        if control_points.len() != self.control_points.len() {
            return Err(SplineError::DimensionMismatch {
                expected: self.control_points.len(),
                found: control_points.len(),
            });
        }
        Ok(Self {
            control_points,
            ..self.clone()
        })
    }

    /// Returns a copy of this curve with control point `index` replaced.
    ///
    /// # Errors
    ///
    /// - [`SplineError::IndexOutOfRange`] if `index` is past the last point.
    /// - [`SplineError::DimensionMismatch`] if `point` has the wrong length.
    pub fn with_control_point_at(&self, index: usize, point: &[F]) -> Result<Self, SplineError> {
        let len = self.num_control_points();
        if index >= len {
            return Err(SplineError::IndexOutOfRange { index, len });
        }
        if point.len() != self.dimension {
            return Err(SplineError::DimensionMismatch {
                expected: self.dimension,
                found: point.len(),
            });
        }
        let mut control_points = self.control_points.clone();
        let start = index * self.dimension;
        control_points[start..start + self.dimension].copy_from_slice(point);
        Ok(Self {
            control_points,
            ..self.clone()
        })
    }

    /// Returns a copy of this curve with a different knot vector.
    ///
    /// # Errors
    ///
    /// Any error of [`KnotVector::from_knots`].
    pub fn with_knot_vector(&self, knots: Vec<F>) -> Result<Self, SplineError> {
        let knots = KnotVector::from_knots(knots, self.num_control_points(), self.degree)?;
        Ok(Self {
            knots,
            ..self.clone()
        })
    }

    /// Evaluates the curve at parameter `u` using de Boor's algorithm.
    ///
    /// A parameter within [`KNOT_EPSILON`](crate::tolerance::KNOT_EPSILON) of
    /// a domain bound is snapped onto that bound. At the upper bound the last
    /// span of non-zero length is used.
    ///
    /// # Errors
    ///
    /// [`SplineError::ParameterOutOfDomain`] if `u` lies outside the domain
    /// (or is NaN).
    pub fn eval(&self, u: F) -> Result<Vec<F>, SplineError> {
        let u = self.snap_to_domain(u)?;
        let k = self.find_knot_span(u);
        Ok(self.de_boor(u, k))
    }

    fn snap_to_domain(&self, u: F) -> Result<F, SplineError> {
        let (min, max) = self.domain();
        if u >= min && u <= max {
            Ok(u)
        } else if knots_equal(u, min) {
            Ok(min)
        } else if knots_equal(u, max) {
            Ok(max)
        } else {
            Err(SplineError::ParameterOutOfDomain {
                u: to_f64(u),
                min: to_f64(min),
                max: to_f64(max),
            })
        }
    }

    /// Finds the knot span index `k` with `U[k] <= u < U[k+1]`, `p <= k <= n`.
    fn find_knot_span(&self, u: F) -> usize {
        let knots = self.knots.as_slice();
        let n = self.num_control_points();
        let p = self.degree;

        // At the end of the domain: the last span with non-zero length.
        if u >= knots[n] {
            let mut k = n - 1;
            while k > p && knots[k] >= knots[n] {
                k -= 1;
            }
            return k;
        }

        // Binary search for knot span
        let mut low = p;
        let mut high = n;
        while low < high {
            let mid = (low + high) / 2;
            if u < knots[mid] {
                high = mid;
            } else {
                low = mid + 1;
            }
        }

        low - 1
    }

    /// de Boor's algorithm for B-spline evaluation.
    fn de_boor(&self, u: F, k: usize) -> Vec<F> {
        let p = self.degree;
        let dim = self.dimension;
        let knots = self.knots.as_slice();

        // Copy the p + 1 affected control points
        let mut d = self.control_points[(k - p) * dim..(k + 1) * dim].to_vec();

        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = k - p + j;
                let alpha = safe_div(u - knots[i], knots[i + p - r + 1] - knots[i]);
                let beta = F::one() - alpha;
                for c in 0..dim {
                    d[j * dim + c] = beta * d[(j - 1) * dim + c] + alpha * d[j * dim + c];
                }
            }
        }

        d.split_off(p * dim)
    }

    /// Computes the derivative curve.
    ///
    /// The derivative of a degree-`p` curve is a degree-`p - 1` curve on the
    /// same domain, with control points
    /// `Q_i = p * (P[i+1] - P[i]) / (U[i+p+1] - U[i+1])` and the knot vector
    /// stripped of its first and last knot. Zero-length knot intervals give
    /// a zero control point.
    ///
    /// # Errors
    ///
    /// [`SplineError::CannotDeriveConstant`] if the degree is 0.
    pub fn derive(&self) -> Result<Self, SplineError> {
        if self.degree == 0 {
            return Err(SplineError::CannotDeriveConstant);
        }

        let p = self.degree;
        let knots = self.knots.as_slice();
        let p_f: F = cast(p);

        let dim = self.dimension;
        let mut control_points = Vec::with_capacity(self.control_points.len() - dim);
        let pairs = self.control_points.windows(2 * dim).step_by(dim);
        for (i, pair) in pairs.enumerate() {
            let factor = safe_div(p_f, knots[i + p + 1] - knots[i + 1]);
            let (a, b) = pair.split_at(dim);
            control_points.extend(a.iter().zip(b).map(|(&x, &y)| (y - x) * factor));
        }

        Ok(Self {
            degree: p - 1,
            dimension: dim,
            control_points,
            knots: self.knots.trimmed(),
        })
    }

    /// Applies [`derive`](Self::derive) `n` times. `n == 0` returns a copy.
    ///
    /// # Errors
    ///
    /// [`SplineError::CannotDeriveConstant`] if `n` exceeds the degree.
    pub fn derive_n(&self, n: usize) -> Result<Self, SplineError> {
        (0..n).try_fold(self.clone(), |curve, _| curve.derive())
    }

    /// Returns `count` parameters evenly spaced over the domain, including
    /// both ends.
    ///
    /// The first value is exactly the domain minimum and the last exactly
    /// the maximum. `count == 1` yields the minimum only.
    pub fn uniform_knot_seq(&self, count: usize) -> Vec<F> {
        let (min, max) = self.domain();
        match count {
            0 => Vec::new(),
            1 => vec![min],
            _ => {
                let last = count - 1;
                let step = (max - min) / cast(last);
                (0..count)
                    .map(|i| {
                        if i == last {
                            max
                        } else {
                            min + step * cast(i)
                        }
                    })
                    .collect()
            }
        }
    }

    /// Returns `true` if the curve's ends meet and its derivatives up to
    /// order `degree - 1` agree there, each within `epsilon`.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors (none occur for a valid curve).
    pub fn is_closed(&self, epsilon: F) -> Result<bool, SplineError> {
        let mut curve = self.clone();
        for order in 0..self.degree.max(1) {
            if order > 0 {
                curve = curve.derive()?;
            }
            let (min, max) = curve.domain();
            let first = curve.eval(min)?;
            let last = curve.eval(max)?;
            if ops::distance(&first, &last) > epsilon {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Pulls the control points toward the straight line from the first to
    /// the last control point.
    ///
    /// `beta` is clamped to `[0, 1]`; `1` keeps the curve unchanged and `0`
    /// flattens it onto the line.
    pub fn tension(&self, beta: F) -> Self {
        let beta = beta.max(F::zero()).min(F::one());
        let s = F::one() - beta;
        let n = self.num_control_points();
        let dim = self.dimension;
        let first = &self.control_points[..dim];
        let last = &self.control_points[(n - 1) * dim..];

        let mut control_points = Vec::with_capacity(self.control_points.len());
        for (i, row) in self.control_points_iter().enumerate() {
            let t = safe_div(cast(i), cast(n - 1));
            for c in 0..dim {
                let on_line = first[c] + (last[c] - first[c]) * t;
                control_points.push(beta * row[c] + s * on_line);
            }
        }

        Self {
            control_points,
            ..self.clone()
        }
    }

    /// Searches the domain for a parameter whose `component` equals `value`.
    ///
    /// Bisects the domain, assuming `component` is monotonic along the curve
    /// (increasing if `ascending`, otherwise decreasing). Stops once the
    /// component is within `epsilon` of `value` or after `max_iterations`
    /// evaluations; in the latter case the result reports
    /// `converged == false` with the last evaluated parameter.
    ///
    /// # Errors
    ///
    /// - [`SplineError::IndexOutOfRange`] if `component >= dimension`.
    /// - [`SplineError::InsufficientPoints`] if `max_iterations == 0`.
    pub fn bisect(
        &self,
        value: F,
        epsilon: F,
        component: usize,
        ascending: bool,
        max_iterations: usize,
    ) -> Result<Bisection<F>, SplineError> {
        if component >= self.dimension {
            return Err(SplineError::IndexOutOfRange {
                index: component,
                len: self.dimension,
            });
        }

        if max_iterations == 0 {
            return Err(SplineError::InsufficientPoints {
                count: 0,
                required: 1,
            });
        }

        let eps = epsilon.abs();
        let two = F::one() + F::one();
        let (mut low, mut high) = self.domain();
        let mut iteration = 0;
        loop {
            iteration += 1;
            let mid = (low + high) / two;
            let point = self.eval(mid)?;
            let coord = point[component];
            let converged = (coord - value).abs() <= eps;
            if converged || iteration >= max_iterations {
                return Ok(Bisection {
                    parameter: mid,
                    point,
                    iterations: iteration,
                    converged,
                });
            }
            if (coord < value) == ascending {
                low = mid;
            } else {
                high = mid;
            }
        }
    }

    /// Computes cumulative chord lengths of the polyline through the curve
    /// points at `params`.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InsufficientPoints`] if `params` is empty.
    /// - [`SplineError::NonAscendingParameters`] at the first decreasing parameter.
    /// - [`SplineError::ParameterOutOfDomain`] from evaluation.
    pub fn chord_lengths(&self, params: &[F]) -> Result<ChordLengths<F>, SplineError> {
        let Some((&first, rest)) = params.split_first() else {
            return Err(SplineError::InsufficientPoints {
                count: 0,
                required: 1,
            });
        };

        let mut lengths = Vec::with_capacity(params.len());
        lengths.push(F::zero());
        let mut prev = self.eval(first)?;
        let mut total = F::zero();
        for (i, &u) in rest.iter().enumerate() {
            if u < params[i] {
                return Err(SplineError::NonAscendingParameters { index: i + 1 });
            }
            let cur = self.eval(u)?;
            total = total + ops::distance(&prev, &cur);
            lengths.push(total);
            prev = cur;
        }

        Ok(ChordLengths::new(params.to_vec(), lengths))
    }

    /// Returns `count` parameters whose curve points are (approximately)
    /// equally spaced by arc length.
    ///
    /// Arc length is approximated from `num_samples` chord samples; `0`
    /// selects [`DEFAULT_CHORD_SAMPLES`].
    ///
    /// # Errors
    ///
    /// Propagates errors of [`chord_lengths`](Self::chord_lengths).
    pub fn equidistant_knot_seq(
        &self,
        count: usize,
        num_samples: usize,
    ) -> Result<Vec<F>, SplineError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let num_samples = if num_samples == 0 {
            DEFAULT_CHORD_SAMPLES
        } else {
            num_samples
        };
        let samples = self.uniform_knot_seq(num_samples);
        Ok(self.chord_lengths(&samples)?.equidistant_knot_seq(count))
    }
}

impl<F: Float + Send + Sync> BSpline<F> {
    /// Evaluates the curve at every parameter in `params`.
    ///
    /// With the `parallel` feature, evaluations run on the rayon thread pool.
    ///
    /// # Errors
    ///
    /// [`SplineError::ParameterOutOfDomain`] for the first rejected parameter.
    pub fn eval_all(&self, params: &[F]) -> Result<Vec<Vec<F>>, SplineError> {
        eval_many(self, params)
    }

    /// Evaluates `count` points evenly spaced over the domain.
    ///
    /// `count == 0` selects [`DEFAULT_SAMPLE_COUNT`].
    pub fn sample(&self, count: usize) -> Result<Vec<Vec<F>>, SplineError> {
        let count = if count == 0 {
            DEFAULT_SAMPLE_COUNT
        } else {
            count
        };
        self.eval_all(&self.uniform_knot_seq(count))
    }
}

#[cfg(feature = "parallel")]
fn eval_many<F: Float + Send + Sync>(
    spline: &BSpline<F>,
    params: &[F],
) -> Result<Vec<Vec<F>>, SplineError> {
    params.par_iter().map(|&u| spline.eval(u)).collect()
}

#[cfg(not(feature = "parallel"))]
fn eval_many<F: Float + Send + Sync>(
    spline: &BSpline<F>,
    params: &[F],
) -> Result<Vec<Vec<F>>, SplineError> {
    params.iter().map(|&u| spline.eval(u)).collect()
}

/// Number of `dimension`-sized rows in a flat buffer of `len` scalars.
pub(crate) fn row_count(len: usize, dimension: usize) -> Result<usize, SplineError> {
    if dimension == 0 {
        return Err(SplineError::InvalidDimension { dimension });
    }
    if len % dimension != 0 {
        return Err(SplineError::ControlPointLength { len, dimension });
    }
    Ok(len / dimension)
}
