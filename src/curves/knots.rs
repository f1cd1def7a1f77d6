//! Knot vector generation and validation.
//!
//! A knot vector for `n + 1` control points of degree `p` holds `n + p + 2`
//! non-decreasing values. The curve's domain is `[U[p], U[n+1]]`.

use crate::error::SplineError;
use crate::tolerance::{cast, knots_equal, MAX_NUM_KNOTS};
use num_traits::Float;
use std::ops::Index;

/// How the knots of a generated vector are laid out over `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnotPolicy {
    /// Simple, evenly spaced knots: `U[i] = i / (n + p)`.
    ///
    /// The curve does not interpolate its end control points.
    Uniform,
    /// `p + 1` knots at 0 and at 1, interior knots evenly spaced.
    ///
    /// The curve starts and ends at its first and last control points.
    Clamped,
    /// Only the start is clamped; the remainder is evenly spaced up to 1.
    Beginning,
    /// Every group of `p + 1` knots shares a value, so the curve is a
    /// chain of Bézier segments of equal parameter length.
    ///
    /// Requires the number of control points to be a multiple of `p + 1`.
    Beziers,
}

/// A validated, immutable knot vector.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotVector<F> {
    knots: Vec<F>,
}

impl<F: Float> KnotVector<F> {
    /// Generates a knot vector for `num_control_points` control points of
    /// the given degree.
    ///
    /// # Errors
    ///
    /// - [`SplineError::InsufficientControlPoints`] if `num_control_points < degree + 1`.
    /// - [`SplineError::InvalidDegree`] if even a minimal vector of this degree
    ///   would exceed [`MAX_NUM_KNOTS`].
    /// - [`SplineError::TooManyKnots`] if the vector would exceed [`MAX_NUM_KNOTS`].
    /// - [`SplineError::MalformedKnotVector`] for [`KnotPolicy::Beziers`] when
    ///   the control point count is not a multiple of the order.
    ///
    /// # Example
    ///
    /// ```
    /// use splinum::curves::{KnotPolicy, KnotVector};
    ///
    /// let knots = KnotVector::<f64>::generate(4, 2, KnotPolicy::Clamped).unwrap();
    /// assert_eq!(knots.as_slice(), &[0.0, 0.0, 0.0, 0.5, 1.0, 1.0, 1.0]);
    /// ```
    pub fn generate(
        num_control_points: usize,
        degree: usize,
        policy: KnotPolicy,
    ) -> Result<Self, SplineError> {
        check_counts(num_control_points, degree)?;

        let order = degree + 1;
        let len = num_control_points + order;
        let knots: Vec<F> = match policy {
            KnotPolicy::Uniform => {
                let fac = F::one() / cast(len - 1);
                (0..len).map(|i| cast::<F, _>(i) * fac).collect()
            }
            KnotPolicy::Clamped => {
                let fac = F::one() / cast(len - 2 * degree - 1);
                (0..len)
                    .map(|i| {
                        if i < order {
                            F::zero()
                        } else if i >= len - order {
                            F::one()
                        } else {
                            cast::<F, _>(i - degree) * fac
                        }
                    })
                    .collect()
            }
            KnotPolicy::Beginning => {
                let fac = F::one() / cast(len - order);
                (0..len)
                    .map(|i| {
                        if i < order {
                            F::zero()
                        } else {
                            cast::<F, _>(i - degree) * fac
                        }
                    })
                    .collect()
            }
            KnotPolicy::Beziers => {
                if num_control_points % order != 0 {
                    return Err(SplineError::MalformedKnotVector {
                        reason: format!(
                            "{num_control_points} control points cannot form Bézier segments of order {order}"
                        ),
                    });
                }
                let groups = len / order;
                let fac = F::one() / cast(groups - 1);
                (0..len)
                    .map(|i| cast::<F, _>(i / order) * fac)
                    .collect()
            }
        };

        log::trace!(
            "generated {:?} knot vector: {} knots for {} control points of degree {}",
            policy,
            len,
            num_control_points,
            degree
        );

        Ok(Self { knots })
    }

    /// Wraps an externally supplied knot vector after validating it.
    ///
    /// # Errors
    ///
    /// Returns the same count errors as [`generate`](Self::generate), and
    /// [`SplineError::MalformedKnotVector`] naming the first violated rule
    /// (see [`is_valid`](Self::is_valid)).
    pub fn from_knots(
        knots: Vec<F>,
        num_control_points: usize,
        degree: usize,
    ) -> Result<Self, SplineError> {
        check_counts(num_control_points, degree)?;
        validate(&knots, num_control_points, degree)
            .map_err(|reason| SplineError::MalformedKnotVector { reason })?;
        Ok(Self { knots })
    }

    /// Returns `true` if `knots` is usable for `num_control_points` control
    /// points of the given degree.
    ///
    /// A valid vector:
    /// - has `num_control_points + degree + 1` entries,
    /// - is non-decreasing,
    /// - has no knot with multiplicity above `degree + 1`,
    /// - spans a non-empty domain `[U[p], U[n+1]]`.
    pub fn is_valid(knots: &[F], num_control_points: usize, degree: usize) -> bool {
        num_control_points > degree && validate(knots, num_control_points, degree).is_ok()
    }

    /// Returns the knots as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[F] {
        &self.knots
    }

    /// Returns the number of knots.
    #[inline]
    pub fn len(&self) -> usize {
        self.knots.len()
    }

    /// Returns `true` if there are no knots (never for a validated vector).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    /// Returns the domain `[U[p], U[n+1]]` for a curve of the given degree.
    #[inline]
    pub fn domain(&self, degree: usize) -> (F, F) {
        let order = degree + 1;
        (self.knots[degree], self.knots[self.knots.len() - order])
    }

    /// Returns how many knots equal (within knot tolerance) the knot at `index`.
    ///
    /// Returns 0 if `index` is out of range.
    pub fn multiplicity_at(&self, index: usize) -> usize {
        match self.knots.get(index) {
            Some(&value) => self
                .knots
                .iter()
                .filter(|&&k| knots_equal(k, value))
                .count(),
            None => 0,
        }
    }

    /// Returns a new vector with the first and last knot removed.
    pub(crate) fn trimmed(&self) -> Self {
        Self {
            knots: self.knots[1..self.knots.len() - 1].to_vec(),
        }
    }
}

impl<F> Index<usize> for KnotVector<F> {
    type Output = F;

    #[inline]
    fn index(&self, index: usize) -> &F {
        &self.knots[index]
    }
}

fn check_counts(num_control_points: usize, degree: usize) -> Result<(), SplineError> {
    // An order of at most MAX_NUM_KNOTS / 2 keeps every sum below in range.
    let order = match degree.checked_add(1) {
        Some(order) if order <= MAX_NUM_KNOTS / 2 => order,
        _ => return Err(SplineError::InvalidDegree { degree }),
    };
    if num_control_points < order {
        return Err(SplineError::InsufficientControlPoints {
            count: num_control_points,
            degree,
        });
    }
    let count = num_control_points.saturating_add(order);
    if count > MAX_NUM_KNOTS {
        return Err(SplineError::TooManyKnots {
            count,
            max: MAX_NUM_KNOTS,
        });
    }
    Ok(())
}

fn validate<F: Float>(knots: &[F], num_control_points: usize, degree: usize) -> Result<(), String> {
    let Some(expected) = degree
        .checked_add(1)
        .and_then(|order| num_control_points.checked_add(order))
    else {
        return Err("knot count overflows".to_string());
    };
    let order = degree + 1;
    if knots.len() != expected {
        return Err(format!("expected {expected} knots, found {}", knots.len()));
    }

    if let Some(i) = knots.iter().position(|k| !k.is_finite()) {
        return Err(format!("non-finite knot at index {i}"));
    }

    let mut mult = 1;
    for i in 1..knots.len() {
        let (prev, knot) = (knots[i - 1], knots[i]);
        if knot < prev {
            return Err(format!("decreasing knot at index {i}"));
        }
        if knots_equal(prev, knot) {
            mult += 1;
            if mult > order {
                return Err(format!(
                    "multiplicity {mult} of knot at index {i} exceeds order {order}"
                ));
            }
        } else {
            mult = 1;
        }
    }

    if knots[degree] >= knots[num_control_points] {
        return Err("empty domain".to_string());
    }
    Ok(())
}
