//! Cumulative chord lengths for arc-length reparametrization.

use crate::tolerance::{cast, LENGTH_ZERO};
use num_traits::Float;

/// Parameters paired with the cumulative polyline length up to each one.
///
/// Produced by [`BSpline::chord_lengths`](super::BSpline::chord_lengths).
/// Both sequences have the same, non-zero length and are non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordLengths<F> {
    knots: Vec<F>,
    lengths: Vec<F>,
}

impl<F: Float> ChordLengths<F> {
    pub(crate) fn new(knots: Vec<F>, lengths: Vec<F>) -> Self {
        debug_assert_eq!(knots.len(), lengths.len());
        debug_assert!(!knots.is_empty());
        Self { knots, lengths }
    }

    #[inline]
    pub fn knots(&self) -> &[F] {
        &self.knots
    }

    #[inline]
    pub fn lengths(&self) -> &[F] {
        &self.lengths
    }

    /// Total length of the sampled polyline.
    #[inline]
    pub fn total(&self) -> F {
        self.lengths.last().copied().unwrap_or_else(F::zero)
    }

    /// Maps an arc length to a parameter by linear interpolation.
    ///
    /// Lengths outside `[0, total]` clamp to the first or last knot. A
    /// segment shorter than [`LENGTH_ZERO`] maps to its lower knot.
    pub fn length_to_knot(&self, len: F) -> F {
        let n = self.knots.len();
        let first = self.knots[0];
        if n == 1 || self.total() < cast(LENGTH_ZERO) || len <= self.lengths[0] {
            return first;
        }
        if len >= self.lengths[n - 1] {
            return self.knots[n - 1];
        }

        // First index whose length exceeds `len`; lies in 1..n.
        let upper = self.lengths.partition_point(|&l| l <= len);
        let idx = upper - 1;
        let denom = self.lengths[upper] - self.lengths[idx];
        if denom < cast(LENGTH_ZERO) {
            return self.knots[idx];
        }
        let r = (len - self.lengths[idx]) / denom;
        r * self.knots[upper] + (F::one() - r) * self.knots[idx]
    }

    /// Maps a fraction `t` of the total length to a parameter.
    #[inline]
    pub fn t_to_knot(&self, t: F) -> F {
        self.length_to_knot(t * self.total())
    }

    /// Returns `count` parameters spaced equally by arc length.
    ///
    /// The first and last values are exactly the first and last knots.
    pub fn equidistant_knot_seq(&self, count: usize) -> Vec<F> {
        if count == 0 {
            return Vec::new();
        }
        let denom: F = cast(count.saturating_sub(1).max(1));
        let mut seq: Vec<F> = (0..count)
            .map(|i| self.t_to_knot(cast::<F, _>(i) / denom))
            .collect();
        if let Some(last) = seq.last_mut() {
            *last = self.knots[self.knots.len() - 1];
        }
        seq[0] = self.knots[0];
        seq
    }
}
