//! 2D vector type.

use super::ops::angle_between;
use crate::error::SplineError;
use crate::tolerance::{cast, LENGTH_ZERO};
use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 2D vector.
///
/// Generic over floating-point types (`f32` or `f64`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Creates a new vector.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// Creates a zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    /// Computes the dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    /// Returns the magnitude (length) of the vector.
    #[inline]
    pub fn magnitude(self) -> F {
        self.dot(self).sqrt()
    }

    /// Returns the distance between the tips of two vectors.
    #[inline]
    pub fn distance(self, other: Self) -> F {
        (self - other).magnitude()
    }

    /// Returns a unit vector pointing in the same direction.
    ///
    /// Returns `None` if the vector is shorter than [`LENGTH_ZERO`].
    #[inline]
    pub fn normalize(self) -> Option<Self> {
        let mag = self.magnitude();
        if mag >= cast(LENGTH_ZERO) {
            Some(self / mag)
        } else {
            None
        }
    }

    /// Returns the angle to `other` in degrees.
    #[inline]
    pub fn angle(self, other: Self) -> F {
        angle_between(self.dot(other), self.magnitude(), other.magnitude())
    }

    /// Returns the components as an array.
    #[inline]
    pub fn to_array(self) -> [F; 2] {
        [self.x, self.y]
    }
}

impl<F: Float> TryFrom<&[F]> for Vec2<F> {
    type Error = SplineError;

    fn try_from(values: &[F]) -> Result<Self, Self::Error> {
        match *values {
            [x, y] => Ok(Self::new(x, y)),
            _ => Err(SplineError::DimensionMismatch {
                expected: 2,
                found: values.len(),
            }),
        }
    }
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl<F: Float> Div<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn div(self, scalar: F) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl<F: Float> Default for Vec2<F> {
    fn default() -> Self {
        Self::zero()
    }
}
