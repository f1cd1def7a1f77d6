//! 4D vector type.

use super::ops::angle_between;
use crate::error::SplineError;
use crate::tolerance::{cast, LENGTH_ZERO};
use num_traits::Float;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 4D vector, e.g. a homogeneous point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec4<F> {
    pub x: F,
    pub y: F,
    pub z: F,
    pub w: F,
}

impl<F: Float> Vec4<F> {
    /// Creates a new vector.
    #[inline]
    pub fn new(x: F, y: F, z: F, w: F) -> Self {
        Self { x, y, z, w }
    }

    /// Creates a zero vector.
    #[inline]
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero(), F::zero())
    }

    #[inline]
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.dot(self)
    }

    #[inline]
    pub fn magnitude(self) -> F {
        self.magnitude_squared().sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> F {
        (self - other).magnitude()
    }

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

    #[inline]
    pub fn to_array(self) -> [F; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl<F: Float> TryFrom<&[F]> for Vec4<F> {
    type Error = SplineError;

    fn try_from(values: &[F]) -> Result<Self, Self::Error> {
        match *values {
            [x, y, z, w] => Ok(Self::new(x, y, z, w)),
            _ => Err(SplineError::DimensionMismatch {
                expected: 4,
                found: values.len(),
            }),
        }
    }
}

impl<F: Float> Add for Vec4<F> {
    type Output = Self;

    #[inline]
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y, self.z + o.z, self.w + o.w)
    }
}

impl<F: Float> Sub for Vec4<F> {
    type Output = Self;

    #[inline]
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y, self.z - o.z, self.w - o.w)
    }
}

impl<F: Float> Mul<F> for Vec4<F> {
    type Output = Self;

    #[inline]
    fn mul(self, s: F) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }
}

impl<F: Float> Div<F> for Vec4<F> {
    type Output = Self;

    #[inline]
    fn div(self, s: F) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s, self.w / s)
    }
}

impl<F: Float> Neg for Vec4<F> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, -self.w)
    }
}
