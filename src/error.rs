//! Error types for spline operations.

use thiserror::Error;

/// Errors that can occur while building, evaluating or transforming splines.
///
/// Offending inputs are echoed back so callers can surface them directly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// The degree cannot be represented within the knot budget.
    #[error("invalid degree: {degree}")]
    InvalidDegree {
        /// The rejected degree.
        degree: usize,
    },

    /// Fewer control points than `degree + 1`.
    #[error("insufficient control points: {count} for degree {degree}")]
    InsufficientControlPoints {
        /// Number of control points supplied.
        count: usize,
        /// Requested degree.
        degree: usize,
    },

    /// A dimension of zero was requested.
    #[error("unsupported dimension: {dimension}")]
    InvalidDimension {
        /// The rejected dimension.
        dimension: usize,
    },

    /// The flat control point buffer does not split into rows of `dimension`.
    #[error("control point buffer of length {len} is not a multiple of dimension {dimension}")]
    ControlPointLength {
        /// Length of the flat buffer.
        len: usize,
        /// Dimension of a single point.
        dimension: usize,
    },

    /// The knot vector would exceed [`MAX_NUM_KNOTS`](crate::tolerance::MAX_NUM_KNOTS).
    #[error("too many knots: {count} > {max}")]
    TooManyKnots {
        /// Number of knots required.
        count: usize,
        /// Upper limit.
        max: usize,
    },

    /// The knot vector is non-monotonic, has the wrong length, or is otherwise unusable.
    #[error("malformed knot vector: {reason}")]
    MalformedKnotVector {
        /// What is wrong with it.
        reason: String,
    },

    /// A parameter lies outside the curve's domain.
    #[error("parameter {u} outside domain [{min}, {max}]")]
    ParameterOutOfDomain {
        /// The rejected parameter.
        u: f64,
        /// Lower domain bound.
        min: f64,
        /// Upper domain bound.
        max: f64,
    },

    /// The derivative of a degree-0 curve was requested.
    #[error("cannot derive a curve of degree 0")]
    CannotDeriveConstant,

    /// Too few points for the requested operation.
    #[error("insufficient points: {count} < {required}")]
    InsufficientPoints {
        /// Number of points supplied.
        count: usize,
        /// Minimum required.
        required: usize,
    },

    /// An input has the wrong dimension.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension the operation requires.
        expected: usize,
        /// Dimension that was supplied.
        found: usize,
    },

    /// The curve has a stationary point (zero-length derivative).
    #[error("curve degenerates at parameter {u}: zero-length derivative")]
    CurveDegeneracy {
        /// Parameter of the stationary point.
        u: f64,
    },

    /// A parameter sequence is not strictly ascending.
    #[error("parameter sequence not ascending at index {index}")]
    NonAscendingParameters {
        /// First index that breaks the ordering.
        index: usize,
    },

    /// An index is out of range.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange {
        /// The rejected index.
        index: usize,
        /// Length of the indexed collection.
        len: usize,
    },

    /// A supplied initial normal is parallel to the tangent.
    #[error("initial normal is parallel to the tangent")]
    DegenerateNormal,

    /// A tridiagonal system is not strictly diagonally dominant.
    #[error("tridiagonal system not diagonally dominant at row {row}")]
    NotDiagonallyDominant {
        /// First offending row.
        row: usize,
    },
}
