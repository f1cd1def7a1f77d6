//! splinum - Parametric B-spline curves
//!
//! Evaluation, differentiation and interpolation of B-spline curves of any
//! degree and dimension, plus rotation-minimizing frames for sweeping
//! profiles along spatial curves.
//!
//! ```
//! use splinum::{compute_frames, interpolate_cubic_natural};
//!
//! let points = [
//!     0.0, 0.0, 0.0,
//!     1.0, 2.0, 1.0,
//!     3.0, 1.0, 2.0,
//!     4.0, 3.0, 2.0,
//! ];
//! let spline = interpolate_cubic_natural(&points, 3).unwrap();
//! let frames = compute_frames(&spline, &spline.uniform_knot_seq(64)).unwrap();
//! assert_eq!(frames.len(), 64);
//! ```

pub mod curves;
pub mod error;
pub mod linalg;
pub mod primitives;
pub mod tolerance;

pub use curves::{
    compute_frames, compute_frames_with_normal, interpolate_catmull_rom,
    interpolate_cubic_natural, BSpline, Frame, FrameSequence, KnotPolicy, KnotVector,
};
pub use error::SplineError;
pub use primitives::{Vec2, Vec3, Vec4};
