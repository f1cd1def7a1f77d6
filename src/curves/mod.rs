//! B-spline curves and the algorithms built on them.

mod bspline;
mod chord;
mod frames;
mod interpolate;
mod knots;

pub use bspline::{BSpline, Bisection};
pub use chord::ChordLengths;
pub use frames::{compute_frames, compute_frames_with_normal, Frame, FrameSequence};
pub use interpolate::{interpolate_catmull_rom, interpolate_cubic_natural};
pub use knots::{KnotPolicy, KnotVector};
