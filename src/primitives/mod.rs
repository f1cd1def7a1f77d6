//! Fixed-arity vectors and slice-based vector helpers.

pub mod ops;
mod vec2;
mod vec3;
mod vec4;

pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;
