// Re-export glam for convenience
pub use glam::*;

// Prism math types
mod aabb;
mod interval;
mod optics;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use optics::{reflect, refract};
pub use ray::Ray;
pub use transform::Mat4Ext;

/// Offset used to push secondary rays off the surface they start on.
pub const SURFACE_EPSILON: f32 = 1e-4;
