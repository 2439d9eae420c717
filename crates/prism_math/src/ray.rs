use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. Ray parameters `t`
/// returned by intersection queries are measured in units of `direction`
/// exactly as supplied, so callers that want distances must normalize first.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Same ray with a unit-length direction.
    ///
    /// A zero direction is left untouched.
    pub fn normalized(&self) -> Ray {
        Ray::new(self.origin, self.direction.normalize_or_zero())
    }

    /// A ray starting `offset` along `direction` from `point`.
    ///
    /// Secondary rays use this to step off the surface they leave.
    pub fn offset_from(point: Vec3, direction: Vec3, offset: f32) -> Ray {
        Ray::new(point + direction * offset, direction)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}
