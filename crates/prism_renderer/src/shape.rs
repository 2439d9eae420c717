//! Shape trait and HitRecord for ray-surface intersection.

use std::sync::Arc;

use prism_core::{Material, SceneData, SceneError};
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::error::ShapeResult;

/// Returned by [`Shape::intersect`] when the ray hits nothing acceptable.
///
/// Greater than any finite distance, so it folds naturally with `min`.
pub const NO_HIT: f32 = f32::INFINITY;

/// Validity filter that accepts every ray parameter.
pub fn always_valid(_t: f32) -> bool {
    true
}

/// Record of a ray-surface intersection.
#[derive(Clone, Copy, Debug)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal (outward; never flipped toward the ray)
    pub normal: Vec3,
    /// Texture coordinate, where the shape defines one
    pub tex_coord: Vec2,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Material at the intersection point
    pub material: &'a Material,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            tex_coord: Vec2::ZERO,
            t: NO_HIT,
            material: Material::unset(),
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Fill in everything but the texture coordinate.
    pub fn set(&mut self, ray: &Ray, t: f32, normal: Vec3, material: &'a Material) {
        self.t = t;
        self.p = ray.at(t);
        self.normal = normal;
        self.material = material;
    }
}

/// Trait for surfaces that can be hit by rays.
///
/// Every shape must be initialized exactly once, then have its bounding box
/// computed, before it is intersected.
pub trait Shape: Send + Sync {
    /// Resolve material and vertex indices against the scene data.
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()>;

    /// Recompute and cache the bounding box (children first for composites).
    fn update_bounding_box(&mut self) -> Aabb;

    /// The cached bounding box. `Aabb::EMPTY` until computed.
    fn bounding_box(&self) -> Aabb;

    /// Find the nearest surface point with a ray parameter inside `range`
    /// that `valid` accepts.
    ///
    /// On success `rec` is overwritten and the parameter is returned;
    /// otherwise `rec` is left untouched and [`NO_HIT`] is returned.
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        range: Interval,
        valid: &dyn Fn(f32) -> bool,
        rec: &mut HitRecord<'a>,
    ) -> f32;

    /// Strict containment test.
    ///
    /// Fails with [`ShapeError::NotSolid`](crate::ShapeError::NotSolid) for
    /// open surfaces.
    fn is_inside(&self, p: Vec3) -> ShapeResult<bool>;

    /// True if the shape encloses a volume, i.e. `is_inside` is meaningful.
    fn is_solid(&self) -> bool {
        true
    }

    /// Short name for diagnostics.
    fn name(&self) -> &'static str;
}

/// The first candidate parameter that is positive, inside `range` and
/// accepted by `valid`. Candidates must be sorted ascending.
pub(crate) fn first_valid(
    candidates: impl IntoIterator<Item = f32>,
    range: Interval,
    valid: &dyn Fn(f32) -> bool,
) -> Option<f32> {
    candidates
        .into_iter()
        .find(|&t| t > 0.0 && range.contains(t) && valid(t))
}

/// Both roots of `a t² + b t + c = 0`, ascending, if real.
pub(crate) fn solve_quadratic(a: f32, b: f32, c: f32) -> Option<(f32, f32)> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / (2.0 * a);
    let t1 = (-b + sqrtd) / (2.0 * a);
    Some((t0.min(t1), t0.max(t1)))
}

/// A shape's material, referenced by index until initialization resolves it.
#[derive(Clone, Debug)]
pub struct MaterialBinding {
    index: i32,
    material: Option<Arc<Material>>,
}

impl MaterialBinding {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            material: None,
        }
    }

    pub fn index(&self) -> i32 {
        self.index
    }

    /// Resolve the index. Fails on negative or out-of-range indices.
    pub fn bind(&mut self, data: &SceneData) -> Result<(), SceneError> {
        self.material = Some(data.material(self.index)?);
        Ok(())
    }

    /// The bound material, or the unset material before initialization.
    pub fn get(&self) -> &Material {
        self.material.as_deref().unwrap_or(Material::unset())
    }
}
