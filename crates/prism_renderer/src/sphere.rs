//! Sphere primitive for ray tracing.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::ShapeResult;
use crate::shape::{first_valid, solve_quadratic, HitRecord, MaterialBinding, Shape, NO_HIT};

/// A sphere primitive.
#[derive(Clone, Debug)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: MaterialBinding,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material_index: i32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            material: MaterialBinding::new(material_index),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Shape for Sphere {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        self.material.bind(data)?;
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        self.bbox = Aabb::from_points(self.center - rvec, self.center + rvec);
        self.bbox
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        range: Interval,
        valid: &dyn Fn(f32) -> bool,
        rec: &mut HitRecord<'a>,
    ) -> f32 {
        // |o + t d - c|² = r²
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = 2.0 * ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let Some((t0, t1)) = solve_quadratic(a, b, c) else {
            return NO_HIT;
        };
        let Some(t) = first_valid([t0, t1], range, valid) else {
            return NO_HIT;
        };

        let normal = (ray.at(t) - self.center).normalize();
        rec.set(ray, t, normal, self.material.get());
        t
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        Ok((p - self.center).length_squared() < self.radius * self.radius)
    }

    fn name(&self) -> &'static str {
        "sphere"
    }
}
