//! Torus found by ray marching its distance function.
//!
//! There is no closed form here. The ray is sampled at [`MARCH_STEPS`] evenly
//! spaced parameters across the part of the valid range inside the slightly
//! padded bounding box, and each sign change of the distance function is
//! refined by [`BISECTION_STEPS`] rounds of bisection. For a range of length `L` the
//! root is located to within `L / MARCH_STEPS / 2^BISECTION_STEPS`. A pair of
//! crossings closer together than one march step (a ray grazing the tube) can
//! be missed.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::ShapeResult;
use crate::shape::{first_valid, HitRecord, MaterialBinding, Shape, NO_HIT};

pub const MARCH_STEPS: usize = 200;
pub const BISECTION_STEPS: usize = 24;

/// Margin added around the bounding box before marching, so the first sample
/// of a ray entering from outside lies strictly outside the tube.
const MARCH_MARGIN: f32 = 1e-3;

/// A solid torus in the XY plane around `center`, with its axis along Z.
#[derive(Clone, Debug)]
pub struct Torus {
    center: Vec3,
    inner_radius: f32,
    outer_radius: f32,
    material: MaterialBinding,
    bbox: Aabb,
}

impl Torus {
    pub fn new(center: Vec3, inner_radius: f32, outer_radius: f32, material_index: i32) -> Self {
        let inner_radius = inner_radius.max(0.0);
        Self {
            center,
            inner_radius,
            outer_radius: outer_radius.max(inner_radius),
            material: MaterialBinding::new(material_index),
            bbox: Aabb::EMPTY,
        }
    }

    /// Distance from the center to the middle of the tube.
    pub fn major_radius(&self) -> f32 {
        (self.inner_radius + self.outer_radius) * 0.5
    }

    /// Radius of the tube.
    pub fn minor_radius(&self) -> f32 {
        (self.outer_radius - self.inner_radius) * 0.5
    }

    /// Signed distance to the surface, negative inside the tube.
    fn distance(&self, p: Vec3) -> f32 {
        let q = p - self.center;
        let ring = q.truncate().length() - self.major_radius();
        (ring * ring + q.z * q.z).sqrt() - self.minor_radius()
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        let q = p - self.center;
        let rho = q.truncate().length();
        if rho <= 0.0 {
            return Vec3::new(0.0, 0.0, q.z.signum());
        }
        let scale = self.major_radius() / rho;
        let tube_center = Vec3::new(q.x * scale, q.y * scale, 0.0);
        (q - tube_center).normalize()
    }

    /// Narrow a bracketed sign change down to a single parameter.
    fn bisect(&self, ray: &Ray, mut lo: f32, mut hi: f32) -> f32 {
        let mut f_lo = self.distance(ray.at(lo));
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (lo + hi);
            let f_mid = self.distance(ray.at(mid));
            if f_lo * f_mid <= 0.0 {
                hi = mid;
            } else {
                lo = mid;
                f_lo = f_mid;
            }
        }
        0.5 * (lo + hi)
    }
}

impl Shape for Torus {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        self.material.bind(data)?;
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        let half = Vec3::new(self.outer_radius, self.outer_radius, self.minor_radius());
        self.bbox = Aabb::from_points(self.center - half, self.center + half);
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
        let padded = Aabb::new(
            self.bbox.x.expand(2.0 * MARCH_MARGIN),
            self.bbox.y.expand(2.0 * MARCH_MARGIN),
            self.bbox.z.expand(2.0 * MARCH_MARGIN),
        );
        let search = padded.ray_range(ray, range);
        if search.is_empty() || !search.size().is_finite() {
            return NO_HIT;
        }

        let step = search.size() / MARCH_STEPS as f32;
        let mut t_prev = search.min;
        let mut f_prev = self.distance(ray.at(t_prev));

        for i in 1..=MARCH_STEPS {
            let t = search.min + step * i as f32;
            let f = self.distance(ray.at(t));

            if f_prev * f <= 0.0 {
                let root = self.bisect(ray, t_prev, t);
                if let Some(root) = first_valid([root], range, valid) {
                    rec.set(ray, root, self.normal_at(ray.at(root)), self.material.get());
                    return root;
                }
            }

            t_prev = t;
            f_prev = f;
        }

        NO_HIT
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        Ok(self.distance(p) < 0.0)
    }

    fn name(&self) -> &'static str {
        "torus"
    }
}
