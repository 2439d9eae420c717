//! Capped cylinder aligned with the Y axis.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::ShapeResult;
use crate::shape::{first_valid, solve_quadratic, HitRecord, MaterialBinding, Shape, NO_HIT};

/// Rays whose direction component is below this are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq)]
enum Surface {
    Side,
    Top,
    Bottom,
}

/// A solid cylinder centred at `center`, spanning `center.y ± height / 2`.
#[derive(Clone, Debug)]
pub struct Cylinder {
    center: Vec3,
    radius: f32,
    height: f32,
    material: MaterialBinding,
    bbox: Aabb,
}

impl Cylinder {
    pub fn new(center: Vec3, radius: f32, height: f32, material_index: i32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            height: height.max(0.0),
            material: MaterialBinding::new(material_index),
            bbox: Aabb::EMPTY,
        }
    }

    fn y_min(&self) -> f32 {
        self.center.y - self.height * 0.5
    }

    fn y_max(&self) -> f32 {
        self.center.y + self.height * 0.5
    }

    /// Squared distance from the axis, measured in the XZ plane.
    fn radial_sq(&self, p: Vec3) -> f32 {
        let dx = p.x - self.center.x;
        let dz = p.z - self.center.z;
        dx * dx + dz * dz
    }

    fn normal_at(&self, p: Vec3, surface: Surface) -> Vec3 {
        match surface {
            Surface::Top => Vec3::Y,
            Surface::Bottom => Vec3::NEG_Y,
            Surface::Side => Vec3::new(p.x - self.center.x, 0.0, p.z - self.center.z).normalize(),
        }
    }
}

impl Shape for Cylinder {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        self.material.bind(data)?;
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        let half = Vec3::new(self.radius, self.height * 0.5, self.radius);
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
        let o = ray.origin;
        let d = ray.direction;
        let mut candidates: Vec<(f32, Surface)> = Vec::with_capacity(4);

        // Lateral surface: (x - cx)² + (z - cz)² = r², restricted to the height span
        let ox = o.x - self.center.x;
        let oz = o.z - self.center.z;
        let a = d.x * d.x + d.z * d.z;
        if a > PARALLEL_EPSILON {
            let b = 2.0 * (ox * d.x + oz * d.z);
            let c = ox * ox + oz * oz - self.radius * self.radius;
            if let Some((t0, t1)) = solve_quadratic(a, b, c) {
                for t in [t0, t1] {
                    let y = o.y + t * d.y;
                    if y >= self.y_min() && y <= self.y_max() {
                        candidates.push((t, Surface::Side));
                    }
                }
            }
        }

        // Caps
        if d.y.abs() > PARALLEL_EPSILON {
            let r2 = self.radius * self.radius;
            for (y, surface) in [(self.y_max(), Surface::Top), (self.y_min(), Surface::Bottom)] {
                let t = (y - o.y) / d.y;
                if self.radial_sq(ray.at(t)) <= r2 {
                    candidates.push((t, surface));
                }
            }
        }

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        let Some((t, surface)) = candidates
            .into_iter()
            .find(|&(t, _)| first_valid([t], range, valid).is_some())
        else {
            return NO_HIT;
        };

        let p = ray.at(t);
        rec.set(ray, t, self.normal_at(p, surface), self.material.get());
        t
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        Ok(p.y > self.y_min()
            && p.y < self.y_max()
            && self.radial_sq(p) < self.radius * self.radius)
    }

    fn name(&self) -> &'static str {
        "cylinder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::always_valid;
    use crate::shape::test_util::{approx, cast, ready};

    fn unit_cylinder() -> Cylinder {
        ready(Cylinder::new(Vec3::ZERO, 1.0, 2.0, 0))
    }

    #[test]
    fn test_cylinder_side_hit() {
        let cyl = unit_cylinder();
        let (t, rec) = cast(&cyl, Vec3::new(-5.0, 0.5, 0.0), Vec3::X);
        assert!((t - 4.0).abs() < 1e-5);
        assert!(approx(rec.normal, Vec3::NEG_X));
    }

    #[test]
    fn test_cylinder_cap_hit() {
        let cyl = unit_cylinder();

        let (t, rec) = cast(&cyl, Vec3::new(0.2, 5.0, 0.0), Vec3::NEG_Y);
        assert!((t - 4.0).abs() < 1e-5);
        assert!(approx(rec.normal, Vec3::Y));

        let (t, rec) = cast(&cyl, Vec3::new(0.2, -5.0, 0.0), Vec3::Y);
        assert!((t - 4.0).abs() < 1e-5);
        assert!(approx(rec.normal, Vec3::NEG_Y));
    }

    #[test]
    fn test_cylinder_miss_above_height() {
        let cyl = unit_cylinder();
        let (t, _) = cast(&cyl, Vec3::new(-5.0, 1.5, 0.0), Vec3::X);
        assert_eq!(t, NO_HIT);
    }

    #[test]
    fn test_cylinder_oblique_enters_through_cap() {
        let cyl = unit_cylinder();
        // Enters the top cap at (0, 1, 0), then exits the side
        let dir = Vec3::new(1.0, -1.0, 0.0);
        let (t, rec) = cast(&cyl, Vec3::new(-1.0, 2.0, 0.0), dir);
        assert!((t - 1.0).abs() < 1e-5);
        assert!(approx(rec.p, Vec3::new(0.0, 1.0, 0.0)));
        assert!(approx(rec.normal, Vec3::Y));
    }

    #[test]
    fn test_cylinder_from_inside() {
        let cyl = unit_cylinder();
        let (t, rec) = cast(&cyl, Vec3::ZERO, Vec3::Z);
        assert!((t - 1.0).abs() < 1e-5);
        assert!(approx(rec.normal, Vec3::Z));
    }

    #[test]
    fn test_cylinder_predicate_skips_near_surface() {
        let cyl = unit_cylinder();
        let ray = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        let mut rec = HitRecord::default();
        let t = cyl.intersect(&ray, Interval::new(0.0, f32::INFINITY), &|t: f32| t > 4.5, &mut rec);
        assert!((t - 6.0).abs() < 1e-5);
        assert!(approx(rec.normal, Vec3::X));

        let t = cyl.intersect(&ray, Interval::new(0.0, 3.0), &always_valid, &mut rec);
        assert_eq!(t, NO_HIT);
    }

    #[test]
    fn test_cylinder_is_inside() {
        let cyl = unit_cylinder();
        assert!(cyl.is_inside(Vec3::new(0.5, 0.9, 0.0)).unwrap());
        assert!(!cyl.is_inside(Vec3::new(0.5, 1.1, 0.0)).unwrap());
        assert!(!cyl.is_inside(Vec3::new(1.0, 0.0, 0.0)).unwrap());
    }

    #[test]
    fn test_cylinder_bounding_box() {
        let cyl = ready(Cylinder::new(Vec3::new(0.0, 1.0, 0.0), 0.5, 4.0, 0));
        assert_eq!(cyl.bounding_box().min(), Vec3::new(-0.5, -1.0, -0.5));
        assert_eq!(cyl.bounding_box().max(), Vec3::new(0.5, 3.0, 0.5));
    }
}
