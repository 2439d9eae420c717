//! Capped cone aligned with the Y axis, apex up.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::ShapeResult;
use crate::shape::{first_valid, solve_quadratic, HitRecord, MaterialBinding, Shape, NO_HIT};

/// Coefficients below this are treated as zero.
const DEGENERATE_EPSILON: f32 = 1e-8;

/// A solid cone with its base centred at `center.y - height / 2` and its apex
/// at `center.y + height / 2`.
#[derive(Clone, Debug)]
pub struct Cone {
    center: Vec3,
    radius: f32,
    height: f32,
    material: MaterialBinding,
    bbox: Aabb,
}

impl Cone {
    pub fn new(center: Vec3, radius: f32, height: f32, material_index: i32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            height: height.max(0.0),
            material: MaterialBinding::new(material_index),
            bbox: Aabb::EMPTY,
        }
    }

    fn tip(&self) -> Vec3 {
        self.center + Vec3::new(0.0, self.height * 0.5, 0.0)
    }

    fn base_y(&self) -> f32 {
        self.center.y - self.height * 0.5
    }

    fn side_normal(&self, p: Vec3) -> Vec3 {
        let tip = self.tip();
        let radial = Vec3::new(p.x - tip.x, 0.0, p.z - tip.z).normalize_or_zero();
        Vec3::new(radial.x * self.height, self.radius, radial.z * self.height).normalize()
    }
}

impl Shape for Cone {
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
        if self.height <= 0.0 {
            return NO_HIT;
        }

        let tip = self.tip();
        let base_y = self.base_y();
        let d = ray.direction;
        let p = ray.origin - tip;

        // x² + z² = k y², apex-relative, with k = tan² of the half angle
        let k = (self.radius / self.height).powi(2);
        let a = d.x * d.x + d.z * d.z - k * d.y * d.y;
        let b = 2.0 * (p.x * d.x + p.z * d.z - k * p.y * d.y);
        let c = p.x * p.x + p.z * p.z - k * p.y * p.y;

        let mut candidates: Vec<(f32, bool)> = Vec::with_capacity(3);
        let push_side = |t: f32, candidates: &mut Vec<(f32, bool)>| {
            let y = ray.origin.y + t * d.y;
            if y >= base_y && y <= tip.y {
                candidates.push((t, false));
            }
        };

        if a.abs() > DEGENERATE_EPSILON {
            if let Some((t0, t1)) = solve_quadratic(a, b, c) {
                push_side(t0, &mut candidates);
                push_side(t1, &mut candidates);
            }
        } else if b.abs() > DEGENERATE_EPSILON {
            // Ray parallel to the slant
            push_side(-c / b, &mut candidates);
        }

        // Base cap
        if d.y.abs() > DEGENERATE_EPSILON {
            let t = (base_y - ray.origin.y) / d.y;
            let hit = ray.at(t);
            let dx = hit.x - tip.x;
            let dz = hit.z - tip.z;
            if dx * dx + dz * dz <= self.radius * self.radius {
                candidates.push((t, true));
            }
        }

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
        let Some((t, on_base)) = candidates
            .into_iter()
            .find(|&(t, _)| first_valid([t], range, valid).is_some())
        else {
            return NO_HIT;
        };

        let normal = if on_base {
            Vec3::NEG_Y
        } else {
            self.side_normal(ray.at(t))
        };
        rec.set(ray, t, normal, self.material.get());
        t
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        let tip = self.tip();
        if self.height <= 0.0 || p.y <= self.base_y() || p.y >= tip.y {
            return Ok(false);
        }
        let allowed = self.radius * (tip.y - p.y) / self.height;
        let dx = p.x - tip.x;
        let dz = p.z - tip.z;
        Ok(dx * dx + dz * dz < allowed * allowed)
    }

    fn name(&self) -> &'static str {
        "cone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::test_util::{approx, cast, ready};

    // Radius 1, height 2: base at y = -1, apex at y = 1
    fn unit_cone() -> Cone {
        ready(Cone::new(Vec3::ZERO, 1.0, 2.0, 0))
    }

    #[test]
    fn test_cone_side_hit() {
        let cone = unit_cone();
        // At y = 0 the radius is 0.5
        let (t, rec) = cast(&cone, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((t - 4.5).abs() < 1e-4);
        assert!(approx(rec.p, Vec3::new(-0.5, 0.0, 0.0)));

        let expected = Vec3::new(-2.0, 1.0, 0.0).normalize();
        assert!(approx(rec.normal, expected));
    }

    #[test]
    fn test_cone_base_hit() {
        let cone = unit_cone();
        let (t, rec) = cast(&cone, Vec3::new(0.3, -4.0, 0.0), Vec3::Y);
        assert!((t - 3.0).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::NEG_Y));
    }

    #[test]
    fn test_cone_rejects_upper_nappe() {
        let cone = unit_cone();
        // Passes above the apex where only the mirrored nappe lies
        let (t, _) = cast(&cone, Vec3::new(-5.0, 1.5, 0.0), Vec3::X);
        assert_eq!(t, NO_HIT);
    }

    #[test]
    fn test_cone_miss_outside_base_radius() {
        let cone = unit_cone();
        let (t, _) = cast(&cone, Vec3::new(1.5, -4.0, 0.0), Vec3::Y);
        assert_eq!(t, NO_HIT);
    }

    #[test]
    fn test_cone_down_the_axis_hits_apex_region() {
        let cone = unit_cone();
        let (t, _) = cast(&cone, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!((t - 4.0).abs() < 1e-3);
    }

    #[test]
    fn test_cone_is_inside() {
        let cone = unit_cone();
        assert!(cone.is_inside(Vec3::new(0.0, 0.0, 0.0)).unwrap());
        assert!(cone.is_inside(Vec3::new(0.4, 0.0, 0.0)).unwrap());
        assert!(!cone.is_inside(Vec3::new(0.6, 0.0, 0.0)).unwrap());
        assert!(!cone.is_inside(Vec3::new(0.0, 1.2, 0.0)).unwrap());
        assert!(!cone.is_inside(Vec3::new(0.0, -1.2, 0.0)).unwrap());
    }
}
