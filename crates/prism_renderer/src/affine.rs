//! Affine transform wrapper for shapes.
//!
//! Rays are brought into the child's local frame with the inverse matrix.
//! Local directions are not renormalized, so the ray parameter of a local hit
//! is also the parameter of the world hit.

use prism_core::{SceneData, Transform};
use prism_math::{Aabb, Interval, Mat3, Mat4, Mat4Ext, Ray, Vec3};

use crate::error::{ShapeError, ShapeResult};
use crate::shape::{HitRecord, Shape, NO_HIT};

/// Matrices with a smaller determinant magnitude cannot be inverted reliably.
const SINGULAR_EPSILON: f32 = 1e-12;

/// A shape placed in the scene by an affine matrix.
pub struct AffineShape {
    shape: Box<dyn Shape>,
    /// Local-to-world transform
    matrix: Mat4,
    /// World-to-local transform
    inverse: Mat4,
    /// Maps local normals to world normals
    normal_matrix: Mat3,
    bbox: Aabb,
}

impl AffineShape {
    /// Wrap a shape with a local-to-world matrix.
    pub fn new(shape: Box<dyn Shape>, matrix: Mat4) -> Self {
        Self {
            shape,
            matrix,
            inverse: Mat4::IDENTITY,
            normal_matrix: Mat3::IDENTITY,
            bbox: Aabb::EMPTY,
        }
    }

    /// Wrap a shape with a scale/rotate/translate transform.
    pub fn from_transform(shape: Box<dyn Shape>, transform: &Transform) -> Self {
        Self::new(shape, transform.to_matrix())
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn inner(&self) -> &dyn Shape {
        self.shape.as_ref()
    }
}

impl Shape for AffineShape {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        let determinant = self.matrix.determinant();
        if !determinant.is_finite() || determinant.abs() < SINGULAR_EPSILON {
            return Err(ShapeError::SingularTransform { determinant });
        }
        self.inverse = self.matrix.inverse();
        self.normal_matrix = self.matrix.normal_matrix();

        self.shape.initialize(data)
    }

    fn update_bounding_box(&mut self) -> Aabb {
        let local = self.shape.update_bounding_box();
        self.bbox = self.matrix.transform_aabb(&local);
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
        let local_ray = self.inverse.transform_ray(ray);
        let t = self.shape.intersect(&local_ray, range, valid, rec);
        if t < NO_HIT {
            rec.p = self.matrix.transform_point3(rec.p);
            rec.normal = (self.normal_matrix * rec.normal).normalize_or_zero();
        }
        t
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        self.shape.is_inside(self.inverse.transform_point3(p))
    }

    fn is_solid(&self) -> bool {
        self.shape.is_solid()
    }

    fn name(&self) -> &'static str {
        "affine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cylinder::Cylinder;
    use crate::shape::test_util::{approx, cast, ready, test_data};
    use crate::sphere::Sphere;
    use prism_math::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn wrapped(shape: impl Shape + 'static, matrix: Mat4) -> AffineShape {
        ready(AffineShape::new(Box::new(shape), matrix))
    }

    #[test]
    fn test_translated_sphere() {
        let shape = wrapped(
            Sphere::new(Vec3::ZERO, 1.0, 0),
            Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)),
        );
        let (t, rec) = cast(&shape, Vec3::ZERO, Vec3::Z);
        assert!((t - 4.0).abs() < 1e-5);
        assert!(approx(rec.p, Vec3::new(0.0, 0.0, 4.0)));
        assert!(approx(rec.normal, Vec3::NEG_Z));
    }

    #[test]
    fn test_scaled_sphere_normal() {
        // Ellipsoid with semi-axes (2, 1, 1)
        let shape = wrapped(
            Sphere::new(Vec3::ZERO, 1.0, 0),
            Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)),
        );

        let (t, rec) = cast(&shape, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((t - 3.0).abs() < 1e-5);
        assert!(approx(rec.normal, Vec3::NEG_X));

        // Off-axis hit: the normal is bent by the inverse transpose
        let p = Vec3::new(2.0 * 0.6, 0.8, 0.0);
        let (t, rec) = cast(&shape, Vec3::new(1.2, 5.0, 0.0), Vec3::NEG_Y);
        assert!((t - 4.2).abs() < 1e-4);
        assert!(approx(rec.p, p));
        assert!(approx(rec.normal, Vec3::new(0.3, 0.8, 0.0).normalize()));
    }

    #[test]
    fn test_rotated_cylinder_bounds_and_hit() {
        // Lay the cylinder along X
        let cyl = Cylinder::new(Vec3::ZERO, 0.5, 4.0, 0);
        let shape = wrapped(cyl, Mat4::from_quat(Quat::from_rotation_z(FRAC_PI_2)));

        let bbox = shape.bounding_box();
        assert!((bbox.x.min + 2.0).abs() < 1e-4);
        assert!((bbox.x.max - 2.0).abs() < 1e-4);
        assert!((bbox.y.max - 0.5).abs() < 1e-4);

        let (t, rec) = cast(&shape, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((t - 3.0).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::NEG_X));
    }

    #[test]
    fn test_affine_is_inside() {
        let shape = AffineShape::new(
            Box::new(Sphere::new(Vec3::ZERO, 1.0, 0)),
            Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0)),
        );
        let shape = ready(shape);
        assert!(shape.is_inside(Vec3::new(3.5, 0.0, 0.0)).unwrap());
        assert!(!shape.is_inside(Vec3::ZERO).unwrap());
    }

    #[test]
    fn test_singular_transform_rejected() {
        let mut shape = AffineShape::new(
            Box::new(Sphere::new(Vec3::ZERO, 1.0, 0)),
            Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)),
        );
        assert!(matches!(
            shape.initialize(&test_data()),
            Err(ShapeError::SingularTransform { .. })
        ));
    }

    #[test]
    fn test_from_transform() {
        let transform = Transform::from_translation(Vec3::new(0.0, 2.0, 0.0));
        let shape = ready(AffineShape::from_transform(
            Box::new(Sphere::new(Vec3::ZERO, 1.0, 0)),
            &transform,
        ));
        let (t, _) = cast(&shape, Vec3::new(0.0, 10.0, 0.0), Vec3::NEG_Y);
        assert!((t - 7.0).abs() < 1e-5);
    }
}
