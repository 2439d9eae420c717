// Transform utilities for Mat4
//
// Extends glam::Mat4 with the affine operations the ray tracer needs.
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use crate::{Aabb, Ray};
use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// The matrix that maps surface normals: inverse transpose of the linear part.
    fn normal_matrix(&self) -> Mat3;

    /// Map a ray by this matrix. The direction is not renormalized, so ray
    /// parameters are preserved across the transform.
    fn transform_ray(&self, ray: &Ray) -> Ray;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn normal_matrix(&self) -> Mat3 {
        Mat3::from_mat4(*self).inverse().transpose()
    }

    fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::new(
            self.transform_point3(ray.origin),
            self.transform_vector3(ray.direction),
        )
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return Aabb::EMPTY;
        }

        let transformed: Vec<Vec3> = aabb
            .corners()
            .iter()
            .map(|&corner| self.transform_point3(corner))
            .collect();

        Aabb::from_point_cloud(&transformed)
    }
}
