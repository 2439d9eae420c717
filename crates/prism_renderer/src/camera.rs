//! Pinhole camera for primary ray generation.

use prism_math::{Ray, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Camera with an explicit orthonormal basis.
///
/// Pixel `(0, 0)` is the bottom-left corner of the image: `i` grows along
/// `right` and `j` grows along `up`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Vec3,
    /// Unit view direction
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Vertical field of view. Values above π are read as degrees.
    pub height_angle: f32,
}

impl Camera {
    /// Create a camera at the origin looking down -Z with a 90° vertical field.
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            forward: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            height_angle: PI / 2.0,
        }
    }

    /// Camera at `position` aimed at `target`, with `up` as the approximate
    /// vertical.
    pub fn look_at(position: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - position).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(up).normalize_or(Vec3::X);
        Self {
            position,
            forward,
            right,
            up: right.cross(forward),
            ..Self::new()
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the vertical field of view, in radians or degrees.
    pub fn with_height_angle(mut self, height_angle: f32) -> Self {
        self.height_angle = height_angle;
        self
    }

    /// Vertical field of view in radians.
    pub fn height_angle_radians(&self) -> f32 {
        if self.height_angle > PI {
            self.height_angle.to_radians()
        } else {
            self.height_angle
        }
    }

    /// Ray through the center of pixel `(i, j)` of a `width × height` image.
    pub fn get_ray(&self, i: u32, j: u32, width: u32, height: u32) -> Ray {
        let theta_v = self.height_angle_radians();
        let aspect = width as f32 / height as f32;
        let theta_h = 2.0 * (aspect * (theta_v / 2.0).tan()).atan();

        let half_width = (theta_h / 2.0).tan();
        let half_height = (theta_v / 2.0).tan();

        let ndc_x = (2.0 * ((i as f32 + 0.5) / width as f32) - 1.0) * half_width;
        let ndc_y = (2.0 * ((j as f32 + 0.5) / height as f32) - 1.0) * half_height;

        let direction = self.forward + ndc_x * self.right + ndc_y * self.up;
        Ray::new(self.position, direction.normalize())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
