//! Light arriving from a fixed direction, without falloff.

use prism_core::Color;
use prism_math::{Ray, Vec3};

use crate::light::{lambert, occluded, phong, transmittance, Intensity, Light};
use crate::shape::{HitRecord, Shape, NO_HIT};

/// A light infinitely far away, shining along `direction`.
#[derive(Clone, Debug)]
pub struct DirectionalLight {
    /// Unit direction the light travels in
    direction: Vec3,
    intensity: Intensity,
}

impl DirectionalLight {
    pub fn new(direction: Vec3, intensity: Intensity) -> Self {
        Self {
            direction: direction.normalize_or(Vec3::NEG_Y),
            intensity,
        }
    }

    pub fn with_intensity(mut self, intensity: Intensity) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    fn to_light(&self) -> Vec3 {
        -self.direction
    }
}

impl Light for DirectionalLight {
    fn ambient(&self, _ray: &Ray, rec: &HitRecord) -> Color {
        rec.material.ambient * self.intensity.ambient
    }

    fn diffuse(&self, _ray: &Ray, rec: &HitRecord) -> Color {
        lambert(rec, self.to_light(), self.intensity.diffuse)
    }

    fn specular(&self, ray: &Ray, rec: &HitRecord) -> Color {
        phong(ray, rec, self.to_light(), self.intensity.specular)
    }

    fn is_in_shadow(&self, rec: &HitRecord, root: &dyn Shape) -> bool {
        occluded(rec, self.to_light(), NO_HIT, root)
    }

    fn transparency(&self, rec: &HitRecord, root: &dyn Shape, cutoff: Color) -> Color {
        transmittance(rec, self.to_light(), NO_HIT, root, cutoff)
    }
}
