//! Omnidirectional light at a position, attenuated with distance.

use prism_core::Color;
use prism_math::{Ray, Vec3};

use crate::light::{lambert, occluded, phong, transmittance, Attenuation, Intensity, Light};
use crate::shape::{HitRecord, Shape};

/// A point light source.
#[derive(Clone, Debug)]
pub struct PointLight {
    position: Vec3,
    intensity: Intensity,
    attenuation: Attenuation,
}

impl PointLight {
    pub fn new(position: Vec3, intensity: Intensity) -> Self {
        Self {
            position,
            intensity,
            attenuation: Attenuation::NONE,
        }
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit direction toward the light, distance to it, and the attenuated
    /// intensities at that distance.
    fn arriving(&self, p: Vec3) -> (Vec3, f32, Intensity) {
        let offset = self.position - p;
        let distance = offset.length();
        let to_light = offset.normalize_or_zero();
        (to_light, distance, self.intensity.scaled(self.attenuation.factor(distance)))
    }
}

impl Light for PointLight {
    fn ambient(&self, _ray: &Ray, rec: &HitRecord) -> Color {
        let (_, _, intensity) = self.arriving(rec.p);
        rec.material.ambient * intensity.ambient
    }

    fn diffuse(&self, _ray: &Ray, rec: &HitRecord) -> Color {
        let (to_light, _, intensity) = self.arriving(rec.p);
        lambert(rec, to_light, intensity.diffuse)
    }

    fn specular(&self, ray: &Ray, rec: &HitRecord) -> Color {
        let (to_light, _, intensity) = self.arriving(rec.p);
        phong(ray, rec, to_light, intensity.specular)
    }

    fn is_in_shadow(&self, rec: &HitRecord, root: &dyn Shape) -> bool {
        let (to_light, distance, _) = self.arriving(rec.p);
        occluded(rec, to_light, distance, root)
    }

    fn transparency(&self, rec: &HitRecord, root: &dyn Shape, cutoff: Color) -> Color {
        let (to_light, distance, _) = self.arriving(rec.p);
        transmittance(rec, to_light, distance, root, cutoff)
    }
}
