//! Positional light restricted to a cone around its axis.

use prism_core::Color;
use prism_math::{Ray, Vec3};

use crate::light::{lambert, occluded, phong, transmittance, Attenuation, Intensity, Light};
use crate::shape::{HitRecord, Shape};

/// A spot light. Outside its cone it contributes nothing at all; inside, its
/// intensity falls off as `cos(angle)^falloff` away from the axis.
#[derive(Clone, Debug)]
pub struct SpotLight {
    position: Vec3,
    /// Unit direction of the cone axis
    direction: Vec3,
    /// Half-angle of the cone, in radians
    cutoff_angle: f32,
    /// Exponent of the angular falloff
    falloff: f32,
    intensity: Intensity,
    attenuation: Attenuation,
}

/// What a spot light delivers to one point inside its cone.
struct Arrival {
    to_light: Vec3,
    distance: f32,
    intensity: Intensity,
}

impl SpotLight {
    pub fn new(position: Vec3, direction: Vec3, cutoff_angle: f32, intensity: Intensity) -> Self {
        Self {
            position,
            direction: direction.normalize_or(Vec3::NEG_Y),
            cutoff_angle,
            falloff: 1.0,
            intensity,
            attenuation: Attenuation::NONE,
        }
    }

    pub fn with_falloff(mut self, falloff: f32) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_attenuation(mut self, attenuation: Attenuation) -> Self {
        self.attenuation = attenuation;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// `None` outside the cone.
    fn arriving(&self, p: Vec3) -> Option<Arrival> {
        let offset = self.position - p;
        let distance = offset.length();
        let to_light = offset.normalize_or_zero();

        let cos_angle = (-to_light).dot(self.direction);
        if cos_angle < self.cutoff_angle.cos() {
            return None;
        }

        let factor = cos_angle.max(0.0).powf(self.falloff) * self.attenuation.factor(distance);
        Some(Arrival {
            to_light,
            distance,
            intensity: self.intensity.scaled(factor),
        })
    }
}

impl Light for SpotLight {
    fn ambient(&self, _ray: &Ray, rec: &HitRecord) -> Color {
        self.arriving(rec.p)
            .map_or(Color::ZERO, |a| rec.material.ambient * a.intensity.ambient)
    }

    fn diffuse(&self, _ray: &Ray, rec: &HitRecord) -> Color {
        self.arriving(rec.p)
            .map_or(Color::ZERO, |a| lambert(rec, a.to_light, a.intensity.diffuse))
    }

    fn specular(&self, ray: &Ray, rec: &HitRecord) -> Color {
        self.arriving(rec.p)
            .map_or(Color::ZERO, |a| phong(ray, rec, a.to_light, a.intensity.specular))
    }

    fn is_in_shadow(&self, rec: &HitRecord, root: &dyn Shape) -> bool {
        self.arriving(rec.p)
            .is_some_and(|a| occluded(rec, a.to_light, a.distance, root))
    }

    fn transparency(&self, rec: &HitRecord, root: &dyn Shape, cutoff: Color) -> Color {
        self.arriving(rec.p).map_or(Color::ONE, |a| {
            transmittance(rec, a.to_light, a.distance, root, cutoff)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::test_util::{floor_hit, occluders, FLOOR_POINT};
    use prism_core::Material;
    use std::f32::consts::FRAC_PI_4;

    fn lit_material() -> Material {
        Material::new("m")
            .with_ambient(Color::ONE)
            .with_diffuse(Color::ONE)
            .with_specular(Color::ONE, 1.0)
    }

    #[test]
    fn test_spot_inside_cone() {
        let material = lit_material();
        let rec = HitRecord {
            normal: Vec3::Y,
            material: &material,
            ..Default::default()
        };
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        let spot = SpotLight::new(
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::NEG_Y,
            FRAC_PI_4,
            Intensity::new(Color::splat(0.5), Color::ONE, Color::ONE),
        )
        .with_falloff(4.0);

        // On the axis cos = 1, so the falloff has no effect
        assert!((spot.ambient(&ray, &rec) - Color::splat(0.5)).length() < 1e-6);
        assert!((spot.diffuse(&ray, &rec) - Color::ONE).length() < 1e-6);
    }

    #[test]
    fn test_spot_falloff_off_axis() {
        let material = lit_material();
        let rec = HitRecord {
            normal: Vec3::Y,
            material: &material,
            ..Default::default()
        };
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y);
        // Axis tilted 30 degrees from the direction to the hit
        let axis = Vec3::new(0.5, -(3.0f32).sqrt() * 0.5, 0.0);
        let spot = SpotLight::new(Vec3::new(0.0, 2.0, 0.0), axis, FRAC_PI_4, Intensity::default())
            .with_falloff(2.0);

        let cos30 = (3.0f32).sqrt() * 0.5;
        let expected = cos30 * cos30;
        assert!((spot.diffuse(&ray, &rec).x - expected).abs() < 1e-5);
    }

    #[test]
    fn test_spot_outside_cone_is_dark_and_unshadowed() {
        let material = lit_material();
        let rec = HitRecord {
            p: FLOOR_POINT,
            normal: Vec3::Y,
            material: &material,
            ..Default::default()
        };
        let ray = Ray::new(FLOOR_POINT + Vec3::Y, Vec3::NEG_Y);
        // Pointing straight up, away from the floor
        let spot = SpotLight::new(
            FLOOR_POINT + Vec3::Y * 5.0,
            Vec3::Y,
            FRAC_PI_4,
            Intensity::new(Color::ONE, Color::ONE, Color::ONE),
        );
        let (_data, root) = occluders(&[(2.0, 0)]);

        assert_eq!(spot.ambient(&ray, &rec), Color::ZERO);
        assert_eq!(spot.diffuse(&ray, &rec), Color::ZERO);
        assert_eq!(spot.specular(&ray, &rec), Color::ZERO);
        assert!(!spot.is_in_shadow(&rec, &root));
        assert_eq!(spot.transparency(&rec, &root, Color::ZERO), Color::ONE);
    }

    #[test]
    fn test_spot_shadow_inside_cone() {
        let (_data, root) = occluders(&[(2.0, 0)]);
        let spot = SpotLight::new(
            FLOOR_POINT + Vec3::Y * 5.0,
            Vec3::NEG_Y,
            FRAC_PI_4,
            Intensity::default(),
        );
        let rec = floor_hit();

        assert!(spot.is_in_shadow(&rec, &root));
        assert_eq!(spot.transparency(&rec, &root, Color::splat(0.01)), Color::ZERO);
    }
}
