//! Light trait and the Phong terms and shadow walk shared by all lights.

use prism_core::Color;
use prism_math::{reflect, Interval, Ray, Vec3, SURFACE_EPSILON};
use serde::{Deserialize, Serialize};

use crate::shape::{always_valid, HitRecord, Shape, NO_HIT};

/// Upper bound on occluders visited by one transparency walk.
pub const MAX_OCCLUDERS: usize = 64;

/// A light source evaluated at a surface hit.
///
/// `ray` is the ray that produced the hit; its origin is the viewer position
/// used for the specular term.
pub trait Light: Send + Sync {
    /// Ambient term. Not subject to shadowing.
    fn ambient(&self, ray: &Ray, rec: &HitRecord) -> Color;

    /// Lambertian term.
    fn diffuse(&self, ray: &Ray, rec: &HitRecord) -> Color;

    /// Phong highlight term.
    fn specular(&self, ray: &Ray, rec: &HitRecord) -> Color;

    /// True if any surface of `root` blocks the path from the hit to the light.
    fn is_in_shadow(&self, rec: &HitRecord, root: &dyn Shape) -> bool;

    /// Product of the transparent coefficients of every occluder between the
    /// hit and the light. The walk stops early once every channel is no
    /// longer above `cutoff`.
    fn transparency(&self, rec: &HitRecord, root: &dyn Shape, cutoff: Color) -> Color;
}

/// Per-term light colors.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intensity {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Intensity {
    pub fn new(ambient: Color, diffuse: Color, specular: Color) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// The same color for diffuse and specular, no ambient.
    pub fn uniform(color: Color) -> Self {
        Self::new(Color::ZERO, color, color)
    }

    pub fn scaled(self, factor: f32) -> Self {
        Self::new(
            self.ambient * factor,
            self.diffuse * factor,
            self.specular * factor,
        )
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::uniform(Color::ONE)
    }
}

/// Distance falloff `1 / (constant + linear·d + quadratic·d²)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    pub const NONE: Attenuation = Attenuation::new(1.0, 0.0, 0.0);

    pub const fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Multiplier at distance `d`. A non-positive divisor leaves the light
    /// unattenuated.
    pub fn factor(&self, d: f32) -> f32 {
        let divisor = self.constant + self.linear * d + self.quadratic * d * d;
        if divisor > 0.0 {
            1.0 / divisor
        } else {
            1.0
        }
    }
}

impl Default for Attenuation {
    fn default() -> Self {
        Self::NONE
    }
}

/// `kd · (n·l) · intensity`, zero if the surface faces away from the light.
pub(crate) fn lambert(rec: &HitRecord, to_light: Vec3, intensity: Color) -> Color {
    let n_dot_l = rec.normal.dot(to_light);
    if n_dot_l <= 0.0 {
        return Color::ZERO;
    }
    rec.material.diffuse * n_dot_l * intensity
}

/// `ks · (v·r)^falloff · intensity`, where `r` is the light direction mirrored
/// about the normal and `v` points back toward the ray origin.
pub(crate) fn phong(ray: &Ray, rec: &HitRecord, to_light: Vec3, intensity: Color) -> Color {
    if rec.normal.dot(to_light) <= 0.0 {
        return Color::ZERO;
    }
    let view = (ray.origin - rec.p).normalize_or_zero();
    let mirrored = reflect(-to_light, rec.normal);
    let v_dot_r = view.dot(mirrored);
    if v_dot_r <= 0.0 {
        return Color::ZERO;
    }
    rec.material.specular * v_dot_r.powf(rec.material.specular_falloff) * intensity
}

/// Whether anything lies within `distance` of the hit along `to_light`.
pub(crate) fn occluded(rec: &HitRecord, to_light: Vec3, distance: f32, root: &dyn Shape) -> bool {
    let shadow_ray = Ray::offset_from(rec.p, to_light, SURFACE_EPSILON);
    let mut occluder = HitRecord::default();
    root.intersect(
        &shadow_ray,
        Interval::new(0.0, distance),
        &always_valid,
        &mut occluder,
    ) < NO_HIT
}

/// Walk the occluders along `to_light`, multiplying their transparency.
pub(crate) fn transmittance(
    rec: &HitRecord,
    to_light: Vec3,
    distance: f32,
    root: &dyn Shape,
    cutoff: Color,
) -> Color {
    let mut trans = Color::ONE;
    let mut origin = rec.p;
    let mut remaining = distance;

    for _ in 0..MAX_OCCLUDERS {
        if !trans.cmpgt(cutoff).all() {
            break;
        }
        let shadow_ray = Ray::offset_from(origin, to_light, SURFACE_EPSILON);
        let mut occluder = HitRecord::default();
        let t = root.intersect(
            &shadow_ray,
            Interval::new(0.0, remaining),
            &always_valid,
            &mut occluder,
        );
        if t == NO_HIT {
            break;
        }
        trans *= occluder.material.transparent;
        origin = occluder.p;
        remaining -= t + SURFACE_EPSILON;
    }

    trans
}
