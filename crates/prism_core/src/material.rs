//! Surface material definition.
//!
//! Materials are owned by the scene (see [`SceneData`](crate::SceneData)) and
//! shared with shapes once their indices are resolved.

use std::sync::Arc;

use prism_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::texture::Texture;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Phong-style surface description.
///
/// Every coefficient is a per-channel RGB weight.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Material name (for diagnostics)
    pub name: String,

    /// Weight applied to each light's ambient intensity
    pub ambient: Color,

    /// Lambertian reflectance
    pub diffuse: Color,

    /// Highlight weight; also the mirror reflection weight
    pub specular: Color,

    /// Transmission weight for refraction and shadow rays
    pub transparent: Color,

    /// Light emitted by the surface itself
    pub emissive: Color,

    /// Phong exponent for the specular highlight
    pub specular_falloff: f32,

    /// Index of refraction
    pub ior: f32,

    /// Texture modulating the shaded color
    #[serde(skip)]
    pub texture: Option<Arc<Texture>>,
}

/// Material bound to hit records before any shape has reported a hit.
static UNSET_MATERIAL: Material = Material::UNSET;

impl Material {
    /// Black, opaque, non-reflective.
    pub const UNSET: Material = Material {
        name: String::new(),
        ambient: Vec3::ZERO,
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
        transparent: Vec3::ZERO,
        emissive: Vec3::ZERO,
        specular_falloff: 1.0,
        ior: 1.0,
        texture: None,
    };

    /// Create a new material with just a name; all coefficients are zero.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Shared reference to the unset material.
    pub fn unset() -> &'static Material {
        &UNSET_MATERIAL
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn with_diffuse(mut self, diffuse: Color) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Set the specular weight and the Phong exponent.
    pub fn with_specular(mut self, specular: Color, falloff: f32) -> Self {
        self.specular = specular;
        self.specular_falloff = falloff;
        self
    }

    /// Set the transmission weight and index of refraction.
    pub fn with_transparency(mut self, transparent: Color, ior: f32) -> Self {
        self.transparent = transparent;
        self.ior = ior;
        self
    }

    pub fn with_emissive(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_texture(mut self, texture: Arc<Texture>) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive.length_squared() > 0.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::UNSET
    }
}
