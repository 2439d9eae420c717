//! Scene-owned arrays that shapes bind to during initialization.
//!
//! The loader fills a [`SceneData`] once. Each shape then resolves its signed
//! material and vertex indices against it exactly once, before any ray is
//! traced. Out-of-range indices are fatal.

use std::sync::Arc;

use prism_math::{Mat4, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};
use crate::material::Material;

/// A mesh vertex.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,

    /// Shading normal; `Vec3::ZERO` when the mesh has none
    #[serde(default)]
    pub normal: Vec3,

    #[serde(default)]
    pub tex_coord: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_normal(mut self, normal: Vec3) -> Self {
        self.normal = normal;
        self
    }

    pub fn with_tex_coord(mut self, tex_coord: Vec2) -> Self {
        self.tex_coord = tex_coord;
        self
    }

    /// True if the vertex carries a usable shading normal.
    pub fn has_normal(&self) -> bool {
        self.normal.length_squared() > 0.0
    }
}

/// Materials and vertices shared by every shape in a scene.
#[derive(Clone, Debug, Default)]
pub struct SceneData {
    pub materials: Vec<Arc<Material>>,
    pub vertices: Vec<Vertex>,
}

impl SceneData {
    /// Create empty scene data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a material and return its index.
    pub fn add_material(&mut self, material: Material) -> i32 {
        self.materials.push(Arc::new(material));
        (self.materials.len() - 1) as i32
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> i32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as i32
    }

    /// Resolve a material index.
    pub fn material(&self, index: i32) -> SceneResult<Arc<Material>> {
        if index < 0 {
            return Err(SceneError::NegativeMaterialIndex(index));
        }
        self.materials
            .get(index as usize)
            .cloned()
            .ok_or(SceneError::MaterialIndexOutOfBounds {
                index,
                count: self.materials.len(),
            })
    }

    /// Resolve a vertex index.
    pub fn vertex(&self, index: i32) -> SceneResult<Vertex> {
        if index < 0 {
            return Err(SceneError::NegativeVertexIndex(index));
        }
        self.vertices
            .get(index as usize)
            .copied()
            .ok_or(SceneError::VertexIndexOutOfBounds {
                index,
                count: self.vertices.len(),
            })
    }
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Translation
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    /// Scale
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}
