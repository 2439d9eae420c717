//! Prism Core - scene-owned data for the ray tracer.
//!
//! This crate provides:
//!
//! - **Materials**: Phong-style coefficients with optional textures
//! - **Textures**: point/bilinear sampled image data
//! - **Scene data**: the resolved material and vertex arrays shapes bind to
//!   during their one-time initialization
//!
//! # Example
//!
//! ```ignore
//! use prism_core::{Material, SceneData, Vertex};
//!
//! let mut data = SceneData::new();
//! let red = data.add_material(Material::new("red").with_diffuse(Color::new(1.0, 0.0, 0.0)));
//! let material = data.material(red)?;
//! ```

pub mod error;
pub mod material;
pub mod scene_data;
pub mod texture;

// Re-export commonly used types
pub use error::{SceneError, SceneResult};
pub use material::{Color, Material};
pub use scene_data::{SceneData, Transform, Vertex};
pub use texture::{Texture, TextureError, TextureResult};
