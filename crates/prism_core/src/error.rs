//! Construction-time integrity errors.
//!
//! These are fatal: a shape that cannot resolve its material or vertices must
//! not take part in rendering.

use thiserror::Error;

use crate::texture::TextureError;

/// Errors raised while binding shapes to scene data.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("negative material index: {0}")]
    NegativeMaterialIndex(i32),

    #[error("material index out of bounds: {index} >= {count}")]
    MaterialIndexOutOfBounds { index: i32, count: usize },

    #[error("negative vertex index: {0}")]
    NegativeVertexIndex(i32),

    #[error("vertex index out of bounds: {index} >= {count}")]
    VertexIndexOutOfBounds { index: i32, count: usize },

    #[error("texture error: {0}")]
    Texture(#[from] TextureError),
}

pub type SceneResult<T> = Result<T, SceneError>;
