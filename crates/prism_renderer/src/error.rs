//! Errors raised by shapes at construction and containment time.

use prism_core::SceneError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShapeError {
    /// A material or vertex index did not resolve.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Containment was asked of a shape that does not enclose a volume.
    #[error("{shape} is an open surface and has no inside")]
    NotSolid { shape: &'static str },

    /// An affine wrapper was given a matrix that cannot be inverted.
    #[error("affine transform is singular (determinant {determinant})")]
    SingularTransform { determinant: f32 },
}

pub type ShapeResult<T> = Result<T, ShapeError>;

/// Failure to load a [`RenderConfig`](crate::RenderConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid render configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
