//! Texture loading and sampling for materials.
//!
//! Textures are sampled at the texture coordinate of a hit. Coordinates that
//! land on the texel lattice read a single texel; everything else is blended
//! bilinearly from the four surrounding texels.

use std::path::Path;

use prism_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture data does not match its size: expected {expected} texels, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Scaled coordinates closer than this to a texel center are point sampled.
const LATTICE_TOLERANCE: f32 = 1e-6;

/// A loaded texture with pixel data.
///
/// Stores pixels as RGB floats in the 0-1 range, row-major, with row 0 at v = 0.
/// A texture always holds at least one texel and exactly `width * height` of them.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<Vec3>,
    /// Original file path (for debugging)
    path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(
        width: u32,
        height: u32,
        pixels: Vec<Vec3>,
        path: impl Into<String>,
    ) -> TextureResult<Self> {
        let expected = (width as usize) * (height as usize);
        if expected == 0 || pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            path: path.into(),
        })
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Vec3) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![color],
            path: "<solid>".to_string(),
        }
    }

    /// Load a texture from an image file.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| {
            TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb
            .pixels()
            .map(|p| Vec3::new(p[0] as f32, p[1] as f32, p[2] as f32) / 255.0)
            .collect();

        let texture = Self::new(width, height, pixels, path.to_string_lossy())?;
        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            texture.path,
            texture.width,
            texture.height,
            texture.size_bytes() as f32 / 1024.0
        );
        Ok(texture)
    }

    /// Texture width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data, one color per texel
    pub fn pixels(&self) -> &[Vec3] {
        &self.pixels
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Sample the texture at a texture coordinate in [0, 1]².
    ///
    /// Coordinates outside the unit square are clamped to its edge.
    pub fn sample(&self, uv: Vec2) -> Vec3 {
        let uv = uv.clamp(Vec2::ZERO, Vec2::ONE);
        let x = uv.x * self.width.saturating_sub(1) as f32;
        let y = uv.y * self.height.saturating_sub(1) as f32;

        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as u32, y0 as u32);

        if fx < LATTICE_TOLERANCE && fy < LATTICE_TOLERANCE {
            return self.texel(x0, y0);
        }

        let x1 = x0 + 1;
        let y1 = y0 + 1;

        let p00 = self.texel(x0, y0);
        let p10 = self.texel(x1, y0);
        let p01 = self.texel(x0, y1);
        let p11 = self.texel(x1, y1);

        let near = p00 * (1.0 - fx) + p10 * fx;
        let far = p01 * (1.0 - fx) + p11 * fx;
        near * (1.0 - fy) + far * fy
    }

    /// Get the texel at integer coordinates, clamped to the image.
    fn texel(&self, x: u32, y: u32) -> Vec3 {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        self.pixels[(y * self.width + x) as usize]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<Vec3>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Texture {
        // 2x2: black, white / white, black
        Texture::new(
            2,
            2,
            vec![Vec3::ZERO, Vec3::ONE, Vec3::ONE, Vec3::ZERO],
            "<checker>",
        )
        .unwrap()
    }

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width(), 1);
        assert_eq!(tex.height(), 1);
        assert_eq!(tex.pixels().len(), 1);
        assert_eq!(tex.path(), "<solid>");

        let sample = tex.sample(Vec2::new(0.5, 0.5));
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_lattice_point_sample() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(0.0, 0.0)), Vec3::ZERO);
        assert_eq!(tex.sample(Vec2::new(1.0, 0.0)), Vec3::ONE);
        assert_eq!(tex.sample(Vec2::new(0.0, 1.0)), Vec3::ONE);
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), Vec3::ZERO);
    }

    #[test]
    fn test_bilinear_sample() {
        let tex = checker();

        // Center of the checker blends all four texels equally
        let center = tex.sample(Vec2::new(0.5, 0.5));
        assert!((center - Vec3::splat(0.5)).length() < 1e-5);

        // A quarter of the way along the bottom row
        let edge = tex.sample(Vec2::new(0.25, 0.0));
        assert!((edge - Vec3::splat(0.25)).length() < 1e-5);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = checker();
        assert_eq!(tex.sample(Vec2::new(-3.0, -1.0)), Vec3::ZERO);
        assert_eq!(tex.sample(Vec2::new(7.0, 0.0)), Vec3::ONE);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let err = Texture::new(2, 2, vec![Vec3::ZERO; 3], "<bad>").unwrap_err();
        assert!(matches!(
            err,
            TextureError::SizeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_empty_texture_rejected() {
        for (width, height) in [(0, 0), (0, 4), (4, 0)] {
            let err = Texture::new(width, height, Vec::new(), "<empty>").unwrap_err();
            assert!(matches!(err, TextureError::SizeMismatch { expected: 0, actual: 0 }));
        }
    }

    #[test]
    fn test_single_row_samples_without_overflow() {
        let tex = Texture::new(3, 1, vec![Vec3::ZERO, Vec3::splat(0.5), Vec3::ONE], "<row>").unwrap();
        assert_eq!(tex.sample(Vec2::new(1.0, 1.0)), Vec3::ONE);
        assert!((tex.sample(Vec2::new(0.25, 0.7)) - Vec3::splat(0.25)).length() < 1e-5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Texture::load("/nonexistent/texture.png").unwrap_err();
        assert!(matches!(err, TextureError::LoadError(_)));
    }
}
