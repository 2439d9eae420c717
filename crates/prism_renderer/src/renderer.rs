//! Frame driver: per-pixel tracing and the parallel bucket render.

use std::path::Path;
use std::time::Instant;

use prism_core::Color;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::camera::Camera;
use crate::error::ConfigError;
use crate::scene::{Scene, TraceStats};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Maximum number of reflection/refraction bounces
    pub max_depth: u32,
    /// Per-channel weight below which a branch is no longer traced
    pub color_cutoff: f32,
    /// Edge length of the square render buckets, in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            max_depth: 5,
            color_cutoff: 0.001,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_color_cutoff(mut self, color_cutoff: f32) -> Self {
        self.color_cutoff = color_cutoff;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn cutoff(&self) -> Color {
        Color::splat(self.color_cutoff)
    }
}

/// Convert a color to 8-bit RGBA. Channels are clamped, not gamma corrected.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = color.clamp(Color::ZERO, Color::ONE);
    [
        (255.0 * c.x).round() as u8,
        (255.0 * c.y).round() as u8,
        (255.0 * c.z).round() as u8,
        255,
    ]
}

/// Trace the pixel at image row `y` (top row is 0), column `x`.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    config: &RenderConfig,
    stats: &mut TraceStats,
) -> Color {
    // Camera rows count up from the bottom of the image
    let j = config.height - 1 - y;
    let ray = camera.get_ray(x, j, config.width, config.height);
    scene.trace(&ray, config.max_depth, config.cutoff(), stats)
}

/// Simple image buffer for storing render output.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y), clamped to [0, 1].
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color.clamp(Color::ZERO, Color::ONE);
    }

    /// Copy a finished bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let local_x = i as u32 % bucket.width;
            let local_y = i as u32 / bucket.width;
            self.set(bucket.x + local_x, bucket.y + local_y, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity((self.width * self.height * 4) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color));
        }
        bytes
    }

    /// Binary PPM (P6) encoding.
    pub fn to_ppm(&self) -> Vec<u8> {
        let mut bytes = format!("P6\n{} {}\n255\n", self.width, self.height).into_bytes();
        bytes.reserve((self.width * self.height * 3) as usize);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgba(*color)[..3]);
        }
        bytes
    }
}

/// Render the whole frame, buckets in parallel.
///
/// Returns the image and the merged statistics of every traced ray.
pub fn render(scene: &Scene, camera: &Camera, config: &RenderConfig) -> (ImageBuffer, TraceStats) {
    let start = Instant::now();
    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets (max depth {}, cutoff {})",
        config.width,
        config.height,
        buckets.len(),
        config.max_depth,
        config.color_cutoff
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, scene, camera, config))
        .collect();

    let mut image = ImageBuffer::new(config.width, config.height);
    let mut stats = TraceStats::new();
    for result in &results {
        image.write_bucket(result);
        stats.merge(&result.stats);
    }

    log::info!(
        "Render finished in {:.2?}: {} rays, deepest bounce {}",
        start.elapsed(),
        stats.rays,
        stats.deepest
    );

    (image, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point_light::PointLight;
    use crate::light::Intensity;
    use crate::sphere::Sphere;
    use prism_core::{Material, SceneData};
    use prism_math::Vec3;

    fn sphere_scene() -> Scene {
        let mut data = SceneData::new();
        let red = data.add_material(
            Material::new("red")
                .with_diffuse(Color::new(1.0, 0.0, 0.0))
                .with_specular(Color::splat(0.5), 16.0),
        );
        let mut scene = Scene::new(data);
        scene.add_shape(Sphere::new(Vec3::new(0.0, 0.0, -5.0), 1.0, red));
        scene.add_light(PointLight::new(Vec3::new(0.0, 0.0, 5.0), Intensity::default()));
        scene.initialize().unwrap();
        scene
    }

    #[test]
    fn test_color_to_rgba() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::new(1.0, 0.5, 2.0)), [255, 128, 255, 255]);
        assert_eq!(color_to_rgba(Color::splat(-1.0)), [0, 0, 0, 255]);
    }

    #[test]
    fn test_config_from_json() {
        let config = RenderConfig::from_json(r#"{ "width": 32, "max_depth": 2 }"#).unwrap();
        assert_eq!(config.width, 32);
        assert_eq!(config.height, 480);
        assert_eq!(config.max_depth, 2);
        assert_eq!(config.bucket_size, DEFAULT_BUCKET_SIZE);

        assert!(matches!(
            RenderConfig::from_json("{ width: }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_render_pixel_rows_are_flipped() {
        // A light source only in the upper half of the view
        let mut data = SceneData::new();
        let glow = data.add_material(Material::new("glow").with_emissive(Color::ONE));
        let mut scene = Scene::new(data);
        scene.add_shape(Sphere::new(Vec3::new(0.0, 3.0, -5.0), 1.0, glow));
        scene.initialize().unwrap();

        let camera = Camera::new();
        let config = RenderConfig::default().with_resolution(21, 21);
        let mut stats = TraceStats::new();

        // Top of the image sees the sphere above the axis
        let top = render_pixel(&scene, &camera, 10, 4, &config, &mut stats);
        let bottom = render_pixel(&scene, &camera, 10, 16, &config, &mut stats);
        assert_eq!(top, Color::ONE);
        assert_eq!(bottom, Color::ZERO);
    }

    #[test]
    fn test_render_frame() {
        let scene = sphere_scene();
        let camera = Camera::new();
        let config = RenderConfig::default()
            .with_resolution(40, 30)
            .with_bucket_size(16)
            .with_max_depth(2);

        let (image, stats) = render(&scene, &camera, &config);
        assert_eq!(image.pixels.len(), 40 * 30);
        assert!(stats.rays >= 40 * 30);
        assert!(stats.deepest <= 2);

        // Center sees the lit sphere, the corner sees nothing
        assert!(image.get(20, 15).x > 0.5);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.to_rgba().len(), 40 * 30 * 4);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let scene = sphere_scene();
        let camera = Camera::new();
        let config = RenderConfig::default().with_resolution(24, 18).with_bucket_size(7);

        let (image, _) = render(&scene, &camera, &config);
        let mut stats = TraceStats::new();
        for y in 0..config.height {
            for x in 0..config.width {
                let expected = render_pixel(&scene, &camera, x, y, &config, &mut stats);
                assert_eq!(image.get(x, y), expected);
            }
        }
    }

    #[test]
    fn test_ppm_header() {
        let image = ImageBuffer::new(3, 2);
        let ppm = image.to_ppm();
        assert!(ppm.starts_with(b"P6\n3 2\n255\n"));
        assert_eq!(ppm.len(), b"P6\n3 2\n255\n".len() + 18);
    }
}
