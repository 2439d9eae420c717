//! Prism Renderer - recursive Whitted-style ray tracing on the CPU.
//!
//! Shapes report their nearest acceptable hit through [`Shape::intersect`],
//! lights evaluate Phong terms and shadow transparency, and [`Scene`] ties
//! them together into a recursive reflect/refract integrator. Frames are
//! rendered in spiral-ordered buckets in parallel.
//!
//! Shapes must be initialized against the scene data once, then have their
//! bounding boxes computed, before any ray is traced; [`Scene::initialize`]
//! does both.

mod affine;
mod bucket;
mod camera;
mod cone;
mod csg;
mod cylinder;
mod directional_light;
mod error;
mod light;
mod point_light;
mod renderer;
mod scene;
mod shape;
mod shape_list;
mod sphere;
mod spot_light;
mod torus;
mod triangle;
mod triangle_list;

pub use affine::AffineShape;
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use cone::Cone;
pub use csg::{Csg, CsgOp};
pub use cylinder::Cylinder;
pub use directional_light::DirectionalLight;
pub use error::{ConfigError, ShapeError, ShapeResult};
pub use light::{Attenuation, Intensity, Light, MAX_OCCLUDERS};
pub use point_light::PointLight;
pub use renderer::{color_to_rgba, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{Scene, TraceStats};
pub use shape::{always_valid, HitRecord, MaterialBinding, Shape, NO_HIT};
pub use shape_list::ShapeList;
pub use sphere::Sphere;
pub use spot_light::SpotLight;
pub use torus::Torus;
pub use triangle::Triangle;
pub use triangle_list::TriangleList;

/// Re-export the data and math types shapes are built from
pub use prism_core::{Color, Material, SceneData, Texture, Transform, Vertex};
pub use prism_math::{Aabb, Interval, Mat4, Quat, Ray, Vec2, Vec3};
