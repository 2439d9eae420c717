//! Scene container and the recursive Whitted-style integrator.
//!
//! A hit is shaded with its emission plus every light's ambient term and its
//! diffuse and specular terms scaled by the light's path transparency. Mirror
//! reflection and refraction then recurse while depth remains and the branch
//! weight stays above the per-channel cutoff. Each recursion divides the
//! cutoff by the branch weight, so a chain of weak bounces is pruned long
//! before the depth limit.

use prism_core::{Color, SceneData};
use prism_math::{reflect, refract, Interval, Ray, Vec3, SURFACE_EPSILON};

use crate::error::ShapeResult;
use crate::light::Light;
use crate::shape::{always_valid, HitRecord, Shape, NO_HIT};
use crate::shape_list::ShapeList;

/// Lower bound of the parameter range searched for every traced ray.
const MIN_HIT_DISTANCE: f32 = 1e-6;

/// Per-trace diagnostics, accumulated by the caller.
///
/// Parallel workers each keep their own and [`merge`](Self::merge) them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceStats {
    /// Rays intersected against the scene, primary and secondary
    pub rays: u64,
    /// Deepest recursion level reached; primary rays are level 0
    pub deepest: u32,
}

impl TraceStats {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, level: u32) {
        self.rays += 1;
        self.deepest = self.deepest.max(level);
    }

    /// Fold another worker's statistics into this one.
    pub fn merge(&mut self, other: &TraceStats) {
        self.rays += other.rays;
        self.deepest = self.deepest.max(other.deepest);
    }
}

/// Everything needed to trace rays: shapes, lights and the data they bind to.
pub struct Scene {
    pub data: SceneData,
    pub root: ShapeList,
    pub lights: Vec<Box<dyn Light>>,
}

impl Scene {
    /// Create a scene over loaded data with no shapes or lights yet.
    pub fn new(data: SceneData) -> Self {
        Self {
            data,
            root: ShapeList::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_shape(&mut self, shape: impl Shape + 'static) {
        self.root.add(shape);
    }

    pub fn add_light(&mut self, light: impl Light + 'static) {
        self.lights.push(Box::new(light));
    }

    /// Bind every shape to the scene data, then compute bounds bottom-up.
    ///
    /// Must be called once, after the last shape is added and before the
    /// first ray is traced.
    pub fn initialize(&mut self) -> ShapeResult<()> {
        self.root.initialize(&self.data)?;
        let bounds = self.root.update_bounding_box();

        log::info!(
            "Scene initialized: {} shapes, {} lights, {} materials, {} vertices",
            self.root.len(),
            self.lights.len(),
            self.data.materials.len(),
            self.data.vertices.len()
        );
        if !bounds.is_empty() {
            log::info!("Scene bounds: {:?} to {:?}", bounds.min(), bounds.max());
        }
        Ok(())
    }

    /// Nearest hit over the whole scene.
    pub fn intersect<'a>(
        &'a self,
        ray: &Ray,
        range: Interval,
        valid: &dyn Fn(f32) -> bool,
        rec: &mut HitRecord<'a>,
    ) -> f32 {
        self.root.intersect(ray, range, valid, rec)
    }

    /// Color seen along `ray`, recursing at most `depth` times.
    pub fn get_color(&self, ray: &Ray, depth: u32, cutoff: Color) -> Color {
        self.trace(ray, depth, cutoff, &mut TraceStats::new())
    }

    /// Like [`get_color`](Self::get_color), recording statistics into `stats`.
    pub fn trace(&self, ray: &Ray, depth: u32, cutoff: Color, stats: &mut TraceStats) -> Color {
        self.trace_level(&ray.normalized(), depth, cutoff, 0, stats)
    }

    fn trace_level(
        &self,
        ray: &Ray,
        depth: u32,
        cutoff: Color,
        level: u32,
        stats: &mut TraceStats,
    ) -> Color {
        stats.record(level);

        let mut rec = HitRecord::default();
        let range = Interval::new(MIN_HIT_DISTANCE, f32::INFINITY);
        if self.intersect(ray, range, &always_valid, &mut rec) == NO_HIT {
            return Color::ZERO;
        }

        let material = rec.material;
        let mut color = material.emissive;
        for light in &self.lights {
            color += light.ambient(ray, &rec);
            let transparency = light.transparency(&rec, &self.root, cutoff);
            color += light.diffuse(ray, &rec) * transparency;
            color += light.specular(ray, &rec) * transparency;
        }

        if let Some(texture) = &material.texture {
            color *= texture.sample(rec.tex_coord);
        }

        if depth > 0 {
            if exceeds(material.specular, cutoff) {
                let direction = reflect(ray.direction, rec.normal);
                let reflected = Ray::offset_from(rec.p, direction, SURFACE_EPSILON);
                color += self.trace_level(
                    &reflected,
                    depth - 1,
                    cutoff / material.specular,
                    level + 1,
                    stats,
                ) * material.specular;
            }

            if exceeds(material.transparent, cutoff) {
                if let Some(direction) = refract(ray.direction, rec.normal, material.ior) {
                    let refracted = Ray::offset_from(rec.p, direction, SURFACE_EPSILON);
                    color += self.trace_level(
                        &refracted,
                        depth - 1,
                        cutoff / material.transparent,
                        level + 1,
                        stats,
                    ) * material.transparent;
                }
            }
        }

        color.clamp(Vec3::ZERO, Vec3::ONE)
    }
}

/// True if every channel of `weight` is above the matching `cutoff` channel.
fn exceeds(weight: Color, cutoff: Color) -> bool {
    weight.cmpgt(cutoff).all()
}
