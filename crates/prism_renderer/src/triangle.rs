//! Triangle primitive for ray tracing.
//!
//! Intersects the supporting plane first, then classifies the hit point with
//! barycentric weights taken from signed sub-triangle areas.

use prism_core::{SceneData, Vertex};
use prism_math::{Aabb, Interval, Ray, Vec2, Vec3};

use crate::error::{ShapeError, ShapeResult};
use crate::shape::{first_valid, HitRecord, MaterialBinding, Shape, NO_HIT};

/// Rays closer than this to the plane direction are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Triangles with less doubled area than this are degenerate.
const AREA_EPSILON: f32 = 1e-12;

/// A triangle over three scene vertices.
#[derive(Clone, Debug)]
pub struct Triangle {
    indices: [i32; 3],
    vertices: [Vertex; 3],
    /// Unit face normal, from the winding a -> b -> c
    normal: Vec3,
    /// Twice the area (length of the edge cross product)
    area: f32,
    material: MaterialBinding,
    bbox: Aabb,
}

impl Triangle {
    /// Create a triangle from three vertex indices.
    pub fn new(indices: [i32; 3], material_index: i32) -> Self {
        Self {
            indices,
            vertices: [Vertex::default(); 3],
            normal: Vec3::ZERO,
            area: 0.0,
            material: MaterialBinding::new(material_index),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn indices(&self) -> [i32; 3] {
        self.indices
    }

    /// Face normal, available after initialization.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    fn positions(&self) -> [Vec3; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }

    /// Barycentric weights of a point on the plane, one per vertex.
    fn weights(&self, p: Vec3) -> Vec3 {
        let [a, b, c] = self.positions();
        let wa = self.normal.dot((c - b).cross(p - b)) / self.area;
        let wb = self.normal.dot((a - c).cross(p - c)) / self.area;
        let wc = self.normal.dot((b - a).cross(p - a)) / self.area;
        Vec3::new(wa, wb, wc)
    }

    fn shading_normal(&self, w: Vec3) -> Vec3 {
        let [va, vb, vc] = &self.vertices;
        if !(va.has_normal() && vb.has_normal() && vc.has_normal()) {
            return self.normal;
        }
        (va.normal * w.x + vb.normal * w.y + vc.normal * w.z).normalize_or(self.normal)
    }

    fn tex_coord(&self, w: Vec3) -> Vec2 {
        let [va, vb, vc] = &self.vertices;
        va.tex_coord * w.x + vb.tex_coord * w.y + vc.tex_coord * w.z
    }
}

impl Shape for Triangle {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        for (slot, &index) in self.vertices.iter_mut().zip(self.indices.iter()) {
            *slot = data.vertex(index)?;
        }
        self.material.bind(data)?;

        let [a, b, c] = self.positions();
        let cross = (b - a).cross(c - a);
        self.area = cross.length();
        if self.area <= AREA_EPSILON {
            log::warn!("Degenerate triangle {:?} has zero area", self.indices);
            self.normal = Vec3::ZERO;
        } else {
            self.normal = cross / self.area;
        }
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        self.bbox = Aabb::from_point_cloud(&self.positions());
        self.bbox
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        range: Interval,
        valid: &dyn Fn(f32) -> bool,
        rec: &mut HitRecord<'a>,
    ) -> f32 {
        if self.area <= AREA_EPSILON {
            return NO_HIT;
        }

        // Plane: n · p = n · a
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return NO_HIT;
        }
        let t = (self.normal.dot(self.vertices[0].position) - self.normal.dot(ray.origin)) / denom;
        let Some(t) = first_valid([t], range, valid) else {
            return NO_HIT;
        };

        let p = ray.at(t);
        let w = self.weights(p);
        if w.min_element() < 0.0 {
            return NO_HIT;
        }

        rec.set(ray, t, self.shading_normal(w), self.material.get());
        rec.tex_coord = self.tex_coord(w);
        t
    }

    fn is_inside(&self, _p: Vec3) -> ShapeResult<bool> {
        Err(ShapeError::NotSolid { shape: self.name() })
    }

    fn is_solid(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "triangle"
    }
}
