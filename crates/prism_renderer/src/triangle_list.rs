//! A mesh of triangles sharing one material.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::{ShapeError, ShapeResult};
use crate::shape::{HitRecord, MaterialBinding, Shape, NO_HIT};
use crate::triangle::Triangle;

/// Triangles over the scene vertex buffer, drawn with a single material.
///
/// Every triangle is tested; the list is meant to sit inside a
/// [`ShapeList`](crate::ShapeList) or an affine wrapper that culls it by box.
#[derive(Clone, Debug)]
pub struct TriangleList {
    triangles: Vec<Triangle>,
    material: MaterialBinding,
    bbox: Aabb,
}

impl TriangleList {
    /// Create a list from vertex index triples.
    pub fn new(material_index: i32, faces: impl IntoIterator<Item = [i32; 3]>) -> Self {
        let triangles = faces
            .into_iter()
            .map(|face| Triangle::new(face, material_index))
            .collect();
        Self {
            triangles,
            material: MaterialBinding::new(material_index),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }
}

impl Shape for TriangleList {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        self.material.bind(data)?;
        for triangle in &mut self.triangles {
            triangle.initialize(data)?;
        }
        log::debug!("Initialized triangle list with {} faces", self.triangles.len());
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        self.bbox = self
            .triangles
            .iter_mut()
            .fold(Aabb::EMPTY, |acc, tri| Aabb::surrounding(&acc, &tri.update_bounding_box()));
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
        let mut closest_so_far = NO_HIT;
        let mut temp_rec = HitRecord::default();

        for triangle in &self.triangles {
            let t = triangle.intersect(ray, range.with_max(closest_so_far), valid, &mut temp_rec);
            if t < closest_so_far {
                closest_so_far = t;
                *rec = temp_rec;
            }
        }

        if closest_so_far < NO_HIT {
            rec.material = self.material.get();
        }
        closest_so_far
    }

    fn is_inside(&self, _p: Vec3) -> ShapeResult<bool> {
        Err(ShapeError::NotSolid { shape: self.name() })
    }

    fn is_solid(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "triangle list"
    }
}
