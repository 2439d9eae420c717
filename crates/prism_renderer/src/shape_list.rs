//! Ordered shape collection with bounding-box culling.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::ShapeResult;
use crate::shape::{HitRecord, Shape, NO_HIT};

/// Lists with at most this many children sort their candidates on the stack.
const INLINE_CANDIDATES: usize = 16;

/// A list of shapes behind one aggregate bounding box.
///
/// Children whose boxes the ray enters are visited in order of box entry
/// distance. Visiting stops only once the closest hit found so far is no
/// farther than the next box entry, since a box entered early can still hold
/// a surface that lies behind a box entered later.
pub struct ShapeList {
    shapes: Vec<Box<dyn Shape>>,
    bbox: Aabb,
}

impl ShapeList {
    /// Create a new empty shape list.
    pub fn new() -> Self {
        Self {
            shapes: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add a shape to the list.
    pub fn add(&mut self, shape: impl Shape + 'static) {
        self.shapes.push(Box::new(shape));
    }

    /// Add an already boxed shape to the list.
    pub fn push(&mut self, shape: Box<dyn Shape>) {
        self.shapes.push(shape);
    }

    pub fn shapes(&self) -> &[Box<dyn Shape>] {
        &self.shapes
    }

    /// Get the number of direct children.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Write `(box entry, child index)` for every child box the ray enters
    /// into `candidates`, returning how many were written.
    fn collect_candidates(&self, ray: &Ray, range: Interval, candidates: &mut [(f32, usize)]) -> usize {
        let mut count = 0;
        for (index, shape) in self.shapes.iter().enumerate() {
            let entry = shape.bounding_box().ray_range(ray, range);
            if !entry.is_empty() {
                candidates[count] = (entry.min, index);
                count += 1;
            }
        }
        count
    }

    fn nearest_candidate<'a>(
        &'a self,
        candidates: &mut [(f32, usize)],
        ray: &Ray,
        range: Interval,
        valid: &dyn Fn(f32) -> bool,
        rec: &mut HitRecord<'a>,
    ) -> f32 {
        // Ties keep insertion order
        candidates.sort_unstable_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut closest_so_far = NO_HIT;
        let mut temp_rec = HitRecord::default();

        for &(entry, index) in candidates.iter() {
            if closest_so_far <= entry {
                break;
            }
            let t = self.shapes[index].intersect(ray, range.with_max(closest_so_far), valid, &mut temp_rec);
            if t < closest_so_far {
                closest_so_far = t;
                *rec = temp_rec;
            }
        }

        closest_so_far
    }
}

impl Default for ShapeList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Box<dyn Shape>> for ShapeList {
    fn from_iter<I: IntoIterator<Item = Box<dyn Shape>>>(iter: I) -> Self {
        Self {
            shapes: iter.into_iter().collect(),
            bbox: Aabb::EMPTY,
        }
    }
}

impl Shape for ShapeList {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        for shape in &mut self.shapes {
            shape.initialize(data)?;
        }
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        if self.shapes.is_empty() {
            log::warn!("Shape list has no children; it can never be hit");
        }
        self.bbox = self
            .shapes
            .iter_mut()
            .fold(Aabb::EMPTY, |acc, shape| Aabb::surrounding(&acc, &shape.update_bounding_box()));
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
        if !self.bbox.hit(ray, range) {
            return NO_HIT;
        }

        if self.shapes.len() <= INLINE_CANDIDATES {
            let mut candidates = [(0.0f32, 0usize); INLINE_CANDIDATES];
            let count = self.collect_candidates(ray, range, &mut candidates);
            self.nearest_candidate(&mut candidates[..count], ray, range, valid, rec)
        } else {
            let mut candidates = vec![(0.0f32, 0usize); self.shapes.len()];
            let count = self.collect_candidates(ray, range, &mut candidates);
            self.nearest_candidate(&mut candidates[..count], ray, range, valid, rec)
        }
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        for shape in &self.shapes {
            if shape.is_inside(p)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn is_solid(&self) -> bool {
        self.shapes.iter().all(|shape| shape.is_solid())
    }

    fn name(&self) -> &'static str {
        "shape list"
    }
}
