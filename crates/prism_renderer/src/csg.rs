//! Constructive solid geometry over solid children.
//!
//! Each child is intersected with a validity filter that only accepts surface
//! points lying on the boundary of the combined solid, so every child reports
//! its nearest boundary point and the closest of those wins.

use prism_core::SceneData;
use prism_math::{Aabb, Interval, Ray, Vec3};

use crate::error::{ShapeError, ShapeResult};
use crate::shape::{HitRecord, Shape, NO_HIT};

/// Boolean operation applied to a [`Csg`] node's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsgOp {
    /// Points inside any child
    Union,
    /// Points inside every child
    Intersection,
    /// Points inside the first child and no other
    Difference,
}

/// A boolean combination of solid shapes.
pub struct Csg {
    op: CsgOp,
    shapes: Vec<Box<dyn Shape>>,
    bbox: Aabb,
}

impl Csg {
    pub fn new(op: CsgOp, shapes: Vec<Box<dyn Shape>>) -> Self {
        Self {
            op,
            shapes,
            bbox: Aabb::EMPTY,
        }
    }

    pub fn union(shapes: Vec<Box<dyn Shape>>) -> Self {
        Self::new(CsgOp::Union, shapes)
    }

    pub fn intersection(shapes: Vec<Box<dyn Shape>>) -> Self {
        Self::new(CsgOp::Intersection, shapes)
    }

    /// `base` with every shape in `subtract` carved out of it.
    pub fn difference(base: Box<dyn Shape>, subtract: Vec<Box<dyn Shape>>) -> Self {
        let mut shapes = Vec::with_capacity(subtract.len() + 1);
        shapes.push(base);
        shapes.extend(subtract);
        Self::new(CsgOp::Difference, shapes)
    }

    /// Add another operand.
    pub fn add(&mut self, shape: impl Shape + 'static) {
        self.shapes.push(Box::new(shape));
    }

    pub fn op(&self) -> CsgOp {
        self.op
    }

    fn inside(&self, index: usize, p: Vec3) -> bool {
        // Children are checked for solidity at initialization
        self.shapes[index].is_inside(p).unwrap_or(false)
    }

    fn inside_any_other(&self, skip: &[usize], p: Vec3) -> bool {
        (0..self.shapes.len())
            .filter(|j| !skip.contains(j))
            .any(|j| self.inside(j, p))
    }

    /// Whether a surface point of child `index` bounds the combined solid.
    fn accepts(&self, index: usize, p: Vec3) -> bool {
        match self.op {
            CsgOp::Union => !self.inside_any_other(&[index], p),
            CsgOp::Intersection => (0..self.shapes.len())
                .filter(|&j| j != index)
                .all(|j| self.inside(j, p)),
            CsgOp::Difference if index == 0 => !self.inside_any_other(&[0], p),
            CsgOp::Difference => self.inside(0, p) && !self.inside_any_other(&[0, index], p),
        }
    }
}

impl Shape for Csg {
    fn initialize(&mut self, data: &SceneData) -> ShapeResult<()> {
        for shape in &mut self.shapes {
            if !shape.is_solid() {
                return Err(ShapeError::NotSolid { shape: shape.name() });
            }
            shape.initialize(data)?;
        }
        Ok(())
    }

    fn update_bounding_box(&mut self) -> Aabb {
        let boxes: Vec<Aabb> = self
            .shapes
            .iter_mut()
            .map(|shape| shape.update_bounding_box())
            .collect();

        self.bbox = match (self.op, boxes.split_first()) {
            (_, None) => Aabb::EMPTY,
            (CsgOp::Union, Some(_)) => boxes
                .iter()
                .fold(Aabb::EMPTY, |acc, b| Aabb::surrounding(&acc, b)),
            (CsgOp::Intersection, Some((first, rest))) => rest
                .iter()
                .fold(*first, |acc, b| Aabb::intersection(&acc, b)),
            (CsgOp::Difference, Some((first, _))) => *first,
        };
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

        let mut closest_so_far = NO_HIT;
        let mut temp_rec = HitRecord::default();

        for (index, shape) in self.shapes.iter().enumerate() {
            let on_boundary = |t: f32| valid(t) && self.accepts(index, ray.at(t));
            let t = shape.intersect(ray, range.with_max(closest_so_far), &on_boundary, &mut temp_rec);
            if t < closest_so_far {
                closest_so_far = t;
                *rec = temp_rec;
                // Carved surfaces face into the cavity
                if self.op == CsgOp::Difference && index > 0 {
                    rec.normal = -rec.normal;
                }
            }
        }

        closest_so_far
    }

    fn is_inside(&self, p: Vec3) -> ShapeResult<bool> {
        let mut inside = Vec::with_capacity(self.shapes.len());
        for shape in &self.shapes {
            inside.push(shape.is_inside(p)?);
        }

        Ok(match (self.op, inside.split_first()) {
            (_, None) => false,
            (CsgOp::Union, _) => inside.iter().any(|&b| b),
            (CsgOp::Intersection, _) => inside.iter().all(|&b| b),
            (CsgOp::Difference, Some((&base, rest))) => base && !rest.iter().any(|&b| b),
        })
    }

    fn name(&self) -> &'static str {
        match self.op {
            CsgOp::Union => "union",
            CsgOp::Intersection => "intersection",
            CsgOp::Difference => "difference",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::test_util::{approx, cast, ready, test_data};
    use crate::sphere::Sphere;
    use crate::triangle::Triangle;
    use prism_core::Vertex;

    // Two unit spheres overlapping on [-0.5, 0.5] along X
    fn pair() -> Vec<Box<dyn Shape>> {
        vec![
            Box::new(Sphere::new(Vec3::new(-0.5, 0.0, 0.0), 1.0, 0)),
            Box::new(Sphere::new(Vec3::new(0.5, 0.0, 0.0), 1.0, 1)),
        ]
    }

    fn cast_after(shape: &dyn Shape, origin: Vec3, dir: Vec3, after: f32) -> (f32, Vec3) {
        let mut rec = HitRecord::default();
        let t = shape.intersect(
            &Ray::new(origin, dir),
            Interval::new(0.001, f32::INFINITY),
            &|t: f32| t > after,
            &mut rec,
        );
        (t, rec.normal)
    }

    #[test]
    fn test_union_skips_interior_surfaces() {
        let union = ready(Csg::union(pair()));

        let (t, rec) = cast(&union, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((t - 3.5).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::NEG_X));

        // Both interior walls are rejected; the next boundary is the far side
        let (t, normal) = cast_after(&union, Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 3.6);
        assert!((t - 6.5).abs() < 1e-4);
        assert!(approx(normal, Vec3::X));
    }

    #[test]
    fn test_intersection_is_the_lens() {
        let lens = ready(Csg::intersection(pair()));

        let (t, rec) = cast(&lens, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((t - 4.5).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::NEG_X));
        assert_eq!(rec.material.name, "clear");

        let bbox = lens.bounding_box();
        assert!((bbox.x.min + 0.5).abs() < 1e-5);
        assert!((bbox.x.max - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_difference_carves_cavity() {
        let mut shapes = pair();
        let b = shapes.pop().unwrap();
        let a = shapes.pop().unwrap();
        let diff = ready(Csg::difference(a, vec![b]));

        // Outer wall of the base
        let (t, rec) = cast(&diff, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((t - 3.5).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::NEG_X));
        assert_eq!(rec.material.name, "white");

        // Carved wall at x = -0.5, facing +X
        let (t, normal) = cast_after(&diff, Vec3::new(-5.0, 0.0, 0.0), Vec3::X, 4.0);
        assert!((t - 4.5).abs() < 1e-4);
        assert!(approx(normal, Vec3::X));

        // From the other side the subtrahend's far wall is the first boundary
        let (t, rec) = cast(&diff, Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_X);
        assert!((t - 5.5).abs() < 1e-4);
        assert!(approx(rec.normal, Vec3::X));
        assert_eq!(rec.material.name, "clear");
    }

    #[test]
    fn test_is_inside_per_op() {
        let left = Vec3::new(-1.0, 0.0, 0.0);
        let middle = Vec3::ZERO;

        let union = Csg::union(pair());
        assert!(union.is_inside(left).unwrap());
        assert!(union.is_inside(middle).unwrap());

        let lens = Csg::intersection(pair());
        assert!(!lens.is_inside(left).unwrap());
        assert!(lens.is_inside(middle).unwrap());

        let mut shapes = pair();
        let b = shapes.pop().unwrap();
        let a = shapes.pop().unwrap();
        let diff = Csg::difference(a, vec![b]);
        assert!(diff.is_inside(left).unwrap());
        assert!(!diff.is_inside(middle).unwrap());
    }

    #[test]
    fn test_open_operand_rejected() {
        let mut data = test_data();
        let a = data.add_vertex(Vertex::new(Vec3::ZERO));
        let b = data.add_vertex(Vertex::new(Vec3::X));
        let c = data.add_vertex(Vertex::new(Vec3::Y));

        let mut union = Csg::union(pair());
        union.add(Triangle::new([a, b, c], 0));
        assert!(matches!(
            union.initialize(&data),
            Err(ShapeError::NotSolid { shape: "triangle" })
        ));
    }

    #[test]
    fn test_disjoint_intersection_is_empty() {
        let lens = ready(Csg::intersection(vec![
            Box::new(Sphere::new(Vec3::new(-3.0, 0.0, 0.0), 1.0, 0)),
            Box::new(Sphere::new(Vec3::new(3.0, 0.0, 0.0), 1.0, 0)),
        ]));
        assert!(lens.bounding_box().is_empty());
        let (t, _) = cast(&lens, Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert_eq!(t, NO_HIT);
    }
}
