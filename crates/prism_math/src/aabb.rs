use crate::{Interval, Ray, Vec3};

/// Axis-Aligned Bounding Box used to reject rays before exact intersection.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
/// `Aabb::EMPTY` marks shapes without a defined extent.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Minimum extent along any axis; thinner boxes are padded to this.
const MIN_EXTENT: f32 = 0.0001;

impl Aabb {
    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));
        Self::new(x, y, z)
    }

    /// Create the smallest AABB containing every point.
    pub fn from_point_cloud(points: &[Vec3]) -> Self {
        let Some((first, rest)) = points.split_first() else {
            return Aabb::EMPTY;
        };
        let (min, max) = rest
            .iter()
            .fold((*first, *first), |(lo, hi), &p| (lo.min(p), hi.max(p)));
        Self::from_points(min, max)
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// The overlap of two AABBs, or `Aabb::EMPTY` when they are disjoint.
    pub fn intersection(box0: &Aabb, box1: &Aabb) -> Self {
        let overlap = Self {
            x: box0.x.intersect(&box1.x),
            y: box0.y.intersect(&box1.y),
            z: box0.z.intersect(&box1.z),
        };
        if overlap.is_empty() {
            Aabb::EMPTY
        } else {
            overlap
        }
    }

    /// True if the box encloses no volume at all.
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Returns true if the point lies inside or on the box.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }

    /// Clip `ray_t` to the part of the ray inside this box.
    ///
    /// Uses the slab method. Returns `Interval::EMPTY` on a miss; otherwise
    /// `min` is the parametric distance at which the ray enters the box (or
    /// `ray_t.min` if it starts inside).
    pub fn ray_range(&self, r: &Ray, mut ray_t: Interval) -> Interval {
        if self.is_empty() {
            return Interval::EMPTY;
        }

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let mut t0 = (slab.min - r.origin[axis]) * adinv;
            let mut t1 = (slab.max - r.origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max < ray_t.min {
                return Interval::EMPTY;
            }
        }

        ray_t
    }

    /// Test if a ray intersects this AABB within the given interval.
    pub fn hit(&self, r: &Ray, ray_t: Interval) -> bool {
        !self.ray_range(r, ray_t).is_empty()
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let a = Vec3::new(10.0, 0.0, 10.0);
        let b = Vec3::new(0.0, 10.0, 0.0);
        let aabb = Aabb::from_points(a, b);

        assert_eq!(aabb.min(), Vec3::ZERO);
        assert_eq!(aabb.max(), Vec3::splat(10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        // A quad lying in the XZ plane
        let aabb = Aabb::from_points(Vec3::new(-1.0, 2.0, -1.0), Vec3::new(1.0, 2.0, 1.0));

        assert!(!aabb.is_empty());
        assert!(aabb.y.size() > 0.0);
        assert!(aabb.y.contains(2.0));
    }

    #[test]
    fn test_aabb_from_point_cloud() {
        let points = [
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ];
        let aabb = Aabb::from_point_cloud(&points);
        assert_eq!(aabb.min(), Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max(), Vec3::new(1.0, 3.0, 0.5));

        assert!(Aabb::from_point_cloud(&[]).is_empty());
    }

    #[test]
    fn test_aabb_surrounding() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let surrounding = Aabb::surrounding(&box1, &box2);

        assert_eq!(surrounding.x.min, 0.0);
        assert_eq!(surrounding.x.max, 10.0);

        // The empty box is the identity for union
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_intersection() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let overlap = Aabb::intersection(&box1, &box2);
        assert_eq!(overlap.min(), Vec3::splat(3.0));
        assert_eq!(overlap.max(), Vec3::splat(5.0));

        let far = Aabb::from_points(Vec3::splat(20.0), Vec3::splat(21.0));
        assert!(Aabb::intersection(&box1, &far).is_empty());
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Nothing hits the empty box
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        assert!(!Aabb::EMPTY.hit(&ray, Interval::UNIVERSE));
    }

    #[test]
    fn test_aabb_ray_range() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        let range = aabb.ray_range(&ray, Interval::new(0.0, f32::INFINITY));
        assert!((range.min - 4.0).abs() < 1e-6);
        assert!((range.max - 6.0).abs() < 1e-6);

        // Starting inside: entry is clipped to the caller's range
        let inside = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let range = aabb.ray_range(&inside, Interval::new(0.001, f32::INFINITY));
        assert_eq!(range.min, 0.001);
        assert!((range.max - 1.0).abs() < 1e-6);

        // Box beyond the end of the caller's range
        let range = aabb.ray_range(&ray, Interval::new(0.0, 3.0));
        assert!(range.is_empty());
    }

    #[test]
    fn test_aabb_contains_point() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::splat(0.5)));
        assert!(aabb.contains_point(Vec3::ONE));
        assert!(!aabb.contains_point(Vec3::new(0.5, 1.5, 0.5)));
    }
}
