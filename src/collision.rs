use glam::Vec2;

/// Ray-cast input data. The ray extends from p1 to p1 + max_fraction * (p2 -
/// p1).
#[derive(Debug, Clone, Copy)]
pub struct RayCastInput {
    pub p1: Vec2,
    pub p2: Vec2,
    pub max_fraction: f32,
}

/// Ray-cast output data. The ray hits at p1 + fraction * (p2 - p1), where p1
/// and p2 come from RayCastInput.
#[derive(Debug, Clone, Copy, Default)]
pub struct RayCastOutput {
    pub normal: Vec2,
    pub fraction: f32,
}

/// An axis aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// The lower vertex.
    pub lower_bound: Vec2,
    /// The upper vertex.
    pub upper_bound: Vec2,
}

impl Aabb {
    #[inline]
    pub const fn new(lower_bound: Vec2, upper_bound: Vec2) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Get the center of the AABB.
    #[inline]
    pub fn center(&self) -> Vec2 {
        0.5 * (self.lower_bound + self.upper_bound)
    }

    /// Get the extents of the AABB (half-widths).
    #[inline]
    pub fn extents(&self) -> Vec2 {
        0.5 * (self.upper_bound - self.lower_bound)
    }

    /// Get the perimeter length
    pub fn get_perimeter(&self) -> f32 {
        let wx = self.upper_bound.x - self.lower_bound.x;
        let wy = self.upper_bound.y - self.lower_bound.y;
        2.0 * (wx + wy)
    }

    /// Combine this AABB with another.
    #[inline]
    pub fn combine(&self, other: &Aabb) -> Self {
        let lower_bound = self.lower_bound.min(other.lower_bound);
        let upper_bound = self.upper_bound.max(other.upper_bound);
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Is the given AABB contained within this AABB?
    #[inline]
    pub fn contains(&self, other: &Aabb) -> bool {
        self.lower_bound.x <= other.lower_bound.x
            && self.lower_bound.y <= other.lower_bound.y
            && self.upper_bound.x >= other.upper_bound.x
            && self.upper_bound.y >= other.upper_bound.y
    }

    /// Do the two AABBs overlap?
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d1 = other.lower_bound - self.upper_bound;
        let d2 = self.lower_bound - other.upper_bound;
        d1.x <= 0.0 && d1.y <= 0.0 && d2.x <= 0.0 && d2.y <= 0.0
    }

    // From Real-time Collision Detection, p179.
    pub fn ray_cast(
        &self,
        output: &mut RayCastOutput,
        input: &RayCastInput,
    ) -> bool {
        let mut tmin = -f32::MAX;
        let mut tmax = f32::MAX;

        let p = input.p1.to_array();
        let d = (input.p2 - input.p1).to_array();
        let lower = self.lower_bound.to_array();
        let upper = self.upper_bound.to_array();

        let mut normal = [0.0f32; 2];

        for i in 0..2 {
            if d[i].abs() < f32::EPSILON {
                // Parallel.
                if p[i] < lower[i] || upper[i] < p[i] {
                    return false;
                }
            } else {
                let inv_d = 1.0 / d[i];
                let mut t1 = (lower[i] - p[i]) * inv_d;
                let mut t2 = (upper[i] - p[i]) * inv_d;

                // Sign of the normal vector.
                let mut s = -1.0;

                if t1 > t2 {
                    core::mem::swap(&mut t1, &mut t2);
                    s = 1.0;
                }

                // Push the min up
                if t1 > tmin {
                    normal = [0.0, 0.0];
                    normal[i] = s;
                    tmin = t1;
                }

                // Pull the max down
                tmax = tmax.min(t2);

                if tmin > tmax {
                    return false;
                }
            }
        }

        // Does the ray start inside the box?
        // Does the ray intersect beyond the max fraction?
        if tmin < 0.0 || input.max_fraction < tmin {
            return false;
        }

        // Intersection.
        output.fraction = tmin;
        output.normal = Vec2::from_array(normal);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_union() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(0.5, -1.0), Vec2::new(2.0, 0.5));
        let c = a.combine(&b);
        assert_eq!(c.lower_bound, Vec2::new(0.0, -1.0));
        assert_eq!(c.upper_bound, Vec2::new(2.0, 1.0));
        assert!(c.contains(&a));
        assert!(c.contains(&b));
    }

    #[test]
    fn perimeter() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 3.0));
        assert!((a.get_perimeter() - 10.0).abs() < 1e-6);
    }

    #[test]
    fn overlap_and_containment() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Aabb::new(Vec2::new(0.5, 0.5), Vec2::new(1.5, 1.5));
        let c = Aabb::new(Vec2::new(2.0, 2.0), Vec2::new(3.0, 3.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.contains(&b));
        assert!(a.combine(&b).contains(&a));

        // Touching edges count as overlap.
        let d = Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.overlaps(&d));
    }

    #[test]
    fn ray_cast_hits_near_face() {
        let a = Aabb::new(Vec2::new(1.0, -1.0), Vec2::new(2.0, 1.0));
        let input = RayCastInput {
            p1: Vec2::new(0.0, 0.0),
            p2: Vec2::new(4.0, 0.0),
            max_fraction: 1.0,
        };
        let mut output = RayCastOutput::default();
        assert!(a.ray_cast(&mut output, &input));
        assert!((output.fraction - 0.25).abs() < 1e-6);
        assert_eq!(output.normal, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn ray_cast_misses_parallel_ray() {
        let a = Aabb::new(Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0));
        let input = RayCastInput {
            p1: Vec2::new(0.0, 0.0),
            p2: Vec2::new(4.0, 0.0),
            max_fraction: 1.0,
        };
        let mut output = RayCastOutput::default();
        assert!(!a.ray_cast(&mut output, &input));
    }

    #[test]
    fn ray_cast_respects_max_fraction() {
        let a = Aabb::new(Vec2::new(3.0, -1.0), Vec2::new(4.0, 1.0));
        let input = RayCastInput {
            p1: Vec2::new(0.0, 0.0),
            p2: Vec2::new(4.0, 0.0),
            max_fraction: 0.5,
        };
        let mut output = RayCastOutput::default();
        assert!(!a.ray_cast(&mut output, &input));
    }
}
