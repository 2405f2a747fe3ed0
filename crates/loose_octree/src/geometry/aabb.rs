//! Axis-aligned bounding box

use crate::foundation::math::{select_by_mask, Vec3};
use crate::geometry::Ray;

/// Below this magnitude a ray direction component is treated as parallel
/// to the slab on that axis.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Axis-Aligned Bounding Box for spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given half extents
    pub fn from_center_half_extent(center: Vec3, half_extent: Vec3) -> Self {
        Self {
            min: center - half_extent,
            max: center + half_extent,
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half extents (half-size) of the AABB
    pub fn half_extent(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Check if `other` lies entirely inside this AABB (touching faces count)
    pub fn contains(&self, other: &Self) -> bool {
        other.min.x >= self.min.x && other.max.x <= self.max.x &&
        other.min.y >= self.min.y && other.max.y <= self.max.y &&
        other.min.z >= self.min.z && other.max.z <= self.max.z
    }

    /// Check if this AABB intersects another AABB
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }

    /// Exact sub-region `index` (0..8) of this box, split at the center
    ///
    /// Bit 0 of the index selects the upper half on X, bit 1 on Y and
    /// bit 2 on Z.
    pub fn octant(&self, index: usize) -> Self {
        let center = self.center();
        Self {
            min: select_by_mask(index, &self.min, &center),
            max: select_by_mask(index, &center, &self.max),
        }
    }

    /// Same center, half extents multiplied by `factor`
    pub fn scaled_about_center(&self, factor: f32) -> Self {
        Self::from_center_half_extent(self.center(), self.half_extent() * factor)
    }

    /// The eight corners, bottom face (min Z) first, counter-clockwise from `min`
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(max.x, max.y, max.z),
            Vec3::new(min.x, max.y, max.z),
        ]
    }

    /// Test ray intersection with this AABB using the slab method
    ///
    /// Returns `(entry, exit)` distances along the ray. The entry distance is
    /// clamped to 0 when the origin is inside the box. Boxes entirely behind
    /// the origin are rejected.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t_min = f32::NEG_INFINITY;
        let mut t_max = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            let (low, high) = (self.min[axis], self.max[axis]);

            if direction.abs() < PARALLEL_EPSILON {
                if origin < low || origin > high {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t1 = (low - origin) * inv;
            let mut t2 = (high - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        if t_max < 0.0 {
            return None;
        }
        Some((t_min.max(0.0), t_max))
    }
}
