//! Ray primitive for ray casting and picking

use crate::foundation::math::Vec3;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized by [`Ray::new`])
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized so that distances along the ray are in
    /// world units. A zero direction is kept as-is.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.try_normalize(f32::EPSILON).unwrap_or(direction);
        Self { origin, direction }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
