//! Collaborators the octree calls back into
//!
//! The tree only knows cached bounding boxes. Exact hit distances and the
//! current bounds of a moving object come from the caller through these
//! traits.

use crate::geometry::{Aabb, Ray};

/// Exact per-object hit test used by the nearest-hit query
pub trait PickTester<H> {
    /// Distance along `ray` to the object's exact geometry, or `None` on a miss
    fn test_hit(&self, handle: &H, ray: &Ray) -> Option<f32>;

    /// Objects returning false here are skipped entirely (hidden, locked, ...)
    fn is_pickable(&self, _handle: &H) -> bool {
        true
    }
}

/// Source of an object's current world bounds
pub trait BoundsSource<H> {
    /// Current bounds of the object behind `handle`
    fn current_bounds(&self, handle: &H) -> Aabb;
}

impl<H, F> BoundsSource<H> for F
where
    F: Fn(&H) -> Aabb,
{
    fn current_bounds(&self, handle: &H) -> Aabb {
        self(handle)
    }
}

/// Closest object hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<H> {
    /// The object that was hit
    pub handle: H,
    /// Exact distance from the ray origin, as reported by the [`PickTester`]
    pub distance: f32,
}
