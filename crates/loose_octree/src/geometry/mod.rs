//! Geometric primitives used by the spatial index
//!
//! Axis-aligned boxes and rays. The octree only ever reasons about these
//! bounding approximations; exact per-object geometry stays with the caller.

mod aabb;
mod ray;

pub use aabb::Aabb;
pub use ray::Ray;
