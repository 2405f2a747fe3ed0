//! Spatial partitioning data structures
//!
//! A loose octree that keeps movable objects in a spatially coherent
//! hierarchy and answers nearest-hit ray queries for picking.

mod octant;
mod node;
mod octree;
mod picking;
mod ray_query;
mod diagnostics;

#[cfg(test)]
mod tests;

pub use node::{OctreeEntry, OctreeNode};
pub use octant::octant_index;
pub use octree::LooseOctree;
pub use picking::{BoundsSource, PickTester, RayHit};
pub use ray_query::PICK_EPSILON;
