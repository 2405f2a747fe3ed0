//! # Loose Octree
//!
//! A dynamic loose octree for object picking and spatial partitioning.
//!
//! ## Features
//!
//! - **Loose Bounds**: Child regions overlap so objects near split planes sink deeper
//! - **Lazy Splitting**: Nodes subdivide only once their local object count overflows
//! - **Bulk Loading**: O(n) per level partitioning for populating whole scenes
//! - **Nearest-Hit Picking**: Best-first ray search with early termination
//! - **Debug Visualization**: Depth-colored wireframe output and tree statistics
//!
//! ## Quick Start
//!
//! ```rust
//! use loose_octree::prelude::*;
//!
//! struct UnitBoxes;
//!
//! impl PickTester<u32> for UnitBoxes {
//!     fn test_hit(&self, handle: &u32, ray: &Ray) -> Option<f32> {
//!         let center = Vec3::new(*handle as f32 * 10.0, 0.0, 0.0);
//!         Aabb::from_center_half_extent(center, Vec3::new(0.5, 0.5, 0.5))
//!             .intersect_ray(ray)
//!             .map(|(entry, _)| entry)
//!     }
//! }
//!
//! let bounds = Aabb::new(Vec3::new(-100.0, -100.0, -100.0), Vec3::new(100.0, 100.0, 100.0));
//! let mut octree = LooseOctree::new(bounds, OctreeConfig::default());
//!
//! for id in 0..4u32 {
//!     let center = Vec3::new(id as f32 * 10.0, 0.0, 0.0);
//!     octree.insert(id, Aabb::from_center_half_extent(center, Vec3::new(0.5, 0.5, 0.5)));
//! }
//!
//! let ray = Ray::new(Vec3::new(-50.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
//! let hit = octree.raycast_closest(&ray, &UnitBoxes).unwrap();
//! assert_eq!(hit.handle, 0);
//! ```
//!
//! ## Threading
//!
//! The tree is single-threaded by contract. Mutation takes `&mut self` and
//! queries borrow `&self`, so a query can never observe a split or clear in
//! progress. Share it across threads only behind the caller's own lock.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod geometry;
pub mod config;
pub mod spatial;
pub mod debug;

/// Common imports for octree users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, OctreeConfig},
        debug::{DebugLine, DebugLineBatch, LineRenderer},
        foundation::math::{Vec3, Vec4},
        geometry::{Aabb, Ray},
        spatial::{BoundsSource, LooseOctree, OctreeEntry, OctreeNode, PickTester, RayHit},
    };
}
