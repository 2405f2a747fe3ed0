//! Loose octree spatial partitioning structure
//!
//! Divides 3D space into hierarchical, slightly overlapping regions. Nodes
//! split lazily once they hold more than `max_objects` objects, and objects
//! sink to the deepest child that fully contains their bounds.
//!
//! The tree also remembers the last bounds each handle was inserted with,
//! so callers can remove or relocate objects without re-supplying them.
//! This cache is not authoritative: remove a handle before reusing it for a
//! different object.

use std::collections::HashMap;
use std::hash::Hash;

use crate::config::{ConfigError, OctreeConfig};
use crate::debug::LineRenderer;
use crate::geometry::{Aabb, Ray};
use crate::spatial::{BoundsSource, OctreeEntry, OctreeNode, PickTester, RayHit};

/// Loose octree over caller-owned object handles
#[derive(Debug, Clone)]
pub struct LooseOctree<H> {
    /// Root node containing the entire world space
    root: OctreeNode<H>,

    /// Split parameters shared by every node
    config: OctreeConfig,

    /// Last bounds passed to insert/update for each handle
    last_bounds: HashMap<H, Aabb>,
}

impl<H> LooseOctree<H> {
    /// Create a new octree with given world bounds
    ///
    /// The configuration is used as-is; see [`Self::try_new`] for a
    /// validating constructor.
    pub fn new(world_bounds: Aabb, config: OctreeConfig) -> Self {
        Self {
            root: OctreeNode::new(world_bounds, 0),
            config,
            last_bounds: HashMap::new(),
        }
    }

    /// Create a new octree after validating `config`
    pub fn try_new(world_bounds: Aabb, config: OctreeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(world_bounds, config))
    }

    /// Root node, for inspection and visualization
    pub const fn root(&self) -> &OctreeNode<H> {
        &self.root
    }

    /// World bounds covered by the root
    pub const fn bounds(&self) -> &Aabb {
        self.root.bounds()
    }

    /// Split parameters of this tree
    pub const fn config(&self) -> &OctreeConfig {
        &self.config
    }

    /// Total node count, root included
    pub fn total_node_count(&self) -> usize {
        self.root.total_node_count()
    }

    /// Total number of stored objects
    pub fn total_object_count(&self) -> usize {
        self.root.total_object_count()
    }

    /// Depth of the deepest node
    pub fn max_occupied_depth(&self) -> u32 {
        self.root.max_occupied_depth()
    }

    /// Check whether the tree stores no objects
    pub fn is_empty(&self) -> bool {
        self.total_object_count() == 0
    }

    /// Emit the wireframe of every node to `renderer`
    pub fn debug_draw<R>(&self, renderer: &mut R)
    where
        R: LineRenderer + ?Sized,
    {
        self.root.debug_draw(renderer);
    }

    /// Log every node's depth, object count and bounds
    pub fn debug_dump(&self) {
        self.root.debug_dump();
    }

    /// Clear the octree, keeping its bounds and configuration
    pub fn clear(&mut self) {
        self.root = OctreeNode::new(*self.root.bounds(), 0);
        self.last_bounds.clear();
    }
}

impl<H: Copy + Eq + Hash> LooseOctree<H> {
    /// Insert an object with the given bounds
    ///
    /// Inserting a handle that is already stored creates a second entry;
    /// use [`Self::update_with_bounds`] to move an object.
    pub fn insert(&mut self, handle: H, bounds: Aabb) {
        self.last_bounds.insert(handle, bounds);
        self.root.insert(OctreeEntry::new(handle, bounds), &self.config);
    }

    /// Insert many objects at once
    ///
    /// Produces the same population as repeated [`Self::insert`] calls but
    /// partitions each level in a single pass.
    pub fn bulk_insert<I>(&mut self, objects: I)
    where
        I: IntoIterator<Item = (H, Aabb)>,
    {
        let batch: Vec<OctreeEntry<H>> = objects
            .into_iter()
            .map(|(handle, bounds)| OctreeEntry::new(handle, bounds))
            .collect();
        if batch.is_empty() {
            return;
        }

        log::debug!("Bulk inserting {} objects into octree", batch.len());
        self.last_bounds.reserve(batch.len());
        for entry in &batch {
            self.last_bounds.insert(entry.handle, entry.bounds);
        }
        self.root.bulk_insert(batch, &self.config);
    }

    /// Remove an object that was inserted with `bounds`
    ///
    /// Returns false if the object is not where `bounds` routes to.
    pub fn remove_with_bounds(&mut self, handle: H, bounds: &Aabb) -> bool {
        if self.root.remove(handle, bounds) {
            self.last_bounds.remove(&handle);
            true
        } else {
            false
        }
    }

    /// Remove an object using its cached bounds
    ///
    /// Unknown handles are ignored and return false.
    pub fn remove(&mut self, handle: H) -> bool {
        match self.last_bounds.get(&handle).copied() {
            Some(bounds) => self.remove_with_bounds(handle, &bounds),
            None => false,
        }
    }

    /// Move an object from `old_bounds` to `new_bounds`
    pub fn update_with_bounds(&mut self, handle: H, old_bounds: &Aabb, new_bounds: Aabb) {
        self.remove_with_bounds(handle, old_bounds);
        self.insert(handle, new_bounds);
    }

    /// Re-read an object's bounds from `source` and move it there
    ///
    /// Handles the tree has never seen are inserted.
    pub fn update<S>(&mut self, handle: H, source: &S)
    where
        S: BoundsSource<H> + ?Sized,
    {
        let new_bounds = source.current_bounds(&handle);
        match self.last_bounds.get(&handle).copied() {
            Some(old_bounds) => self.update_with_bounds(handle, &old_bounds, new_bounds),
            None => self.insert(handle, new_bounds),
        }
    }

    /// Whether the tree has cached bounds for `handle`
    pub fn contains(&self, handle: &H) -> bool {
        self.last_bounds.contains_key(handle)
    }

    /// Bounds `handle` was last inserted or updated with
    pub fn cached_bounds(&self, handle: &H) -> Option<&Aabb> {
        self.last_bounds.get(handle)
    }

    /// Closest pickable object hit by `ray`
    pub fn raycast_closest<P>(&self, ray: &Ray, tester: &P) -> Option<RayHit<H>>
    where
        P: PickTester<H> + ?Sized,
    {
        self.root.raycast_closest(ray, tester)
    }

    /// All objects whose cached bounds the ray passes through
    ///
    /// For exact results each candidate still needs its own hit test.
    pub fn raycast_candidates(&self, ray: &Ray) -> Vec<H> {
        let mut results = Vec::new();
        self.root.raycast_candidates(ray, &mut results);
        results
    }

    /// Ray candidates with their box entry distance, nearest first
    pub fn raycast_candidates_ordered(&self, ray: &Ray) -> Vec<(H, f32)> {
        let mut results = Vec::new();
        self.root.raycast_candidates_with_distance(ray, &mut results);
        results.sort_by(|a, b| a.1.total_cmp(&b.1));
        results
    }

    /// All objects whose cached bounds intersect `query`
    pub fn query_aabb(&self, query: &Aabb) -> Vec<H> {
        let mut results = Vec::new();
        self.root.query_aabb(query, &mut results);
        results
    }
}
