//! Octree node storage and lazy splitting
//!
//! Each node keeps the objects that could not be pushed further down and,
//! once split, exactly eight owned children. Splitting happens only through
//! [`OctreeNode::split`], which leaves an already split node untouched, so a
//! populated subtree can never be replaced by fresh empty children.

use crate::config::OctreeConfig;
use crate::geometry::Aabb;
use crate::spatial::octant;

/// Object handle stored at a node together with the bounds it was inserted with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OctreeEntry<H> {
    /// Caller-owned object handle
    pub handle: H,
    /// Bounds supplied at insert time
    pub bounds: Aabb,
}

impl<H> OctreeEntry<H> {
    /// Pair a handle with its bounds
    pub const fn new(handle: H, bounds: Aabb) -> Self {
        Self { handle, bounds }
    }
}

/// Single node in the octree hierarchy
#[derive(Debug, Clone)]
pub struct OctreeNode<H> {
    /// World-space (loose) bounds of this node
    pub(crate) bounds: Aabb,

    /// Depth in the tree (0 = root)
    pub(crate) depth: u32,

    /// Objects stored directly at this node
    pub(crate) objects: Vec<OctreeEntry<H>>,

    /// Child nodes (8 octants), None if this is a leaf
    pub(crate) children: Option<Box<[OctreeNode<H>; 8]>>,
}

impl<H> OctreeNode<H> {
    /// Create a new leaf node
    pub const fn new(bounds: Aabb, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            objects: Vec::new(),
            children: None,
        }
    }

    /// Bounds of this node, including the loose expansion
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Depth in the tree (0 = root)
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Objects stored directly at this node
    pub fn objects(&self) -> &[OctreeEntry<H>] {
        &self.objects
    }

    /// The eight children, if this node has been split
    pub fn children(&self) -> Option<&[OctreeNode<H>; 8]> {
        self.children.as_deref()
    }

    /// Check if this node is a leaf (has no children)
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Split this node into 8 children if it has none yet
    ///
    /// Child `i` covers the exact octant `i` of this node expanded by
    /// `loose_factor` around the octant's own center. An already split node
    /// keeps its existing children.
    pub fn split(&mut self, loose_factor: f32) -> &mut [OctreeNode<H>; 8] {
        split_children(&mut self.children, &self.bounds, self.depth, loose_factor)
    }

    fn should_split(&self, config: &OctreeConfig) -> bool {
        self.objects.len() > config.max_objects && self.depth < config.max_depth
    }
}

impl<H: Copy + PartialEq> OctreeNode<H> {
    /// Insert an object, descending into the child that fully contains it
    pub(crate) fn insert(&mut self, entry: OctreeEntry<H>, config: &OctreeConfig) {
        let center = self.bounds.center();
        if let Some(children) = self.children.as_deref_mut() {
            if let Some(index) = octant::route(children, &center, &entry.bounds) {
                children[index].insert(entry, config);
                return;
            }
        }

        // Fits no child (or this is a leaf): keep it here
        self.objects.push(entry);

        if self.should_split(config) {
            self.push_down(config);
        }
    }

    /// Insert a whole batch, partitioning once per level
    pub(crate) fn bulk_insert(&mut self, mut batch: Vec<OctreeEntry<H>>, config: &OctreeConfig) {
        if batch.is_empty() {
            return;
        }

        if self.objects.is_empty() {
            std::mem::swap(&mut self.objects, &mut batch);
        } else {
            self.objects.append(&mut batch);
        }

        if !self.is_leaf() || self.should_split(config) {
            self.push_down(config);
        }
    }

    /// Move every local object that fits a child into that child
    ///
    /// Splits first if needed. Objects are classified in one reverse pass and
    /// removed with swap-remove, then each child receives its batch through
    /// [`Self::bulk_insert`]. Objects that fit no child stay here.
    fn push_down(&mut self, config: &OctreeConfig) {
        let center = self.bounds.center();
        let children = split_children(&mut self.children, &self.bounds, self.depth, config.loose_factor);

        let estimated_per_octant = self.objects.len() / 8 + 1;
        let mut batches: [Vec<OctreeEntry<H>>; 8] =
            std::array::from_fn(|_| Vec::with_capacity(estimated_per_octant));

        for index in (0..self.objects.len()).rev() {
            if let Some(target) = octant::route(children, &center, &self.objects[index].bounds) {
                batches[target].push(self.objects.swap_remove(index));
            }
        }

        for (child, batch) in children.iter_mut().zip(batches) {
            if !batch.is_empty() {
                child.bulk_insert(batch, config);
            }
        }
    }

    /// Remove `handle`, following the same routing that placed it
    ///
    /// Returns false when the handle is not on the routed path; the rest of
    /// the tree is not searched.
    pub(crate) fn remove(&mut self, handle: H, bounds: &Aabb) -> bool {
        if let Some(index) = self.objects.iter().position(|entry| entry.handle == handle) {
            self.objects.remove(index);
            return true;
        }

        let center = self.bounds.center();
        let Some(children) = self.children.as_deref_mut() else {
            return false;
        };
        match octant::route(children, &center, bounds) {
            Some(index) => children[index].remove(handle, bounds),
            None => false,
        }
    }

    /// Path of child indices from this node to the node holding `handle`
    ///
    /// Uses the insert routing, so it only finds objects stored where the
    /// routing rule says they should be.
    pub fn routed_path(&self, handle: H, bounds: &Aabb) -> Option<Vec<usize>> {
        let mut path = Vec::new();
        let mut node = self;
        loop {
            if node.objects.iter().any(|entry| entry.handle == handle) {
                return Some(path);
            }
            let children = node.children.as_deref()?;
            let index = octant::route(children, &node.bounds.center(), bounds)?;
            path.push(index);
            node = &children[index];
        }
    }
}

fn split_children<'a, H>(
    children: &'a mut Option<Box<[OctreeNode<H>; 8]>>,
    bounds: &Aabb,
    depth: u32,
    loose_factor: f32,
) -> &'a mut [OctreeNode<H>; 8] {
    children.get_or_insert_with(|| {
        log::trace!(
            "Splitting octree node at depth {} ({:?} - {:?})",
            depth,
            bounds.min,
            bounds.max
        );
        Box::new(std::array::from_fn(|index| {
            let child_bounds = bounds.octant(index).scaled_about_center(loose_factor);
            OctreeNode::new(child_bounds, depth + 1)
        }))
    })
}
