//! Ray queries over the octree
//!
//! The nearest-hit query is a best-first branch-and-bound search: nodes are
//! expanded in order of the ray's entry distance into their bounds, and the
//! search stops as soon as the closest queued node starts farther away than
//! the best exact hit found so far.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::{Aabb, Ray};
use crate::spatial::{OctreeNode, PickTester, RayHit};

/// Slack added to the best hit distance before pruning
///
/// Keeps near-tied candidates alive against floating point noise in the
/// box entry distances.
pub const PICK_EPSILON: f32 = 1e-3;

/// Queued node ordered by entry distance, then by push order
struct QueuedNode<'a, H> {
    node: &'a OctreeNode<H>,
    entry: f32,
    sequence: u64,
}

impl<H> PartialEq for QueuedNode<'_, H> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<H> Eq for QueuedNode<'_, H> {}

impl<H> PartialOrd for QueuedNode<'_, H> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<H> Ord for QueuedNode<'_, H> {
    // Reversed so the max-heap pops the smallest entry distance first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .entry
            .total_cmp(&self.entry)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Entry distance beyond which nothing can beat `best`
fn pruning_cutoff<H>(best: Option<RayHit<H>>) -> f32 {
    best.map_or(f32::INFINITY, |hit| hit.distance + PICK_EPSILON)
}

impl<H: Copy> OctreeNode<H> {
    /// Closest object along `ray` according to `tester`
    ///
    /// Objects are first rejected against their cached bounds; only the
    /// survivors are handed to [`PickTester::test_hit`]. An equal distance
    /// never replaces an earlier hit.
    pub fn raycast_closest<P>(&self, ray: &Ray, tester: &P) -> Option<RayHit<H>>
    where
        P: PickTester<H> + ?Sized,
    {
        let (root_entry, _) = self.bounds.intersect_ray(ray)?;

        let mut heap = BinaryHeap::new();
        let mut sequence = 0_u64;
        heap.push(QueuedNode { node: self, entry: root_entry, sequence });

        let mut best: Option<RayHit<H>> = None;

        while let Some(QueuedNode { node, entry, .. }) = heap.pop() {
            // Every queued node starts at or beyond this one
            if entry > pruning_cutoff(best) {
                break;
            }

            for object in &node.objects {
                if !tester.is_pickable(&object.handle) {
                    continue;
                }
                let Some((box_entry, _)) = object.bounds.intersect_ray(ray) else {
                    continue;
                };
                if box_entry > pruning_cutoff(best) {
                    continue;
                }

                if let Some(distance) = tester.test_hit(&object.handle, ray) {
                    let best_distance = best.map_or(f32::INFINITY, |hit| hit.distance);
                    if distance < best_distance {
                        best = Some(RayHit { handle: object.handle, distance });
                    }
                }
            }

            let Some(children) = node.children.as_deref() else {
                continue;
            };
            let cutoff = pruning_cutoff(best);
            for child in children {
                if let Some((child_entry, _)) = child.bounds.intersect_ray(ray) {
                    if child_entry <= cutoff {
                        sequence += 1;
                        heap.push(QueuedNode { node: child, entry: child_entry, sequence });
                    }
                }
            }
        }

        best
    }

    /// Collect every handle whose cached bounds the ray intersects
    pub fn raycast_candidates(&self, ray: &Ray, results: &mut Vec<H>) {
        if self.bounds.intersect_ray(ray).is_none() {
            return;
        }

        results.extend(
            self.objects
                .iter()
                .filter(|entry| entry.bounds.intersect_ray(ray).is_some())
                .map(|entry| entry.handle),
        );

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.raycast_candidates(ray, results);
            }
        }
    }

    /// Like [`Self::raycast_candidates`], paired with the entry distance into each box
    ///
    /// Results are in traversal order; callers sort as needed.
    pub fn raycast_candidates_with_distance(&self, ray: &Ray, results: &mut Vec<(H, f32)>) {
        if self.bounds.intersect_ray(ray).is_none() {
            return;
        }

        for entry in &self.objects {
            if let Some((t_min, _)) = entry.bounds.intersect_ray(ray) {
                results.push((entry.handle, t_min));
            }
        }

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.raycast_candidates_with_distance(ray, results);
            }
        }
    }

    /// Collect every handle whose cached bounds intersect `query`
    pub fn query_aabb(&self, query: &Aabb, results: &mut Vec<H>) {
        if !self.bounds.intersects(query) {
            return;
        }

        results.extend(
            self.objects
                .iter()
                .filter(|entry| entry.bounds.intersects(query))
                .map(|entry| entry.handle),
        );

        if let Some(children) = self.children.as_deref() {
            for child in children {
                child.query_aabb(query, results);
            }
        }
    }
}
