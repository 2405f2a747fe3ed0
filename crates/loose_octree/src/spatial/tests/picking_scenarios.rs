//! Nearest-hit ray queries and candidate collection

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use approx::assert_relative_eq;

use super::{unit_box_at, world_bounds};
use crate::config::OctreeConfig;
use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, Ray};
use crate::spatial::{LooseOctree, PickTester};

/// Reports fixed distances per handle
#[derive(Default)]
struct ScriptedPicker {
    distances: HashMap<u32, f32>,
    hidden: HashSet<u32>,
}

impl ScriptedPicker {
    fn new(distances: &[(u32, f32)]) -> Self {
        Self {
            distances: distances.iter().copied().collect(),
            hidden: HashSet::new(),
        }
    }
}

impl PickTester<u32> for ScriptedPicker {
    fn test_hit(&self, handle: &u32, _ray: &Ray) -> Option<f32> {
        self.distances.get(handle).copied()
    }

    fn is_pickable(&self, handle: &u32) -> bool {
        !self.hidden.contains(handle)
    }
}

/// Treats each object's box as its exact geometry and counts hit tests
struct BoxPicker {
    boxes: HashMap<u32, Aabb>,
    tests: Cell<usize>,
}

impl BoxPicker {
    fn new(boxes: &[(u32, Aabb)]) -> Self {
        Self {
            boxes: boxes.iter().copied().collect(),
            tests: Cell::new(0),
        }
    }
}

impl PickTester<u32> for BoxPicker {
    fn test_hit(&self, handle: &u32, ray: &Ray) -> Option<f32> {
        self.tests.set(self.tests.get() + 1);
        self.boxes
            .get(handle)
            .and_then(|bounds| bounds.intersect_ray(ray))
            .map(|(entry, _)| entry)
    }
}

fn three_object_tree() -> LooseOctree<u32> {
    let config = OctreeConfig { max_depth: 5, max_objects: 2, ..Default::default() };
    let mut octree = LooseOctree::new(world_bounds(), config);
    octree.insert(1, unit_box_at(0.0, 0.0, 0.0));
    octree.insert(2, unit_box_at(50.0, 50.0, 50.0));
    octree.insert(3, unit_box_at(-50.0, -50.0, -50.0));
    octree
}

#[test]
fn test_nearest_hit_picks_smallest_distance() {
    let octree = three_object_tree();
    let picker = ScriptedPicker::new(&[(1, 5.0), (2, 10.0), (3, 15.0)]);
    let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

    let hit = octree.raycast_closest(&ray, &picker).unwrap();

    assert_eq!(hit.handle, 1);
    assert_relative_eq!(hit.distance, 5.0, epsilon = 1e-4);
    assert!(octree.total_node_count() > 1);
    assert_eq!(octree.total_object_count(), 3);
}

#[test]
fn test_ray_hitting_nothing_returns_none() {
    let octree = three_object_tree();
    let picker = ScriptedPicker::new(&[(1, 5.0), (2, 10.0), (3, 15.0)]);

    let inside_miss = Ray::new(Vec3::new(0.0, 90.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    assert!(octree.raycast_closest(&inside_miss, &picker).is_none());

    let outside_miss = Ray::new(Vec3::new(500.0, 500.0, 500.0), Vec3::new(1.0, 0.0, 0.0));
    assert!(octree.raycast_closest(&outside_miss, &picker).is_none());
}

#[test]
fn test_geometric_nearest_along_diagonal() {
    let octree = three_object_tree();
    let picker = BoxPicker::new(&[
        (1, unit_box_at(0.0, 0.0, 0.0)),
        (2, unit_box_at(50.0, 50.0, 50.0)),
        (3, unit_box_at(-50.0, -50.0, -50.0)),
    ]);
    let ray = Ray::new(Vec3::new(-80.0, -80.0, -80.0), Vec3::new(1.0, 1.0, 1.0));

    let hit = octree.raycast_closest(&ray, &picker).unwrap();

    assert_eq!(hit.handle, 3);
    assert_relative_eq!(hit.distance, 29.5 * 3.0_f32.sqrt(), epsilon = 1e-2);
}

#[test]
fn test_hidden_objects_are_skipped() {
    let octree = three_object_tree();
    let mut picker = ScriptedPicker::new(&[(1, 5.0), (2, 10.0), (3, 15.0)]);
    picker.hidden.insert(1);
    let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

    let hit = octree.raycast_closest(&ray, &picker).unwrap();

    assert_eq!(hit.handle, 2);
}

#[test]
fn test_equal_distances_keep_first_found() {
    let mut octree = LooseOctree::new(world_bounds(), OctreeConfig::default());
    octree.insert(1, unit_box_at(10.0, 0.0, 0.0));
    octree.insert(2, unit_box_at(10.0, 0.0, 0.0));
    let picker = ScriptedPicker::new(&[(1, 20.0), (2, 20.0)]);
    let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));

    let hit = octree.raycast_closest(&ray, &picker).unwrap();

    assert_eq!(hit.handle, 1);
}

#[test]
fn test_far_nodes_are_pruned() {
    let config = OctreeConfig { max_depth: 5, max_objects: 1, loose_factor: 1.2 };
    let mut octree = LooseOctree::new(world_bounds(), config);
    let near = (1, unit_box_at(-50.0, 20.0, 20.0));
    let far = (2, unit_box_at(50.0, 20.0, 20.0));
    octree.insert(near.0, near.1);
    octree.insert(far.0, far.1);
    let picker = BoxPicker::new(&[near, far]);
    let ray = Ray::new(Vec3::new(-99.0, 20.0, 20.0), Vec3::new(1.0, 0.0, 0.0));

    let hit = octree.raycast_closest(&ray, &picker).unwrap();

    assert_eq!(hit.handle, 1);
    assert_relative_eq!(hit.distance, 48.5, epsilon = 1e-4);
    assert_eq!(picker.tests.get(), 1);
}

#[test]
fn test_relocated_object_is_found_in_new_region() {
    let mut octree = three_object_tree();
    let region_a = unit_box_at(-50.0, -50.0, -50.0);
    let region_b = unit_box_at(60.0, -60.0, 30.0);
    assert_eq!(octree.cached_bounds(&3), Some(&region_a));

    octree.update(3, &|_: &u32| region_b);

    let picker = BoxPicker::new(&[
        (1, unit_box_at(0.0, 0.0, 0.0)),
        (2, unit_box_at(50.0, 50.0, 50.0)),
        (3, region_b),
    ]);
    let into_b = Ray::new(Vec3::new(60.0, -60.0, -99.0), Vec3::new(0.0, 0.0, 1.0));
    let into_a = Ray::new(Vec3::new(-50.0, -50.0, -99.0), Vec3::new(0.0, 0.0, 1.0));

    assert_eq!(octree.raycast_closest(&into_b, &picker).map(|hit| hit.handle), Some(3));
    assert!(octree.raycast_closest(&into_a, &picker).is_none());
    assert_eq!(octree.total_object_count(), 3);
}

#[test]
fn test_candidates_follow_cached_bounds() {
    let octree = three_object_tree();
    let ray = Ray::new(Vec3::new(-80.0, -80.0, -80.0), Vec3::new(1.0, 1.0, 1.0));

    let mut candidates = octree.raycast_candidates(&ray);
    candidates.sort_unstable();
    assert_eq!(candidates, vec![1, 2, 3]);

    let ordered: Vec<u32> = octree
        .raycast_candidates_ordered(&ray)
        .into_iter()
        .map(|(handle, _)| handle)
        .collect();
    assert_eq!(ordered, vec![3, 1, 2]);

    let sideways = Ray::new(Vec3::new(-80.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(octree.raycast_candidates(&sideways), vec![1]);
}

#[test]
fn test_query_aabb_finds_overlapping_objects() {
    let octree = three_object_tree();

    let mut found = octree.query_aabb(&Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(60.0, 60.0, 60.0)));
    found.sort_unstable();
    assert_eq!(found, vec![1, 2]);

    let empty = octree.query_aabb(&Aabb::new(Vec3::new(20.0, 20.0, 20.0), Vec3::new(30.0, 30.0, 30.0)));
    assert!(empty.is_empty());
}
