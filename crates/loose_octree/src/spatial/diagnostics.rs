//! Read-only traversals for statistics and visualization

use crate::debug::{depth_color, wireframe_box, LineRenderer};
use crate::spatial::OctreeNode;

impl<H> OctreeNode<H> {
    /// Count this node and every descendant
    pub fn total_node_count(&self) -> usize {
        1 + self
            .children()
            .map_or(0, |children| children.iter().map(Self::total_node_count).sum())
    }

    /// Count objects stored in this node and every descendant
    pub fn total_object_count(&self) -> usize {
        self.objects.len()
            + self
                .children()
                .map_or(0, |children| children.iter().map(Self::total_object_count).sum())
    }

    /// Depth of the deepest node in this subtree
    pub fn max_occupied_depth(&self) -> u32 {
        self.children().map_or(self.depth, |children| {
            children
                .iter()
                .map(Self::max_occupied_depth)
                .fold(self.depth, u32::max)
        })
    }

    /// Emit a wireframe box for every node, colored by depth
    ///
    /// Walks with an explicit stack (pre-order, child 0 first) so arbitrarily
    /// deep trees cannot overflow the call stack.
    pub fn debug_draw<R>(&self, renderer: &mut R)
    where
        R: LineRenderer + ?Sized,
    {
        let mut stack = vec![self];

        while let Some(node) = stack.pop() {
            renderer.add_lines(&wireframe_box(&node.bounds, depth_color(node.depth)));

            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }
    }

    /// Log depth, object count and bounds of every node
    pub fn debug_dump(&self) {
        log::info!("===== OCTREE DUMP BEGIN =====");

        let mut stack = vec![self];
        let mut total_objects = 0;

        while let Some(node) = stack.pop() {
            let (min, max) = (node.bounds.min, node.bounds.max);
            log::info!(
                "[Octree] depth={}, objects={}, bounds=[({:.1},{:.1},{:.1})-({:.1},{:.1},{:.1})], extent: {:.3}",
                node.depth,
                node.objects.len(),
                min.x, min.y, min.z,
                max.x, max.y, max.z,
                node.bounds.half_extent().magnitude(),
            );
            total_objects += node.objects.len();

            if let Some(children) = node.children() {
                stack.extend(children.iter().rev());
            }
        }

        log::info!("size: {}", total_objects);
        log::info!("===== OCTREE DUMP END =====");
    }
}

#[cfg(test)]
mod tests {
    use crate::config::OctreeConfig;
    use crate::debug::{depth_color, DebugLine, DebugLineBatch};
    use crate::foundation::math::{Vec3, Vec4};
    use crate::geometry::Aabb;
    use crate::spatial::{OctreeEntry, OctreeNode};

    fn split_root() -> OctreeNode<u32> {
        let bounds = Aabb::new(Vec3::new(-8.0, -8.0, -8.0), Vec3::new(8.0, 8.0, 8.0));
        let mut root = OctreeNode::new(bounds, 0);
        root.split(1.0);
        root
    }

    #[test]
    fn test_counts_on_single_leaf() {
        let root: OctreeNode<u32> = OctreeNode::new(Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0)), 0);
        assert_eq!(root.total_node_count(), 1);
        assert_eq!(root.total_object_count(), 0);
        assert_eq!(root.max_occupied_depth(), 0);
    }

    #[test]
    fn test_counts_after_nested_split() {
        let config = OctreeConfig { max_depth: 2, max_objects: 1, loose_factor: 1.0 };
        let mut root = split_root();
        root.insert(OctreeEntry::new(1, Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(5.5, 5.5, 5.5))), &config);
        root.insert(OctreeEntry::new(2, Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.5, 1.5, 1.5))), &config);

        assert_eq!(root.total_node_count(), 1 + 8 + 8);
        assert_eq!(root.total_object_count(), 2);
        assert_eq!(root.max_occupied_depth(), 2);
    }

    #[test]
    fn test_debug_draw_emits_preorder_colored_boxes() {
        let root = split_root();
        let mut batch = DebugLineBatch::new();
        root.debug_draw(&mut batch);

        assert_eq!(batch.len(), 9 * 12);

        let color_of = |box_index: usize| -> Vec4 {
            let line: &DebugLine = &batch.lines()[box_index * 12];
            Vec4::from(line.color)
        };
        assert_eq!(color_of(0), depth_color(0));
        for box_index in 1..9 {
            assert_eq!(color_of(box_index), depth_color(1));
        }

        // Child 0 is drawn right after the root
        let first_child = &batch.lines()[12];
        assert_eq!(first_child.start, [-8.0, -8.0, -8.0]);
    }

    #[test]
    fn test_debug_dump_does_not_mutate() {
        let root = split_root();
        root.debug_dump();
        assert_eq!(root.total_node_count(), 9);
    }
}
