//! Octant classification
//!
//! Octant indices use bit 0 for +X, bit 1 for +Y and bit 2 for +Z:
//!
//! ```text
//! 0: -X, -Y, -Z    4: -X, -Y, +Z
//! 1: +X, -Y, -Z    5: +X, -Y, +Z
//! 2: -X, +Y, -Z    6: -X, +Y, +Z
//! 3: +X, +Y, -Z    7: +X, +Y, +Z
//! ```

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;
use crate::spatial::OctreeNode;

/// Octant (0-7) whose side of `center` the box's center falls on
///
/// This is only a guess at the child that will hold the box: with loose
/// children or a box straddling a split plane the chosen child may not
/// contain it.
pub fn octant_index(center: &Vec3, bounds: &Aabb) -> usize {
    let box_center = bounds.center();
    let x_bit = usize::from(box_center.x >= center.x);
    let y_bit = usize::from(box_center.y >= center.y);
    let z_bit = usize::from(box_center.z >= center.z);
    (z_bit << 2) | (y_bit << 1) | x_bit
}

/// Does child `index` fully contain `bounds`?
pub fn can_fit_in_octant<H>(children: &[OctreeNode<H>; 8], bounds: &Aabb, index: usize) -> bool {
    children[index].bounds().contains(bounds)
}

/// Child that should store `bounds`, or `None` if it has to stay at the parent
///
/// Tries the heuristic octant first, then the remaining seven in index order.
pub fn route<H>(children: &[OctreeNode<H>; 8], center: &Vec3, bounds: &Aabb) -> Option<usize> {
    let optimal = octant_index(center, bounds);
    if can_fit_in_octant(children, bounds, optimal) {
        return Some(optimal);
    }

    (0..8).find(|&index| index != optimal && can_fit_in_octant(children, bounds, index))
}
