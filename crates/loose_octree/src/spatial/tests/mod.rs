//! Scenario tests exercising the octree through its public API

mod picking_scenarios;

use crate::foundation::math::Vec3;
use crate::geometry::Aabb;

/// Tree bounds used by most scenarios
fn world_bounds() -> Aabb {
    Aabb::new(Vec3::new(-100.0, -100.0, -100.0), Vec3::new(100.0, 100.0, 100.0))
}

/// Axis-aligned unit cube centered at the given point
fn unit_box_at(x: f32, y: f32, z: f32) -> Aabb {
    Aabb::from_center_half_extent(Vec3::new(x, y, z), Vec3::new(0.5, 0.5, 0.5))
}
