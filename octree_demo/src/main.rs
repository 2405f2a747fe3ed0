//! Octree Demo
//!
//! Headless simulation driving a loose octree the way a game loop would:
//! - Ships bounce around a closed box and are re-binned every frame
//! - The whole tree is rebuilt from scratch periodically with a bulk load
//! - A fixed camera picks the nearest ship along its view ray
//! - Node wireframes are collected into a line batch for rendering
//!
//! Pass a `.toml` or `.ron` file as the first argument to override the
//! octree parameters.

use bitflags::bitflags;
use loose_octree::foundation::logging;
use loose_octree::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmap::{new_key_type, SlotMap};

// World settings
const OCTREE_SIZE: f32 = 100.0; // Octree bounds: -50 to +50 on each axis
const RNG_SEED: u64 = 0x0c7_2ee;

// Ship counts
const NUM_SMALL_SHIPS: usize = 40;
const NUM_LARGE_SHIPS: usize = 8;

// Movement speeds and sizes
const SMALL_SHIP_SPEED: f32 = 6.0;
const LARGE_SHIP_SPEED: f32 = 3.0;
const SMALL_SHIP_RADIUS: f32 = 0.8;
const LARGE_SHIP_RADIUS: f32 = 2.0;

// Simulation timing
const DELTA_TIME: f32 = 1.0 / 60.0;
const SIM_FRAMES: u64 = 600;
const REBUILD_INTERVAL: u64 = 120;
const PICK_INTERVAL: u64 = 30;
const CHURN_INTERVAL: u64 = 90;

new_key_type! {
    /// Stable handle of a ship, used as the octree object handle
    struct ShipKey;
}

bitflags! {
    /// Per-ship state bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    struct ShipFlags: u32 {
        /// Not rendered and not pickable
        const HIDDEN = 1 << 0;
        /// Currently under the camera's pick ray
        const SELECTED = 1 << 1;
    }
}

/// Demo errors
#[derive(thiserror::Error, Debug)]
enum DemoError {
    /// Octree parameters were rejected
    #[error("octree configuration: {0}")]
    Config(#[from] ConfigError),
}

struct Ship {
    position: Vec3,
    velocity: Vec3,
    radius: f32, // Bounding sphere radius
    flags: ShipFlags,
}

impl Ship {
    fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extent(self.position, Vec3::repeat(self.radius))
    }

    /// Entry distance of `ray` into the ship's bounding sphere
    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let offset = ray.origin - self.position;
        let b = offset.dot(&ray.direction);
        let c = offset.magnitude_squared() - self.radius * self.radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let far = -b + root;
        if far < 0.0 {
            return None;
        }
        Some((-b - root).max(0.0))
    }
}

/// Exact sphere picking over the ship table
struct ShipPicker<'a> {
    ships: &'a SlotMap<ShipKey, Ship>,
}

impl PickTester<ShipKey> for ShipPicker<'_> {
    fn test_hit(&self, handle: &ShipKey, ray: &Ray) -> Option<f32> {
        self.ships.get(*handle)?.intersect_ray(ray)
    }

    fn is_pickable(&self, handle: &ShipKey) -> bool {
        self.ships
            .get(*handle)
            .is_some_and(|ship| !ship.flags.contains(ShipFlags::HIDDEN))
    }
}

/// Current bounds straight from the ship table
struct ShipBounds<'a> {
    ships: &'a SlotMap<ShipKey, Ship>,
}

impl BoundsSource<ShipKey> for ShipBounds<'_> {
    fn current_bounds(&self, handle: &ShipKey) -> Aabb {
        // Only live keys are ever updated; a stale key collapses to the origin
        self.ships.get(*handle).map_or_else(
            || Aabb::from_center_half_extent(Vec3::zeros(), Vec3::zeros()),
            Ship::bounds,
        )
    }
}

struct OctreeDemoApp {
    ships: SlotMap<ShipKey, Ship>,
    octree: LooseOctree<ShipKey>,
    debug_lines: DebugLineBatch,
    camera_position: Vec3,
    rng: StdRng,
    frame: u64,
}

impl OctreeDemoApp {
    fn new(config: OctreeConfig) -> Result<Self, DemoError> {
        let half_bounds = OCTREE_SIZE / 2.0;
        let world_bounds = Aabb::new(Vec3::repeat(-half_bounds), Vec3::repeat(half_bounds));
        let octree = LooseOctree::try_new(world_bounds, config)?;

        let mut app = Self {
            ships: SlotMap::with_key(),
            octree,
            debug_lines: DebugLineBatch::new(),
            // 30 degrees above the horizon, looking at the origin
            camera_position: Vec3::new(0.0, 40.0, -69.3),
            rng: StdRng::seed_from_u64(RNG_SEED),
            frame: 0,
        };

        for _ in 0..NUM_SMALL_SHIPS {
            app.spawn_ship(SMALL_SHIP_RADIUS, SMALL_SHIP_SPEED);
        }
        for _ in 0..NUM_LARGE_SHIPS {
            app.spawn_ship(LARGE_SHIP_RADIUS, LARGE_SHIP_SPEED);
        }

        app.octree
            .bulk_insert(app.ships.iter().map(|(key, ship)| (key, ship.bounds())));
        log::info!(
            "Spawned {} ships, octree has {} nodes",
            app.ships.len(),
            app.octree.total_node_count()
        );

        Ok(app)
    }

    fn spawn_ship(&mut self, radius: f32, speed: f32) -> ShipKey {
        let half_bounds = OCTREE_SIZE / 2.0 - radius;
        let position = Vec3::new(
            self.rng.gen_range(-half_bounds..half_bounds),
            self.rng.gen_range(-half_bounds..half_bounds),
            self.rng.gen_range(-half_bounds..half_bounds),
        );
        let heading = Vec3::new(
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
            self.rng.gen_range(-1.0..1.0),
        );
        let velocity = heading.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::x) * speed;

        self.ships.insert(Ship {
            position,
            velocity,
            radius,
            flags: ShipFlags::empty(),
        })
    }

    fn run(&mut self) {
        while self.frame < SIM_FRAMES {
            self.update(DELTA_TIME);
            self.frame += 1;
        }

        log::info!(
            "Finished {} frames: {} ships, {} nodes, {} objects, deepest node at depth {}",
            self.frame,
            self.ships.len(),
            self.octree.total_node_count(),
            self.octree.total_object_count(),
            self.octree.max_occupied_depth()
        );
        self.octree.debug_dump();
    }

    fn update(&mut self, delta_time: f32) {
        self.move_ships(delta_time);

        if self.frame % REBUILD_INTERVAL == 0 {
            self.rebuild_octree();
        } else {
            self.update_octree();
        }

        if self.frame % CHURN_INTERVAL == 0 {
            self.churn_ships();
        }

        if self.frame % PICK_INTERVAL == 0 {
            self.update_picking();
            self.update_octree_visualization();
        }
    }

    fn move_ships(&mut self, delta_time: f32) {
        let half_bounds = OCTREE_SIZE / 2.0;

        for ship in self.ships.values_mut() {
            let mut pos = ship.position + ship.velocity * delta_time;

            // Bounce off walls
            for axis in 0..3 {
                let limit = half_bounds - ship.radius;
                if pos[axis] < -limit || pos[axis] > limit {
                    ship.velocity[axis] = -ship.velocity[axis];
                    pos[axis] = pos[axis].clamp(-limit, limit);
                }
            }

            ship.position = pos;
        }
    }

    /// Re-bin every ship from its current position
    fn update_octree(&mut self) {
        let source = ShipBounds { ships: &self.ships };
        for key in self.ships.keys() {
            self.octree.update(key, &source);
        }
    }

    fn rebuild_octree(&mut self) {
        self.octree.clear();
        self.octree
            .bulk_insert(self.ships.iter().map(|(key, ship)| (key, ship.bounds())));
        log::debug!(
            "Rebuilt octree at frame {}: {} nodes",
            self.frame,
            self.octree.total_node_count()
        );
    }

    /// Despawn one ship, spawn a replacement and toggle one ship's visibility
    fn churn_ships(&mut self) {
        let keys: Vec<ShipKey> = self.ships.keys().collect();
        if keys.is_empty() {
            return;
        }

        let victim = keys[self.rng.gen_range(0..keys.len())];
        if self.octree.remove(victim) {
            self.ships.remove(victim);
        } else {
            log::warn!("Ship {victim:?} was not found in the octree");
        }

        let spawned = self.spawn_ship(SMALL_SHIP_RADIUS, SMALL_SHIP_SPEED);
        if let Some(ship) = self.ships.get(spawned) {
            self.octree.insert(spawned, ship.bounds());
        }

        let toggled = keys[self.rng.gen_range(0..keys.len())];
        if let Some(ship) = self.ships.get_mut(toggled) {
            ship.flags.toggle(ShipFlags::HIDDEN);
        }
    }

    fn update_picking(&mut self) {
        let ray = Ray::new(self.camera_position, -self.camera_position);
        let picker = ShipPicker { ships: &self.ships };
        let hit = self.octree.raycast_closest(&ray, &picker);

        for ship in self.ships.values_mut() {
            ship.flags.remove(ShipFlags::SELECTED);
        }

        match hit {
            Some(RayHit { handle, distance }) => {
                if let Some(ship) = self.ships.get_mut(handle) {
                    ship.flags.insert(ShipFlags::SELECTED);
                }
                let candidates = self.octree.raycast_candidates(&ray).len();
                log::info!(
                    "Frame {}: picked {handle:?} at distance {distance:.2} ({candidates} candidates)",
                    self.frame
                );
            }
            None => log::info!("Frame {}: nothing under the camera", self.frame),
        }
    }

    fn update_octree_visualization(&mut self) {
        self.debug_lines.clear();
        if self.debug_lines.enabled {
            self.octree.debug_draw(&mut self.debug_lines);
        }
        log::debug!(
            "Octree wireframe: {} lines, {} bytes",
            self.debug_lines.len(),
            self.debug_lines.as_bytes().len()
        );
    }
}

fn load_config() -> OctreeConfig {
    let Some(path) = std::env::args().nth(1) else {
        return OctreeConfig::default();
    };

    match OctreeConfig::load_from_file(&path) {
        Ok(config) => {
            log::info!("Loaded octree config from {path}: {config:?}");
            config
        }
        Err(e) => {
            log::warn!("Failed to load {path}: {e}. Using defaults.");
            OctreeConfig::default()
        }
    }
}

fn main() -> Result<(), DemoError> {
    logging::init_with_default("info");

    log::info!("=== Octree Demo ===");
    let mut app = OctreeDemoApp::new(load_config())?;
    app.run();
    Ok(())
}
