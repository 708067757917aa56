//! Level building and management.

use glam::{Quat, Vec3};
use groundwork_physics::{CollisionWorld, ContentFlags};
use serde::{Deserialize, Serialize};

use crate::trees::{add_tree_colliders, TerrainTrees, TreeColliderFilter, TreeInstance};

/// A level: collision geometry and spawn points.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub collision: CollisionWorld,

    /// Spawn points.
    pub spawn_points: Vec<SpawnPoint>,
}

/// A spawn point for players or enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPoint {
    /// Position in world space.
    pub position: Vec3,

    /// Initial facing direction (yaw in radians).
    pub facing: f32,

    /// Spawn point type.
    pub spawn_type: SpawnType,
}

/// Types of spawn points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnType {
    /// Player spawn point.
    Player,
    /// Enemy spawn point.
    Enemy,
}

impl Level {
    /// Create an empty level.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            collision: CollisionWorld::new(),
            spawn_points: Vec::new(),
        }
    }

    /// Create a test level: walled floor, a walkable 30° ramp, a too-steep
    /// 50° ramp and a small grove of trees.
    pub fn test_arena() -> Self {
        let mut level = Self::new("test_arena", "Test Arena");
        let world = &mut level.collision;

        // Floor
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            ContentFlags::SOLID,
        );

        // Walls
        let wall_height = 5.0;
        let wall_thickness = 0.5;
        let arena_size = 50.0;

        for (center, half_extents) in [
            // North, south
            (Vec3::new(0.0, wall_height / 2.0, -arena_size), Vec3::new(arena_size, wall_height / 2.0, wall_thickness)),
            (Vec3::new(0.0, wall_height / 2.0, arena_size), Vec3::new(arena_size, wall_height / 2.0, wall_thickness)),
            // East, west
            (Vec3::new(arena_size, wall_height / 2.0, 0.0), Vec3::new(wall_thickness, wall_height / 2.0, arena_size)),
            (Vec3::new(-arena_size, wall_height / 2.0, 0.0), Vec3::new(wall_thickness, wall_height / 2.0, arena_size)),
        ] {
            world.add_box(center, half_extents, ContentFlags::SOLID);
        }

        // Ramps rise toward +X, sunk into the floor at their low end
        add_ramp(world, Vec3::new(10.0, 0.0, -20.0), 30.0, 8.0, 4.0);
        add_ramp(world, Vec3::new(10.0, 0.0, 20.0), 50.0, 6.0, 4.0);

        let grove = TerrainTrees {
            origin: Vec3::new(-40.0, 0.0, -40.0),
            size: Vec3::new(20.0, 10.0, 20.0),
            instances: (0..9)
                .map(|i| TreeInstance {
                    position: Vec3::new(0.2 + 0.3 * (i % 3) as f32, 0.0, 0.2 + 0.3 * (i / 3) as f32),
                    prototype: i % 2,
                    width_scale: 1.0,
                    height_scale: 1.5 + 0.25 * i as f32,
                })
                .collect(),
        };
        add_tree_colliders(world, &grove, &TreeColliderFilter::default());

        // Spawn points
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-20.0, 1.0, 0.0),
            facing: 0.0,
            spawn_type: SpawnType::Player,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(20.0, 1.0, 0.0),
            facing: std::f32::consts::PI,
            spawn_type: SpawnType::Player,
        });
        level.spawn_points.push(SpawnPoint {
            position: Vec3::new(-14.0, 1.0, 5.0),
            facing: 0.0,
            spawn_type: SpawnType::Enemy,
        });

        level
    }

    /// Get the nth spawn point of a type.
    pub fn spawn(&self, spawn_type: SpawnType, index: usize) -> Option<&SpawnPoint> {
        self.spawn_points
            .iter()
            .filter(|s| s.spawn_type == spawn_type)
            .nth(index)
    }

    /// Get a player spawn point.
    pub fn get_player_spawn(&self, index: usize) -> Option<&SpawnPoint> {
        self.spawn(SpawnType::Player, index)
    }

    /// Get the number of player spawn points.
    pub fn player_spawn_count(&self) -> usize {
        self.spawn_points
            .iter()
            .filter(|s| s.spawn_type == SpawnType::Player)
            .count()
    }
}

/// Add a ramp as a rotated slab. `foot` is where the slope meets the floor;
/// the surface rises toward +X at `degrees` over `length`.
fn add_ramp(world: &mut CollisionWorld, foot: Vec3, degrees: f32, length: f32, width: f32) {
    let radians = degrees.to_radians();
    let thickness = 0.5;
    let up_slope = Vec3::new(radians.cos(), radians.sin(), 0.0);
    let surface_normal = Vec3::new(-radians.sin(), radians.cos(), 0.0);
    let center = foot + up_slope * (length / 2.0) - surface_normal * (thickness / 2.0);

    world.add_oriented_box(
        center,
        Vec3::new(length / 2.0, thickness / 2.0, width / 2.0),
        Quat::from_rotation_z(radians),
        ContentFlags::SOLID,
    );
}
