//! Tree collider generation.
//!
//! Terrain tree instances carry no collision of their own. At level build
//! time each selected tree gets a capsule trunk in the collision world.

use glam::Vec3;
use groundwork_physics::{CollisionWorld, ContentFlags};
use serde::{Deserialize, Serialize};

/// Trunk radius per unit of width scale.
pub const TRUNK_RADIUS_PER_WIDTH: f32 = 0.5;

/// Trunk height per unit of height scale.
pub const TRUNK_HEIGHT_PER_HEIGHT: f32 = 5.0;

/// One tree placed on a terrain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeInstance {
    /// Position in terrain space, each axis normalized to [0, 1].
    pub position: Vec3,

    /// Index into the terrain's tree prototypes.
    pub prototype: usize,

    pub width_scale: f32,
    pub height_scale: f32,
}

/// Trees of one terrain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TerrainTrees {
    /// World position of the terrain's corner.
    pub origin: Vec3,

    /// Terrain extent in world units.
    pub size: Vec3,

    pub instances: Vec<TreeInstance>,
}

impl TerrainTrees {
    /// World position of a tree's base.
    pub fn world_position(&self, tree: &TreeInstance) -> Vec3 {
        self.origin + tree.position * self.size
    }
}

/// Which trees get colliders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeColliderFilter {
    /// Prototype indices to collide with. Empty selects every prototype.
    pub prototypes: Vec<usize>,

    /// Trees with a smaller height scale are skipped (saplings, shrubs).
    pub min_height: f32,
}

impl Default for TreeColliderFilter {
    fn default() -> Self {
        Self {
            prototypes: Vec::new(),
            min_height: 2.0,
        }
    }
}

impl TreeColliderFilter {
    /// Check if a tree passes the filter.
    pub fn accepts(&self, tree: &TreeInstance) -> bool {
        let prototype_selected = self.prototypes.is_empty() || self.prototypes.contains(&tree.prototype);
        prototype_selected && tree.height_scale >= self.min_height
    }
}

/// Add a capsule trunk for every tree the filter accepts.
///
/// Returns the number of colliders added. Trees whose scales give a
/// degenerate capsule are skipped with a warning.
pub fn add_tree_colliders(world: &mut CollisionWorld, trees: &TerrainTrees, filter: &TreeColliderFilter) -> usize {
    let mut added = 0;

    for tree in trees.instances.iter().filter(|tree| filter.accepts(tree)) {
        let base = trees.world_position(tree);
        let radius = TRUNK_RADIUS_PER_WIDTH * tree.width_scale;
        let height = TRUNK_HEIGHT_PER_HEIGHT * tree.height_scale;

        match world.add_capsule(base, radius, height, ContentFlags::FOLIAGE) {
            Ok(_) => added += 1,
            Err(err) => log::warn!("skipping tree at {base:?}: {err}"),
        }
    }

    log::info!(
        "generated {added} tree colliders from {} trees",
        trees.instances.len()
    );
    added
}
