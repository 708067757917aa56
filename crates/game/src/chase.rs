//! Pursuit AI.
//!
//! A chaser walks straight at its target while the target is within
//! detection range. There is no pathfinding: walls and ramps are handled by
//! the movement core like any other body.

use glam::Vec3;
use groundwork_physics::movement::{BodyState, Intent};
use serde::{Deserialize, Serialize};

use crate::player::EntityId;

/// Pursuit tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaseConfig {
    /// Distance at which a target is noticed (meters, inclusive).
    pub detection_range: f32,

    /// Walking speed while chasing (meters/second). Becomes the enemy
    /// movement config's `move_speed`.
    pub chase_speed: f32,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            detection_range: 10.0,
            chase_speed: 3.5,
        }
    }
}

/// Decides each tick whether to move toward a target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Chaser {
    pub config: ChaseConfig,

    /// Whether the last update was chasing.
    pub chasing: bool,
}

impl Chaser {
    pub fn new(config: ChaseConfig) -> Self {
        Self {
            config,
            chasing: false,
        }
    }

    /// Produce this tick's intent.
    ///
    /// The intent is expressed in the world frame (yaw 0), so the body must
    /// be ticked with a camera yaw of 0.
    pub fn update(&mut self, own_position: Vec3, target: Option<Vec3>) -> Intent {
        let offset = target.map(|t| t - own_position);
        let in_range = offset.is_some_and(|o| o.length() <= self.config.detection_range);

        if in_range != self.chasing {
            self.chasing = in_range;
            if in_range {
                log::info!("chaser at {own_position:?} started chasing");
            } else {
                log::info!("chaser at {own_position:?} stopped chasing");
            }
        }

        match offset {
            Some(offset) if in_range => Intent::toward(offset, 0.0, false),
            _ => Intent::default(),
        }
    }
}

/// An AI-driven body that pursues one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub body: BodyState,
    pub chaser: Chaser,

    /// Player being pursued. Fixed when the enemy is added.
    pub target: Option<EntityId>,
}

impl Enemy {
    pub fn new(id: EntityId, spawn_position: Vec3, chaser: Chaser, target: Option<EntityId>) -> Self {
        Self {
            id,
            body: BodyState::new(spawn_position),
            chaser,
            target,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }
}
