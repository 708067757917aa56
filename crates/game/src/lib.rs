//! Groundwork host simulation
//!
//! This crate drives the movement core the way a game would:
//!
//! - Raw input to movement intents, with edge-triggered jumps
//! - Players and their animator parameters
//! - Pursuit AI for enemies
//! - Level building, including colliders for terrain trees
//! - A fixed-timestep simulation loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌─────────┐    ┌──────────────┐    ┌─────────────────────┐  │
//! │  │ Input / │───►│ Movement     │───►│ Bodies, animator    │  │
//! │  │ Chaser  │    │ controller   │    │ params, frame count │  │
//! │  └─────────┘    └──────────────┘    └─────────────────────┘  │
//! │                       ▲                                      │
//! │                       │ Level collision (floor, ramps, trees)│
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod chase;
pub mod input;
pub mod level;
pub mod player;
pub mod simulation;
pub mod trees;

// Re-export main types
pub use chase::{ChaseConfig, Chaser, Enemy};
pub use input::{JumpLatch, PlayerInput};
pub use level::{Level, SpawnPoint, SpawnType};
pub use player::{AnimatorParams, EntityId, Player};
pub use simulation::{Simulation, SimulationConfig, SimulationError};
pub use trees::{add_tree_colliders, TerrainTrees, TreeColliderFilter, TreeInstance};

// Re-export physics types for convenience
pub use groundwork_physics::{
    AnimationSignals, BodyState, CollisionWorld, ContentFlags, Intent, MovementConfig,
    MovementController, TraceResult, TraceShape,
};
