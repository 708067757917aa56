//! Groundwork movement core.
//!
//! Kinematic character movement for a fixed-timestep 3D simulation: ground
//! detection, slope handling and sliding, jumping and air control, driven
//! through a collide-and-slide sweep against static geometry.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: brushes built on `parry3d` shapes, with ray, sphere and
//!   capsule-sweep queries
//! - **Movement**: uses those queries to turn per-tick intent into body motion
//!
//! Everything is synchronous and deterministic. Bodies share no mutable
//! state, so a host may tick them in any order.

pub mod collision;
pub mod error;
pub mod movement;

// Re-export commonly used types
pub use collision::{CollisionWorld, ContentFlags, SurfaceContact, TraceResult, TraceShape};
pub use error::{ConfigError, WorldError};
pub use movement::{
    AnimationSignals, AnimationSink, BodyState, GroundProbe, GroundSample, Intent, MovementConfig,
    MovementController, MovementFlags, MovementRegime, ProbeShape, SlopeClassification,
    SlopeClassifier, SlopeKind, ThresholdClassifier, TickReport,
};
