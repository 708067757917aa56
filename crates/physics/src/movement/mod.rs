//! Body movement.
//!
//! Each tick runs, in order:
//!
//! 1. [`GroundProbe`] samples the geometry below the body
//! 2. a [`SlopeClassifier`] turns the sample into flat / walkable / too steep
//! 3. the [resolver](resolve) turns intent and ground into a velocity change
//! 4. [`try_jump`] may override the vertical velocity
//! 5. the [`MovementController`] corrects, moves the body by collide-and-slide
//!    and publishes [`AnimationSignals`]
//!
//! # Design
//!
//! The controller holds configuration and collaborators only; all per-body
//! state lives in [`BodyState`], owned by the host. Nothing here allocates
//! or fails on the tick path, and the same inputs always produce the same
//! outputs.

mod config;
mod controller;
mod jump;
mod probe;
mod resolver;
mod signals;
mod slide_move;
mod slope;
mod state;

pub use config::MovementConfig;
pub use controller::{smooth_damp_angle, wrap_angle, MovementController, TickReport};
pub use jump::{is_falling, try_jump, update_ground_state, GroundTransition};
pub use probe::{slope_angle, GroundContact, GroundProbe, GroundSample, ProbeObserver, ProbeShape};
pub use resolver::{
    clamp_horizontal, correct_grounded, move_direction, move_towards, project_on_plane, resolve,
    surface_velocity, target_speed, MovementRegime, VelocityDelta,
};
pub use signals::{AnimationSignals, AnimationSink};
pub use slide_move::{clip_velocity, slide_move, snap_to_ground};
pub use slope::{classify_angle, slide_direction, SlopeClassification, SlopeClassifier, SlopeKind, ThresholdClassifier};
pub use state::{yaw_forward, yaw_of, yaw_right, BodyState, Intent, MovementFlags, MOVE_DEADZONE_SQUARED};
