//! Collision queries for character movement.
//!
//! This module provides the geometry the movement core runs against, built on
//! `parry3d` shapes.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The collision environment containing all geometry
//! - [`TraceResult`]: Output from a ray or sweep
//! - [`SurfaceContact`]: Closest surface near a sphere
//! - [`TraceShape`]: Shape used for sweeps (capsule, sphere or point)
//!
//! # Tracing Algorithm
//!
//! Sweeps use parry's shape casting against every brush and return:
//! - How far the shape traveled (fraction 0.0-1.0)
//! - The final position, a small skin off whatever was hit
//! - Surface normal at impact (if any)
//!
//! Resting against a surface is not a collision; only motion into it is.

mod flags;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use trace::{SurfaceContact, TraceResult, TraceShape};
pub use world::{CollisionBrush, CollisionWorld, TRACE_SKIN};
