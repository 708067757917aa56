//! Setup-time errors.
//!
//! Nothing on the per-tick path returns an error; these only come out of
//! configuration validation and world building.

use thiserror::Error;

/// Invalid movement tunables.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        field: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("sprint_speed ({sprint}) is below move_speed ({walk})")]
    SprintSlowerThanWalk { walk: f32, sprint: f32 },
}

/// Geometry that could not be added to a collision world.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("invalid triangle mesh: {0}")]
    InvalidMesh(String),

    #[error("degenerate capsule (radius {radius}, height {height})")]
    DegenerateCapsule { radius: f32, height: f32 },
}
