//! Trace results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Result of a collision trace through the world.
///
/// Traces sweep a shape from a start position to an end position and
/// report what was hit along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the trace path we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub fraction: f32,

    /// Final position after the trace.
    ///
    /// For sweeps this stays just outside the geometry that was hit. For
    /// raycasts it is the impact point itself.
    pub end_position: Vec3,

    /// Surface normal at the impact point, pointing out of the geometry
    /// that was hit. `None` if nothing was hit.
    pub hit_normal: Option<Vec3>,

    /// Content flags of what was hit.
    pub hit_contents: ContentFlags,

    /// Whether the trace started inside solid geometry.
    pub started_in_solid: bool,

    /// Whether the trace could not leave solid geometry at all.
    pub all_solid: bool,

    /// Brush that was hit, if any.
    pub hit_brush: Option<u32>,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            started_in_solid: false,
            all_solid: false,
            hit_brush: None,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }
}

/// Closest surface found by a proximity query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceContact {
    /// Point on the surface.
    pub point: Vec3,
    /// Surface normal, pointing out of the geometry toward the query shape.
    pub normal: Vec3,
    /// Separation between the query shape and the surface (negative when
    /// penetrating).
    pub distance: f32,
    /// Brush the surface belongs to.
    pub brush: u32,
}

/// Shape used for collision traces.
///
/// Shapes are centred on the trace origin: a body position is the middle of
/// its capsule, and the feet sit half the capsule height below it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (pill shape).
    Capsule {
        /// Radius of the capsule cylinder and end caps.
        radius: f32,
        /// Total height from bottom of lower cap to top of upper cap.
        height: f32,
    },

    /// A sphere.
    Sphere {
        /// Sphere radius.
        radius: f32,
    },

    /// A single point (infinitely small).
    Point,
}

impl TraceShape {
    /// Standard humanoid body capsule.
    pub const BODY_STANDING: Self = Self::Capsule {
        radius: 0.4,
        height: 1.8,
    };
}
