//! Ground probe.
//!
//! Samples the geometry below a body every tick. A miss is the airborne
//! result, not an error.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::{CollisionWorld, ContentFlags};

use super::config::MovementConfig;

/// Normals shorter than this are treated as degenerate.
const NORMAL_EPSILON: f32 = 1e-6;

/// Shape the ground probe uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeShape {
    /// Single ray straight down.
    Ray,

    /// Sphere at the probe point, reporting anything within the probe
    /// distance of its surface.
    Sphere {
        /// Sphere radius (meters).
        radius: f32,
    },
}

impl Default for ProbeShape {
    fn default() -> Self {
        Self::Ray
    }
}

/// Surface found below the body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundContact {
    /// Point on the surface.
    pub point: Vec3,

    /// Surface normal facing the probe. May be degenerate if the geometry is.
    pub normal: Vec3,

    /// Angle between the normal and world up (degrees). NaN for a
    /// degenerate normal.
    pub slope_angle: f32,

    /// Brush the surface belongs to.
    pub brush: Option<u32>,
}

/// One tick's view of the ground.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundSample {
    /// Ground contact, `None` when the probe missed.
    pub contact: Option<GroundContact>,
}

impl GroundSample {
    /// Sample for a probe that found nothing.
    pub const MISS: Self = Self { contact: None };

    /// Check if the probe found ground.
    #[inline]
    pub fn hit(&self) -> bool {
        self.contact.is_some()
    }

    /// Surface normal, if there was a hit.
    #[inline]
    pub fn normal(&self) -> Option<Vec3> {
        self.contact.map(|c| c.normal)
    }

    /// Slope angle in degrees, if there was a hit.
    #[inline]
    pub fn slope_angle(&self) -> Option<f32> {
        self.contact.map(|c| c.slope_angle)
    }
}

/// Angle between a surface normal and world up, in degrees.
///
/// Returns NaN for zero-length or non-finite normals so the classifier can
/// fail toward "too steep".
pub fn slope_angle(normal: Vec3) -> f32 {
    let length = normal.length();
    if !(length > NORMAL_EPSILON) || !length.is_finite() {
        return f32::NAN;
    }
    (normal.y / length).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Diagnostic hook called after every probe.
pub trait ProbeObserver {
    /// `origin` and `end` bound the probed segment.
    fn on_probe(&mut self, origin: Vec3, end: Vec3, sample: &GroundSample);
}

impl ProbeObserver for () {
    #[inline]
    fn on_probe(&mut self, _origin: Vec3, _end: Vec3, _sample: &GroundSample) {}
}

/// Downward ground probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    /// Distance from the body origin to the start of the probe window.
    pub offset: f32,

    /// Length of the probe window.
    pub distance: f32,

    /// Ray or sphere.
    pub shape: ProbeShape,

    /// What counts as ground.
    pub mask: ContentFlags,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self::from_config(&MovementConfig::default())
    }
}

impl GroundProbe {
    /// Probe matching a movement config.
    pub fn from_config(config: &MovementConfig) -> Self {
        Self {
            offset: config.ground_probe_offset,
            distance: config.ground_probe_distance,
            shape: config.probe_shape,
            mask: ContentFlags::MASK_GROUND,
        }
    }

    /// Sample the ground below `position`.
    ///
    /// With no world every probe misses.
    pub fn sample(&self, world: Option<&CollisionWorld>, position: Vec3) -> GroundSample {
        self.sample_observed(world, position, &mut ())
    }

    /// Same as [`sample`](Self::sample), reporting to an observer.
    pub fn sample_observed(
        &self,
        world: Option<&CollisionWorld>,
        position: Vec3,
        observer: &mut impl ProbeObserver,
    ) -> GroundSample {
        let probe_point = position - Vec3::Y * self.offset;

        let (origin, end, sample) = match self.shape {
            ProbeShape::Ray => {
                // Cast from the body origin so ground the body has sunk into
                // still registers; the hit window ends `distance` below the
                // probe point either way.
                let reach = self.offset + self.distance;
                let end = position - Vec3::Y * reach;
                let sample = world.map_or(GroundSample::MISS, |world| {
                    self.sample_ray(world, position, reach)
                });
                (position, end, sample)
            }
            ProbeShape::Sphere { radius } => {
                let end = probe_point - Vec3::Y * self.distance;
                let sample = world.map_or(GroundSample::MISS, |world| {
                    self.sample_sphere(world, probe_point, radius)
                });
                (probe_point, end, sample)
            }
        };

        observer.on_probe(origin, end, &sample);
        sample
    }

    fn sample_ray(&self, world: &CollisionWorld, origin: Vec3, reach: f32) -> GroundSample {
        let trace = world.raycast(origin, Vec3::NEG_Y, reach, self.mask);
        if !trace.hit_something() {
            return GroundSample::MISS;
        }

        let normal = trace.hit_normal.unwrap_or(Vec3::ZERO);
        GroundSample {
            contact: Some(GroundContact {
                point: trace.end_position,
                normal,
                slope_angle: slope_angle(normal),
                brush: trace.hit_brush,
            }),
        }
    }

    fn sample_sphere(&self, world: &CollisionWorld, center: Vec3, radius: f32) -> GroundSample {
        let Some(found) = world.sphere_contact(center, radius, self.distance, self.mask) else {
            return GroundSample::MISS;
        };

        GroundSample {
            contact: Some(GroundContact {
                point: found.point,
                normal: found.normal,
                slope_angle: slope_angle(found.normal),
                brush: Some(found.brush),
            }),
        }
    }
}
