//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! metric units (meters, seconds, degrees for angles).

use serde::{Deserialize, Serialize};

use crate::collision::TraceShape;
use crate::error::ConfigError;

use super::probe::ProbeShape;

/// Configuration for character movement.
///
/// Immutable while a simulation runs; the host builds one at setup time and
/// hands it to the [`MovementController`](super::MovementController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Body Dimensions
    // ========================================================================
    /// Collision radius (meters).
    pub body_radius: f32,

    /// Capsule height including both caps (meters). The body origin sits at
    /// the middle of the capsule.
    pub body_height: f32,

    // ========================================================================
    // Locomotion
    // ========================================================================
    /// Walking speed (meters/second).
    pub move_speed: f32,

    /// Sprinting speed (meters/second).
    pub sprint_speed: f32,

    /// Time for the body yaw to catch up with the move direction (seconds).
    pub turn_smooth_time: f32,

    // ========================================================================
    // Jumping and Air
    // ========================================================================
    /// Upward velocity set by a jump (meters/second).
    pub jump_impulse: f32,

    /// Gravity acceleration while airborne (meters/second²).
    pub gravity: f32,

    /// Fraction of the move acceleration available in the air.
    pub air_control_factor: f32,

    /// Vertical velocity below which an airborne body counts as falling.
    pub falling_velocity_threshold: f32,

    // ========================================================================
    // Slopes
    // ========================================================================
    /// Steepest walkable slope (degrees). Exactly this angle is walkable.
    pub max_walkable_slope_angle: f32,

    /// Angles at or below this are treated as flat ground (degrees).
    pub flat_angle_threshold: f32,

    /// Acceleration pressing the body into sloped ground (meters/second²).
    pub ground_snap_force: f32,

    /// Acceleration pressing the body into flat ground (meters/second²).
    pub flat_stick_force: f32,

    /// Speed into the ground kept while grounded (meters/second). Keeps the
    /// probe hitting so the grounded flag does not flicker.
    pub grounded_stick_speed: f32,

    /// Speed a slide settles at on too-steep ground (meters/second).
    pub slide_base_speed: f32,

    /// Rate the slide speed approaches `slide_base_speed` (meters/second²).
    pub slide_acceleration: f32,

    /// Fraction of the move speed usable for sideways steering while sliding.
    pub slide_steer_factor: f32,

    // ========================================================================
    // Ground Probe
    // ========================================================================
    /// Distance from the body origin down to where the probe window starts
    /// (meters). Half the body height puts it at the feet.
    pub ground_probe_offset: f32,

    /// Length of the probe window below the offset point (meters).
    pub ground_probe_distance: f32,

    /// Ray or sphere probe.
    pub probe_shape: ProbeShape,

    // ========================================================================
    // Integration
    // ========================================================================
    /// Maximum collision planes per sweep.
    pub max_clip_planes: usize,

    /// Overbounce factor for velocity clipping (prevents sticking).
    pub overbounce: f32,

    /// Longest tick accepted; longer ticks are clamped (seconds).
    pub max_delta_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            body_radius: 0.4,
            body_height: 1.8,

            move_speed: 10.0,
            sprint_speed: 15.0,
            turn_smooth_time: 0.05,

            jump_impulse: 12.0,
            gravity: 9.81,
            air_control_factor: 0.15,
            falling_velocity_threshold: -2.0,

            max_walkable_slope_angle: 45.0,
            flat_angle_threshold: 1.0,
            ground_snap_force: 15.0,
            flat_stick_force: 5.0,
            grounded_stick_speed: 2.0,
            slide_base_speed: 2.0,
            slide_acceleration: 4.0,
            slide_steer_factor: 0.25,

            ground_probe_offset: 0.9,
            ground_probe_distance: 0.4,
            probe_shape: ProbeShape::Ray,

            max_clip_planes: 5,
            overbounce: 1.001,
            max_delta_time: 0.066, // ~15 FPS minimum
        }
    }
}

impl MovementConfig {
    /// Snappier movement: more air control, faster slides.
    pub fn arcade() -> Self {
        Self {
            move_speed: 12.0,
            sprint_speed: 18.0,
            air_control_factor: 0.4,
            slide_base_speed: 4.0,
            slide_acceleration: 8.0,
            slide_steer_factor: 0.5,
            ..Default::default()
        }
    }

    /// Heavy, grounded movement: slow, little air control, shallow slopes.
    pub fn heavy() -> Self {
        Self {
            move_speed: 5.0,
            sprint_speed: 7.5,
            air_control_factor: 0.05,
            max_walkable_slope_angle: 35.0,
            ground_snap_force: 25.0,
            ..Default::default()
        }
        .with_jump_height(1.0)
    }

    /// Upward velocity that reaches `height` under `gravity`: `sqrt(2 g h)`.
    pub fn jump_impulse_for_height(gravity: f32, height: f32) -> f32 {
        (2.0 * gravity * height).max(0.0).sqrt()
    }

    /// Tune `jump_impulse` to a target apex height under this config's gravity.
    pub fn with_jump_height(mut self, height: f32) -> Self {
        self.jump_impulse = Self::jump_impulse_for_height(self.gravity, height);
        self
    }

    /// Speed the body aims for on the ground for the given sprint state.
    #[inline]
    pub fn max_speed(&self, sprinting: bool) -> f32 {
        if sprinting {
            self.sprint_speed
        } else {
            self.move_speed
        }
    }

    /// Collision shape of the body.
    pub fn body_shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.body_radius,
            height: self.body_height,
        }
    }

    /// Check every tunable. Call once at setup; the tick path assumes a
    /// validated config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("body_radius", self.body_radius),
            ("body_height", self.body_height),
            ("move_speed", self.move_speed),
            ("sprint_speed", self.sprint_speed),
            ("turn_smooth_time", self.turn_smooth_time),
            ("jump_impulse", self.jump_impulse),
            ("gravity", self.gravity),
            ("air_control_factor", self.air_control_factor),
            ("falling_velocity_threshold", self.falling_velocity_threshold),
            ("max_walkable_slope_angle", self.max_walkable_slope_angle),
            ("flat_angle_threshold", self.flat_angle_threshold),
            ("ground_snap_force", self.ground_snap_force),
            ("flat_stick_force", self.flat_stick_force),
            ("grounded_stick_speed", self.grounded_stick_speed),
            ("slide_base_speed", self.slide_base_speed),
            ("slide_acceleration", self.slide_acceleration),
            ("slide_steer_factor", self.slide_steer_factor),
            ("ground_probe_offset", self.ground_probe_offset),
            ("ground_probe_distance", self.ground_probe_distance),
            ("overbounce", self.overbounce),
            ("max_delta_time", self.max_delta_time),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        for (field, value) in [
            ("body_radius", self.body_radius),
            ("body_height", self.body_height),
            ("move_speed", self.move_speed),
            ("sprint_speed", self.sprint_speed),
            ("gravity", self.gravity),
            ("ground_probe_distance", self.ground_probe_distance),
            ("max_delta_time", self.max_delta_time),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        for (field, value) in [
            ("turn_smooth_time", self.turn_smooth_time),
            ("jump_impulse", self.jump_impulse),
            ("ground_snap_force", self.ground_snap_force),
            ("flat_stick_force", self.flat_stick_force),
            ("grounded_stick_speed", self.grounded_stick_speed),
            ("slide_base_speed", self.slide_base_speed),
            ("slide_acceleration", self.slide_acceleration),
            ("ground_probe_offset", self.ground_probe_offset),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.sprint_speed < self.move_speed {
            return Err(ConfigError::SprintSlowerThanWalk {
                walk: self.move_speed,
                sprint: self.sprint_speed,
            });
        }

        check_range("air_control_factor", self.air_control_factor, 0.0, 1.0)?;
        // A full steer factor would let input cancel the slide
        check_range("slide_steer_factor", self.slide_steer_factor, 0.0, 0.95)?;
        check_range("flat_angle_threshold", self.flat_angle_threshold, 0.0, 45.0)?;
        check_range(
            "max_walkable_slope_angle",
            self.max_walkable_slope_angle,
            self.flat_angle_threshold,
            89.0,
        )?;
        check_range("overbounce", self.overbounce, 1.0, 1.1)?;
        check_range(
            "body_height",
            self.body_height,
            2.0 * self.body_radius,
            f32::MAX,
        )?;

        if self.falling_velocity_threshold > 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "falling_velocity_threshold",
                value: self.falling_velocity_threshold,
                min: f32::MIN,
                max: 0.0,
            });
        }

        if self.max_clip_planes == 0 {
            return Err(ConfigError::NotPositive {
                field: "max_clip_planes",
                value: 0.0,
            });
        }

        if let ProbeShape::Sphere { radius } = self.probe_shape {
            if !(radius > 0.0) || !radius.is_finite() {
                return Err(ConfigError::NotPositive {
                    field: "probe_shape.radius",
                    value: radius,
                });
            }
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange { field, value, min, max });
    }
    Ok(())
}
