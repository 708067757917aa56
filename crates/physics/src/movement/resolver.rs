//! Velocity resolver.
//!
//! Turns intent and classified ground into this tick's velocity change. The
//! resolver never touches position; displacement happens in the controller
//! through the slide move.
//!
//! Three regimes:
//!
//! - **Walking**: grounded on flat or walkable ground. Input accelerates the
//!   body along the ground plane, a stick force presses it into the surface,
//!   and [`correct_grounded`] keeps a small into-ground speed and clamps
//!   horizontal speed to the target.
//! - **Sliding**: grounded on too-steep ground. The slide owns the velocity;
//!   input only steers sideways.
//! - **Airborne**: gravity plus damped air control, no clamp. Also used for a
//!   body still inside the probe window on the way up from a jump.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::config::MovementConfig;
use super::slope::{SlopeClassification, SlopeKind};
use super::state::{clamp_move_axis, yaw_forward, yaw_right, BodyState, Intent, MOVE_DEADZONE_SQUARED};

/// Which set of rules moved the body this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementRegime {
    /// Grounded on flat or walkable ground.
    Walking,
    /// Grounded on too-steep ground.
    Sliding,
    /// No ground contact, or rising away from it after a jump.
    Airborne,
}

/// Velocity change for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityDelta {
    pub regime: MovementRegime,

    /// Acceleration integrated as `v += a * dt`.
    pub acceleration: Vec3,

    /// Velocity that replaces the integrated one outright (sliding).
    pub velocity_override: Option<Vec3>,

    /// Slide speed to store on the body. Zero outside the sliding regime.
    pub slide_speed: f32,

    /// World-space move direction from intent (unit or zero).
    pub move_direction: Vec3,

    /// Speed the intent asks for. Zero without input.
    pub target_speed: f32,
}

impl VelocityDelta {
    /// Integrate onto a velocity.
    pub fn apply(&self, velocity: Vec3, delta_time: f32) -> Vec3 {
        match self.velocity_override {
            Some(velocity) => velocity,
            None => velocity + self.acceleration * delta_time,
        }
    }
}

/// World-space move direction for a move axis seen from `frame_yaw`.
///
/// Unit length, or zero when there is no input. Zero input is never
/// normalized.
pub fn move_direction(move_axis: Vec2, frame_yaw: f32) -> Vec3 {
    let axis = clamp_move_axis(move_axis);
    if axis.length_squared() <= MOVE_DEADZONE_SQUARED {
        return Vec3::ZERO;
    }

    let wish = yaw_forward(frame_yaw) * axis.y + yaw_right(frame_yaw) * axis.x;
    wish.normalize_or_zero()
}

/// Speed the intent asks for: sprint or walk speed, zero without input.
pub fn target_speed(intent: &Intent, config: &MovementConfig) -> f32 {
    if intent.has_movement() {
        config.max_speed(intent.sprint)
    } else {
        0.0
    }
}

/// Move `current` toward `target` by at most `max_delta`, never past it.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Limit the horizontal part of a velocity to `max_speed`, keeping vertical.
pub fn clamp_horizontal(velocity: Vec3, max_speed: f32) -> Vec3 {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    let speed = horizontal.length();
    if speed <= max_speed {
        return velocity;
    }

    let clamped = if speed > 0.0 {
        horizontal * (max_speed.max(0.0) / speed)
    } else {
        Vec3::ZERO
    };
    Vec3::new(clamped.x, velocity.y, clamped.z)
}

/// Project a vector onto the plane with the given unit normal.
#[inline]
pub fn project_on_plane(vector: Vec3, normal: Vec3) -> Vec3 {
    vector - normal * vector.dot(normal)
}

/// Lift a horizontal velocity onto a ground plane, keeping its horizontal
/// part. Idle bodies get a zero result so they never creep downhill.
pub fn surface_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    let horizontal = Vec3::new(velocity.x, 0.0, velocity.z);
    if normal.y <= 1e-3 {
        return horizontal;
    }
    let rise = -(normal.x * horizontal.x + normal.z * horizontal.z) / normal.y;
    Vec3::new(horizontal.x, rise, horizontal.z)
}

/// Resolve intent against the ground into a velocity change.
///
/// `classification` is `None` for an airborne body.
pub fn resolve(
    intent: &Intent,
    body: &BodyState,
    classification: Option<&SlopeClassification>,
    frame_yaw: f32,
    config: &MovementConfig,
    delta_time: f32,
) -> VelocityDelta {
    let direction = move_direction(intent.move_axis, frame_yaw);
    let target = if direction == Vec3::ZERO {
        0.0
    } else {
        target_speed(intent, config)
    };

    let base = VelocityDelta {
        regime: MovementRegime::Airborne,
        acceleration: Vec3::ZERO,
        velocity_override: None,
        slide_speed: 0.0,
        move_direction: direction,
        target_speed: target,
    };

    let air = VelocityDelta {
        acceleration: direction * target * config.air_control_factor + Vec3::NEG_Y * config.gravity,
        ..base
    };

    let Some(ground) = classification else {
        return air;
    };

    // Still inside the probe window on the way up from a jump
    if body.flags.jumping() && body.velocity.dot(ground.normal) > config.grounded_stick_speed {
        return air;
    }

    match ground.kind {
        SlopeKind::Flat | SlopeKind::WalkableSlope => {
            let normal = ground.normal;
            let (wish, stick_force) = match ground.kind {
                SlopeKind::Flat => (direction, config.flat_stick_force),
                _ => (
                    project_on_plane(direction, normal).normalize_or_zero(),
                    config.ground_snap_force,
                ),
            };

            VelocityDelta {
                regime: MovementRegime::Walking,
                acceleration: wish * target - normal * stick_force,
                ..base
            }
        }
        SlopeKind::TooSteep => {
            let normal = ground.normal;
            let stick = -normal * config.grounded_stick_speed;

            let Some(slide_dir) = ground.slide_direction else {
                // Unreadable ground: no new movement, just stay pressed down
                return VelocityDelta {
                    regime: MovementRegime::Sliding,
                    velocity_override: Some(stick),
                    ..base
                };
            };

            let current = if body.flags.sliding() {
                body.slide_speed
            } else {
                body.velocity.dot(slide_dir).max(0.0)
            };
            let slide_speed = move_towards(
                current,
                config.slide_base_speed,
                config.slide_acceleration * delta_time,
            );

            // Steering is sideways only, so input can never hold the body
            // against the slide.
            let across = project_on_plane(direction, normal);
            let across = across - slide_dir * across.dot(slide_dir);
            let steer = across * target * config.slide_steer_factor;

            VelocityDelta {
                regime: MovementRegime::Sliding,
                velocity_override: Some(slide_dir * slide_speed + steer + stick),
                slide_speed,
                ..base
            }
        }
    }
}

/// Grounded correction for the walking regime, applied after integration.
///
/// Velocity into the ground is replaced by a fixed stick speed (on flat
/// ground this makes vertical velocity exactly `-grounded_stick_speed`), then
/// horizontal speed is clamped to `max_speed`. Velocity leaving the ground is
/// left alone.
pub fn correct_grounded(
    velocity: Vec3,
    ground: &SlopeClassification,
    max_speed: f32,
    config: &MovementConfig,
) -> Vec3 {
    let normal = ground.normal;
    let into_ground = velocity.dot(normal);

    let floored = if into_ground <= 0.0 {
        velocity - normal * (into_ground + config.grounded_stick_speed)
    } else {
        velocity
    };

    clamp_horizontal(floored, max_speed)
}
