//! Body state and intent structures.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Squared move-axis length below which intent counts as "no input".
pub const MOVE_DEADZONE_SQUARED: f32 = 1e-6;

/// Flags describing the body's current movement state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementFlags(pub u16);

impl MovementFlags {
    /// Probe reported ground contact this tick.
    pub const ON_GROUND: u16 = 1 << 0;

    /// Grounded on too-steep ground and sliding.
    pub const SLIDING: u16 = 1 << 1;

    /// Left the ground through a jump and has not landed yet.
    pub const JUMPING: u16 = 1 << 2;

    /// Airborne and moving down faster than the falling threshold.
    pub const FALLING: u16 = 1 << 3;

    /// Sprint was requested with movement input this tick.
    pub const SPRINTING: u16 = 1 << 4;

    /// Check if a flag is set.
    #[inline]
    pub fn has(self, flag: u16) -> bool {
        (self.0 & flag) != 0
    }

    /// Set or clear a flag.
    #[inline]
    pub fn set(&mut self, flag: u16, value: bool) {
        if value {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    /// Check if the body is on the ground.
    #[inline]
    pub fn on_ground(self) -> bool {
        self.has(Self::ON_GROUND)
    }

    /// Check if the body is sliding.
    #[inline]
    pub fn sliding(self) -> bool {
        self.has(Self::SLIDING)
    }

    /// Check if the body is in a jump.
    #[inline]
    pub fn jumping(self) -> bool {
        self.has(Self::JUMPING)
    }

    /// Check if the body is falling.
    #[inline]
    pub fn falling(self) -> bool {
        self.has(Self::FALLING)
    }

    /// Check if the body is sprinting.
    #[inline]
    pub fn sprinting(self) -> bool {
        self.has(Self::SPRINTING)
    }
}

/// Complete movement state for one body.
///
/// Owned by the host, mutated only by
/// [`MovementController::tick`](super::MovementController::tick).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyState {
    /// Body origin in world space (middle of the capsule).
    pub position: Vec3,

    /// Velocity in world space (meters/second).
    pub velocity: Vec3,

    /// Facing angle around the up axis (radians).
    pub yaw: f32,

    /// Angular velocity of the yaw smoothing (radians/second).
    pub yaw_velocity: f32,

    /// Movement state flags.
    pub flags: MovementFlags,

    /// Current slide speed along the slope. Zero unless sliding.
    pub slide_speed: f32,

    /// Accumulated simulation time of this body (seconds).
    pub clock: f64,

    /// When the body last touched down.
    pub grounded_since: Option<f64>,

    /// When the body last left the ground.
    pub airborne_since: Option<f64>,
}

impl Default for BodyState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            yaw_velocity: 0.0,
            flags: MovementFlags::default(),
            slide_speed: 0.0,
            clock: 0.0,
            grounded_since: None,
            // Bodies start airborne until a probe says otherwise
            airborne_since: Some(0.0),
        }
    }
}

impl BodyState {
    /// Create a new body at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Check if the body is on the ground.
    #[inline]
    pub fn grounded(&self) -> bool {
        self.flags.on_ground()
    }

    /// Velocity with the vertical component removed.
    #[inline]
    pub fn horizontal_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        self.horizontal_velocity().length()
    }

    /// Direction the body faces (horizontal only).
    pub fn forward_direction(&self) -> Vec3 {
        yaw_forward(self.yaw)
    }
}

/// Horizontal forward vector for a yaw angle.
#[inline]
pub fn yaw_forward(yaw: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(cos_yaw, 0.0, sin_yaw)
}

/// Horizontal right vector for a yaw angle.
#[inline]
pub fn yaw_right(yaw: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    Vec3::new(-sin_yaw, 0.0, cos_yaw)
}

/// Yaw angle that faces along a horizontal direction.
#[inline]
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.z.atan2(direction.x)
}

/// What the body's driver wants this tick.
///
/// Produced outside the core every tick. The only field the core touches is
/// `jump_requested`, which it consumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Strafe (x) and forward (y) input, each in [-1, 1]. Not necessarily
    /// normalized.
    pub move_axis: Vec2,

    /// Sprint held.
    pub sprint: bool,

    /// Edge-triggered jump request. Cleared by the tick that sees it.
    pub jump_requested: bool,
}

impl Intent {
    /// Intent with a move axis and sprint state, no jump.
    pub fn new(move_axis: Vec2, sprint: bool) -> Self {
        Self {
            move_axis,
            sprint,
            jump_requested: false,
        }
    }

    /// Same intent with a jump requested.
    pub fn with_jump(mut self) -> Self {
        self.jump_requested = true;
        self
    }

    /// Intent that moves along a world-space direction, expressed in the
    /// reference frame of `frame_yaw`.
    pub fn toward(direction: Vec3, frame_yaw: f32, sprint: bool) -> Self {
        let flat = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
        let axis = Vec2::new(flat.dot(yaw_right(frame_yaw)), flat.dot(yaw_forward(frame_yaw)));
        Self::new(axis, sprint)
    }

    /// Move axis with each component clamped to [-1, 1]. A non-finite axis
    /// reads as no input.
    #[inline]
    pub fn clamped_axis(&self) -> Vec2 {
        clamp_move_axis(self.move_axis)
    }

    /// Check if any movement input is active.
    #[inline]
    pub fn has_movement(&self) -> bool {
        self.clamped_axis().length_squared() > MOVE_DEADZONE_SQUARED
    }
}

/// Clamp a raw move axis to [-1, 1] per component.
///
/// NaN and infinite axes become zero. The finite check runs first because
/// clamping would turn them into full input.
pub fn clamp_move_axis(move_axis: Vec2) -> Vec2 {
    if !move_axis.is_finite() {
        return Vec2::ZERO;
    }
    move_axis.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}
