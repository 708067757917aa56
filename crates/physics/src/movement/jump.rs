//! Jump and airborne state.
//!
//! Jumps are edge-triggered: a request is consumed by the tick that sees it,
//! whether or not the body was grounded. A request made in the air is
//! dropped, never queued for landing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::state::{BodyState, MovementFlags};

/// Try to jump.
///
/// Clears `jump_requested` in every case. Returns the new velocity when the
/// jump fires: vertical velocity is zeroed, then `impulse` is added. The
/// impulse is instantaneous and does not depend on the tick length.
pub fn try_jump(velocity: Vec3, grounded: bool, jump_requested: &mut bool, impulse: f32) -> Option<Vec3> {
    let requested = std::mem::take(jump_requested);
    if !(requested && grounded) {
        return None;
    }

    Some(Vec3::new(velocity.x, 0.0, velocity.z) + Vec3::Y * impulse)
}

/// Change in ground contact between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundTransition {
    /// Contact unchanged.
    None,
    /// Airborne last tick, grounded now.
    Landed,
    /// Grounded last tick, airborne now.
    LeftGround,
}

impl GroundTransition {
    pub fn between(was_grounded: bool, grounded: bool) -> Self {
        match (was_grounded, grounded) {
            (false, true) => Self::Landed,
            (true, false) => Self::LeftGround,
            _ => Self::None,
        }
    }
}

/// Record this tick's ground contact on the body.
///
/// Sets `ON_GROUND`, stamps `grounded_since`/`airborne_since` on a
/// transition, and clears `JUMPING` once the body is back on the ground
/// and no longer rising.
pub fn update_ground_state(body: &mut BodyState, grounded: bool) -> GroundTransition {
    let transition = GroundTransition::between(body.grounded(), grounded);

    match transition {
        GroundTransition::Landed => {
            body.grounded_since = Some(body.clock);
            body.airborne_since = None;
        }
        GroundTransition::LeftGround => {
            body.airborne_since = Some(body.clock);
            body.grounded_since = None;
        }
        GroundTransition::None => {}
    }

    body.flags.set(MovementFlags::ON_GROUND, grounded);
    if grounded && body.velocity.y <= 0.0 {
        body.flags.set(MovementFlags::JUMPING, false);
    }

    transition
}

/// Check if a body counts as falling: airborne and moving down faster than
/// `threshold` (a negative vertical speed).
#[inline]
pub fn is_falling(grounded: bool, vertical_velocity: f32, threshold: f32) -> bool {
    !grounded && vertical_velocity < threshold
}
