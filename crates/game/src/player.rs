//! Player entity and state.

use glam::Vec3;
use groundwork_physics::movement::{wrap_angle, AnimationSignals, AnimationSink, BodyState, Intent};
use serde::{Deserialize, Serialize};

use crate::input::{JumpLatch, PlayerInput};

/// Unique identifier for entities.
pub type EntityId = u32;

/// Animator parameters driven by the movement signals.
///
/// Mirrors what an animation state machine reads: a speed float, two bools
/// and a jump trigger. Nothing in the simulation reads these back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatorParams {
    pub speed: f32,
    pub grounded: bool,
    pub free_fall: bool,

    /// Jump triggers fired so far.
    pub jump_triggers: u32,
}

impl AnimationSink for AnimatorParams {
    fn publish(&mut self, signals: &AnimationSignals) {
        self.speed = signals.speed;
        self.grounded = signals.grounded;
        self.free_fall = signals.falling;
        if signals.jumped {
            self.jump_triggers += 1;
        }
    }
}

/// A player in the game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Unique player ID.
    pub id: EntityId,

    /// Player name/handle.
    pub name: String,

    /// Movement physics state.
    pub body: BodyState,

    /// Camera yaw the move input is relative to (radians).
    pub camera_yaw: f32,

    /// Intent for the next physics tick.
    pub pending: Intent,

    /// Jump press edge detection.
    pub jump_latch: JumpLatch,

    pub animator: AnimatorParams,
}

impl Player {
    /// Create a new player at the given position.
    pub fn new(id: EntityId, name: String, spawn_position: Vec3, facing: f32) -> Self {
        let mut body = BodyState::new(spawn_position);
        body.yaw = facing;

        Self {
            id,
            name,
            body,
            camera_yaw: facing,
            pending: Intent::default(),
            jump_latch: JumpLatch::default(),
            animator: AnimatorParams::default(),
        }
    }

    /// Get the player's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// Check if the player is on the ground.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.body.grounded()
    }

    /// Latch one frame of raw input.
    ///
    /// Turns the camera and replaces the pending intent. A jump press stays
    /// pending until a physics tick consumes it, even if several frames pass
    /// first.
    pub fn apply_input(&mut self, input: &PlayerInput, mouse_sensitivity: f32) {
        self.camera_yaw = wrap_angle(self.camera_yaw + input.yaw_delta(mouse_sensitivity));

        let intent = input.to_intent(&mut self.jump_latch);
        let jump_pending = self.pending.jump_requested;
        self.pending = intent;
        self.pending.jump_requested |= jump_pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let player = Player::new(1, "Test".to_string(), Vec3::new(0.0, 1.0, 0.0), 0.5);
        assert_eq!(player.position(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(player.camera_yaw, 0.5);
        assert!(!player.on_ground());
    }

    #[test]
    fn test_animator_params() {
        let mut params = AnimatorParams::default();
        params.publish(&AnimationSignals {
            speed: 4.0,
            grounded: false,
            falling: true,
            jumped: false,
        });
        assert_eq!(params.speed, 4.0);
        assert!(params.free_fall);
        assert_eq!(params.jump_triggers, 0);

        params.publish(&AnimationSignals {
            jumped: true,
            grounded: true,
            ..Default::default()
        });
        assert_eq!(params.jump_triggers, 1);
        assert!(!params.free_fall);
    }

    #[test]
    fn test_jump_survives_frames_without_tick() {
        let mut player = Player::new(1, "Test".to_string(), Vec3::ZERO, 0.0);
        let mut input = PlayerInput::default();

        input.actions.jump = true;
        player.apply_input(&input, 1.0);
        input.actions.jump = false;
        player.apply_input(&input, 1.0);

        assert!(player.pending.jump_requested);
    }

    #[test]
    fn test_apply_input_turns_camera() {
        let mut player = Player::new(1, "Test".to_string(), Vec3::ZERO, 0.0);
        let input = PlayerInput {
            mouse_delta: (500.0, 0.0),
            ..Default::default()
        };

        player.apply_input(&input, 2.0);
        assert!((player.camera_yaw - 1.0).abs() < 1e-6);
    }
}
