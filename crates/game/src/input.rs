//! Player input handling.
//!
//! This module converts raw per-frame input (keys, mouse) into the
//! [`Intent`] the movement core consumes.

use glam::Vec2;
use groundwork_physics::movement::Intent;
use serde::{Deserialize, Serialize};

/// Raw player input for a single frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this frame (pixels).
    pub mouse_delta: (f32, f32),

    /// Action buttons pressed.
    pub actions: ActionInput,

    /// Frame number this input was generated.
    pub frame: u32,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub sprint: bool,
}

/// Turns a held jump button into one request per press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpLatch {
    /// Previous frame's jump input (for edge detection).
    prev_jump_pressed: bool,
}

impl JumpLatch {
    /// Feed this frame's button state. Returns true on the press edge only.
    pub fn update(&mut self, jump_pressed: bool) -> bool {
        let edge = jump_pressed && !self.prev_jump_pressed;
        self.prev_jump_pressed = jump_pressed;
        edge
    }
}

impl PlayerInput {
    /// Build the movement intent for this frame.
    ///
    /// Diagonal key combinations are normalized so they are no faster than
    /// straight movement. The jump request comes from `latch`.
    pub fn to_intent(&self, latch: &mut JumpLatch) -> Intent {
        let mut axis = Vec2::ZERO;

        if self.movement.forward {
            axis.y += 1.0;
        }
        if self.movement.backward {
            axis.y -= 1.0;
        }
        if self.movement.right {
            axis.x += 1.0;
        }
        if self.movement.left {
            axis.x -= 1.0;
        }

        // Normalize diagonal movement
        let magnitude = axis.length();
        if magnitude > 1.0 {
            axis /= magnitude;
        }

        Intent {
            move_axis: axis,
            sprint: self.actions.sprint,
            jump_requested: latch.update(self.actions.jump),
        }
    }

    /// Camera yaw change for this frame (radians).
    ///
    /// Moving the mouse right turns right (increases yaw).
    pub fn yaw_delta(&self, mouse_sensitivity: f32) -> f32 {
        self.mouse_delta.0 * mouse_sensitivity * 0.001
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_to_intent() {
        let mut input = PlayerInput::default();
        input.movement.forward = true;
        input.movement.right = true;
        input.actions.jump = true;

        let intent = input.to_intent(&mut JumpLatch::default());

        // Should be normalized for diagonal movement
        assert!(intent.move_axis.x > 0.0 && intent.move_axis.x < 1.0);
        assert!(intent.move_axis.y > 0.0 && intent.move_axis.y < 1.0);
        assert!((intent.move_axis.length() - 1.0).abs() < 1e-6);
        assert!(intent.jump_requested);
    }

    #[test]
    fn test_straight_movement_not_normalized() {
        let mut input = PlayerInput::default();
        input.movement.forward = true;

        let intent = input.to_intent(&mut JumpLatch::default());

        assert_eq!(intent.move_axis, Vec2::new(0.0, 1.0));
        assert!(!intent.sprint);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = PlayerInput::default();
        input.movement.left = true;
        input.movement.right = true;

        let intent = input.to_intent(&mut JumpLatch::default());
        assert_eq!(intent.move_axis, Vec2::ZERO);
        assert!(!intent.has_movement());
        assert!(input.has_movement());
    }

    #[test]
    fn test_held_jump_requests_once() {
        let mut latch = JumpLatch::default();
        let mut input = PlayerInput::default();
        input.actions.jump = true;

        let requests = (0..10)
            .filter(|_| input.to_intent(&mut latch).jump_requested)
            .count();
        assert_eq!(requests, 1);

        input.actions.jump = false;
        assert!(!input.to_intent(&mut latch).jump_requested);
        input.actions.jump = true;
        assert!(input.to_intent(&mut latch).jump_requested);
    }

    #[test]
    fn test_yaw_delta() {
        let input = PlayerInput {
            mouse_delta: (100.0, 40.0),
            ..Default::default()
        };
        assert!((input.yaw_delta(2.0) - 0.2).abs() < 1e-6);
    }
}
