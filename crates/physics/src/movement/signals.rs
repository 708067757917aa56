//! Derived state published for animation and gameplay.

use serde::{Deserialize, Serialize};

/// What a tick publishes. Write-only from the core's side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationSignals {
    /// Horizontal speed (meters/second, never negative).
    pub speed: f32,
    pub grounded: bool,
    /// Airborne and dropping faster than the falling threshold.
    pub falling: bool,
    /// A jump fired this tick.
    pub jumped: bool,
}

/// Receiver for published signals.
pub trait AnimationSink {
    fn publish(&mut self, signals: &AnimationSignals);
}

impl AnimationSink for () {
    #[inline]
    fn publish(&mut self, _signals: &AnimationSignals) {}
}

impl AnimationSink for Vec<AnimationSignals> {
    fn publish(&mut self, signals: &AnimationSignals) {
        self.push(*signals);
    }
}
