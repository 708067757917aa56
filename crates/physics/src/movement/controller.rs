//! Movement controller.
//!
//! This is the per-tick entry point for body movement. It runs the ground
//! probe, slope classifier, velocity resolver and jump check in a fixed
//! order, moves the body through the collision world and publishes the
//! derived signals.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::collision::{CollisionWorld, ContentFlags};

use super::config::MovementConfig;
use super::jump::{is_falling, try_jump, update_ground_state, GroundTransition};
use super::probe::{GroundProbe, GroundSample};
use super::resolver::{
    clamp_horizontal, correct_grounded, project_on_plane, resolve, surface_velocity, MovementRegime,
};
use super::signals::{AnimationSignals, AnimationSink};
use super::slide_move::{slide_move, snap_to_ground};
use super::slope::{SlopeClassification, SlopeClassifier, ThresholdClassifier};
use super::state::{yaw_of, BodyState, Intent, MovementFlags};

/// Everything one tick worked out, for callers that want more than the
/// published signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Ground probe result at the start of the tick.
    pub sample: GroundSample,

    /// Ground classification, `None` when airborne.
    pub slope: Option<SlopeClassification>,

    pub regime: MovementRegime,

    /// Grounded/airborne change this tick.
    pub transition: GroundTransition,

    pub jumped: bool,

    /// What was published to the sink.
    pub signals: AnimationSignals,
}

/// Body movement controller.
///
/// Built once with its collaborators and shared by every body that uses the
/// same tuning. Holds no per-body state.
///
/// # Example
///
/// ```ignore
/// let controller = MovementController::new(MovementConfig::default());
/// let mut body = BodyState::default();
/// controller.spawn_at(&mut body, spawn_position, &world);
///
/// // Each tick:
/// controller.tick(&mut body, &mut intent, camera_yaw, Some(&world), delta_time, &mut ());
/// ```
#[derive(Debug, Clone)]
pub struct MovementController<C = ThresholdClassifier> {
    /// Movement configuration.
    pub config: MovementConfig,
    pub probe: GroundProbe,
    pub classifier: C,
}

impl MovementController {
    /// Create a controller with the probe and classifier the config
    /// describes.
    pub fn new(config: MovementConfig) -> Self {
        let probe = GroundProbe::from_config(&config);
        let classifier = ThresholdClassifier {
            flat_angle: config.flat_angle_threshold,
        };
        Self::with_parts(config, probe, classifier)
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(MovementConfig::default())
    }
}

impl<C: SlopeClassifier> MovementController<C> {
    /// Create a controller from explicit collaborators.
    pub fn with_parts(config: MovementConfig, probe: GroundProbe, classifier: C) -> Self {
        Self {
            config,
            probe,
            classifier,
        }
    }

    /// Place a body on the ground below a spawn point.
    ///
    /// Traces the body shape down from just above `spawn_pos` and rests it on
    /// whatever it finds. Without ground the body stays at `spawn_pos`,
    /// airborne.
    pub fn spawn_at(&self, body: &mut BodyState, spawn_pos: Vec3, world: &CollisionWorld) {
        let trace_start = spawn_pos + Vec3::Y;
        let trace_end = spawn_pos - Vec3::Y * 2.0;

        let trace = world.trace(
            trace_start,
            trace_end,
            self.config.body_shape(),
            ContentFlags::MASK_BODY_SOLID,
        );

        body.velocity = Vec3::ZERO;
        body.yaw_velocity = 0.0;
        body.slide_speed = 0.0;
        body.flags = MovementFlags::default();

        if trace.hit_something() && !trace.all_solid {
            body.position = trace.end_position;
            body.flags.set(MovementFlags::ON_GROUND, true);
            body.grounded_since = Some(body.clock);
            body.airborne_since = None;
        } else {
            body.position = spawn_pos;
            body.grounded_since = None;
            body.airborne_since = Some(body.clock);
        }

        log::debug!(
            "spawned at {:?} (grounded: {})",
            body.position,
            body.grounded()
        );
    }

    /// Advance one body by one tick.
    ///
    /// Order: probe, classify, resolve, integrate, jump, grounded correction,
    /// displacement, orientation, ground state, publish. `intent.jump_requested`
    /// is always cleared. A `None` world means no collision geometry: every
    /// probe misses and the body moves freely.
    pub fn tick(
        &self,
        body: &mut BodyState,
        intent: &mut Intent,
        camera_yaw: f32,
        world: Option<&CollisionWorld>,
        delta_time: f32,
        sink: &mut impl AnimationSink,
    ) -> TickReport {
        // Clamp delta time to prevent physics explosions
        let delta_time = if delta_time.is_finite() {
            delta_time.clamp(0.0, self.config.max_delta_time)
        } else {
            0.0
        };
        body.clock += f64::from(delta_time);

        let sample = self.probe.sample(world, body.position);
        let grounded = sample.hit();
        let slope = self
            .classifier
            .classify(&sample, self.config.max_walkable_slope_angle);

        let delta = resolve(intent, body, slope.as_ref(), camera_yaw, &self.config, delta_time);
        let mut velocity = delta.apply(body.velocity, delta_time);

        let jumped = match try_jump(velocity, grounded, &mut intent.jump_requested, self.config.jump_impulse) {
            Some(launched) => {
                velocity = launched;
                true
            }
            None => false,
        };

        if delta.regime == MovementRegime::Walking {
            match slope.as_ref() {
                // The launch keeps its vertical speed, only the horizontal clamp applies
                _ if jumped => velocity = clamp_horizontal(velocity, delta.target_speed),
                Some(ground) => {
                    velocity = correct_grounded(velocity, ground, delta.target_speed, &self.config);
                }
                None => {}
            }
        }

        body.velocity = velocity;
        body.slide_speed = delta.slide_speed;
        body.flags.set(MovementFlags::SLIDING, !jumped && delta.regime == MovementRegime::Sliding);
        body.flags.set(MovementFlags::SPRINTING, intent.sprint && intent.has_movement());
        if jumped {
            body.flags.set(MovementFlags::JUMPING, true);
            log::debug!("jump at {:?}, vy {}", body.position, body.velocity.y);
        }

        let surface = if jumped { None } else { slope.as_ref() };
        self.displace(body, world, delta.regime, surface, delta_time);

        if delta.move_direction != Vec3::ZERO {
            self.turn_toward(body, yaw_of(delta.move_direction), delta_time);
        }

        let transition = update_ground_state(body, grounded);
        match transition {
            GroundTransition::Landed => log::debug!("landed at {:?}", body.position),
            GroundTransition::LeftGround => log::debug!("left ground at {:?}", body.position),
            GroundTransition::None => {}
        }

        let falling = is_falling(grounded, body.velocity.y, self.config.falling_velocity_threshold);
        body.flags.set(MovementFlags::FALLING, falling);

        let signals = AnimationSignals {
            speed: body.horizontal_speed(),
            grounded,
            falling,
            jumped,
        };
        sink.publish(&signals);

        log::trace!(
            "tick: regime={:?} angle={:?} pos={:?} vel={:?}",
            delta.regime,
            sample.slope_angle(),
            body.position,
            body.velocity
        );

        TickReport {
            sample,
            slope,
            regime: delta.regime,
            transition,
            jumped,
            signals,
        }
    }

    // ========================================================================
    // Displacement
    // ========================================================================

    /// Move the body by its velocity for one tick.
    ///
    /// Grounded regimes move along the ground plane and then snap down;
    /// everything else slides freely and keeps the clipped velocity.
    fn displace(
        &self,
        body: &mut BodyState,
        world: Option<&CollisionWorld>,
        regime: MovementRegime,
        surface: Option<&SlopeClassification>,
        delta_time: f32,
    ) {
        let Some(world) = world else {
            body.position += body.velocity * delta_time;
            return;
        };

        let shape = self.config.body_shape();
        let mask = ContentFlags::MASK_BODY_SOLID;

        let step = match (regime, surface) {
            (MovementRegime::Walking, Some(ground)) => Some(surface_velocity(body.velocity, ground.normal)),
            (MovementRegime::Sliding, Some(ground)) => Some(project_on_plane(body.velocity, ground.normal)),
            _ => None,
        };

        match step {
            Some(mut step) => {
                slide_move(world, &mut body.position, &mut step, shape, mask, delta_time, &self.config);
                if regime == MovementRegime::Walking {
                    // Walls cut horizontal velocity; vertical stays the stick speed
                    body.velocity.x = step.x;
                    body.velocity.z = step.z;
                }
                snap_to_ground(world, &mut body.position, shape, mask, self.config.ground_probe_distance);
            }
            None => {
                let mut velocity = body.velocity;
                slide_move(world, &mut body.position, &mut velocity, shape, mask, delta_time, &self.config);
                body.velocity = velocity;
            }
        }
    }

    // ========================================================================
    // Orientation
    // ========================================================================

    fn turn_toward(&self, body: &mut BodyState, target_yaw: f32, delta_time: f32) {
        body.yaw = wrap_angle(smooth_damp_angle(
            body.yaw,
            target_yaw,
            &mut body.yaw_velocity,
            self.config.turn_smooth_time,
            delta_time,
        ));
    }
}

/// Wrap an angle to [-PI, PI).
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Critically damped approach of `current` toward `target` along the
/// shortest way around the circle.
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, delta_time: f32) -> f32 {
    let target = current + wrap_angle(target - current);

    if smooth_time <= 0.0 {
        *velocity = 0.0;
        return target;
    }
    if delta_time <= 0.0 {
        return current;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * delta_time;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * delta_time;
    *velocity = (*velocity - omega * temp) * decay;
    let output = target + (change + temp) * decay;

    // Never overshoot
    if (target > current) == (output > target) {
        *velocity = 0.0;
        return target;
    }
    output
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::slope::SlopeKind;
    use glam::{Quat, Vec2};

    const DT: f32 = 1.0 / 60.0;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor at y=0
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(100.0, 0.5, 100.0),
            ContentFlags::SOLID,
        );

        world
    }

    /// Ramp whose surface descends toward -X.
    fn create_ramp_world(degrees: f32) -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_oriented_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(40.0, 0.5, 20.0),
            Quat::from_rotation_z(degrees.to_radians()),
            ContentFlags::SOLID,
        );
        world
    }

    fn forward() -> Intent {
        Intent::new(Vec2::new(0.0, 1.0), false)
    }

    fn spawned(controller: &MovementController, world: &CollisionWorld, at: Vec3) -> BodyState {
        let mut body = BodyState::default();
        controller.spawn_at(&mut body, at, world);
        assert!(body.grounded(), "spawn point should be above ground");
        body
    }

    #[test]
    fn test_gravity() {
        let controller = MovementController::with_default_config();
        let mut body = BodyState::new(Vec3::new(0.0, 10.0, 0.0));

        let report = controller.tick(&mut body, &mut Intent::default(), 0.0, None, DT, &mut ());

        assert_eq!(report.regime, MovementRegime::Airborne);
        assert!(!report.signals.grounded);
        assert!((body.velocity.y + 9.81 * DT).abs() < 1e-4);
        assert!(body.position.y < 10.0);
    }

    #[test]
    fn test_delta_time_is_clamped() {
        let controller = MovementController::with_default_config();
        let mut body = BodyState::new(Vec3::new(0.0, 10.0, 0.0));

        controller.tick(&mut body, &mut Intent::default(), 0.0, None, 1.0, &mut ());

        assert!((body.velocity.y + 9.81 * 0.066).abs() < 1e-4);
        assert!((body.clock - 0.066).abs() < 1e-6);
    }

    #[test]
    fn test_falls_and_lands() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = BodyState::new(Vec3::new(0.0, 3.0, 0.0));

        let mut landed = false;
        for _ in 0..120 {
            let report = controller.tick(&mut body, &mut Intent::default(), 0.0, Some(&world), DT, &mut ());
            landed |= report.transition == GroundTransition::Landed;
        }

        assert!(landed);
        assert!(body.grounded());
        assert!((body.position.y - 0.9).abs() < 0.01, "resting height {}", body.position.y);
        assert!((body.velocity.y + 2.0).abs() < 1e-4, "grounded vertical floor");
        assert!(body.grounded_since.is_some());
        assert_eq!(body.airborne_since, None);
    }

    #[test]
    fn test_flat_steady_state_speed() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(body.horizontal_speed(), 0.0);

        for tick in 1..=120 {
            let report = controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut ());
            assert!(report.signals.grounded);
            assert_eq!(report.regime, MovementRegime::Walking);
            if tick == 30 {
                // Acceleration equals the walk speed, so half speed after half a second
                assert!((report.signals.speed - 5.0).abs() < 0.01, "speed {}", report.signals.speed);
            }
        }

        assert!((body.horizontal_speed() - 10.0).abs() < 1e-3);
        assert!(body.velocity.x > 9.99, "camera yaw 0 forward is +X");
        assert!((body.position.y - 0.9).abs() < 0.01);
    }

    #[test]
    fn test_sprint_steady_state_speed() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));

        let mut sprint = Intent::new(Vec2::new(0.0, 1.0), true);
        for _ in 0..150 {
            controller.tick(&mut body, &mut sprint, 0.0, Some(&world), DT, &mut ());
        }

        assert!((body.horizontal_speed() - 15.0).abs() < 1e-3);
        assert!(body.flags.sprinting());
    }

    #[test]
    fn test_stops_without_input() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));

        for _ in 0..30 {
            controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut ());
        }
        controller.tick(&mut body, &mut Intent::default(), 0.0, Some(&world), DT, &mut ());

        assert_eq!(body.horizontal_speed(), 0.0);
    }

    #[test]
    fn test_jump() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));
        controller.tick(&mut body, &mut Intent::default(), 0.0, Some(&world), DT, &mut ());

        let mut intent = Intent::default().with_jump();
        let report = controller.tick(&mut body, &mut intent, 0.0, Some(&world), DT, &mut ());

        assert!(report.jumped);
        assert!(report.signals.jumped);
        assert!(!intent.jump_requested, "request consumed");
        assert_eq!(body.velocity.y, 12.0);
        assert!(body.flags.jumping());

        // Rises out of the probe window and comes back down
        let mut peak = body.position.y;
        let mut landed = false;
        for _ in 0..240 {
            let report = controller.tick(&mut body, &mut Intent::default(), 0.0, Some(&world), DT, &mut ());
            peak = peak.max(body.position.y);
            landed |= report.transition == GroundTransition::Landed;
        }
        assert!(peak > 0.9 + 6.0, "apex near v²/2g, got {peak}");
        assert!(landed);
        assert!(!body.flags.jumping());
    }

    #[test]
    fn test_jump_request_dropped_in_air() {
        let controller = MovementController::with_default_config();
        let mut body = BodyState::new(Vec3::new(0.0, 10.0, 0.0));

        let mut intent = Intent::default().with_jump();
        let report = controller.tick(&mut body, &mut intent, 0.0, None, DT, &mut ());

        assert!(!report.jumped);
        assert!(!intent.jump_requested, "request consumed even when airborne");
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn test_probe_miss_goes_airborne_same_tick() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));
        controller.tick(&mut body, &mut Intent::default(), 0.0, Some(&world), DT, &mut ());

        // Geometry gone: the very next probe misses
        let report = controller.tick(&mut body, &mut Intent::default(), 0.0, None, DT, &mut ());
        assert!(!report.signals.grounded);
        assert!(!body.grounded());
        assert_eq!(report.transition, GroundTransition::LeftGround);
        assert_eq!(body.airborne_since, Some(body.clock));

        for _ in 0..30 {
            let report = controller.tick(&mut body, &mut Intent::default(), 0.0, None, DT, &mut ());
            assert_eq!(report.signals.falling, body.velocity.y < -2.0);
        }
        assert!(body.flags.falling());
    }

    #[test]
    fn test_walks_off_ledge() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(2.0, 0.5, 20.0),
            ContentFlags::SOLID,
        );
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));

        let mut left_ground = false;
        let mut fell = false;
        for _ in 0..180 {
            let report = controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut ());
            left_ground |= report.transition == GroundTransition::LeftGround;
            fell |= report.signals.falling;
        }

        assert!(left_ground);
        assert!(fell);
        assert!(body.position.y < 0.0);
    }

    #[test]
    fn test_idle_on_walkable_ramp_does_not_creep() {
        let world = create_ramp_world(30.0);
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 2.0, 0.0));
        let start = body.position;

        for _ in 0..120 {
            let report = controller.tick(&mut body, &mut Intent::default(), 0.0, Some(&world), DT, &mut ());
            assert!(report.signals.grounded);
            assert_eq!(report.slope.map(|s| s.kind), Some(SlopeKind::WalkableSlope));
        }

        let drift = body.position - start;
        assert!(Vec3::new(drift.x, 0.0, drift.z).length() < 0.01, "drifted {drift:?}");
        assert!(drift.y.abs() < 0.01);
    }

    #[test]
    fn test_walks_up_walkable_ramp() {
        let world = create_ramp_world(30.0);
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 2.0, 0.0));
        let start = body.position;

        // Uphill is +X, which is forward at camera yaw 0
        for _ in 0..60 {
            let report = controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut ());
            assert!(report.signals.grounded);
        }

        assert!(body.position.x > start.x + 3.0);
        assert!(body.position.y > start.y + 1.5, "climbed");
        assert!(body.horizontal_speed() <= 10.0 + 1e-3);
    }

    #[test]
    fn test_walkable_ramp_steady_state_speed() {
        let world = create_ramp_world(30.0);
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(body.horizontal_speed(), 0.0);

        let mut report = None;
        for _ in 0..120 {
            let tick = controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut ());
            assert!(tick.signals.grounded);
            assert_eq!(tick.regime, MovementRegime::Walking);
            assert!(tick.signals.speed <= 10.0 + 1e-4);
            report = Some(tick);
        }

        let report = report.expect("ticked");
        assert!((report.signals.speed - 10.0).abs() < 0.05, "speed {}", report.signals.speed);
        assert!(body.velocity.x > 9.9, "uphill is +X");
    }

    #[test]
    fn test_jump_tick_keeps_speed_clamped() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));

        // Already at walk speed, so this tick's acceleration would overshoot
        body.velocity = Vec3::new(10.0, -2.0, 0.0);
        let mut intent = forward().with_jump();
        let report = controller.tick(&mut body, &mut intent, 0.0, Some(&world), DT, &mut ());

        assert!(report.jumped);
        assert_eq!(report.regime, MovementRegime::Walking);
        assert!(report.signals.speed <= 10.0 + 1e-4, "speed {}", report.signals.speed);
        assert!((body.velocity.x - 10.0).abs() < 1e-4);
        assert_eq!(body.velocity.y, 12.0, "launch speed untouched by the clamp");
    }

    #[test]
    fn test_steep_ramp_slides_down() {
        let world = create_ramp_world(50.0);
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 2.0, 0.0));
        let start = body.position;

        // Pushing uphill does not hold the body in place
        for _ in 0..60 {
            let report = controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut ());
            assert!(report.signals.grounded);
            assert_eq!(report.regime, MovementRegime::Sliding);
            let slope = report.slope.expect("grounded");
            assert_eq!(slope.kind, SlopeKind::TooSteep);
            assert!(slope.slide_direction.is_some());
        }

        assert!(body.flags.sliding());
        assert!(body.position.x < start.x - 0.3, "slid downhill");
        assert!(body.position.y < start.y);
        assert!((body.slide_speed - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_sink_receives_each_tick() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));
        let mut published: Vec<AnimationSignals> = Vec::new();

        for _ in 0..10 {
            controller.tick(&mut body, &mut forward(), 0.0, Some(&world), DT, &mut published);
        }
        controller.tick(&mut body, &mut Intent::default().with_jump(), 0.0, Some(&world), DT, &mut published);

        assert_eq!(published.len(), 11);
        assert!(published.iter().all(|s| s.speed >= 0.0));
        assert!(published[..10].iter().all(|s| s.grounded && !s.falling && !s.jumped));
        assert!(published[10].jumped);
    }

    #[test]
    fn test_turns_toward_move_direction() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();
        let mut body = spawned(&controller, &world, Vec3::new(0.0, 1.0, 0.0));

        // Strafe right at camera yaw 0 moves along +Z
        let mut intent = Intent::new(Vec2::new(1.0, 0.0), false);
        for _ in 0..60 {
            controller.tick(&mut body, &mut intent, 0.0, Some(&world), DT, &mut ());
        }

        assert!((body.yaw - PI / 2.0).abs() < 0.01, "yaw {}", body.yaw);
        assert!(body.forward_direction().z > 0.99);
    }

    #[test]
    fn test_smooth_damp_angle_takes_short_way() {
        let mut velocity = 0.0;
        let next = smooth_damp_angle(3.0, -3.0, &mut velocity, 0.05, DT);
        assert!(next > 3.0, "wraps through PI instead of sweeping back");
        assert!(velocity > 0.0);

        let mut velocity = 0.0;
        let mut yaw = 0.0;
        for _ in 0..120 {
            yaw = smooth_damp_angle(yaw, 1.0, &mut velocity, 0.05, DT);
            assert!(yaw <= 1.0 + 1e-6);
        }
        assert!((yaw - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawn_at_finds_ground() {
        let world = create_test_world();
        let controller = MovementController::with_default_config();

        let mut body = BodyState::default();
        controller.spawn_at(&mut body, Vec3::new(0.0, 1.5, 0.0), &world);

        assert!(body.grounded(), "Should be on ground after spawn");
        assert!((body.position.y - 0.9).abs() < 0.01, "got y={}", body.position.y);
        assert_eq!(body.airborne_since, None);
    }

    #[test]
    fn test_spawn_at_no_ground() {
        let world = CollisionWorld::new();
        let controller = MovementController::with_default_config();

        let mut body = BodyState::default();
        let spawn_pos = Vec3::new(0.0, 10.0, 0.0);
        controller.spawn_at(&mut body, spawn_pos, &world);

        assert_eq!(body.position, spawn_pos, "Should use spawn position when no ground");
        assert!(!body.grounded(), "Should not be on ground");
    }
}
