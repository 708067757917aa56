//! Collide-and-slide displacement.
//!
//! Moves the body capsule along a velocity, clipping against every surface it
//! touches so it slides along walls and around corners instead of stopping.

use glam::Vec3;

use crate::collision::{CollisionWorld, ContentFlags, TraceShape};

use super::config::MovementConfig;

/// Upper bound on tracked clip planes, whatever the config asks for.
const MAX_CLIP_PLANES: usize = 8;

/// Clip velocity against a surface normal.
///
/// This removes the component of velocity going into the surface and
/// optionally adds a small "overbounce" to prevent sticking.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Slide a shape through the world.
///
/// Traces along `velocity`; on impact, clips the velocity against every
/// plane touched so far and continues with the time left. `velocity` comes
/// back clipped.
///
/// Returns whether the full movement succeeded without any collisions.
pub fn slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    shape: TraceShape,
    mask: ContentFlags,
    delta_time: f32,
    config: &MovementConfig,
) -> bool {
    let mut time_remaining = delta_time;
    let original_velocity = *velocity;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    for _ in 0..config.max_clip_planes.min(MAX_CLIP_PLANES) {
        if velocity.length_squared() < 0.0001 {
            break;
        }

        let target = *position + *velocity * time_remaining;
        let trace = world.trace(*position, target, shape, mask);

        if trace.fraction >= 1.0 {
            *position = trace.end_position;
            return num_planes == 0;
        }

        if !trace.all_solid {
            *position = trace.end_position;
        }
        time_remaining *= 1.0 - trace.fraction;

        let Some(normal) = trace.hit_normal else {
            continue;
        };

        if trace.all_solid {
            *velocity = Vec3::ZERO;
            return false;
        }

        if num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        // Find a clip that works for every plane touched so far
        let mut clipped = *velocity;
        let mut found_valid = false;

        for i in 0..num_planes {
            clipped = clip_velocity(clipped, planes[i], config.overbounce);

            let valid = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| clipped.dot(planes[j]) >= -0.01);

            if valid {
                *velocity = clipped;
                found_valid = true;
                break;
            }
        }

        if found_valid {
            continue;
        }

        if num_planes < 2 {
            *velocity = Vec3::ZERO;
            return false;
        }

        // Crease between two planes
        let crease = planes[0].cross(planes[1]).normalize_or_zero();
        *velocity = crease * original_velocity.dot(crease);

        if velocity.dot(planes[0]) < -0.01 || velocity.dot(planes[1]) < -0.01 {
            *velocity = Vec3::ZERO;
            return false;
        }
    }

    false
}

/// Sweep the shape down by up to `distance` and rest it on whatever it
/// meets. Leaves the position alone when nothing is in reach.
///
/// Returns whether ground was found.
pub fn snap_to_ground(
    world: &CollisionWorld,
    position: &mut Vec3,
    shape: TraceShape,
    mask: ContentFlags,
    distance: f32,
) -> bool {
    let trace = world.trace(*position, *position - Vec3::Y * distance, shape, mask);
    if !trace.hit_something() || trace.all_solid {
        return false;
    }

    *position = trace.end_position;
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape() -> TraceShape {
        TraceShape::BODY_STANDING
    }

    fn floor_and_wall() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            ContentFlags::SOLID,
        );
        // Wall facing -X at x = 3
        world.add_box(
            Vec3::new(3.5, 2.0, 0.0),
            Vec3::new(0.5, 2.0, 20.0),
            ContentFlags::SOLID,
        );
        world
    }

    #[test]
    fn test_clip_velocity_removes_into_surface() {
        let clipped = clip_velocity(Vec3::new(5.0, -3.0, 0.0), Vec3::Y, 1.0);
        assert!((clipped - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-6);

        let clipped = clip_velocity(Vec3::new(0.0, -3.0, 0.0), Vec3::Y, 1.001);
        assert!(clipped.y > 0.0, "overbounce pushes slightly off the plane");
    }

    #[test]
    fn test_free_move() {
        let world = floor_and_wall();
        let config = MovementConfig::default();
        let mut position = Vec3::new(0.0, 1.0, 0.0);
        let mut velocity = Vec3::new(0.0, 0.0, 6.0);

        let clean = slide_move(&world, &mut position, &mut velocity, shape(), ContentFlags::MASK_BODY_SOLID, 0.5, &config);

        assert!(clean);
        assert!((position.z - 3.0).abs() < 1e-4);
        assert_eq!(velocity, Vec3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_resting_body_moves_along_floor() {
        let world = floor_and_wall();
        let config = MovementConfig::default();
        let mut position = Vec3::new(0.0, 0.9, 0.0);
        let mut velocity = Vec3::new(0.0, 0.0, 10.0);

        let clean = slide_move(&world, &mut position, &mut velocity, shape(), ContentFlags::MASK_BODY_SOLID, 1.0 / 60.0, &config);

        assert!(clean);
        assert!((position.z - 10.0 / 60.0).abs() < 1e-4);
        assert_eq!(velocity, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_slides_along_wall() {
        let world = floor_and_wall();
        let config = MovementConfig::default();
        let mut position = Vec3::new(1.5, 1.0, 0.0);
        let mut velocity = Vec3::new(4.0, 0.0, 4.0);

        let clean = slide_move(&world, &mut position, &mut velocity, shape(), ContentFlags::MASK_BODY_SOLID, 0.5, &config);

        assert!(!clean);
        assert!(position.x < 3.0 - 0.39, "stays out of the wall");
        assert!(position.z > 1.0, "keeps sliding along it");
        assert!(velocity.x.abs() < 0.1);
    }

    #[test]
    fn test_snap_to_ground() {
        let world = floor_and_wall();
        let mut position = Vec3::new(0.0, 1.2, 0.0);

        assert!(snap_to_ground(&world, &mut position, shape(), ContentFlags::MASK_BODY_SOLID, 0.4));
        assert!((position.y - 0.9).abs() < 0.01);

        let mut high = Vec3::new(0.0, 3.0, 0.0);
        assert!(!snap_to_ground(&world, &mut high, shape(), ContentFlags::MASK_BODY_SOLID, 0.4));
        assert_eq!(high.y, 3.0);
    }
}
