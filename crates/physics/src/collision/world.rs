//! Collision world containing all static geometry.
//!
//! The collision world stores collidable brushes and answers the queries the
//! movement core needs: downward rays and sphere contacts for ground probing,
//! and capsule sweeps for moving bodies.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{cast_shapes, contact, Ray, ShapeCastHit, ShapeCastOptions};
use parry3d::shape::SharedShape;

use super::flags::ContentFlags;
use super::trace::{SurfaceContact, TraceResult, TraceShape};
use crate::error::WorldError;

/// Gap a sweep leaves between the shape and whatever it hit.
pub const TRACE_SKIN: f32 = 0.002;

/// Overlap below this depth counts as touching, not penetrating.
const PENETRATION_TOLERANCE: f32 = 1.0e-4;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, terrain, trigger, etc.).
    pub contents: ContentFlags,
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Box brushes (axis-aligned and oriented)
/// - Vertical capsules (tree trunks, posts)
/// - Triangle meshes (terrain)
///
/// # Thread Safety
///
/// The world is only read during a tick. The host must not mutate it while
/// bodies are being stepped; under that contract it can be shared across
/// threads for parallel per-body ticks.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> u32 {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, contents)
    }

    /// Add a rotated box to the world. Ramps are built this way.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        contents: ContentFlags,
    ) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.push_brush(shape, isometry(center, rotation), contents)
    }

    /// Add a vertical capsule standing on `base`.
    ///
    /// `height` is the full height including both caps and must be at least
    /// twice the radius.
    pub fn add_capsule(
        &mut self,
        base: Vec3,
        radius: f32,
        height: f32,
        contents: ContentFlags,
    ) -> Result<u32, WorldError> {
        if !(radius > 0.0) || !(height >= 2.0 * radius) {
            return Err(WorldError::DegenerateCapsule { radius, height });
        }

        let half_cylinder = (height - 2.0 * radius) / 2.0;
        let shape = SharedShape::capsule_y(half_cylinder, radius);
        let center = base + Vec3::new(0.0, height / 2.0, 0.0);

        Ok(self.push_brush(shape, isometry(center, Quat::IDENTITY), contents))
    }

    /// Add a triangle mesh to the world.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Mesh vertex positions
    /// * `indices` - Triangle indices (3 per triangle)
    /// * `contents` - Content flags for collision filtering
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        contents: ContentFlags,
    ) -> Result<u32, WorldError> {
        if vertices.len() < 3 || indices.is_empty() {
            return Err(WorldError::InvalidMesh("mesh needs at least one triangle".into()));
        }
        if let Some(bad) = indices.iter().flatten().find(|&&i| i as usize >= vertices.len()) {
            return Err(WorldError::InvalidMesh(format!(
                "index {bad} out of range for {} vertices",
                vertices.len()
            )));
        }

        let parry_vertices: Vec<Point<Real>> = vertices.iter().map(|v| to_point(*v)).collect();
        let shape = SharedShape::trimesh(parry_vertices, indices.to_vec())
            .map_err(|e| WorldError::InvalidMesh(format!("{e:?}")))?;

        Ok(self.push_brush(shape, Isometry::identity(), contents))
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Check whether the world has any geometry at all.
    pub fn is_empty(&self) -> bool {
        self.brushes.is_empty()
    }

    /// Trace a shape through the world.
    ///
    /// Sweeps the given shape from `start` to `end` and returns information
    /// about what was hit. Both positions are shape centres. On a hit the
    /// shape stops [`TRACE_SKIN`] off the surface along its normal, so a
    /// follow-up move parallel to that surface starts clear of it.
    ///
    /// Touching geometry is not a hit, and neither is moving away from
    /// geometry the shape already overlaps; only motion into a surface is
    /// blocked.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, mask: ContentFlags) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();

        // No movement - just check if position is valid
        if distance < 0.0001 {
            return if self.point_in_solid(start, shape, mask) {
                TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_contents: ContentFlags::SOLID,
                    started_in_solid: true,
                    all_solid: true,
                    hit_brush: None,
                }
            } else {
                TraceResult::no_hit(start)
            };
        }

        let started_in_solid = self.point_in_solid(start, shape, mask);
        let Some((hit, brush)) = self.first_impact(start, delta, shape, mask) else {
            return TraceResult {
                started_in_solid,
                ..TraceResult::no_hit(end)
            };
        };

        // normal1 is in the swept shape's frame, which is never rotated
        let normal = -to_vec3(&hit.normal1);
        let normal = if normal.is_finite() && normal.length_squared() > 0.5 {
            normal.normalize()
        } else {
            -delta / distance
        };

        let fraction = hit.time_of_impact.clamp(0.0, 1.0);

        TraceResult {
            fraction,
            end_position: start + delta * fraction + normal * TRACE_SKIN,
            hit_normal: Some(normal),
            hit_contents: brush.contents,
            started_in_solid,
            all_solid: started_in_solid && fraction <= 0.0,
            hit_brush: Some(brush.id),
        }
    }

    /// Perform a raycast (point trace) through the world.
    ///
    /// The returned normal always faces back toward the ray origin, so
    /// one-sided mesh triangles hit from behind still report a usable
    /// surface.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, mask: ContentFlags) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 0.5 || !(max_distance > 0.0) {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(to_point(origin), Vector::new(dir.x, dir.y, dir.z));

        let mut closest_hit: Option<(f32, &CollisionBrush)> = None;

        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }

            if let Some(toi) = brush.shape.cast_ray(&brush.transform, &ray, max_distance, true) {
                let is_closer = closest_hit.as_ref().map_or(true, |(dist, _)| toi < *dist);
                if is_closer {
                    closest_hit = Some((toi, brush));
                }
            }
        }

        let Some((distance, brush)) = closest_hit else {
            return TraceResult::no_hit(origin + dir * max_distance);
        };

        let mut normal = self.compute_hit_normal(&ray, distance, brush);
        if normal.dot(dir) > 0.0 {
            normal = -normal;
        }

        TraceResult {
            fraction: distance / max_distance,
            end_position: origin + dir * distance,
            hit_normal: Some(normal),
            hit_contents: brush.contents,
            started_in_solid: distance <= 0.0,
            all_solid: false,
            hit_brush: Some(brush.id),
        }
    }

    /// Find the closest surface within `prediction` of a sphere.
    ///
    /// Returns `None` when nothing matching `mask` is that close.
    pub fn sphere_contact(
        &self,
        center: Vec3,
        radius: f32,
        prediction: f32,
        mask: ContentFlags,
    ) -> Option<SurfaceContact> {
        let ball = SharedShape::ball(radius.max(0.001));
        let ball_transform = isometry(center, Quat::IDENTITY);

        let mut closest: Option<SurfaceContact> = None;

        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }

            let Ok(Some(found)) = contact(
                &ball_transform,
                ball.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                prediction.max(0.0),
            ) else {
                continue;
            };

            if closest.map_or(true, |c| found.dist < c.distance) {
                closest = Some(SurfaceContact {
                    point: Vec3::new(found.point2.x, found.point2.y, found.point2.z),
                    normal: to_vec3(&found.normal2),
                    distance: found.dist,
                    brush: brush.id,
                });
            }
        }

        closest
    }

    /// Check if a shape at a position overlaps solid geometry. A shape
    /// resting against a surface is not in solid.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> bool {
        let test_shape = create_parry_shape(shape);
        let test_transform = isometry(position, Quat::IDENTITY);

        self.brushes
            .iter()
            .filter(|brush| mask.intersects(brush.contents))
            .any(|brush| {
                matches!(
                    contact(
                        &test_transform,
                        test_shape.as_ref(),
                        &brush.transform,
                        brush.shape.as_ref(),
                        0.0,
                    ),
                    Ok(Some(found)) if found.dist < -PENETRATION_TOLERANCE
                )
            })
    }

    /// Resolve collision by pushing a shape out of solid geometry.
    ///
    /// Returns the corrected position.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, mask: ContentFlags) -> Vec3 {
        let test_shape = create_parry_shape(shape);
        let test_transform = isometry(position, Quat::IDENTITY);

        let mut correction = Vec3::ZERO;

        for brush in &self.brushes {
            if !mask.intersects(brush.contents) {
                continue;
            }

            if let Ok(Some(found)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                0.0,
            ) {
                // normal2 points out of the brush, toward the test shape
                let depth = -found.dist;
                if depth > 0.0 {
                    correction += to_vec3(&found.normal2) * (depth + 0.001);
                }
            }
        }

        position + correction
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_brush(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
        });

        id
    }

    /// Earliest time of impact of `shape` swept by `delta` from `start`.
    ///
    /// Times are fractions of `delta`. Impacts at time zero whose motion
    /// separates the shapes are discarded by parry.
    fn first_impact(
        &self,
        start: Vec3,
        delta: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
    ) -> Option<(ShapeCastHit, &CollisionBrush)> {
        let swept = create_parry_shape(shape);
        let swept_transform = isometry(start, Quat::IDENTITY);
        let velocity = Vector::new(delta.x, delta.y, delta.z);
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: true,
        };

        let mut closest: Option<(ShapeCastHit, &CollisionBrush)> = None;

        for brush in self.brushes.iter().filter(|brush| mask.intersects(brush.contents)) {
            let Ok(Some(hit)) = cast_shapes(
                &swept_transform,
                &velocity,
                swept.as_ref(),
                &brush.transform,
                &Vector::zeros(),
                brush.shape.as_ref(),
                options,
            ) else {
                continue;
            };

            if closest.map_or(true, |(best, _)| hit.time_of_impact < best.time_of_impact) {
                closest = Some((hit, brush));
            }
        }

        closest
    }

    /// Compute hit normal from a ray intersection.
    fn compute_hit_normal(&self, ray: &Ray, toi: f32, brush: &CollisionBrush) -> Vec3 {
        match brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, ray, toi + 0.01, true)
        {
            Some(intersection) => to_vec3(&intersection.normal),
            None => -Vec3::new(ray.dir.x, ray.dir.y, ray.dir.z).normalize_or_zero(),
        }
    }
}

fn create_parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsule is defined by half-height of the cylinder part
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(cylinder_half_height, radius)
        }
        TraceShape::Sphere { radius } => SharedShape::ball(radius),
        TraceShape::Point => SharedShape::ball(0.001),
    }
}

fn isometry(center: Vec3, rotation: Quat) -> Isometry<Real> {
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(rotation.w, rotation.x, rotation.y, rotation.z));
    Isometry::from_parts(Translation3::new(center.x, center.y, center.z), rotation)
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn to_vec3(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================
