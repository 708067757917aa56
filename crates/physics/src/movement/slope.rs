//! Slope classification.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::probe::GroundSample;

/// What kind of ground the body stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlopeKind {
    /// Level within normal-vector noise.
    Flat,
    /// Sloped but walkable.
    WalkableSlope,
    /// Steeper than the walkable limit, or unreadable. The body slides.
    TooSteep,
}

/// Classified ground for one tick. Never cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlopeClassification {
    pub kind: SlopeKind,

    /// Unit surface normal. World up when the sampled normal is degenerate.
    pub normal: Vec3,

    /// Slope angle in degrees (NaN for a degenerate normal).
    pub angle: f32,

    /// Steepest-descent direction within the slope plane. `None` on flat
    /// ground and for degenerate normals.
    pub slide_direction: Option<Vec3>,
}

impl SlopeClassification {
    /// Check if this ground makes the body slide.
    #[inline]
    pub fn is_too_steep(&self) -> bool {
        self.kind == SlopeKind::TooSteep
    }
}

/// Turns a ground sample into a classification.
pub trait SlopeClassifier {
    /// Classify a sample against the steepest walkable angle (degrees).
    /// Returns `None` when the sample has no ground.
    fn classify(&self, sample: &GroundSample, max_angle: f32) -> Option<SlopeClassification>;
}

/// Classifies by fixed angle thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdClassifier {
    /// Angles at or below this count as flat (degrees).
    pub flat_angle: f32,
}

impl Default for ThresholdClassifier {
    fn default() -> Self {
        Self { flat_angle: 1.0 }
    }
}

impl SlopeClassifier for ThresholdClassifier {
    fn classify(&self, sample: &GroundSample, max_angle: f32) -> Option<SlopeClassification> {
        let contact = sample.contact?;
        let kind = classify_angle(contact.slope_angle, self.flat_angle, max_angle);

        let unit_normal = contact
            .normal
            .try_normalize()
            .filter(|_| !contact.slope_angle.is_nan());

        let slide_direction = match kind {
            SlopeKind::Flat => None,
            _ => unit_normal.and_then(slide_direction),
        };

        Some(SlopeClassification {
            kind,
            normal: unit_normal.unwrap_or(Vec3::Y),
            angle: contact.slope_angle,
            slide_direction,
        })
    }
}

/// Classify a slope angle (degrees).
///
/// The upper bound is inclusive: exactly `max_angle` is walkable. NaN is too
/// steep.
pub fn classify_angle(angle: f32, flat_angle: f32, max_angle: f32) -> SlopeKind {
    if angle.is_nan() || angle > max_angle {
        SlopeKind::TooSteep
    } else if angle <= flat_angle {
        SlopeKind::Flat
    } else {
        SlopeKind::WalkableSlope
    }
}

/// Steepest-descent direction on the plane with the given unit normal.
///
/// This is world up projected onto the plane, negated so it points downhill.
/// `None` when the plane is level or the normal is vertical-degenerate.
pub fn slide_direction(normal: Vec3) -> Option<Vec3> {
    let uphill = Vec3::Y - normal * Vec3::Y.dot(normal);
    (-uphill).try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::probe::{slope_angle, GroundContact};

    fn sample_with_normal(normal: Vec3) -> GroundSample {
        GroundSample {
            contact: Some(GroundContact {
                point: Vec3::ZERO,
                normal,
                slope_angle: slope_angle(normal),
                brush: None,
            }),
        }
    }

    fn normal_at(degrees: f32) -> Vec3 {
        let radians = degrees.to_radians();
        Vec3::new(radians.sin(), radians.cos(), 0.0)
    }

    #[test]
    fn test_classify_angle_thresholds() {
        assert_eq!(classify_angle(0.0, 1.0, 45.0), SlopeKind::Flat);
        assert_eq!(classify_angle(1.0, 1.0, 45.0), SlopeKind::Flat);
        assert_eq!(classify_angle(1.01, 1.0, 45.0), SlopeKind::WalkableSlope);
        assert_eq!(classify_angle(30.0, 1.0, 45.0), SlopeKind::WalkableSlope);
        assert_eq!(classify_angle(45.0, 1.0, 45.0), SlopeKind::WalkableSlope);
        assert_eq!(classify_angle(45.01, 1.0, 45.0), SlopeKind::TooSteep);
        assert_eq!(classify_angle(120.0, 1.0, 45.0), SlopeKind::TooSteep);
    }

    #[test]
    fn test_classify_angle_sweep() {
        for tenth in 0..900 {
            let angle = tenth as f32 / 10.0;
            let expected = if angle <= 1.0 {
                SlopeKind::Flat
            } else if angle <= 40.0 {
                SlopeKind::WalkableSlope
            } else {
                SlopeKind::TooSteep
            };
            assert_eq!(classify_angle(angle, 1.0, 40.0), expected, "angle {angle}");
        }
    }

    #[test]
    fn test_nan_angle_is_too_steep() {
        assert_eq!(classify_angle(f32::NAN, 1.0, 45.0), SlopeKind::TooSteep);

        let classifier = ThresholdClassifier::default();
        let result = classifier
            .classify(&sample_with_normal(Vec3::ZERO), 45.0)
            .expect("contact present");
        assert_eq!(result.kind, SlopeKind::TooSteep);
        assert_eq!(result.slide_direction, None);
        assert_eq!(result.normal, Vec3::Y);
    }

    #[test]
    fn test_miss_has_no_classification() {
        let classifier = ThresholdClassifier::default();
        assert_eq!(classifier.classify(&GroundSample::MISS, 45.0), None);
    }

    #[test]
    fn test_flat_has_no_slide_direction() {
        let classifier = ThresholdClassifier::default();
        let result = classifier.classify(&sample_with_normal(Vec3::Y), 45.0).expect("contact");
        assert_eq!(result.kind, SlopeKind::Flat);
        assert_eq!(result.slide_direction, None);
    }

    #[test]
    fn test_steep_slope_slides_downhill() {
        let classifier = ThresholdClassifier::default();
        let normal = normal_at(50.0);
        let result = classifier.classify(&sample_with_normal(normal), 45.0).expect("contact");

        assert_eq!(result.kind, SlopeKind::TooSteep);
        let dir = result.slide_direction.expect("steep slope has a slide direction");
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.dot(normal).abs() < 1e-5, "slide stays in the plane");
        assert!(dir.y < 0.0, "slide goes down");
        // Normal leans toward +X, so downhill is +X
        assert!(dir.x > 0.0);
    }

    #[test]
    fn test_walkable_boundary_uses_sampled_angle() {
        let classifier = ThresholdClassifier::default();
        let result = classifier
            .classify(&sample_with_normal(normal_at(45.0)), 45.5)
            .expect("contact");
        assert_eq!(result.kind, SlopeKind::WalkableSlope);
        assert!(result.slide_direction.is_some());
    }
}
